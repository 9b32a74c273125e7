//! Global GoodAction configuration.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{HubError, HubResult};
use crate::search::SearchOptions;
use crate::time::Zone;

static DEFAULT_CATALOG: &str = "~/.goodaction/data.json";
static DEFAULT_DISPLAY_TIMEZONE: &str = "Asia/Shanghai";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 15;

/// Display timezone value that means "use the system zone".
pub const AUTO_TIMEZONE: &str = "auto";

fn default_catalog() -> String {
    DEFAULT_CATALOG.to_string()
}

fn default_display_timezone() -> String {
    DEFAULT_DISPLAY_TIMEZONE.to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

fn is_default_catalog(s: &String) -> bool {
    s == DEFAULT_CATALOG
}

fn is_default_display_timezone(s: &String) -> bool {
    s == DEFAULT_DISPLAY_TIMEZONE
}

fn is_default_fetch_timeout(secs: &u64) -> bool {
    *secs == DEFAULT_FETCH_TIMEOUT_SECS
}

/// Where the catalog snapshot comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Path(PathBuf),
    Url(String),
}

impl CatalogSource {
    /// `http(s)://` locations are URLs; anything else is a path, with `~` expanded.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.starts_with("http://") || s.starts_with("https://") {
            CatalogSource::Url(s.to_string())
        } else {
            CatalogSource::Path(PathBuf::from(shellexpand::tilde(s).into_owned()))
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            CatalogSource::Path(path) => path.display().to_string(),
            CatalogSource::Url(url) => url.clone(),
        }
    }
}

/// Global configuration at ~/.config/goodaction/config.toml
///
/// Every key can be overridden with a `GOODACTION_` environment variable,
/// e.g. `GOODACTION_CATALOG` or `GOODACTION_SEARCH__THRESHOLD`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HubConfig {
    #[serde(default = "default_catalog", skip_serializing_if = "is_default_catalog")]
    pub catalog: String,

    #[serde(
        default = "default_display_timezone",
        skip_serializing_if = "is_default_display_timezone"
    )]
    pub display_timezone: String,

    #[serde(
        default = "default_fetch_timeout_secs",
        skip_serializing_if = "is_default_fetch_timeout"
    )]
    pub fetch_timeout_secs: u64,

    #[serde(default)]
    pub search: SearchOptions,
}

impl Default for HubConfig {
    fn default() -> Self {
        HubConfig {
            catalog: default_catalog(),
            display_timezone: default_display_timezone(),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            search: SearchOptions::default(),
        }
    }
}

impl HubConfig {
    pub fn config_dir() -> HubResult<PathBuf> {
        Ok(dirs::config_dir()
            .ok_or_else(|| HubError::Config("Could not determine config directory".into()))?
            .join("goodaction"))
    }

    pub fn config_path() -> HubResult<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load the global config, creating a commented-out default file on first run.
    pub fn load() -> HubResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from a specific file (missing is fine) plus environment overrides.
    pub fn load_from(path: &Path) -> HubResult<Self> {
        let mut config: HubConfig = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(
                Environment::with_prefix("GOODACTION")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(|e| HubError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| HubError::Config(e.to_string()))?;

        config.search = config.search.with_threshold(config.search.threshold);
        Ok(config)
    }

    pub fn catalog_source(&self) -> CatalogSource {
        CatalogSource::parse(&self.catalog)
    }

    /// The configured display zone. `auto` is resolved by the caller, which knows the system zone.
    pub fn display_zone(&self) -> HubResult<Option<Zone>> {
        if self.display_timezone.eq_ignore_ascii_case(AUTO_TIMEZONE) {
            return Ok(None);
        }
        Zone::parse(&self.display_timezone)
            .map(Some)
            .map_err(HubError::Config)
    }

    pub fn save_to(&self, path: &Path) -> HubResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| HubError::Config(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)
            .map_err(|e| HubError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> HubResult<()> {
        let contents = format!(
            "\
# GoodAction configuration

# Catalog location, a JSON file or an http(s) URL:
# catalog = \"{}\"

# Timezone deadlines are shown in (\"auto\" uses the system timezone):
# display_timezone = \"{}\"

# Seconds to wait for a remote catalog:
# fetch_timeout_secs = {}

# [search]
# Mismatch ratio a field may have and still match (0.0 = exact only):
# threshold = 0.3
",
            DEFAULT_CATALOG, DEFAULT_DISPLAY_TIMEZONE, DEFAULT_FETCH_TIMEOUT_SECS
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                HubError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| HubError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
