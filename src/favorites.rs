//! Favorite event ids, persisted at ~/.config/goodaction/favorites.toml

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use goodaction_core::config::HubConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favorites {
    #[serde(default)]
    events: BTreeSet<String>,
}

impl Favorites {
    pub fn path() -> Result<PathBuf> {
        Ok(HubConfig::config_dir()?.join("favorites.toml"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Like [`Favorites::load`], but an unreadable file only costs the
    /// favorites, not the command.
    pub fn load_or_default() -> Self {
        match Self::path() {
            Ok(path) => Self::load_from_or_default(&path),
            Err(e) => {
                tracing::warn!("Could not locate favorites: {:#}", e);
                Favorites::default()
            }
        }
    }

    pub fn load_from_or_default(path: &Path) -> Self {
        Self::load_from(path).unwrap_or_else(|e| {
            tracing::warn!("Ignoring favorites: {:#}", e);
            Favorites::default()
        })
    }

    /// Load favorites; a missing file means no favorites yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Favorites::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid favorites file {}", path.display()))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)
            .with_context(|| format!("Could not write {}", path.display()))?;
        Ok(())
    }

    pub fn ids(&self) -> &BTreeSet<String> {
        &self.events
    }

    pub fn contains(&self, event_id: &str) -> bool {
        self.events.contains(event_id)
    }

    /// Returns false if the event was already a favorite.
    pub fn add(&mut self, event_id: &str) -> bool {
        self.events.insert(event_id.to_string())
    }

    /// Returns false if the event was not a favorite.
    pub fn remove(&mut self, event_id: &str) -> bool {
        self.events.remove(event_id)
    }
}
