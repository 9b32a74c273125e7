mod commands;
mod favorites;
mod render;
mod source;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use goodaction_core::Category;
use goodaction_core::config::{AUTO_TIMEZONE, CatalogSource, HubConfig};
use goodaction_core::filter::FilterCriteria;
use goodaction_core::search::FieldWeights;
use goodaction_core::time::Zone;

use crate::favorites::Favorites;

#[derive(Parser)]
#[command(name = "goodaction")]
#[command(about = "Track upcoming deadlines of conferences, competitions and charitable activities")]
struct Cli {
    /// Catalog JSON file or http(s) URL (overrides the configured catalog)
    #[arg(long, global = true)]
    source: Option<String>,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List events ranked by their next deadline
    List {
        #[command(flatten)]
        filters: FilterArgs,

        /// Fuzzy search over title, tags, location and deadline date
        #[arg(short, long)]
        query: Option<String>,

        #[command(flatten)]
        view: ViewArgs,
    },
    /// Search everything and show the best matches, most urgent first
    Search {
        query: String,

        #[command(flatten)]
        view: ViewArgs,
    },
    /// Show the categories, tags and locations that can be filtered on
    Facets,
    /// Manage favorite events
    Favorite {
        #[command(subcommand)]
        action: FavoriteAction,
    },
    /// Validate the catalog and report events that cannot be resolved
    Check,
}

#[derive(Subcommand)]
enum FavoriteAction {
    /// Mark an event (by event id) as favorite
    Add { event_id: String },
    /// Remove an event from favorites
    Remove { event_id: String },
    /// List favorite events
    List,
}

#[derive(Args)]
struct FilterArgs {
    /// Only this category (conference, competition, activity)
    #[arg(short, long)]
    category: Option<Category>,

    /// Only items with any of these tags (repeatable)
    #[arg(short, long = "tag")]
    tags: Vec<String>,

    /// Only events at any of these locations (repeatable)
    #[arg(short, long = "location")]
    locations: Vec<String>,

    /// Only favorite events
    #[arg(short, long)]
    favorites: bool,
}

#[derive(Args)]
pub struct ViewArgs {
    /// Timezone to show deadlines in (IANA name, UTC±H, AoE or "auto")
    #[arg(long)]
    tz: Option<String>,

    /// Reference instant instead of the current time (RFC 3339)
    #[arg(long)]
    now: Option<String>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

/// Settings shared by every command, resolved once from config and flags.
pub struct Session {
    pub config: HubConfig,
    pub source: CatalogSource,
    pub favorites: Favorites,
}

/// How a listing is shown.
pub struct View {
    pub zone: Zone,
    pub now: DateTime<Utc>,
    pub json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = HubConfig::load()?;
    let source = match cli.source.as_deref() {
        Some(s) => CatalogSource::parse(s),
        None => config.catalog_source(),
    };
    let session = Session {
        source,
        favorites: Favorites::load_or_default(),
        config,
    };

    match cli.command {
        Commands::List {
            filters,
            query,
            view,
        } => {
            let view = resolve_view(&session.config, &view)?;
            let criteria = filters.into_criteria(&session.favorites);
            let options = session.config.search;
            commands::list::run(&session, &view, &criteria, query.as_deref().unwrap_or(""), &options)
                .await
        }
        Commands::Search { query, view } => {
            let view = resolve_view(&session.config, &view)?;
            let options = session
                .config
                .search
                .with_weights(FieldWeights::recommendation());
            commands::list::run(&session, &view, &FilterCriteria::default(), &query, &options).await
        }
        Commands::Facets => commands::facets::run(&session).await,
        Commands::Favorite { action } => match action {
            FavoriteAction::Add { event_id } => commands::favorite::add(&session, &event_id).await,
            FavoriteAction::Remove { event_id } => commands::favorite::remove(&event_id),
            FavoriteAction::List => commands::favorite::list(&session).await,
        },
        Commands::Check => commands::check::run(&session).await,
    }
}

fn init_tracing(verbose: bool) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter(verbose))
        .init();
}

fn env_filter(verbose: bool) -> tracing_subscriber::EnvFilter {
    let rust_log = std::env::var(tracing_subscriber::EnvFilter::DEFAULT_ENV).unwrap_or_default();
    env_filter_from(verbose, &rust_log)
}

/// `RUST_LOG` wins when set; otherwise warn, or debug with `--verbose`.
fn env_filter_from(verbose: bool, directives: &str) -> tracing_subscriber::EnvFilter {
    let default_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::EnvFilter::builder()
        .with_default_directive(default_level.into())
        .parse_lossy(directives)
}

impl FilterArgs {
    fn into_criteria(self, favorites: &Favorites) -> FilterCriteria {
        FilterCriteria {
            category: self.category,
            tags: self.tags.into_iter().collect(),
            locations: self.locations.into_iter().collect(),
            favorites_only: self.favorites,
            favorite_ids: favorites.ids().clone(),
        }
    }
}

fn resolve_view(config: &HubConfig, args: &ViewArgs) -> Result<View> {
    let zone = match args.tz.as_deref() {
        Some(tz) if tz.eq_ignore_ascii_case(AUTO_TIMEZONE) => system_zone(),
        Some(tz) => Zone::parse(tz).map_err(|e| anyhow::anyhow!(e))?,
        None => match config.display_zone()? {
            Some(zone) => zone,
            None => system_zone(),
        },
    };

    let now = match args.now.as_deref() {
        Some(s) => DateTime::parse_from_rfc3339(s)
            .with_context(|| format!("Invalid --now '{}'. Expected RFC 3339, e.g. 2025-03-01T00:00:00Z", s))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    Ok(View {
        zone,
        now,
        json: args.json,
    })
}

/// The system timezone, falling back to UTC when it cannot be detected.
fn system_zone() -> Zone {
    let detected = iana_time_zone::get_timezone()
        .map_err(|e| e.to_string())
        .and_then(|name| Zone::parse(&name));

    match detected {
        Ok(zone) => zone,
        Err(e) => {
            tracing::warn!("Could not detect system timezone ({}), using UTC", e);
            Zone::Iana(chrono_tz::UTC)
        }
    }
}
