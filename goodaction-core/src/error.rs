//! Error types for the GoodAction pipeline.

use thiserror::Error;

/// Errors that can occur while loading a catalog or resolving its deadlines.
#[derive(Error, Debug)]
pub enum HubError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Event '{event_id}' has an empty timeline")]
    EmptyTimeline { event_id: String },

    #[error("Malformed timeline entry in event '{event_id}': {reason}")]
    MalformedTimelineEntry { event_id: String, reason: String },

    #[error("Could not fetch catalog from {source_name}: {reason}")]
    CatalogFetch { source_name: String, reason: String },

    #[error("Catalog fetch timed out after {0}s")]
    FetchTimeout(u64),

    #[error("Catalog parse error: {0}")]
    CatalogParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HubError {
    /// True for failures that belong to a single event instance rather than the whole catalog.
    pub fn is_record_local(&self) -> bool {
        matches!(
            self,
            HubError::EmptyTimeline { .. } | HubError::MalformedTimelineEntry { .. }
        )
    }
}

/// Result type alias for GoodAction operations.
pub type HubResult<T> = Result<T, HubError>;
