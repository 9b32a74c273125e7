//! Core types and pipeline for the GoodAction deadline tracker.
//!
//! This crate turns a catalog of recurring items into a ranked, display-ready list:
//! - `catalog` holds the `Item` / `EventInstance` / `TimelineEntry` tree
//! - `time` resolves the next deadline of an event instance relative to "now"
//! - `flatten`, `filter`, `search` and `rank` are the pipeline stages
//! - `pipeline` wires the stages together and keeps the search index between queries

pub mod catalog;
pub mod config;
pub mod error;
pub mod filter;
pub mod flatten;
pub mod pipeline;
pub mod rank;
pub mod search;
pub mod time;

// Re-export the catalog types at crate root for convenience
pub use catalog::*;
pub use error::{HubError, HubResult};
