pub mod check;
pub mod facets;
pub mod favorite;
pub mod list;

use anyhow::Result;
use goodaction_core::Catalog;

use crate::Session;
use crate::source::fetch_catalog;

/// Fetch the session's catalog snapshot.
pub async fn load_catalog(session: &Session) -> Result<Catalog> {
    let catalog = fetch_catalog(&session.source, session.config.fetch_timeout_secs).await?;
    Ok(catalog)
}
