//! Catalog fetch from a local file or an HTTP endpoint.
//!
//! This is the only asynchronous step: once a snapshot is returned, everything
//! downstream runs synchronously on it.

use std::time::Duration;

use goodaction_core::config::CatalogSource;
use goodaction_core::{Catalog, HubError, HubResult};

/// Fetch the full catalog snapshot, giving up after `timeout_secs` or on Ctrl-C.
pub async fn fetch_catalog(source: &CatalogSource, timeout_secs: u64) -> HubResult<Catalog> {
    tracing::debug!(source = %source.display_name(), "Fetching catalog");

    let fetch = tokio::time::timeout(Duration::from_secs(timeout_secs), fetch_text(source));

    let text = tokio::select! {
        result = fetch => result.map_err(|_| HubError::FetchTimeout(timeout_secs))??,
        _ = tokio::signal::ctrl_c() => {
            return Err(fetch_error(source, "cancelled"));
        }
    };

    let catalog = Catalog::from_json(&text)?;
    tracing::debug!(
        items = catalog.items.len(),
        events = catalog.event_count(),
        "Catalog loaded"
    );
    Ok(catalog)
}

async fn fetch_text(source: &CatalogSource) -> HubResult<String> {
    match source {
        CatalogSource::Path(path) => tokio::fs::read_to_string(path)
            .await
            .map_err(|e| fetch_error(source, e)),
        CatalogSource::Url(raw) => {
            let url = url::Url::parse(raw).map_err(|e| fetch_error(source, e))?;

            let response = reqwest::get(url)
                .await
                .and_then(|r| r.error_for_status())
                .map_err(|e| fetch_error(source, e))?;

            response.text().await.map_err(|e| fetch_error(source, e))
        }
    }
}

fn fetch_error(source: &CatalogSource, reason: impl ToString) -> HubError {
    HubError::CatalogFetch {
        source_name: source.display_name(),
        reason: reason.to_string(),
    }
}
