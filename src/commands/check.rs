use anyhow::Result;
use owo_colors::OwoColorize;

use super::load_catalog;
use crate::Session;
use crate::render::pluralize;

pub async fn run(session: &Session) -> Result<()> {
    let catalog = load_catalog(session).await?;
    let issues = catalog.validate();

    println!(
        "{} {} {}, {} {}",
        session.source.display_name().bold(),
        catalog.items.len(),
        pluralize("item", catalog.items.len()),
        catalog.event_count(),
        pluralize("event", catalog.event_count()),
    );

    if issues.is_empty() {
        println!("{}", "Catalog is valid".green());
        return Ok(());
    }

    for issue in &issues {
        println!("   {} {}", "✗".red(), issue);
    }

    anyhow::bail!(
        "Found {} {} in the catalog",
        issues.len(),
        pluralize("problem", issues.len())
    );
}
