use anyhow::Result;
use owo_colors::OwoColorize;

use super::load_catalog;
use crate::Session;
use crate::favorites::Favorites;
use crate::render::Render;

/// Mark an event as favorite. The id must exist in the current catalog.
///
/// Edits reload the store strictly so a damaged file is reported, not overwritten.
pub async fn add(session: &Session, event_id: &str) -> Result<()> {
    let catalog = load_catalog(&session).await?;
    let Some((item, event)) = catalog.find_event(event_id) else {
        anyhow::bail!(
            "No event with id '{}' in {}",
            event_id,
            session.source.display_name()
        );
    };

    let mut favorites = Favorites::load()?;
    if !favorites.add(event_id) {
        println!("{} {}", "Already a favorite:".dimmed(), event_id);
        return Ok(());
    }
    favorites.save()?;

    println!("{} {} {}", "★".yellow(), item.title, event.year);
    Ok(())
}

/// Remove a favorite. Works offline, so stale ids can be cleaned up.
pub fn remove(event_id: &str) -> Result<()> {
    let mut favorites = Favorites::load()?;
    if !favorites.remove(event_id) {
        anyhow::bail!("'{}' is not a favorite", event_id);
    }
    favorites.save()?;

    println!("{} {}", "Removed".green(), event_id);
    Ok(())
}

pub async fn list(session: &Session) -> Result<()> {
    if session.favorites.ids().is_empty() {
        println!("{}", "No favorites yet".dimmed());
        return Ok(());
    }

    let catalog = load_catalog(session).await?;
    for event_id in session.favorites.ids() {
        match catalog.find_event(event_id) {
            Some((item, event)) => println!(
                "{} {} {} {}",
                "★".yellow(),
                item.title,
                event.year,
                item.category.render()
            ),
            None => println!(
                "{} {} {}",
                "★".dimmed(),
                event_id,
                "(not in catalog)".dimmed()
            ),
        }
        println!("   {}", format!("id: {}", event_id).dimmed());
    }

    Ok(())
}
