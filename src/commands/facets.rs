use anyhow::Result;
use goodaction_core::Category;
use owo_colors::OwoColorize;

use super::load_catalog;
use crate::Session;
use crate::render::Render;

pub async fn run(session: &Session) -> Result<()> {
    let catalog = load_catalog(session).await?;

    println!("{}", "Categories".bold());
    for category in Category::ALL {
        let count = catalog
            .items
            .iter()
            .filter(|item| item.category == category)
            .map(|item| item.events.len())
            .sum::<usize>();
        println!("  {} {}", category.render(), count.to_string().dimmed());
    }

    println!();
    println!("{}", "Tags".bold());
    print_values(catalog.tags());

    println!();
    println!("{}", "Locations".bold());
    print_values(catalog.locations());

    Ok(())
}

fn print_values<'a>(values: impl IntoIterator<Item = &'a str>) {
    let values: Vec<&str> = values.into_iter().collect();
    if values.is_empty() {
        println!("  {}", "(none)".dimmed());
    } else {
        println!("  {}", values.join(", "));
    }
}
