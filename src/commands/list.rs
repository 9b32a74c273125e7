use anyhow::Result;
use goodaction_core::filter::FilterCriteria;
use goodaction_core::pipeline::Pipeline;
use goodaction_core::search::SearchOptions;
use owo_colors::OwoColorize;

use super::load_catalog;
use crate::render::{RecordView, pluralize, render_record};
use crate::{Session, View};

pub async fn run(
    session: &Session,
    view: &View,
    criteria: &FilterCriteria,
    query: &str,
    options: &SearchOptions,
) -> Result<()> {
    let catalog = load_catalog(session).await?;
    let pipeline = Pipeline::new(&catalog, view.now, options);
    let records = pipeline.run(criteria, query);

    if view.json {
        let views: Vec<RecordView> = records
            .iter()
            .map(|r| RecordView::new(r, &view.zone, session.favorites.contains(&r.event.id)))
            .collect();
        println!("{}", serde_json::to_string_pretty(&views)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    for (i, record) in records.iter().enumerate() {
        if i > 0 {
            println!();
        }
        let favorite = session.favorites.contains(&record.event.id);
        println!("{}", render_record(record, &view.zone, favorite));
    }

    let upcoming = records.iter().filter(|r| !r.is_ended()).count();
    println!();
    println!(
        "{}",
        format!(
            "{} {}, {} upcoming",
            records.len(),
            pluralize("event", records.len()),
            upcoming
        )
        .dimmed()
    );

    Ok(())
}
