//! Terminal rendering for pipeline output.
//!
//! Extension traits that add colored rendering to goodaction-core types using owo_colors.

use goodaction_core::Category;
use goodaction_core::flatten::FlatRecord;
use goodaction_core::time::{Countdown, Zone};
use owo_colors::OwoColorize;
use serde::Serialize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Category {
    fn render(&self) -> String {
        let label = format!("[{}]", self);
        match self {
            Category::Conference => label.blue().to_string(),
            Category::Competition => label.magenta().to_string(),
            Category::Activity => label.green().to_string(),
        }
    }
}

/// Deadlines closer than this are highlighted
const URGENT_DAYS: i64 = 7;

impl Render for Countdown {
    fn render(&self) -> String {
        let text = format!("{:>16}", self.to_string());
        if self.ended {
            text.dimmed().to_string()
        } else if self.days < URGENT_DAYS {
            text.red().bold().to_string()
        } else {
            text.yellow().to_string()
        }
    }
}

/// Render one record as a block of lines, with the deadline shown in `zone`.
pub fn render_record(record: &FlatRecord<'_>, zone: &Zone, favorite: bool) -> String {
    let item = record.item;
    let event = record.event;

    let star = if favorite { " ★".yellow().to_string() } else { String::new() };
    let title = format!("{} {}", item.title, event.year);
    let title = if record.is_ended() {
        title.dimmed().to_string()
    } else {
        title.bold().to_string()
    };

    let mut lines = vec![format!(
        "{} {} {}{}",
        record.countdown().render(),
        title,
        item.category.render(),
        star
    )];

    let deadline = zone.convert(&record.next_deadline);
    let milestone = record.milestone_comment();
    let deadline_text = format!("{} ({})", deadline.format("%Y-%m-%d %H:%M"), zone);
    if milestone.is_empty() {
        lines.push(format!("   {}", deadline_text));
    } else {
        lines.push(format!("   {} · {}", milestone, deadline_text));
    }

    let details: Vec<&str> = [event.location.as_str(), event.date.as_str()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();
    if !details.is_empty() {
        lines.push(format!("   {}", details.join(" · ").dimmed()));
    }

    if !item.tags.is_empty() {
        let tags: Vec<String> = item.tags.iter().map(|t| format!("#{}", t)).collect();
        lines.push(format!("   {}", tags.join(" ").cyan()));
    }

    let mut footer = format!("id: {}", event.id);
    if !event.link.is_empty() {
        footer.push_str(&format!("  {}", event.link));
    }
    lines.push(format!("   {}", footer.dimmed()));

    lines.join("\n")
}

/// Display-ready record for `--json` output.
#[derive(Serialize)]
pub struct RecordView<'a> {
    pub event_id: &'a str,
    pub item_id: String,
    pub title: &'a str,
    pub description: &'a str,
    pub category: Category,
    pub tags: &'a [String],
    pub year: i32,
    pub location: &'a str,
    pub date: &'a str,
    pub link: &'a str,
    pub next_deadline: String,
    pub milestone: &'a str,
    pub time_remaining_ms: i64,
    pub ended: bool,
    pub favorite: bool,
}

impl<'a> RecordView<'a> {
    pub fn new(record: &FlatRecord<'a>, zone: &Zone, favorite: bool) -> Self {
        RecordView {
            event_id: &record.event.id,
            item_id: record.item.id(),
            title: &record.item.title,
            description: &record.item.description,
            category: record.item.category,
            tags: &record.item.tags,
            year: record.event.year,
            location: &record.event.location,
            date: &record.event.date,
            link: &record.event.link,
            next_deadline: zone.convert(&record.next_deadline).to_rfc3339(),
            milestone: record.milestone_comment(),
            time_remaining_ms: record.time_remaining_ms,
            ended: record.is_ended(),
            favorite,
        }
    }
}

/// Simple pluralization helper
pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}
