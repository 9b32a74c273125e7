//! Expansion of the catalog into one record per (item, event instance).

use chrono::{DateTime, FixedOffset, Utc};

use crate::catalog::{Catalog, EventInstance, Item};
use crate::error::HubError;
use crate::time::{self, Countdown, Resolution};

/// An (item, event instance) pair with its resolved next deadline.
///
/// Derived per pipeline run from a fixed "now"; it borrows from the catalog
/// and is never cached across reference instants.
#[derive(Debug, Clone, Copy)]
pub struct FlatRecord<'a> {
    pub item: &'a Item,
    pub event: &'a EventInstance,
    pub next_deadline: DateTime<FixedOffset>,
    pub time_remaining_ms: i64,
    pub milestone: usize,
}

impl<'a> FlatRecord<'a> {
    pub fn new(item: &'a Item, event: &'a EventInstance, resolution: Resolution) -> Self {
        FlatRecord {
            item,
            event,
            next_deadline: resolution.next_deadline,
            time_remaining_ms: resolution.time_remaining_ms,
            milestone: resolution.milestone,
        }
    }

    pub fn is_ended(&self) -> bool {
        self.time_remaining_ms < 0
    }

    /// Comment of the timeline entry the next deadline came from.
    pub fn milestone_comment(&self) -> &'a str {
        self.event
            .timeline
            .get(self.milestone)
            .map(|entry| entry.comment.as_str())
            .unwrap_or_default()
    }

    pub fn countdown(&self) -> Countdown {
        Countdown::from_millis(self.time_remaining_ms)
    }
}

/// An event instance that could not be resolved and was left out.
#[derive(Debug)]
pub struct SkippedEvent<'a> {
    pub item: &'a Item,
    pub event: &'a EventInstance,
    pub error: HubError,
}

/// Flatten the catalog, returning the records alongside the instances that failed to resolve.
///
/// Output keeps catalog order: item order, then event order within the item.
pub fn try_flatten(catalog: &Catalog, now: DateTime<Utc>) -> (Vec<FlatRecord<'_>>, Vec<SkippedEvent<'_>>) {
    let mut records = Vec::with_capacity(catalog.event_count());
    let mut skipped = Vec::new();

    for item in &catalog.items {
        for event in &item.events {
            match time::resolve(event, now) {
                Ok(resolution) => records.push(FlatRecord::new(item, event, resolution)),
                Err(error) => skipped.push(SkippedEvent { item, event, error }),
            }
        }
    }

    (records, skipped)
}

/// Flatten the catalog into records. Instances that fail to resolve are logged and dropped
/// so one bad entry cannot take the whole listing down.
pub fn flatten(catalog: &Catalog, now: DateTime<Utc>) -> Vec<FlatRecord<'_>> {
    let (records, skipped) = try_flatten(catalog, now);

    for s in &skipped {
        tracing::warn!(
            item = %s.item.title,
            event = %s.event.id,
            "Skipping event instance: {}",
            s.error
        );
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, TimelineEntry};

    fn instance(id: &str, timezone: &str, deadlines: &[&str]) -> EventInstance {
        EventInstance {
            year: 2025,
            id: id.into(),
            link: String::new(),
            timeline: deadlines
                .iter()
                .map(|d| TimelineEntry {
                    deadline: d.to_string(),
                    comment: format!("due {}", d),
                })
                .collect(),
            timezone: timezone.into(),
            date: String::new(),
            location: String::new(),
        }
    }

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
            .expect("valid test instant")
            .with_timezone(&Utc)
    }

    #[test]
    fn test_one_record_per_instance_in_catalog_order() {
        let catalog = Catalog::new(vec![
            Item::new(
                "A",
                Category::Conference,
                vec![
                    instance("a1", "UTC", &["2025-06-01"]),
                    instance("a2", "UTC", &["2025-02-01"]),
                ],
            ),
            Item::new("B", Category::Activity, vec![instance("b1", "UTC", &["2024-06-01"])]),
        ]);

        let records = flatten(&catalog, now());
        let ids: Vec<_> = records.iter().map(|r| r.event.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a2", "b1"]);
        assert_eq!(records.len(), catalog.event_count());
        assert!(records[2].is_ended());
    }

    #[test]
    fn test_bad_instance_is_isolated() {
        let catalog = Catalog::new(vec![Item::new(
            "A",
            Category::Competition,
            vec![
                instance("good", "UTC", &["2025-06-01"]),
                instance("bad-zone", "Not/AZone", &["2025-06-01"]),
                instance("empty", "UTC", &[]),
            ],
        )]);

        let (records, skipped) = try_flatten(&catalog, now());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].event.id, "good");

        let skipped_ids: Vec<_> = skipped.iter().map(|s| s.event.id.as_str()).collect();
        assert_eq!(skipped_ids, vec!["bad-zone", "empty"]);
        assert!(skipped.iter().all(|s| s.error.is_record_local()));

        assert_eq!(flatten(&catalog, now()).len(), 1);
    }

    #[test]
    fn test_milestone_comment() {
        let catalog = Catalog::new(vec![Item::new(
            "A",
            Category::Conference,
            vec![instance("a1", "UTC", &["2025-03-01", "2025-02-01"])],
        )]);

        let records = flatten(&catalog, now());
        assert_eq!(records[0].milestone_comment(), "due 2025-02-01");
    }

    #[test]
    fn test_empty_catalog() {
        assert!(flatten(&Catalog::default(), now()).is_empty());
    }
}
