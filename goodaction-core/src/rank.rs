//! Urgency ordering.

use std::cmp::{Ordering, Reverse};

use crate::flatten::FlatRecord;

/// Sort key: upcoming before ended, soonest upcoming first, most recently ended first.
fn urgency_key(record: &FlatRecord<'_>) -> (bool, i64, Reverse<i64>) {
    let ended = record.is_ended();
    if ended {
        (true, 0, Reverse(record.time_remaining_ms))
    } else {
        (false, record.time_remaining_ms, Reverse(0))
    }
}

pub fn compare_urgency(a: &FlatRecord<'_>, b: &FlatRecord<'_>) -> Ordering {
    urgency_key(a).cmp(&urgency_key(b))
}

/// Order records by urgency. The sort is stable, so equal remaining times keep
/// their input order.
pub fn rank<'a>(records: &[FlatRecord<'a>]) -> Vec<FlatRecord<'a>> {
    let mut ranked = records.to_vec();
    ranked.sort_by(compare_urgency);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, EventInstance, Item};
    use chrono::DateTime;

    fn item() -> Item {
        Item::new("Item", Category::Activity, Vec::new())
    }

    fn event(id: &str) -> EventInstance {
        EventInstance {
            year: 2025,
            id: id.into(),
            link: String::new(),
            timeline: Vec::new(),
            timezone: "UTC".into(),
            date: String::new(),
            location: String::new(),
        }
    }

    fn record<'a>(item: &'a Item, event: &'a EventInstance, remaining: i64) -> FlatRecord<'a> {
        FlatRecord {
            item,
            event,
            next_deadline: DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("valid test instant"),
            time_remaining_ms: remaining,
            milestone: 0,
        }
    }

    #[test]
    fn test_upcoming_before_ended() {
        let item = item();
        let events: Vec<_> = ["a", "b", "c", "d", "e"].into_iter().map(event).collect();

        let records = vec![
            record(&item, &events[0], -5_000),
            record(&item, &events[1], 10_000),
            record(&item, &events[2], -1_000),
            record(&item, &events[3], 0),
            record(&item, &events[4], 3_000),
        ];

        let ranked: Vec<_> = rank(&records).iter().map(|r| r.event.id.as_str()).collect();
        // upcoming ascending (zero counts as upcoming), then ended by recency
        assert_eq!(ranked, vec!["d", "e", "b", "c", "a"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let item = item();
        let events: Vec<_> = ["x", "y", "z", "w"].into_iter().map(event).collect();

        let records = vec![
            record(&item, &events[0], 500),
            record(&item, &events[1], 500),
            record(&item, &events[2], -500),
            record(&item, &events[3], -500),
        ];

        let ranked: Vec<_> = rank(&records).iter().map(|r| r.event.id.as_str()).collect();
        assert_eq!(ranked, vec!["x", "y", "z", "w"]);
    }

    #[test]
    fn test_extreme_values() {
        let item = item();
        let events: Vec<_> = ["min", "max"].into_iter().map(event).collect();

        let records = vec![
            record(&item, &events[0], i64::MIN),
            record(&item, &events[1], i64::MAX),
        ];

        let ranked: Vec<_> = rank(&records).iter().map(|r| r.event.id.as_str()).collect();
        assert_eq!(ranked, vec!["max", "min"]);
    }

    #[test]
    fn test_empty() {
        assert!(rank(&[]).is_empty());
    }
}
