//! Fuzzy, weighted, multi-field text search over flat records.
//!
//! Each record is searchable by title, description, tags, location and by
//! facets of its resolved next deadline (full date, zero-padded month, year),
//! so "2025" or "03" finds records by deadline even though no stored field
//! says so. The default weights leave the description out; the
//! recommendation profile ([`FieldWeights::recommendation`]) includes it and
//! drops the deadline facets.

pub mod fuzzy;
mod index;

pub use index::{DEFAULT_THRESHOLD, FieldWeights, SearchHit, SearchIndex, SearchOptions};

use crate::flatten::FlatRecord;

/// Rank `records` by relevance to `query`, best first, dropping non-matches.
///
/// A blank query passes the records through unchanged.
pub fn search<'a>(
    records: &[FlatRecord<'a>],
    query: &str,
    options: &SearchOptions,
) -> Vec<FlatRecord<'a>> {
    if query.trim().is_empty() {
        return records.to_vec();
    }

    SearchIndex::build(records, options)
        .search(query)
        .into_iter()
        .map(|hit| records[hit.index])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Category, EventInstance, Item, TimelineEntry};
    use crate::flatten::flatten;
    use chrono::{DateTime, Utc};

    fn instance(id: &str, location: &str, deadline: &str) -> EventInstance {
        EventInstance {
            year: 2025,
            id: id.into(),
            link: String::new(),
            timeline: vec![TimelineEntry {
                deadline: deadline.into(),
                comment: String::new(),
            }],
            timezone: "UTC".into(),
            date: String::new(),
            location: location.into(),
        }
    }

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Item::new(
                "NeurIPS",
                Category::Conference,
                vec![instance("neurips25", "San Diego", "2025-05-15T23:59:59")],
            )
            .with_tags(["AI", "ML"]),
            Item::new(
                "Kaggle Ocean Challenge",
                Category::Competition,
                vec![instance("ocean", "Online", "2026-03-10")],
            )
            .with_tags(["data", "environment"]),
            Item::new(
                "Library Volunteering",
                Category::Activity,
                vec![instance("library", "Shanghai", "2026-07-01")],
            )
            .with_tags(["education"])
            .with_description("Read stories to children every weekend"),
        ])
    }

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
            .expect("valid test instant")
            .with_timezone(&Utc)
    }

    fn ids(records: &[FlatRecord<'_>]) -> Vec<String> {
        records.iter().map(|r| r.event.id.clone()).collect()
    }

    #[test]
    fn test_blank_query_passes_through() {
        let catalog = catalog();
        let records = flatten(&catalog, now());
        let options = SearchOptions::default();

        assert_eq!(ids(&search(&records, "", &options)), ids(&records));
        assert_eq!(ids(&search(&records, "   \t", &options)), ids(&records));
    }

    #[test]
    fn test_title_match_with_typo() {
        let catalog = catalog();
        let records = flatten(&catalog, now());

        let hits = search(&records, "nuerips", &SearchOptions::default());
        assert_eq!(ids(&hits), vec!["neurips25"]);
    }

    #[test]
    fn test_year_facet_matches_resolved_deadline() {
        let catalog = catalog();
        let records = flatten(&catalog, now());

        // "2025" only appears literally in the resolved deadline of neurips25.
        // "2026" is one edit away, so the other records match too but rank lower.
        let hits = search(&records, "2025", &SearchOptions::default());
        assert_eq!(ids(&hits), vec!["neurips25", "ocean", "library"]);

        let exact = SearchOptions::default().with_threshold(0.0);
        assert_eq!(ids(&search(&records, "2025", &exact)), vec!["neurips25"]);
    }

    #[test]
    fn test_month_facet() {
        let catalog = catalog();
        let records = flatten(&catalog, now());

        let hits = search(&records, "03", &SearchOptions::default());
        assert_eq!(ids(&hits), vec!["ocean"]);
    }

    #[test]
    fn test_tag_and_location_fields() {
        let catalog = catalog();
        let records = flatten(&catalog, now());
        let options = SearchOptions::default();

        assert_eq!(ids(&search(&records, "environment", &options)), vec!["ocean"]);
        assert_eq!(ids(&search(&records, "shanghai", &options)), vec!["library"]);
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let catalog = catalog();
        let records = flatten(&catalog, now());

        assert!(search(&records, "zzzzqqqq", &SearchOptions::default()).is_empty());
        assert!(search(&[], "neurips", &SearchOptions::default()).is_empty());
    }

    #[test]
    fn test_threshold_controls_strictness() {
        let catalog = catalog();
        let records = flatten(&catalog, now());

        let strict = SearchOptions::default().with_threshold(0.0);
        assert!(search(&records, "neurlps", &strict).is_empty());
        assert_eq!(
            ids(&search(&records, "neurlps", &SearchOptions::default())),
            vec!["neurips25"]
        );
    }

    #[test]
    fn test_exact_title_ranks_above_fuzzy_match() {
        let catalog = Catalog::new(vec![
            Item::new(
                "Ocean Clean",
                Category::Activity,
                vec![instance("fuzzy", "Xiamen", "2025-06-01")],
            ),
            Item::new(
                "Ocean Cleanup",
                Category::Activity,
                vec![instance("exact", "Xiamen", "2025-06-01")],
            ),
        ]);
        let records = flatten(&catalog, now());

        let hits = search(&records, "cleanup", &SearchOptions::default());
        assert_eq!(ids(&hits), vec!["exact", "fuzzy"]);
    }

    #[test]
    fn test_index_reused_across_queries() {
        let catalog = catalog();
        let records = flatten(&catalog, now());
        let index = SearchIndex::build(&records, &SearchOptions::default());

        assert_eq!(index.len(), 3);
        assert_eq!(index.search("ocean").len(), 1);
        assert_eq!(index.search("library")[0].index, 2);

        // Candidates outside the record set are ignored
        let hits = index.search_among("neurips", [0, 7]);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].index, 0);
    }

    #[test]
    fn test_description_only_searched_by_recommendation_profile() {
        let catalog = catalog();
        let records = flatten(&catalog, now());

        let list = SearchOptions::default();
        assert!(search(&records, "stories", &list).is_empty());

        let recommend = SearchOptions::default().with_weights(FieldWeights::recommendation());
        assert_eq!(ids(&search(&records, "stories", &recommend)), vec!["library"]);
    }

    #[test]
    fn test_recommendation_profile_ignores_deadline_facets() {
        let catalog = catalog();
        let records = flatten(&catalog, now());

        let recommend = SearchOptions::default()
            .with_weights(FieldWeights::recommendation())
            .with_threshold(0.0);
        assert!(search(&records, "2025-05-15", &recommend).is_empty());
        assert_eq!(
            ids(&search(&records, "2025-05-15", &SearchOptions::default().with_threshold(0.0))),
            vec!["neurips25"]
        );
    }
}
