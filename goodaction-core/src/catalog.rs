//! Catalog types: items, their yearly event instances, and deadline timelines.
//!
//! The catalog is fetched once as a JSON array of items and treated as an
//! immutable snapshot. Every later stage borrows from it.

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HubResult;
use crate::time;

/// Closed set of item categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Conference,
    Competition,
    Activity,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::Conference,
        Category::Competition,
        Category::Activity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Conference => "conference",
            Category::Competition => "competition",
            Category::Activity => "activity",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "Unknown category '{}'. Expected one of: conference, competition, activity",
                    s
                )
            })
    }
}

/// One deadline milestone. The deadline carries no timezone marker; it is
/// interpreted in the owning event instance's timezone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub deadline: String,
    #[serde(default)]
    pub comment: String,
}

/// One concrete occurrence of an item (e.g. the 2025 edition).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventInstance {
    pub year: i32,
    /// Unique within the catalog; also the key favorites are stored under.
    pub id: String,
    #[serde(default)]
    pub link: String,
    /// Stored order matters: it decides the fallback when every deadline has passed.
    pub timeline: Vec<TimelineEntry>,
    pub timezone: String,
    /// Display date, e.g. "December 2-7, 2025"
    #[serde(default)]
    pub date: String,
    #[serde(rename = "place", default)]
    pub location: String,
}

/// A recurring thing to track (conference, competition or activity).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "id", default, skip_serializing_if = "Option::is_none")]
    explicit_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    #[serde(default)]
    pub tags: Vec<String>,
    pub events: Vec<EventInstance>,
}

impl Item {
    pub fn new(title: impl Into<String>, category: Category, events: Vec<EventInstance>) -> Self {
        Item {
            explicit_id: None,
            title: title.into(),
            description: String::new(),
            category,
            tags: Vec::new(),
            events,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.explicit_id = Some(id.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Stable identifier: the explicit `id` if present, otherwise a slug of the title.
    pub fn id(&self) -> String {
        match &self.explicit_id {
            Some(id) => id.clone(),
            None => slug::slugify(&self.title),
        }
    }

}

/// Problems found by [`Catalog::validate`].
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogIssue {
    ItemWithoutEvents { title: String },
    DuplicateEventId { event_id: String },
    UnresolvableEvent { event_id: String, reason: String },
}

impl fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CatalogIssue::ItemWithoutEvents { title } => {
                write!(f, "'{}' has no event instances", title)
            }
            CatalogIssue::DuplicateEventId { event_id } => {
                write!(f, "event id '{}' is used more than once", event_id)
            }
            CatalogIssue::UnresolvableEvent { event_id, reason } => {
                write!(f, "event '{}' cannot be resolved: {}", event_id, reason)
            }
        }
    }
}

/// The full item list, as delivered by the catalog source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    pub items: Vec<Item>,
}

impl Catalog {
    pub fn new(items: Vec<Item>) -> Self {
        Catalog { items }
    }

    pub fn from_json(json: &str) -> HubResult<Self> {
        Ok(serde_json::from_str(json)?)
    }


    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of (item, event instance) pairs.
    pub fn event_count(&self) -> usize {
        self.items.iter().map(|item| item.events.len()).sum()
    }

    pub fn find_event(&self, event_id: &str) -> Option<(&Item, &EventInstance)> {
        self.items.iter().find_map(|item| {
            item.events
                .iter()
                .find(|event| event.id == event_id)
                .map(|event| (item, event))
        })
    }

    /// Distinct tags across all items, sorted.
    pub fn tags(&self) -> BTreeSet<&str> {
        self.items
            .iter()
            .flat_map(|item| item.tags.iter().map(String::as_str))
            .collect()
    }

    /// Distinct non-empty event locations, sorted.
    pub fn locations(&self) -> BTreeSet<&str> {
        self.items
            .iter()
            .flat_map(|item| item.events.iter())
            .map(|event| event.location.as_str())
            .filter(|location| !location.is_empty())
            .collect()
    }

    /// Check the data-integrity preconditions the pipeline relies on.
    pub fn validate(&self) -> Vec<CatalogIssue> {
        let mut issues = Vec::new();
        let mut seen_ids = HashSet::new();

        for item in &self.items {
            if item.events.is_empty() {
                issues.push(CatalogIssue::ItemWithoutEvents {
                    title: item.title.clone(),
                });
            }

            for event in &item.events {
                if !seen_ids.insert(event.id.as_str()) {
                    issues.push(CatalogIssue::DuplicateEventId {
                        event_id: event.id.clone(),
                    });
                }

                if let Err(e) = time::deadlines(event) {
                    issues.push(CatalogIssue::UnresolvableEvent {
                        event_id: event.id.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {
            "title": "ACL Annual Meeting",
            "description": "Computational linguistics",
            "category": "conference",
            "tags": ["NLP", "AI"],
            "events": [
                {
                    "year": 2025,
                    "id": "acl25",
                    "link": "https://2025.aclweb.org",
                    "timeline": [
                        { "deadline": "2025-02-15T23:59:59", "comment": "Full paper" }
                    ],
                    "timezone": "UTC-12",
                    "date": "July 27 - August 1, 2025",
                    "place": "Vienna, Austria"
                }
            ]
        },
        {
            "id": "charity-run",
            "title": "Charity Run",
            "category": "activity",
            "events": [
                {
                    "year": 2025,
                    "id": "run25",
                    "timeline": [{ "deadline": "2025-09-01" }],
                    "timezone": "Asia/Shanghai"
                }
            ]
        }
    ]"#;

    #[test]
    fn test_parse_sample_catalog() {
        let catalog = Catalog::from_json(SAMPLE).expect("Should parse");

        assert_eq!(catalog.items.len(), 2);
        assert_eq!(catalog.event_count(), 2);

        let acl = &catalog.items[0];
        assert_eq!(acl.category, Category::Conference);
        assert_eq!(acl.events[0].location, "Vienna, Austria");
        assert_eq!(acl.events[0].timeline[0].comment, "Full paper");

        let run = &catalog.items[1];
        assert!(run.tags.is_empty());
        assert!(run.description.is_empty());
        assert_eq!(run.events[0].location, "");
        assert_eq!(run.events[0].timeline[0].comment, "");
    }

    #[test]
    fn test_item_id_explicit_or_slug() {
        let catalog = Catalog::from_json(SAMPLE).expect("Should parse");
        assert_eq!(catalog.items[0].id(), "acl-annual-meeting");
        assert_eq!(catalog.items[1].id(), "charity-run");
    }

    #[test]
    fn test_unknown_category_rejected() {
        let json = r#"[{ "title": "X", "category": "party", "events": [] }]"#;
        assert!(Catalog::from_json(json).is_err());
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("Conference".parse::<Category>(), Ok(Category::Conference));
        assert_eq!(" activity ".parse::<Category>(), Ok(Category::Activity));
        assert!("workshop".parse::<Category>().is_err());
    }

    #[test]
    fn test_facets_are_sorted_and_distinct() {
        let catalog = Catalog::from_json(SAMPLE).expect("Should parse");

        let tags: Vec<_> = catalog.tags().into_iter().collect();
        assert_eq!(tags, vec!["AI", "NLP"]);

        // Empty places are not offered as a facet
        let locations: Vec<_> = catalog.locations().into_iter().collect();
        assert_eq!(locations, vec!["Vienna, Austria"]);
    }

    #[test]
    fn test_find_event() {
        let catalog = Catalog::from_json(SAMPLE).expect("Should parse");
        let (item, event) = catalog.find_event("run25").expect("Should find run25");
        assert_eq!(item.title, "Charity Run");
        assert_eq!(event.year, 2025);
        assert!(catalog.find_event("nope").is_none());
    }

    #[test]
    fn test_validate_reports_issues() {
        let mut catalog = Catalog::from_json(SAMPLE).expect("Should parse");
        assert!(catalog.validate().is_empty());

        catalog.items.push(Item::new("Empty", Category::Competition, Vec::new()));
        let mut duplicate = catalog.items[0].events[0].clone();
        duplicate.timeline.clear();
        catalog.items[1].events.push(duplicate);

        let issues = catalog.validate();
        assert_eq!(issues.len(), 3, "Got: {:?}", issues);
        assert!(issues.contains(&CatalogIssue::ItemWithoutEvents {
            title: "Empty".into()
        }));
        assert!(issues.contains(&CatalogIssue::DuplicateEventId {
            event_id: "acl25".into()
        }));
        assert!(issues
            .iter()
            .any(|i| matches!(i, CatalogIssue::UnresolvableEvent { event_id, .. } if event_id == "acl25")));
    }

    #[test]
    fn test_roundtrip_keeps_place_key() {
        let catalog = Catalog::from_json(SAMPLE).expect("Should parse");
        let json = serde_json::to_string(&catalog).expect("Should serialize");
        assert!(json.contains("\"place\":\"Vienna, Austria\""));
        assert!(json.contains("\"id\":\"charity-run\""));
    }
}
