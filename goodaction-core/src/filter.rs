//! Category, tag, location and favorites filtering.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::Category;
use crate::flatten::FlatRecord;

/// Filter selections supplied by the caller.
///
/// Empty selections are permissive: an empty tag set keeps every record, it
/// never excludes everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub category: Option<Category>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub locations: BTreeSet<String>,
    #[serde(default)]
    pub favorites_only: bool,
    /// Event instance ids the user has marked as favorite
    #[serde(default)]
    pub favorite_ids: BTreeSet<String>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.tags.is_empty()
            && self.locations.is_empty()
            && !self.favorites_only
    }

    pub fn matches(&self, record: &FlatRecord<'_>) -> bool {
        self.matches_category(record)
            && self.matches_tags(record)
            && self.matches_location(record)
            && self.matches_favorites(record)
    }

    fn matches_category(&self, record: &FlatRecord<'_>) -> bool {
        self.category.is_none_or(|c| record.item.category == c)
    }

    // Any selected tag qualifies
    fn matches_tags(&self, record: &FlatRecord<'_>) -> bool {
        self.tags.is_empty() || record.item.tags.iter().any(|t| self.tags.contains(t))
    }

    fn matches_location(&self, record: &FlatRecord<'_>) -> bool {
        self.locations.is_empty() || self.locations.contains(&record.event.location)
    }

    fn matches_favorites(&self, record: &FlatRecord<'_>) -> bool {
        !self.favorites_only || self.favorite_ids.contains(&record.event.id)
    }
}

/// Keep the records that pass every active filter, in their original order.
pub fn filter<'a>(records: &[FlatRecord<'a>], criteria: &FilterCriteria) -> Vec<FlatRecord<'a>> {
    records
        .iter()
        .filter(|record| criteria.matches(record))
        .copied()
        .collect()
}
