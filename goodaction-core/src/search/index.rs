//! Pre-normalised search fields for a fixed record set.

use serde::{Deserialize, Serialize};

use super::fuzzy::{match_score, normalize};
use crate::flatten::FlatRecord;

/// Stand-in for an exact field match so it still weighs into the product.
const EXACT_MATCH_SCORE: f64 = f64::EPSILON;

pub const DEFAULT_THRESHOLD: f64 = 0.3;

/// Relative weight of each searchable field. Weights are normalised to sum to 1.
///
/// A field with weight 0 is not searched at all.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldWeights {
    pub title: f64,
    pub description: f64,
    pub tags: f64,
    pub location: f64,
    pub date: f64,
    pub month: f64,
    pub year: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        FieldWeights {
            title: 0.4,
            description: 0.0,
            tags: 0.3,
            location: 0.2,
            date: 0.1,
            month: 0.1,
            year: 0.1,
        }
    }
}

impl FieldWeights {
    /// Recommendation profile: title, description, tags and location at equal
    /// weight, deadline facets off.
    pub fn recommendation() -> Self {
        FieldWeights {
            title: 1.0,
            description: 1.0,
            tags: 1.0,
            location: 1.0,
            date: 0.0,
            month: 0.0,
            year: 0.0,
        }
    }

    fn as_array(&self) -> [f64; FIELD_COUNT] {
        [
            self.title,
            self.description,
            self.tags,
            self.location,
            self.date,
            self.month,
            self.year,
        ]
    }

    fn normalized(&self) -> [f64; FIELD_COUNT] {
        let weights = self.as_array().map(|w| w.max(0.0));
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return [1.0 / FIELD_COUNT as f64; FIELD_COUNT];
        }
        weights.map(|w| w / total)
    }
}

/// Matching tolerance and field weighting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Highest mismatch ratio a field may have and still match. 0.0 only admits
    /// exact substrings; 1.0 admits anything.
    pub threshold: f64,
    pub weights: FieldWeights,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            threshold: DEFAULT_THRESHOLD,
            weights: FieldWeights::default(),
        }
    }
}

impl SearchOptions {
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn with_weights(mut self, weights: FieldWeights) -> Self {
        self.weights = weights;
        self
    }
}

const FIELD_COUNT: usize = 7;

/// One searchable field of one record. Multi-valued fields (tags) keep every value.
#[derive(Debug, Clone)]
struct IndexedField {
    values: Vec<Vec<char>>,
    /// Field-length norm: shorter fields count for more
    norm: f64,
}

impl IndexedField {
    fn new<S: AsRef<str>>(values: &[S]) -> Self {
        let words: usize = values
            .iter()
            .map(|v| v.as_ref().split_whitespace().count())
            .sum();

        IndexedField {
            values: values
                .iter()
                .map(|v| v.as_ref())
                .filter(|v| !v.is_empty())
                .map(normalize)
                .collect(),
            norm: 1.0 / (words.max(1) as f64).sqrt(),
        }
    }

    /// Best mismatch ratio across the field's values.
    fn best_score(&self, pattern: &[char]) -> Option<f64> {
        self.values
            .iter()
            .map(|value| match_score(pattern, value))
            .min_by(f64::total_cmp)
    }
}

/// A record that matched a query, by position in the indexed record set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit {
    pub index: usize,
    /// Combined relevance; lower is better
    pub score: f64,
}

/// Search fields extracted from a record set, built once and queried many times.
///
/// The index only stays valid for the exact record slice it was built from.
#[derive(Debug, Clone)]
pub struct SearchIndex {
    entries: Vec<[IndexedField; FIELD_COUNT]>,
    weights: [f64; FIELD_COUNT],
    threshold: f64,
}

impl SearchIndex {
    pub fn build(records: &[FlatRecord<'_>], options: &SearchOptions) -> Self {
        let entries = records.iter().map(index_record).collect();

        tracing::debug!(records = records.len(), "Built search index");

        SearchIndex {
            entries,
            weights: options.weights.normalized(),
            threshold: options.threshold.clamp(0.0, 1.0),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Score every indexed record against `query`, best first.
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        self.search_among(query, 0..self.entries.len())
    }

    /// Score only the given record positions, best first. Ties keep the order
    /// the candidates were given in.
    pub fn search_among<I>(&self, query: &str, candidates: I) -> Vec<SearchHit>
    where
        I: IntoIterator<Item = usize>,
    {
        let pattern = normalize(query.trim());
        if pattern.is_empty() {
            return Vec::new();
        }

        let mut hits: Vec<SearchHit> = candidates
            .into_iter()
            .filter_map(|index| {
                let fields = self.entries.get(index)?;
                self.score(&pattern, fields)
                    .map(|score| SearchHit { index, score })
            })
            .collect();

        hits.sort_by(|a, b| a.score.total_cmp(&b.score));
        hits
    }

    fn score(&self, pattern: &[char], fields: &[IndexedField; FIELD_COUNT]) -> Option<f64> {
        let mut matched = false;
        let mut total = 1.0;

        for (field, weight) in fields.iter().zip(self.weights) {
            if weight <= 0.0 {
                continue;
            }
            let Some(score) = field.best_score(pattern) else {
                continue;
            };
            if score > self.threshold {
                continue;
            }
            matched = true;
            let score = if score == 0.0 { EXACT_MATCH_SCORE } else { score };
            total *= score.powf(weight * field.norm);
        }

        matched.then_some(total)
    }
}

fn index_record(record: &FlatRecord<'_>) -> [IndexedField; FIELD_COUNT] {
    let deadline = record.next_deadline;
    [
        IndexedField::new(&[record.item.title.as_str()]),
        IndexedField::new(&[record.item.description.as_str()]),
        IndexedField::new(record.item.tags.as_slice()),
        IndexedField::new(&[record.event.location.as_str()]),
        IndexedField::new(&[deadline.format("%Y-%m-%d").to_string()]),
        IndexedField::new(&[deadline.format("%m").to_string()]),
        IndexedField::new(&[deadline.format("%Y").to_string()]),
    ]
}
