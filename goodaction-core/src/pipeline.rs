//! catalog → flatten → filter → search → rank
//!
//! The pipeline is a pure function of (catalog, now, criteria, query). Callers
//! re-run it whenever one of those changes; nothing is recomputed behind their back.

use chrono::{DateTime, Utc};

use crate::catalog::Catalog;
use crate::filter::FilterCriteria;
use crate::flatten::{self, FlatRecord};
use crate::rank;
use crate::search::{SearchIndex, SearchOptions};

/// Flattened records and their search index for one (catalog, now) pair.
///
/// Build it again when the catalog or the reference instant changes; reuse it
/// across filter and query changes so typing a query does not rebuild the index.
pub struct Pipeline<'c> {
    records: Vec<FlatRecord<'c>>,
    index: SearchIndex,
}

impl<'c> Pipeline<'c> {
    pub fn new(catalog: &'c Catalog, now: DateTime<Utc>, options: &SearchOptions) -> Self {
        let records = flatten::flatten(catalog, now);
        let index = SearchIndex::build(&records, options);

        Pipeline {
            records,
            index,
        }
    }

    /// Every resolvable record, in catalog order.
    pub fn records(&self) -> &[FlatRecord<'c>] {
        &self.records
    }

    /// Filter, search and rank. The result is ordered by urgency.
    pub fn run(&self, criteria: &FilterCriteria, query: &str) -> Vec<FlatRecord<'c>> {
        let candidates = (0..self.records.len()).filter(|&i| criteria.matches(&self.records[i]));

        let selected: Vec<FlatRecord<'c>> = if query.trim().is_empty() {
            candidates.map(|i| self.records[i]).collect()
        } else {
            self.index
                .search_among(query, candidates)
                .into_iter()
                .map(|hit| self.records[hit.index])
                .collect()
        };

        tracing::debug!(
            total = self.records.len(),
            selected = selected.len(),
            "Pipeline run"
        );

        rank::rank(&selected)
    }
}

/// One-shot run of the whole pipeline.
pub fn run<'c>(
    catalog: &'c Catalog,
    now: DateTime<Utc>,
    criteria: &FilterCriteria,
    query: &str,
    options: &SearchOptions,
) -> Vec<FlatRecord<'c>> {
    Pipeline::new(catalog, now, options).run(criteria, query)
}
