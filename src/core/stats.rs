//! Aggregate statistics over a filtered record set

use crate::core::record::Record;
use chrono::{DateTime, Duration, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;

/// Records created within this many days count as recent
pub const RECENT_WINDOW_DAYS: i64 = 30;

/// Statistics derived from the filtered (pre-pagination) collection
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedStats {
    pub count: usize,
    pub total_value: f64,
    pub average_value: f64,
    /// Distinct related ids per relation, in the order the record type declares them
    pub distinct_related: IndexMap<String, usize>,
    pub recent_count: usize,
}

impl DerivedStats {
    /// Distinct count for one relation, 0 when the relation is unknown
    pub fn distinct(&self, relation: &str) -> usize {
        self.distinct_related.get(relation).copied().unwrap_or(0)
    }
}

/// Compute stats against the current clock
pub fn compute_stats<T: Record>(records: &[T]) -> DerivedStats {
    compute_stats_at(records, Utc::now())
}

/// Compute stats as seen at `now`
///
/// Absent prices add 0. Records without a relation id are left out of that
/// relation's distinct set but still counted.
pub fn compute_stats_at<T: Record>(records: &[T], now: DateTime<Utc>) -> DerivedStats {
    let count = records.len();
    let total_value: f64 = records.iter().map(Record::price_or_zero).sum();
    let average_value = if count > 0 {
        total_value / count as f64
    } else {
        0.0
    };

    let distinct_related = T::relations()
        .iter()
        .map(|relation| {
            let ids: HashSet<&str> = records
                .iter()
                .filter_map(|r| r.related_id(relation))
                .collect();
            (relation.to_string(), ids.len())
        })
        .collect();

    let cutoff = now - Duration::days(RECENT_WINDOW_DAYS);
    let recent_count = records
        .iter()
        .filter(|r| r.created_at().is_some_and(|at| at >= cutoff))
        .count();

    DerivedStats {
        count,
        total_value,
        average_value,
        distinct_related,
        recent_count,
    }
}
