//! The list engine: filter, sort and paginate a record collection
//!
//! Every function here is pure. Given the same records and parameters it
//! returns the same output, so views can recompute on every input event.

use crate::core::field::SortKey;
use crate::core::query::{FilterCriteria, Page, PaginationMeta, SortDirection, SortSpec};
use crate::core::record::Record;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use std::collections::HashSet;

/// Label used for related entities that carry no display name
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Keep the records matching every active criterion
///
/// Survivors keep their input order. Absent or malformed fields never fail
/// the filter; they simply do not match.
pub fn apply_filters<T: Record>(records: Vec<T>, criteria: &FilterCriteria) -> Vec<T> {
    let search = SearchTerm::new(criteria);
    let start = criteria.start_date.map(start_of_day);
    let end = criteria.end_date.map(end_of_day);

    records
        .into_iter()
        .filter(|record| {
            search.as_ref().is_none_or(|s| s.matches(record))
                && matches_exact(record, criteria)
                && criteria
                    .min_price
                    .is_none_or(|min| record.price_or_zero() >= min)
                && criteria
                    .max_price
                    .is_none_or(|max| record.price_or_zero() <= max)
                && start.is_none_or(|start| record.created_at().is_some_and(|at| at >= start))
                && end.is_none_or(|end| record.created_at().is_some_and(|at| at <= end))
        })
        .collect()
}

/// Sort the whole collection by `spec`
///
/// The sort is stable: records with equal keys keep their relative order in
/// both directions.
pub fn apply_sort<T: Record>(records: Vec<T>, spec: &SortSpec) -> Vec<T> {
    let kind = T::field_kind(&spec.field);

    let mut keyed: Vec<(SortKey, T)> = records
        .into_iter()
        .map(|record| {
            let key = SortKey::from_value(kind, record.field_value(&spec.field));
            (key, record)
        })
        .collect();

    match spec.direction {
        SortDirection::Asc => keyed.sort_by(|a, b| a.0.cmp(&b.0)),
        SortDirection::Desc => keyed.sort_by(|a, b| b.0.cmp(&a.0)),
    }

    keyed.into_iter().map(|(_, record)| record).collect()
}

/// Cut one page out of an already sorted collection
///
/// A page past the end yields no items. The page is never clamped here;
/// `Page::total_pages` lets the caller do that.
pub fn paginate<T: Clone>(records: &[T], page: usize, page_size: usize) -> Page<T> {
    let pagination = PaginationMeta::new(page, page_size, records.len());
    let items = records[pagination.window()].to_vec();

    Page { items, pagination }
}

/// Filter then sort, the full derivation before pagination
pub fn filter_and_sort<T: Record>(
    records: Vec<T>,
    criteria: &FilterCriteria,
    spec: &SortSpec,
) -> Vec<T> {
    apply_sort(apply_filters(records, criteria), spec)
}

/// A related entity offered as an exact-match filter choice
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Facet {
    pub id: String,
    pub label: String,
}

/// Unique related entities in first-seen order
///
/// The label is the text value the record exposes under the relation name.
pub fn facets<T: Record>(records: &[T], relation: &str) -> Vec<Facet> {
    let mut seen = HashSet::new();
    let mut result = Vec::new();

    for record in records {
        let Some(id) = record.related_id(relation) else {
            continue;
        };
        if !seen.insert(id.to_string()) {
            continue;
        }

        let label = record
            .field_value(relation)
            .and_then(|v| v.as_str().map(str::to_string))
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| UNKNOWN_LABEL.to_string());

        result.push(Facet {
            id: id.to_string(),
            label,
        });
    }

    result
}

/// Midnight UTC at the start of `date`
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// 23:59:59.999 UTC at the end of `date`
pub fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    let last_ms = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    date.and_time(last_ms).and_utc()
}

fn matches_exact<T: Record>(record: &T, criteria: &FilterCriteria) -> bool {
    criteria
        .exact
        .iter()
        .filter(|(_, wanted)| !wanted.is_empty())
        .all(|(key, wanted)| match record.related_id(key) {
            Some(id) => id == wanted,
            None => record
                .field_value(key)
                .and_then(|v| v.as_str().map(|s| s == wanted))
                .unwrap_or(false),
        })
}

struct SearchTerm<'a> {
    needle: String,
    field: Option<&'a str>,
}

impl<'a> SearchTerm<'a> {
    fn new(criteria: &'a FilterCriteria) -> Option<Self> {
        if criteria.search_term.is_empty() {
            return None;
        }
        Some(Self {
            needle: criteria.search_term.to_lowercase(),
            field: criteria.search_field.as_deref().filter(|f| !f.is_empty()),
        })
    }

    fn matches<T: Record>(&self, record: &T) -> bool {
        match self.field {
            Some(field) => self.field_matches(record, field),
            None => T::searchable_fields()
                .iter()
                .any(|field| self.field_matches(record, field)),
        }
    }

    fn field_matches<T: Record>(&self, record: &T, field: &str) -> bool {
        record
            .field_value(field)
            .and_then(|v| v.search_text())
            .is_some_and(|text| text.to_lowercase().contains(&self.needle))
    }
}
