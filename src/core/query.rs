//! Filter criteria, sort specifications and pagination metadata

use crate::core::error::ParseError;
use crate::core::record::CREATED_AT_FIELD;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Default number of rows per page
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Page sizes offered by the list views
pub const PAGE_SIZES: [usize; 3] = [5, 10, 20];

/// A snapshot of the active filters of a list view
///
/// Every field is optional or empty by default, meaning "no restriction".
///
/// # Example
/// ```rust,ignore
/// let criteria = FilterCriteria::default()
///     .with_search("ali")
///     .with_exact("user", "64f0c0ffee")
///     .with_price_range(Some(100.0), Some(200.0));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterCriteria {
    /// Case-insensitive substring searched in the record's searchable fields
    pub search_term: String,

    /// Restrict the search to this single field
    pub search_field: Option<String>,

    /// Exact-match filters keyed by relation or field name
    ///
    /// Empty values are ignored.
    pub exact: BTreeMap<String, String>,

    /// Inclusive lower price bound
    pub min_price: Option<f64>,

    /// Inclusive upper price bound
    pub max_price: Option<f64>,

    /// Inclusive start date (from 00:00:00 UTC)
    pub start_date: Option<NaiveDate>,

    /// Inclusive end date (until 23:59:59.999 UTC)
    pub end_date: Option<NaiveDate>,
}

impl FilterCriteria {
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn with_search_field(mut self, field: impl Into<String>) -> Self {
        self.search_field = Some(field.into());
        self
    }

    pub fn with_exact(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.exact.insert(key.into(), value.into());
        self
    }

    pub fn with_price_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    pub fn with_date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    /// True when no filter restricts the collection
    pub fn is_empty(&self) -> bool {
        self.search_term.is_empty()
            && self.exact.values().all(|v| v.is_empty())
            && self.min_price.is_none()
            && self.max_price.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }
}

/// Parse a `YYYY-MM-DD` date as entered in a date picker
///
/// An empty input means "no bound".
pub fn parse_date_bound(input: &str) -> Result<Option<NaiveDate>, ParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| ParseError::Date {
            value: input.to_string(),
        })
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Sort field and direction
///
/// # Format
/// - `field:asc` or `field` (ascending)
/// - `field:desc` (descending)
///
/// # Example
/// ```
/// use listview::core::query::{SortDirection, SortSpec};
///
/// let spec: SortSpec = "price:desc".parse().unwrap();
/// assert_eq!(spec.field, "price");
/// assert_eq!(spec.direction, SortDirection::Desc);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self::desc(CREATED_AT_FIELD)
    }
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }

    /// Toggle sorting on `field`
    ///
    /// The same field flips direction; a new field starts descending.
    pub fn toggle(&mut self, field: &str) {
        if self.field == field {
            self.direction = self.direction.flipped();
        } else {
            self.field = field.to_string();
            self.direction = SortDirection::Desc;
        }
    }
}

impl FromStr for SortSpec {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::Sort {
            value: s.to_string(),
        };

        let (field, direction) = match s.split_once(':') {
            Some((field, "asc")) => (field, SortDirection::Asc),
            Some((field, "desc")) => (field, SortDirection::Desc),
            Some(_) => return Err(invalid()),
            None => (s, SortDirection::Asc),
        };

        let field = field.trim();
        if field.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            field: field.to_string(),
            direction,
        })
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match self.direction {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        };
        write!(f, "{}:{}", self.field, direction)
    }
}

/// One page of records together with its pagination metadata
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    /// The records of the requested page
    pub items: Vec<T>,

    /// Pagination metadata
    pub pagination: PaginationMeta,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> usize {
        self.pagination.total_pages
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Current page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub page_size: usize,

    /// Total number of items (after filters)
    pub total_items: usize,

    /// Total number of pages
    pub total_pages: usize,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_prev: bool,
}

impl PaginationMeta {
    /// Create pagination metadata from calculation
    ///
    /// The page is not clamped into `[1, total_pages]`; callers decide.
    pub fn new(page: usize, page_size: usize, total_items: usize) -> Self {
        // Ensure page size is at least 1 to avoid division by zero
        let page_size = page_size.max(1);
        let page = page.max(1);
        let total_pages = total_items.div_ceil(page_size);

        Self {
            page,
            page_size,
            total_items,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }

    /// Index range of this page inside the full collection
    pub fn window(&self) -> std::ops::Range<usize> {
        let start = (self.page - 1)
            .saturating_mul(self.page_size)
            .min(self.total_items);
        let end = start.saturating_add(self.page_size).min(self.total_items);
        start..end
    }
}
