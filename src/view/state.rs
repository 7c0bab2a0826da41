//! Reducer state behind a list view
//!
//! `ListViewState` holds the raw records and every parameter of the view in
//! one value. Events update the parameters and the derived collection is
//! recomputed eagerly, so reads never see a stale filter or sort.

use crate::core::engine::{Facet, facets, filter_and_sort, paginate};
use crate::core::query::{DEFAULT_PAGE_SIZE, FilterCriteria, Page, PaginationMeta, SortSpec};
use crate::core::record::Record;
use crate::core::stats::{DerivedStats, compute_stats};
use chrono::NaiveDate;
use serde::Serialize;

/// Where the view is in its fetch cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
}

/// A dismissible banner shown above the list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

/// Identifies one fetch; only the latest issued token may land
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// What happened to a fetch response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// A newer fetch was issued; the response was dropped
    Stale,
}

/// User intents a list view reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    SetSearch(String),
    SetSearchField(Option<String>),
    /// Empty value clears the filter
    SetExactFilter { key: String, value: String },
    SetMinPrice(Option<f64>),
    SetMaxPrice(Option<f64>),
    SetDateRange {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
    ToggleSort(String),
    SetSort(SortSpec),
    SetPage(usize),
    NextPage,
    PrevPage,
    SetPageSize(usize),
    ResetFilters,
    DismissNotice,
}

impl ViewEvent {
    fn resets_page(&self) -> bool {
        matches!(
            self,
            ViewEvent::SetSearch(_)
                | ViewEvent::SetSearchField(_)
                | ViewEvent::SetExactFilter { .. }
                | ViewEvent::SetMinPrice(_)
                | ViewEvent::SetMaxPrice(_)
                | ViewEvent::SetDateRange { .. }
                | ViewEvent::ToggleSort(_)
                | ViewEvent::SetSort(_)
                | ViewEvent::ResetFilters
        )
    }
}

/// Everything a renderer needs, detached from the state
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSnapshot<T> {
    pub items: Vec<T>,
    pub pagination: PaginationMeta,
    pub stats: DerivedStats,
    pub load_state: LoadState,
    pub notice: Option<Notice>,
    pub sort: SortSpec,
    pub criteria: FilterCriteria,
}

#[derive(Debug, Clone)]
pub struct ListViewState<T: Record> {
    records: Vec<T>,
    criteria: FilterCriteria,
    sort: SortSpec,
    page: usize,
    page_size: usize,
    load_state: LoadState,
    notice: Option<Notice>,
    latest_request: u64,
    visible: Vec<T>,
    stats: DerivedStats,
}

impl<T: Record> Default for ListViewState<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> ListViewState<T> {
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            records: Vec::new(),
            criteria: FilterCriteria::default(),
            sort: SortSpec::default(),
            page: 1,
            page_size: page_size.max(1),
            load_state: LoadState::Idle,
            notice: None,
            latest_request: 0,
            visible: Vec::new(),
            stats: DerivedStats::default(),
        }
    }

    /// Start with a sort other than newest first
    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = sort;
        self.recompute();
        self
    }

    /// Apply one user event
    pub fn apply(&mut self, event: ViewEvent) {
        let resets_page = event.resets_page();

        match event {
            ViewEvent::SetSearch(term) => self.criteria.search_term = term,
            ViewEvent::SetSearchField(field) => self.criteria.search_field = field,
            ViewEvent::SetExactFilter { key, value } => {
                if value.is_empty() {
                    self.criteria.exact.remove(&key);
                } else {
                    self.criteria.exact.insert(key, value);
                }
            }
            ViewEvent::SetMinPrice(min) => self.criteria.min_price = min,
            ViewEvent::SetMaxPrice(max) => self.criteria.max_price = max,
            ViewEvent::SetDateRange { start, end } => {
                self.criteria.start_date = start;
                self.criteria.end_date = end;
            }
            ViewEvent::ToggleSort(field) => self.sort.toggle(&field),
            ViewEvent::SetSort(spec) => self.sort = spec,
            ViewEvent::SetPage(page) => self.page = page.max(1),
            ViewEvent::NextPage => {
                if self.page < self.total_pages() {
                    self.page += 1;
                }
            }
            ViewEvent::PrevPage => {
                if self.page > 1 {
                    self.page -= 1;
                }
            }
            ViewEvent::SetPageSize(size) => self.page_size = size.max(1),
            ViewEvent::ResetFilters => {
                let search_field = self.criteria.search_field.take();
                self.criteria = FilterCriteria {
                    search_field,
                    ..Default::default()
                };
            }
            ViewEvent::DismissNotice => self.notice = None,
        }

        if resets_page {
            self.page = 1;
            self.recompute();
        }
    }

    /// Issue a token for a fetch about to start and enter `Loading`
    pub fn begin_fetch(&mut self) -> RequestToken {
        self.latest_request += 1;
        self.load_state = LoadState::Loading;
        RequestToken(self.latest_request)
    }

    /// Land a fetch result
    ///
    /// Success replaces the raw records wholesale. Failure keeps them and
    /// raises an error notice. A response for an outdated token changes
    /// nothing.
    pub fn complete_fetch<E: std::fmt::Display>(
        &mut self,
        token: RequestToken,
        result: Result<Vec<T>, E>,
    ) -> FetchOutcome {
        if token.0 != self.latest_request {
            tracing::debug!(
                resource = T::resource_name(),
                token = token.0,
                latest = self.latest_request,
                "Dropping stale fetch response"
            );
            return FetchOutcome::Stale;
        }

        match result {
            Ok(records) => {
                self.records = records;
                self.load_state = LoadState::Loaded;
                if self
                    .notice
                    .as_ref()
                    .is_some_and(|n| n.kind == NoticeKind::Error)
                {
                    self.notice = None;
                }
                self.recompute();
            }
            Err(e) => {
                self.load_state = LoadState::Error;
                self.notice = Some(Notice::error(e.to_string()));
            }
        }
        FetchOutcome::Applied
    }

    /// Whether `token` is the most recently issued one
    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.latest_request
    }

    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    /// Move the page back into range after the collection shrank
    pub fn clamp_page(&mut self) {
        let total = self.total_pages();
        self.page = self.page.min(total).max(1);
    }

    /// The current page of the filtered and sorted collection
    pub fn page_items(&self) -> Page<T> {
        paginate(&self.visible, self.page, self.page_size)
    }

    pub fn snapshot(&self) -> ListSnapshot<T> {
        let Page { items, pagination } = self.page_items();
        ListSnapshot {
            items,
            pagination,
            stats: self.stats.clone(),
            load_state: self.load_state,
            notice: self.notice.clone(),
            sort: self.sort.clone(),
            criteria: self.criteria.clone(),
        }
    }

    /// Exact-filter choices for `relation`, taken from the raw records
    pub fn facets(&self, relation: &str) -> Vec<Facet> {
        facets(&self.records, relation)
    }

    pub fn total_pages(&self) -> usize {
        self.visible.len().div_ceil(self.page_size)
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Filtered and sorted records, before pagination
    pub fn filtered(&self) -> &[T] {
        &self.visible
    }

    pub fn stats(&self) -> &DerivedStats {
        &self.stats
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    fn recompute(&mut self) {
        self.visible = filter_and_sort(self.records.clone(), &self.criteria, &self.sort);
        self.stats = compute_stats(&self.visible);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{FetchError, ListviewError};
    use crate::core::record::PRICE_FIELD;
    use crate::core::record::test_support::TestRecord;
    use crate::core::query::SortDirection;

    fn loaded(records: Vec<TestRecord>, page_size: usize) -> ListViewState<TestRecord> {
        let mut state = ListViewState::with_page_size(page_size);
        let token = state.begin_fetch();
        assert_eq!(
            state.complete_fetch(token, Ok::<_, ListviewError>(records)),
            FetchOutcome::Applied
        );
        state
    }

    fn numbered(n: usize) -> Vec<TestRecord> {
        (0..n)
            .map(|i| TestRecord::new(&i.to_string()).priced(i as f64))
            .collect()
    }

    fn fetch_failure() -> ListviewError {
        FetchError::Transport {
            method: "GET".to_string(),
            url: "http://localhost/api".to_string(),
            message: "connection refused".to_string(),
        }
        .into()
    }

    #[test]
    fn test_initial_state() {
        let state = ListViewState::<TestRecord>::new();
        assert_eq!(state.load_state(), LoadState::Idle);
        assert_eq!(state.page(), 1);
        assert_eq!(state.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(state.sort(), &SortSpec::default());
        assert_eq!(state.total_pages(), 0);
    }

    #[test]
    fn test_fetch_cycle() {
        let mut state = ListViewState::<TestRecord>::new();
        let token = state.begin_fetch();
        assert_eq!(state.load_state(), LoadState::Loading);

        state.complete_fetch(token, Ok::<_, ListviewError>(numbered(3)));
        assert_eq!(state.load_state(), LoadState::Loaded);
        assert_eq!(state.records().len(), 3);
        assert_eq!(state.stats().count, 3);
    }

    #[test]
    fn test_filter_events_reset_page() {
        let events = vec![
            ViewEvent::SetSearch("1".to_string()),
            ViewEvent::SetSearchField(Some("name".to_string())),
            ViewEvent::SetExactFilter {
                key: "user".to_string(),
                value: "u1".to_string(),
            },
            ViewEvent::SetMinPrice(Some(1.0)),
            ViewEvent::SetMaxPrice(None),
            ViewEvent::SetDateRange {
                start: None,
                end: None,
            },
            ViewEvent::ToggleSort(PRICE_FIELD.to_string()),
            ViewEvent::SetSort(SortSpec::asc("name")),
            ViewEvent::ResetFilters,
        ];

        for event in events {
            let mut state = loaded(numbered(30), 5);
            state.apply(ViewEvent::SetPage(3));
            assert_eq!(state.page(), 3);

            state.apply(event.clone());
            assert_eq!(state.page(), 1, "{event:?} should reset the page");
        }
    }

    #[test]
    fn test_page_size_keeps_page() {
        let mut state = loaded(numbered(30), 5);
        state.apply(ViewEvent::SetPage(2));
        state.apply(ViewEvent::SetPageSize(20));
        assert_eq!(state.page(), 2);
        assert_eq!(state.page_size(), 20);
        assert_eq!(state.total_pages(), 2);
    }

    #[test]
    fn test_next_and_prev_stay_in_range() {
        let mut state = loaded(numbered(7), 5);

        state.apply(ViewEvent::PrevPage);
        assert_eq!(state.page(), 1);

        state.apply(ViewEvent::NextPage);
        state.apply(ViewEvent::NextPage);
        assert_eq!(state.page(), 2);
    }

    #[test]
    fn test_exact_filter_empty_value_clears() {
        let records = vec![
            TestRecord::new("1").by_user("u1"),
            TestRecord::new("2").by_user("u2"),
        ];
        let mut state = loaded(records, 10);

        state.apply(ViewEvent::SetExactFilter {
            key: "user".to_string(),
            value: "u1".to_string(),
        });
        assert_eq!(state.filtered().len(), 1);
        assert_eq!(state.stats().count, 1);

        state.apply(ViewEvent::SetExactFilter {
            key: "user".to_string(),
            value: String::new(),
        });
        assert_eq!(state.filtered().len(), 2);
        assert!(state.criteria().exact.is_empty());
    }

    #[test]
    fn test_toggle_sort() {
        let mut state = loaded(numbered(3), 10);

        state.apply(ViewEvent::ToggleSort(PRICE_FIELD.to_string()));
        assert_eq!(state.sort().direction, SortDirection::Desc);
        assert_eq!(state.filtered()[0].id, "2");

        state.apply(ViewEvent::ToggleSort(PRICE_FIELD.to_string()));
        assert_eq!(state.sort().direction, SortDirection::Asc);
        assert_eq!(state.filtered()[0].id, "0");
    }

    #[test]
    fn test_reset_filters_keeps_sort_and_search_field() {
        let mut state = loaded(numbered(10), 10);
        state.apply(ViewEvent::SetSearchField(Some("email".to_string())));
        state.apply(ViewEvent::SetSearch("zzz".to_string()));
        state.apply(ViewEvent::SetSort(SortSpec::asc(PRICE_FIELD)));
        assert!(state.filtered().is_empty());

        state.apply(ViewEvent::ResetFilters);
        assert_eq!(state.filtered().len(), 10);
        assert_eq!(state.criteria().search_field.as_deref(), Some("email"));
        assert_eq!(state.sort(), &SortSpec::asc(PRICE_FIELD));
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut state = ListViewState::<TestRecord>::new();
        let first = state.begin_fetch();
        let second = state.begin_fetch();

        assert_eq!(
            state.complete_fetch(second, Ok::<_, ListviewError>(numbered(2))),
            FetchOutcome::Applied
        );
        assert_eq!(
            state.complete_fetch(first, Ok::<_, ListviewError>(numbered(9))),
            FetchOutcome::Stale
        );
        assert_eq!(state.records().len(), 2);
        assert!(!state.is_current(first));
    }

    #[test]
    fn test_error_keeps_previous_records() {
        let mut state = loaded(numbered(4), 10);

        let token = state.begin_fetch();
        state.complete_fetch(token, Err::<Vec<TestRecord>, _>(fetch_failure()));

        assert_eq!(state.load_state(), LoadState::Error);
        assert_eq!(state.records().len(), 4);
        assert_eq!(state.notice().map(|n| n.kind), Some(NoticeKind::Error));

        state.apply(ViewEvent::DismissNotice);
        assert!(state.notice().is_none());
        assert_eq!(state.load_state(), LoadState::Error);

        let token = state.begin_fetch();
        state.complete_fetch(token, Ok::<_, ListviewError>(numbered(1)));
        assert_eq!(state.load_state(), LoadState::Loaded);
    }

    #[test]
    fn test_success_clears_error_notice_only() {
        let mut state = loaded(numbered(1), 10);
        state.set_notice(Notice::success("Saved"));

        let token = state.begin_fetch();
        state.complete_fetch(token, Ok::<_, ListviewError>(numbered(2)));
        assert_eq!(state.notice(), Some(&Notice::success("Saved")));
    }

    #[test]
    fn test_clamp_page_after_shrink() {
        let mut state = loaded(numbered(12), 5);
        state.apply(ViewEvent::SetPage(3));

        let token = state.begin_fetch();
        state.complete_fetch(token, Ok::<_, ListviewError>(numbered(4)));
        assert_eq!(state.page(), 3);
        assert!(state.page_items().is_empty());

        state.clamp_page();
        assert_eq!(state.page(), 1);
        assert_eq!(state.page_items().items.len(), 4);
    }

    #[test]
    fn test_snapshot() {
        let mut state = loaded(numbered(12), 5);
        state.apply(ViewEvent::SetSort(SortSpec::asc(PRICE_FIELD)));
        state.apply(ViewEvent::NextPage);

        let snapshot = state.snapshot();
        assert_eq!(snapshot.items.len(), 5);
        assert_eq!(snapshot.items[0].id, "5");
        assert_eq!(snapshot.pagination.total_pages, 3);
        assert!(snapshot.pagination.has_next);
        assert_eq!(snapshot.stats.count, 12);
        assert_eq!(snapshot.load_state, LoadState::Loaded);
    }

    #[test]
    fn test_facets_use_raw_records() {
        let mut state = loaded(
            vec![
                TestRecord::new("1").by_user("u1").named("Alice", ""),
                TestRecord::new("2").by_user("u2").named("Bob", ""),
            ],
            10,
        );
        state.apply(ViewEvent::SetSearch("alice".to_string()));

        assert_eq!(state.filtered().len(), 1);
        assert_eq!(state.facets("user").len(), 2);
    }
}
