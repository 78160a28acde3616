use std::fmt;

use crate::catalog::{ExhibitSummary, Query};

/// Monotonic id of a dispatched fetch.
pub type Sequence = u64;

/// User-visible failure of the latest fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewError {
    /// Network error or non-2xx response from the catalog.
    FetchFailed,
}

impl ViewError {
    pub fn message(&self) -> &'static str {
        match self {
            ViewError::FetchFailed => "Failed to fetch exhibits",
        }
    }
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Read model observed by the presentation layer.
///
/// Items, page count and error always come from the most recently
/// dispatched attempt that completed, never from a superseded one.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub loading: bool,
    pub error: Option<ViewError>,
    pub items: Vec<ExhibitSummary>,
    /// `None` until a response carrying a total count commits.
    pub total_pages: Option<u32>,
    /// Current query, including edits not yet dispatched.
    pub query: Query,
    /// Text of the page-number box; may differ from `query.page()` while edited.
    pub page_input: String,
    /// A search edit is waiting out the debounce interval.
    pub search_pending: bool,
    /// Attempt whose response is on screen.
    pub committed: Option<Sequence>,
}

impl ViewState {
    pub fn new(query: Query) -> Self {
        Self {
            loading: false,
            error: None,
            items: Vec::new(),
            total_pages: None,
            page_input: query.page().to_string(),
            query,
            search_pending: false,
            committed: None,
        }
    }

    pub fn page(&self) -> u32 {
        self.query.page()
    }

    /// No fetch in flight and no search edit waiting to be sent.
    pub fn is_settled(&self) -> bool {
        !self.loading && !self.search_pending
    }

    pub fn has_previous(&self) -> bool {
        self.page() > 1
    }

    /// Unknown page counts never block moving forward.
    pub fn has_next(&self) -> bool {
        self.total_pages.map_or(true, |total| self.page() < total)
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(Query::default())
    }
}
