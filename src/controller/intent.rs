use crate::catalog::FilterField;

/// User actions on the exhibit listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryIntent {
    SetFilter { field: FilterField, value: String },
    SetSearchText(String),
    GoToPage(u32),
    NextPage,
    PreviousPage,
    /// Typing in the page-number box. Nothing is fetched until submitted.
    EditPageInput(String),
    /// Enter or blur on the page-number box.
    SubmitPageInput,
    /// Empty every filter and the search text, back to page 1, in one step.
    ResetFilters,
    /// Re-run the current query, e.g. after a failure.
    Refresh,
}

impl QueryIntent {
    pub fn set_filter(field: FilterField, value: impl Into<String>) -> Self {
        QueryIntent::SetFilter {
            field,
            value: value.into(),
        }
    }

    /// Search edits are the only intents subject to the debounce interval.
    pub fn is_search_edit(&self) -> bool {
        matches!(self, QueryIntent::SetSearchText(_))
    }
}
