use std::num::NonZeroU32;

use crate::catalog::Query;
use crate::controller::intent::QueryIntent;
use crate::controller::state::ViewState;

/// Result of reducing one intent against the current view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The query changed and must be fetched.
    Fetch(Query),
    /// Only the page-number box changes.
    Draft(String),
    Unchanged,
}

/// Pure mapping from `(view, intent)` to the next query.
///
/// This is the only place that decides whether an edit invalidates the
/// current query. Side effects (dispatch, cancellation) belong to the
/// fetch controller.
pub struct QueryReducer;

impl QueryReducer {
    pub fn reduce(state: &ViewState, intent: QueryIntent) -> Transition {
        let current = &state.query;
        match intent {
            QueryIntent::SetFilter { field, value } => {
                changed(current, current.with_filter(field, value))
            }
            QueryIntent::SetSearchText(text) => changed(current, current.with_search_text(text)),
            QueryIntent::GoToPage(page) => Self::go_to_page(state, page),
            QueryIntent::NextPage => Self::go_to_page(state, current.page().saturating_add(1)),
            QueryIntent::PreviousPage => Self::go_to_page(state, current.page().saturating_sub(1)),
            QueryIntent::EditPageInput(text) => draft(state, text),
            QueryIntent::SubmitPageInput => match state.page_input.trim().parse::<u32>() {
                Ok(page) => Self::go_to_page(state, page),
                Err(_) => draft(state, current.page().to_string()),
            },
            QueryIntent::ResetFilters => changed(current, current.cleared()),
            QueryIntent::Refresh => Transition::Fetch(current.clone()),
        }
    }

    /// Out-of-range pages leave the query alone and put the page box back.
    fn go_to_page(state: &ViewState, page: u32) -> Transition {
        let current = &state.query;
        match in_bounds(page, state.total_pages) {
            Some(page) if page.get() != current.page() => {
                Transition::Fetch(current.with_page(page))
            }
            _ => draft(state, current.page().to_string()),
        }
    }
}

/// `1 <= page <= total_pages`, or just `page >= 1` while the total is unknown.
pub fn in_bounds(page: u32, total_pages: Option<u32>) -> Option<NonZeroU32> {
    let page = NonZeroU32::new(page)?;
    match total_pages {
        Some(total) if page.get() > total => None,
        _ => Some(page),
    }
}

fn changed(current: &Query, next: Query) -> Transition {
    if &next == current {
        Transition::Unchanged
    } else {
        Transition::Fetch(next)
    }
}

fn draft(state: &ViewState, text: String) -> Transition {
    if state.page_input == text {
        Transition::Unchanged
    } else {
        Transition::Draft(text)
    }
}
