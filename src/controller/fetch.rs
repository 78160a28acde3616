//! Sequencing of catalog fetches.
//!
//! Every query change dispatches a new [`FetchAttempt`] with the next value
//! of `latest_sequence`. Older pending attempts are marked superseded and
//! their cancellation tokens fired. When a response arrives, it is committed
//! only if its id still equals `latest_sequence`; everything else is dropped
//! without touching the view. Cancellation only saves work: the sequence
//! check alone decides what reaches the view.

use tokio_util::sync::CancellationToken;

use crate::catalog::{CatalogPage, FetchError, Query};
use crate::config::StaleItems;
use crate::controller::intent::QueryIntent;
use crate::controller::reducer::{QueryReducer, Transition};
use crate::controller::state::{Sequence, ViewError, ViewState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptStatus {
    Pending,
    Completed,
    Superseded,
    Aborted,
}

/// One dispatched request/response cycle.
#[derive(Debug, Clone)]
pub struct FetchAttempt {
    pub id: Sequence,
    pub query: Query,
    pub status: AttemptStatus,
    pub cancel: CancellationToken,
}

/// What happened to a response handed to [`FetchController::settle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// Latest attempt succeeded; the view shows its items.
    Committed,
    /// Latest attempt failed; the view shows `FetchFailed`.
    Failed,
    /// A newer attempt exists; response dropped.
    Superseded,
    /// Attempt was cancelled; nothing changed.
    Aborted,
    /// No such attempt in flight.
    Unknown,
}

impl Settlement {
    /// Final status of the attempt this settlement belongs to.
    pub fn status(&self) -> AttemptStatus {
        match self {
            Settlement::Committed | Settlement::Failed => AttemptStatus::Completed,
            Settlement::Superseded => AttemptStatus::Superseded,
            Settlement::Aborted | Settlement::Unknown => AttemptStatus::Aborted,
        }
    }
}

/// Owner of the view state and the sequence counter.
#[derive(Debug)]
pub struct FetchController {
    latest_sequence: Sequence,
    state: ViewState,
    in_flight: Vec<FetchAttempt>,
    last_dispatched: Option<Query>,
    stale_items: StaleItems,
}

impl FetchController {
    pub fn new(initial: Query, stale_items: StaleItems) -> Self {
        Self {
            latest_sequence: 0,
            state: ViewState::new(initial),
            in_flight: Vec::new(),
            last_dispatched: None,
            stale_items,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn latest_sequence(&self) -> Sequence {
        self.latest_sequence
    }

    /// Attempts dispatched but not yet settled, superseded ones included.
    pub fn in_flight(&self) -> &[FetchAttempt] {
        &self.in_flight
    }

    /// The current query differs from the last one dispatched.
    pub fn is_dirty(&self) -> bool {
        self.last_dispatched.as_ref() != Some(&self.state.query)
    }

    /// Applies a user action to the query.
    ///
    /// Returns `true` when the query changed and a fetch should be
    /// dispatched. The caller decides when (immediately or after a debounce).
    pub fn apply(&mut self, intent: QueryIntent) -> bool {
        match QueryReducer::reduce(&self.state, intent) {
            Transition::Fetch(query) => {
                self.replace_query(query);
                true
            }
            Transition::Draft(text) => {
                self.state.page_input = text;
                false
            }
            Transition::Unchanged => false,
        }
    }

    pub fn set_search_pending(&mut self, pending: bool) {
        self.state.search_pending = pending;
    }

    /// Replaces the query and dispatches it.
    pub fn on_query_change(&mut self, query: Query) -> FetchAttempt {
        self.replace_query(query);
        self.dispatch()
    }

    /// A different result set has an unknown page count until it commits.
    fn replace_query(&mut self, query: Query) {
        if !query.same_results_as(&self.state.query) {
            self.state.total_pages = None;
        }
        self.state.page_input = query.page().to_string();
        self.state.query = query;
    }

    /// Starts a fetch for the current query, superseding all pending ones.
    ///
    /// The returned attempt is a snapshot; its `status` stays `Pending`.
    pub fn dispatch(&mut self) -> FetchAttempt {
        self.latest_sequence += 1;
        let id = self.latest_sequence;

        for attempt in self
            .in_flight
            .iter_mut()
            .filter(|a| a.status == AttemptStatus::Pending)
        {
            attempt.status = AttemptStatus::Superseded;
            attempt.cancel.cancel();
            tracing::trace!(seq = attempt.id, superseded_by = id, "Fetch superseded");
        }

        self.state.loading = true;
        self.state.error = None;
        self.state.search_pending = false;
        if self.stale_items == StaleItems::Clear {
            self.state.items.clear();
        }

        let attempt = FetchAttempt {
            id,
            query: self.state.query.clone(),
            status: AttemptStatus::Pending,
            cancel: CancellationToken::new(),
        };
        tracing::debug!(
            seq = id,
            page = attempt.query.page(),
            search = attempt.query.search_text(),
            "Dispatching catalog fetch"
        );
        self.last_dispatched = Some(attempt.query.clone());
        self.in_flight.push(attempt.clone());
        attempt
    }

    /// Records the outcome of attempt `id`.
    pub fn settle(&mut self, id: Sequence, result: Result<CatalogPage, FetchError>) -> Settlement {
        let Some(position) = self.in_flight.iter().position(|a| a.id == id) else {
            tracing::trace!(seq = id, "Response for unknown fetch");
            return Settlement::Unknown;
        };
        let attempt = self.in_flight.remove(position);

        if id != self.latest_sequence || attempt.status != AttemptStatus::Pending {
            tracing::debug!(
                seq = id,
                latest = self.latest_sequence,
                "Ignoring response for stale fetch"
            );
            return Settlement::Superseded;
        }

        match result {
            Ok(page) => {
                self.state.total_pages = page.total_pages(attempt.query.page_size());
                self.state.items = page.items;
                self.state.loading = false;
                self.state.error = None;
                self.state.committed = Some(id);
                tracing::debug!(
                    seq = id,
                    items = self.state.items.len(),
                    total_pages = ?self.state.total_pages,
                    "Catalog page committed"
                );
                Settlement::Committed
            }
            Err(e) if e.is_cancelled() => {
                tracing::trace!(seq = id, "Fetch cancelled");
                Settlement::Aborted
            }
            Err(e) => {
                tracing::warn!(
                    seq = id,
                    error_type = e.error_type(),
                    error = %e,
                    "Error fetching exhibits"
                );
                self.state.error = Some(ViewError::FetchFailed);
                self.state.loading = false;
                Settlement::Failed
            }
        }
    }

    /// Cancels everything in flight. Used when the view shuts down.
    pub fn abort_all(&mut self) {
        for attempt in self.in_flight.drain(..) {
            attempt.cancel.cancel();
            tracing::trace!(seq = attempt.id, "Fetch aborted");
        }
        self.state.loading = false;
    }
}
