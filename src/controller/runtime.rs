//! Event loop that owns a [`FetchController`].
//!
//! One task per mounted view. User intents arrive over an mpsc channel,
//! fetch results over another, and the resulting [`ViewState`] is published
//! on a watch channel. All controller mutation happens on this one task;
//! spawned fetch tasks only perform I/O and report back.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

use crate::catalog::{CatalogPage, CatalogTransport, FetchError, FilterField, Query};
use crate::config::{Config, StaleItems};
use crate::controller::fetch::{FetchAttempt, FetchController};
use crate::controller::intent::QueryIntent;
use crate::controller::state::{Sequence, ViewState};

const COMMAND_BUFFER: usize = 64;

/// The view task has stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Catalog view has shut down")]
pub struct ViewClosed;

/// Construction options for a catalog view.
#[derive(Debug, Clone)]
pub struct ViewOptions {
    pub initial_query: Query,
    pub stale_items: StaleItems,
    /// Zero dispatches every search edit immediately.
    pub search_debounce: Duration,
}

impl ViewOptions {
    pub fn from_config(config: &Config) -> Self {
        let page_size = NonZeroU32::new(config.catalog.page_size).unwrap_or(NonZeroU32::MIN);
        Self {
            initial_query: Query::new(page_size),
            stale_items: config.view.stale_items,
            search_debounce: Duration::from_millis(config.view.search_debounce_ms),
        }
    }

    pub fn with_initial_query(mut self, query: Query) -> Self {
        self.initial_query = query;
        self
    }
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

enum ViewCommand {
    Apply {
        intent: QueryIntent,
        respond_to: oneshot::Sender<ViewState>,
    },
}

/// Cloneable front end of a running view.
#[derive(Clone)]
pub struct ViewHandle {
    sender: mpsc::Sender<ViewCommand>,
    state: watch::Receiver<ViewState>,
}

impl ViewHandle {
    /// Sends `intent` and returns the view as it stands right after applying it.
    pub async fn apply(&self, intent: QueryIntent) -> Result<ViewState, ViewClosed> {
        let (respond_to, receiver) = oneshot::channel();
        self.sender
            .send(ViewCommand::Apply { intent, respond_to })
            .await
            .map_err(|_| ViewClosed)?;
        receiver.await.map_err(|_| ViewClosed)
    }

    pub async fn set_filter(
        &self,
        field: FilterField,
        value: impl Into<String>,
    ) -> Result<ViewState, ViewClosed> {
        self.apply(QueryIntent::set_filter(field, value)).await
    }

    pub async fn set_search_text(&self, text: impl Into<String>) -> Result<ViewState, ViewClosed> {
        self.apply(QueryIntent::SetSearchText(text.into())).await
    }

    pub async fn go_to_page(&self, page: u32) -> Result<ViewState, ViewClosed> {
        self.apply(QueryIntent::GoToPage(page)).await
    }

    pub async fn next_page(&self) -> Result<ViewState, ViewClosed> {
        self.apply(QueryIntent::NextPage).await
    }

    pub async fn previous_page(&self) -> Result<ViewState, ViewClosed> {
        self.apply(QueryIntent::PreviousPage).await
    }

    pub async fn edit_page_input(&self, text: impl Into<String>) -> Result<ViewState, ViewClosed> {
        self.apply(QueryIntent::EditPageInput(text.into())).await
    }

    pub async fn submit_page_input(&self) -> Result<ViewState, ViewClosed> {
        self.apply(QueryIntent::SubmitPageInput).await
    }

    pub async fn reset_filters(&self) -> Result<ViewState, ViewClosed> {
        self.apply(QueryIntent::ResetFilters).await
    }

    pub async fn refresh(&self) -> Result<ViewState, ViewClosed> {
        self.apply(QueryIntent::Refresh).await
    }

    /// Latest published state.
    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.clone()
    }

    /// Waits until nothing is loading and no search edit is pending.
    pub async fn settled(&self) -> Result<ViewState, ViewClosed> {
        let mut receiver = self.state.clone();
        let state = receiver
            .wait_for(ViewState::is_settled)
            .await
            .map_err(|_| ViewClosed)?;
        Ok(state.clone())
    }
}

type FetchResult = (Sequence, Result<CatalogPage, FetchError>);

/// The task side of a view: controller, transport and channels.
pub struct CatalogView<T: CatalogTransport> {
    controller: FetchController,
    transport: Arc<T>,
    commands: mpsc::Receiver<ViewCommand>,
    results_tx: mpsc::UnboundedSender<FetchResult>,
    results_rx: mpsc::UnboundedReceiver<FetchResult>,
    publisher: watch::Sender<ViewState>,
    search_debounce: Duration,
    search_deadline: Option<Instant>,
    initial: Option<FetchAttempt>,
}

/// Starts a view on the current tokio runtime and dispatches the initial query.
///
/// The view stops once every [`ViewHandle`] is dropped; in-flight fetches
/// are cancelled on the way out.
pub fn spawn_view<T: CatalogTransport>(
    transport: Arc<T>,
    options: ViewOptions,
) -> (ViewHandle, JoinHandle<()>) {
    let (view, handle) = CatalogView::new(transport, options);
    let task = tokio::spawn(view.run());
    (handle, task)
}

impl<T: CatalogTransport> CatalogView<T> {
    pub fn new(transport: Arc<T>, options: ViewOptions) -> (Self, ViewHandle) {
        let mut controller = FetchController::new(options.initial_query, options.stale_items);
        // Dispatched here so the first published state already reads as loading.
        let initial = controller.dispatch();
        let (publisher, state) = watch::channel(controller.state().clone());
        let (sender, commands) = mpsc::channel(COMMAND_BUFFER);
        let (results_tx, results_rx) = mpsc::unbounded_channel();

        let view = Self {
            controller,
            transport,
            commands,
            results_tx,
            results_rx,
            publisher,
            search_debounce: options.search_debounce,
            search_deadline: None,
            initial: Some(initial),
        };
        (view, ViewHandle { sender, state })
    }

    pub async fn run(mut self) {
        if let Some(attempt) = self.initial.take() {
            self.spawn_fetch(attempt);
        }

        loop {
            let deadline = self.search_deadline;
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(command) => self.handle(command),
                    None => break,
                },
                Some((id, result)) = self.results_rx.recv() => {
                    let settlement = self.controller.settle(id, result);
                    tracing::trace!(seq = id, ?settlement, "Fetch settled");
                    self.publish();
                }
                _ = wait_for_deadline(deadline) => {
                    self.search_deadline = None;
                    self.flush_search();
                }
            }
        }

        self.controller.abort_all();
        self.publish();
        tracing::debug!("Catalog view stopped");
    }

    fn handle(&mut self, command: ViewCommand) {
        match command {
            ViewCommand::Apply { intent, respond_to } => {
                let debounced = intent.is_search_edit() && !self.search_debounce.is_zero();
                if self.controller.apply(intent) {
                    if debounced {
                        self.search_deadline = Some(Instant::now() + self.search_debounce);
                        self.controller.set_search_pending(true);
                    } else {
                        self.search_deadline = None;
                        self.dispatch();
                    }
                }
                self.publish();
                if respond_to.send(self.controller.state().clone()).is_err() {
                    tracing::trace!("View: Apply response dropped (receiver gone)");
                }
            }
        }
    }

    /// Debounce elapsed: send the search unless it was already covered.
    fn flush_search(&mut self) {
        if self.controller.is_dirty() {
            self.dispatch();
        } else {
            self.controller.set_search_pending(false);
        }
        self.publish();
    }

    fn dispatch(&mut self) {
        let attempt = self.controller.dispatch();
        self.spawn_fetch(attempt);
    }

    fn spawn_fetch(&self, attempt: FetchAttempt) {
        let transport = Arc::clone(&self.transport);
        let results = self.results_tx.clone();

        tokio::spawn(async move {
            let result = transport
                .fetch_page(&attempt.query, attempt.cancel.clone())
                .await;
            if results.send((attempt.id, result)).is_err() {
                tracing::trace!(seq = attempt.id, "View gone before fetch settled");
            }
        });
    }

    fn publish(&self) {
        let next = self.controller.state();
        self.publisher.send_if_modified(|current| {
            if current == next {
                false
            } else {
                *current = next.clone();
                true
            }
        });
    }
}

async fn wait_for_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
