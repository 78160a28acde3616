//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod mock_catalog;

use async_trait::async_trait;
use curator::catalog::{CatalogPage, CatalogTransport, ExhibitSummary, FetchError, Query, RecordId};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::{oneshot, watch};
use tokio_util::sync::CancellationToken;

/// Create a temporary config file with the given TOML contents.
pub fn temp_config(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, contents).expect("Failed to write config");
    (temp_dir, config_path)
}

// -- Catalog fixtures ---------------------------------------------------------

pub fn exhibit(title: &str) -> ExhibitSummary {
    ExhibitSummary {
        id: RecordId::new(title.to_lowercase().replace(' ', "-")),
        title: title.to_string(),
        creator: None,
        image_url: None,
        description: None,
        collection: None,
        culture: None,
        date: None,
    }
}

pub fn page_of(titles: &[&str], total_count: Option<u64>) -> CatalogPage {
    CatalogPage {
        items: titles.iter().map(|t| exhibit(t)).collect(),
        total_count,
    }
}

pub fn titles(items: &[ExhibitSummary]) -> Vec<&str> {
    items.iter().map(|e| e.title.as_str()).collect()
}

// -- Scripted transport -------------------------------------------------------

struct ScriptedCall {
    query: Query,
    cancel: CancellationToken,
    reply: Option<oneshot::Sender<Result<CatalogPage, FetchError>>>,
}

/// Transport whose responses are released by the test, in any order.
///
/// Each `fetch_page` call parks until [`ScriptedTransport::respond`] is
/// called for its index. Cancellation is recorded but otherwise ignored, so
/// a superseded call still delivers whatever the test hands it.
pub struct ScriptedTransport {
    calls: Mutex<Vec<ScriptedCall>>,
    count: watch::Sender<usize>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        let (count, _) = watch::channel(0);
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            count,
        })
    }

    /// Waits until at least `n` calls have been made.
    pub async fn wait_for_calls(&self, n: usize) {
        let mut count = self.count.subscribe();
        tokio::time::timeout(Duration::from_secs(2), count.wait_for(|c| *c >= n))
            .await
            .unwrap_or_else(|_| panic!("timed out waiting for {} fetch calls", n))
            .expect("transport dropped");
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn query(&self, index: usize) -> Query {
        self.calls.lock()[index].query.clone()
    }

    pub fn is_cancelled(&self, index: usize) -> bool {
        self.calls.lock()[index].cancel.is_cancelled()
    }

    /// Releases call `index` with `result`.
    pub fn respond(&self, index: usize, result: Result<CatalogPage, FetchError>) {
        let reply = self.calls.lock()[index]
            .reply
            .take()
            .unwrap_or_else(|| panic!("call {} already answered", index));
        let _ = reply.send(result);
    }
}

#[async_trait]
impl CatalogTransport for ScriptedTransport {
    async fn fetch_page(
        &self,
        query: &Query,
        cancel: CancellationToken,
    ) -> Result<CatalogPage, FetchError> {
        let (reply, response) = oneshot::channel();
        {
            let mut calls = self.calls.lock();
            calls.push(ScriptedCall {
                query: query.clone(),
                cancel,
                reply: Some(reply),
            });
            self.count.send_replace(calls.len());
        }
        response.await.unwrap_or(Err(FetchError::Cancelled))
    }
}

/// Gives spawned fetch tasks time to report back to the view.
pub async fn let_tasks_run() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}
