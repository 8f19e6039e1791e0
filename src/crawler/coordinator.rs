//! Crawl orchestrator - concurrent fan-out over the source adapters
//!
//! Every adapter runs on its own tokio task against the shared HTTP client.
//! A failing or panicking adapter is recorded as `Failed` and never affects
//! the others. Workers hand their records back through their join handles;
//! nothing is accumulated in shared state.

use crate::crawler::HttpClient;
use crate::sources::{RawRecord, SourceAdapter};
use chrono::{DateTime, Utc};
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinError;

/// Terminal state of one adapter run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterStatus {
    /// Finished with this many raw records
    Success(usize),
    /// Failed with a readable reason
    Failed(String),
}

impl fmt::Display for AdapterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(count) => write!(f, "Success({})", count),
            Self::Failed(reason) => write!(f, "Failed({})", reason),
        }
    }
}

/// Outcome of one adapter within a crawl session
#[derive(Debug, Clone)]
pub struct AdapterRunResult {
    pub adapter: String,
    pub status: AdapterStatus,
    pub elapsed: Duration,
}

impl AdapterRunResult {
    pub fn is_success(&self) -> bool {
        matches!(self.status, AdapterStatus::Success(_))
    }
}

/// Per-invocation record of a crawl, reported to the caller then discarded
#[derive(Debug, Clone)]
pub struct CrawlSession {
    pub query: String,
    pub page_budget: u32,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub results: Vec<AdapterRunResult>,
}

impl CrawlSession {
    pub fn succeeded(&self) -> impl Iterator<Item = &AdapterRunResult> {
        self.results.iter().filter(|r| r.is_success())
    }

    pub fn failed(&self) -> impl Iterator<Item = &AdapterRunResult> {
        self.results.iter().filter(|r| !r.is_success())
    }

    /// Status of the adapter with the given name
    pub fn status_of(&self, adapter: &str) -> Option<&AdapterStatus> {
        self.results
            .iter()
            .find(|r| r.adapter == adapter)
            .map(|r| &r.status)
    }

    /// Raw records produced by all successful adapters
    pub fn total_records(&self) -> usize {
        self.results
            .iter()
            .map(|r| match r.status {
                AdapterStatus::Success(count) => count,
                AdapterStatus::Failed(_) => 0,
            })
            .sum()
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Runs every adapter concurrently against one query
#[derive(Debug, Clone)]
pub struct Orchestrator {
    client: Arc<HttpClient>,
}

impl Orchestrator {
    pub fn new(client: HttpClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Crawls `query` with every adapter and waits for all of them
    ///
    /// Returns the session record and the union of records from the adapters
    /// that succeeded. Records arrive in adapter order, but no ordering is
    /// promised between adapters.
    pub async fn run(
        &self,
        query: &str,
        page_budget: u32,
        adapters: &[Arc<dyn SourceAdapter>],
    ) -> (CrawlSession, Vec<RawRecord>) {
        let started_at = Utc::now();
        let dispatched = Instant::now();

        tracing::info!(
            "Dispatching {} adapters for query '{}' ({} pages each)",
            adapters.len(),
            query,
            page_budget
        );

        let mut handles = Vec::with_capacity(adapters.len());
        for adapter in adapters {
            let name = adapter.name().to_string();
            let adapter = Arc::clone(adapter);
            let client = Arc::clone(&self.client);
            let query = query.to_string();

            let handle = tokio::spawn(async move {
                let started = Instant::now();
                let result = adapter.crawl(&query, page_budget, &client).await;
                (result, started.elapsed())
            });
            handles.push((name, handle));
        }

        let mut results = Vec::with_capacity(handles.len());
        let mut records = Vec::new();

        for (adapter, handle) in handles {
            let (status, elapsed) = match handle.await {
                Ok((Ok(batch), elapsed)) => {
                    tracing::info!(
                        "[{}] Finished with {} records in {:?}",
                        adapter,
                        batch.len(),
                        elapsed
                    );
                    let count = batch.len();
                    records.extend(batch);
                    (AdapterStatus::Success(count), elapsed)
                }
                Ok((Err(err), elapsed)) => {
                    tracing::warn!("[{}] Failed: {}", adapter, err);
                    (AdapterStatus::Failed(err.to_string()), elapsed)
                }
                Err(join_error) => {
                    let reason = join_failure_reason(join_error);
                    tracing::warn!("[{}] Task aborted: {}", adapter, reason);
                    (AdapterStatus::Failed(reason), dispatched.elapsed())
                }
            };

            results.push(AdapterRunResult {
                adapter,
                status,
                elapsed,
            });
        }

        let session = CrawlSession {
            query: query.to_string(),
            page_budget,
            started_at,
            finished_at: Utc::now(),
            results,
        };

        tracing::info!(
            "Crawl finished: {} of {} adapters succeeded, {} raw records",
            session.succeeded().count(),
            session.results.len(),
            records.len()
        );

        (session, records)
    }
}

fn join_failure_reason(error: JoinError) -> String {
    if error.is_panic() {
        format!("panicked: {}", panic_message(error.into_panic()))
    } else {
        "task cancelled".to_string()
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
