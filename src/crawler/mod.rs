//! Crawler module: fetching, orchestration and crawl sessions
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with bounded retries
//! - Concurrent fan-out over the source adapters
//! - The session driver that feeds crawl results into the catalog

mod coordinator;
mod fetcher;
mod session;

pub use coordinator::{AdapterRunResult, AdapterStatus, CrawlSession, Orchestrator};
pub use fetcher::{
    build_http_client, is_transient_status, FetchError, HttpClient, RetryPolicy,
    TRANSIENT_STATUSES,
};
pub use session::{merge_products, run_session, MergeCounts, SessionReport};
