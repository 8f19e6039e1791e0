//! Pagination and politeness harness shared by the adapters
//!
//! Listing pages are fetched strictly in order: whether page N+1 is worth
//! requesting depends on page N having returned items. Every request after the
//! first one waits for the configured delay.

use crate::sources::AdapterError;
use std::future::Future;
use std::time::Duration;

/// Drives sequential, throttled requests for one adapter
#[derive(Debug, Clone)]
pub struct PageWalker {
    delay: Duration,
}

impl PageWalker {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Sleeps for the politeness delay
    pub async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }

    /// Fetches listing pages `1..=page_budget` and concatenates their items
    ///
    /// Stops at the first page that yields nothing. The first error aborts the
    /// walk and is returned as-is.
    pub async fn collect_pages<T, F, Fut>(
        &self,
        page_budget: u32,
        mut fetch_page: F,
    ) -> Result<Vec<T>, AdapterError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<Vec<T>, AdapterError>>,
    {
        let mut items = Vec::new();

        for page in 1..=page_budget {
            if page > 1 {
                self.pause().await;
            }

            let batch = fetch_page(page).await?;
            if batch.is_empty() {
                tracing::debug!("Page {} returned no items, stopping pagination", page);
                break;
            }
            items.extend(batch);
        }

        Ok(items)
    }

    /// Visits each item in turn, pausing before every request
    ///
    /// `visit` returns `Ok(None)` for items that should be skipped.
    pub async fn visit_each<I, T, F, Fut>(
        &self,
        items: Vec<I>,
        mut visit: F,
    ) -> Result<Vec<T>, AdapterError>
    where
        F: FnMut(I) -> Fut,
        Fut: Future<Output = Result<Option<T>, AdapterError>>,
    {
        let mut results = Vec::with_capacity(items.len());

        for item in items {
            self.pause().await;
            if let Some(result) = visit(item).await? {
                results.push(result);
            }
        }

        Ok(results)
    }
}
