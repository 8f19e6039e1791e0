//! Source adapters: per-store producers of raw product records
//!
//! Each store is a separate implementation of [`SourceAdapter`]. Adapters share
//! nothing but the [`HttpClient`] handed to them by the orchestrator and the
//! small HTML helpers in `html`.

mod bms;
mod diamondstar;
mod html;
mod leaders;
mod newvision;
mod smartbuy;
mod walker;

pub use bms::BmsAdapter;
pub use diamondstar::DiamondStarAdapter;
pub use leaders::LeadersAdapter;
pub use newvision::NewVisionAdapter;
pub use smartbuy::SmartBuyAdapter;
pub use walker::PageWalker;

use crate::config::{Config, SourceKind};
use crate::crawler::{FetchError, HttpClient};
use crate::ConfigError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors that end one adapter's crawl
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Failed to parse {url}: {message}")]
    Parse { url: String, message: String },

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// An unvalidated, source-tagged mapping of field name to text
///
/// Keys are whatever the source calls its columns ("Product Name",
/// "Price (JD)", ...). The normalization pipeline maps them onto the
/// canonical schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    source: String,
    fields: HashMap<String, String>,
}

impl RawRecord {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            fields: HashMap::new(),
        }
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Inserts only when a value was found
    pub fn insert_opt(&mut self, key: impl Into<String>, value: Option<String>) {
        if let Some(value) = value {
            self.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Name of the adapter that produced this record
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A site-specific producer of raw records for a search query
///
/// Implementations must:
/// - stop paginating on the first empty listing page or when `page_budget` is spent
/// - wait between consecutive requests to the same host
/// - skip malformed items instead of failing the whole crawl
/// - report any unrecoverable failure as a single `AdapterError`
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Name used as the source tag and in session reports
    fn name(&self) -> &str;

    /// Crawls up to `page_budget` listing pages for `query`
    async fn crawl(
        &self,
        query: &str,
        page_budget: u32,
        client: &HttpClient,
    ) -> Result<Vec<RawRecord>, AdapterError>;
}

/// Fetches a product detail page, treating a 404 as a skippable item
pub(crate) async fn fetch_detail(
    client: &HttpClient,
    source: &str,
    url: &str,
) -> Result<Option<String>, AdapterError> {
    match client.get_text(url).await {
        Ok(body) => Ok(Some(body)),
        Err(err) if err.status() == Some(404) => {
            tracing::warn!("[{}] Skipping missing product page {}", source, url);
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

/// Fetches a listing page; a 404 means the results ran out and reads as empty
///
/// WooCommerce answers 404 for `/page/N/` past the last results page.
pub(crate) async fn fetch_listing(
    client: &HttpClient,
    source: &str,
    url: &str,
) -> Result<Option<String>, AdapterError> {
    match client.get_text(url).await {
        Ok(body) => Ok(Some(body)),
        Err(err) if err.status() == Some(404) => {
            tracing::debug!("[{}] Listing page {} not found, no more results", source, url);
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

/// Builds the adapters for every enabled `[[source]]` entry
pub fn build_adapters(config: &Config) -> Result<Vec<Arc<dyn SourceAdapter>>, ConfigError> {
    let delay = Duration::from_millis(config.crawler.page_delay_ms);
    let mut adapters: Vec<Arc<dyn SourceAdapter>> = Vec::new();

    for entry in config.sources.iter().filter(|s| s.enabled) {
        let base_url = Url::parse(&entry.base_url).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid base-url '{}': {}", entry.base_url, e))
        })?;
        let walker = PageWalker::new(delay);
        let name = entry.name.clone();

        let adapter: Arc<dyn SourceAdapter> = match entry.kind {
            SourceKind::Bms => Arc::new(BmsAdapter::new(name, base_url, walker)),
            SourceKind::SmartBuy => Arc::new(SmartBuyAdapter::new(name, base_url, walker)),
            SourceKind::Leaders => Arc::new(LeadersAdapter::new(name, base_url, walker)),
            SourceKind::DiamondStar => Arc::new(DiamondStarAdapter::new(name, base_url, walker)),
            SourceKind::NewVision => Arc::new(NewVisionAdapter::new(name, base_url, walker)),
        };
        adapters.push(adapter);
    }

    Ok(adapters)
}
