//! Output module for session reports and catalog summaries
//!
//! This module handles:
//! - Printing session reports, product listings and catalog statistics
//! - Generating markdown summaries of the catalog and the last crawl

mod markdown;
pub mod stats;

pub use markdown::{format_markdown_summary, format_session_report, write_markdown_summary};
pub use stats::{format_products, format_statistics, print_products, print_statistics};

use crate::product::CanonicalProduct;
use crate::storage::{CatalogStats, CatalogStore, StorageError};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Snapshot of the catalog for the markdown export
#[derive(Debug, Clone)]
pub struct CatalogSummary {
    pub generated_at: DateTime<Utc>,
    pub config_hash: String,
    pub stats: CatalogStats,
    /// Saved products, most recently updated first
    pub saved: Vec<CanonicalProduct>,
}

impl CatalogSummary {
    /// Share of products with a known price, in percent
    pub fn priced_rate(&self) -> f64 {
        if self.stats.total_products == 0 {
            0.0
        } else {
            let priced = self.stats.total_products - self.stats.unknown_price;
            (priced as f64 / self.stats.total_products as f64) * 100.0
        }
    }
}

/// Generates a catalog summary from the store
///
/// # Arguments
///
/// * `store` - The catalog to summarize
/// * `config_hash` - Hash of the configuration file in use
///
/// # Returns
///
/// * `Ok(CatalogSummary)` - Successfully generated summary
/// * `Err(OutputError)` - Failed to query the catalog
pub fn generate_summary(store: &dyn CatalogStore, config_hash: &str) -> OutputResult<CatalogSummary> {
    Ok(CatalogSummary {
        generated_at: Utc::now(),
        config_hash: config_hash.to_string(),
        stats: store.stats()?,
        saved: store.list_saved()?,
    })
}
