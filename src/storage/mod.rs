//! Storage module for the product catalog
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Upserting canonical products keyed by product URL
//! - Clearing stale unsaved rows before a crawl
//! - Saved-flag curation and catalog reads

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteCatalog;
pub use traits::{CatalogStore, StorageError, StorageResult};

use crate::SweepError;

use std::path::Path;

/// Initializes or opens a catalog database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteCatalog)` - Successfully initialized catalog
/// * `Err(SweepError)` - Failed to initialize catalog
pub fn open_catalog(path: &Path) -> Result<SqliteCatalog, SweepError> {
    SqliteCatalog::new(path)
}

/// What an upsert did to the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Which unsaved rows `clear_unsaved` removes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClearScope {
    /// Every unsaved row in the catalog
    All,
    /// Unsaved rows written by this search query (compared lower-cased)
    Query(String),
}

/// Aggregate counts over the catalog
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogStats {
    pub total_products: u64,
    pub saved_products: u64,
    pub unknown_price: u64,
    /// (store, count), largest first
    pub by_store: Vec<(String, u64)>,
    /// (category, count), largest first
    pub by_category: Vec<(String, u64)>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}
