//! Catalog store trait and error types
//!
//! This module defines the trait interface for catalog backends and the
//! associated error types.

use crate::product::CanonicalProduct;
use crate::storage::{CatalogStats, ClearScope, UpsertOutcome};
use thiserror::Error;

/// Errors that can occur during catalog operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

/// Result type for catalog operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Durable collection of canonical products keyed by product URL
///
/// The crawl pipeline only ever calls [`upsert`](Self::upsert) and
/// [`clear_unsaved`](Self::clear_unsaved). The `saved` flag is written by
/// [`mark_saved`](Self::mark_saved) and [`unmark_saved`](Self::unmark_saved)
/// alone.
pub trait CatalogStore {
    // ===== Merge =====

    /// Inserts a product or overwrites the row with the same product URL
    ///
    /// Every column except the identity and `saved` is replaced. New rows
    /// start unsaved.
    fn upsert(&mut self, product: &CanonicalProduct) -> StorageResult<UpsertOutcome>;

    /// Deletes unsaved rows, returning how many were removed
    fn clear_unsaved(&mut self, scope: &ClearScope) -> StorageResult<usize>;

    // ===== Curation =====

    /// Marks a product as saved. Returns false if no such product exists.
    fn mark_saved(&mut self, product_url: &str) -> StorageResult<bool>;

    /// Clears the saved flag. Returns false if no such product exists.
    fn unmark_saved(&mut self, product_url: &str) -> StorageResult<bool>;

    /// Deletes a product regardless of its saved flag
    fn delete(&mut self, product_url: &str) -> StorageResult<bool>;

    // ===== Reads =====

    fn get(&self, product_url: &str) -> StorageResult<Option<CanonicalProduct>>;

    /// All products, oldest row first
    fn list_all(&self) -> StorageResult<Vec<CanonicalProduct>>;

    /// Products whose search query contains `filter`, case-insensitively
    fn list_by_query(&self, filter: &str) -> StorageResult<Vec<CanonicalProduct>>;

    /// Saved products, most recently updated first
    fn list_saved(&self) -> StorageResult<Vec<CanonicalProduct>>;

    // ===== Statistics =====

    fn count(&self) -> StorageResult<u64>;

    fn stats(&self) -> StorageResult<CatalogStats>;
}
