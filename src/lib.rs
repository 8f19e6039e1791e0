//! Catalog-Sweep: a product catalog aggregator
//!
//! This crate crawls several independent store websites concurrently, normalizes
//! the heterogeneous listings they produce into one canonical schema, and merges
//! them into a persistent catalog keyed by product URL. User curation (the
//! "saved" flag) survives repeated crawls.

pub mod config;
pub mod crawler;
pub mod normalize;
pub mod output;
pub mod product;
pub mod sources;
pub mod storage;

use thiserror::Error;

/// Main error type for Catalog-Sweep operations
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Invalid crawl trigger: {0}")]
    InvalidTrigger(String),

    #[error("Catalog lock poisoned")]
    LockPoisoned,
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Catalog-Sweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_session, Orchestrator, SessionReport};
pub use product::{CanonicalProduct, Price, UNKNOWN};
pub use sources::{RawRecord, SourceAdapter};
pub use storage::{CatalogStore, SqliteCatalog};
