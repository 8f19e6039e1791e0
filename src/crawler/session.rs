//! Crawl session driver: clear, orchestrate, normalize, merge, report

use crate::crawler::{CrawlSession, Orchestrator};
use crate::normalize::Normalizer;
use crate::product::CanonicalProduct;
use crate::sources::SourceAdapter;
use crate::storage::{CatalogStore, ClearScope, UpsertOutcome};
use crate::{Result, SweepError};
use std::sync::{Arc, Mutex};

/// Everything a caller learns about one crawl session
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub session: CrawlSession,
    /// Stale unsaved rows removed before crawling
    pub cleared: usize,
    /// Raw records that became canonical products
    pub accepted: usize,
    /// Raw records dropped for lacking a product URL
    pub rejected: usize,
    pub inserted: usize,
    pub updated: usize,
    /// Products whose upsert failed twice
    pub merge_failed: usize,
}

/// Merge counters for one batch of products
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MergeCounts {
    pub inserted: usize,
    pub updated: usize,
    pub failed: usize,
}

/// Runs one complete crawl session
///
/// 1. Validate the trigger (non-empty query, page budget of at least 1)
/// 2. Delete every unsaved row in the catalog
/// 3. Crawl all adapters concurrently
/// 4. Normalize the raw records
/// 5. Upsert the products, retrying each failed write once
///
/// Adapter failures only show up in the report. The session itself fails
/// only on an invalid trigger or when the stale rows cannot be cleared.
///
/// # Example
///
/// ```no_run
/// use catalog_sweep::config::load_config;
/// use catalog_sweep::crawler::{run_session, HttpClient, Orchestrator};
/// use catalog_sweep::normalize::Normalizer;
/// use catalog_sweep::sources::build_adapters;
/// use catalog_sweep::storage::SqliteCatalog;
/// use std::path::Path;
/// use std::sync::{Arc, Mutex};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// let orchestrator = Orchestrator::new(HttpClient::new(&config.http, &config.user_agent)?);
/// let normalizer = Normalizer::new(&config.normalize);
/// let adapters = build_adapters(&config)?;
/// let catalog = Arc::new(Mutex::new(SqliteCatalog::new(Path::new("catalog.db"))?));
///
/// let report = run_session(&catalog, &orchestrator, &normalizer, &adapters, "tv", 2).await?;
/// println!("{} products merged", report.inserted + report.updated);
/// # Ok(())
/// # }
/// ```
pub async fn run_session<C>(
    catalog: &Arc<Mutex<C>>,
    orchestrator: &Orchestrator,
    normalizer: &Normalizer,
    adapters: &[Arc<dyn SourceAdapter>],
    query: &str,
    page_budget: u32,
) -> Result<SessionReport>
where
    C: CatalogStore + Send,
{
    let query = query.trim();
    if query.is_empty() {
        return Err(SweepError::InvalidTrigger("query must not be empty".to_string()));
    }
    if page_budget == 0 {
        return Err(SweepError::InvalidTrigger(
            "page budget must be at least 1".to_string(),
        ));
    }

    let cleared = {
        let mut store = catalog.lock().map_err(|_| SweepError::LockPoisoned)?;
        store.clear_unsaved(&ClearScope::All)?
    };
    tracing::info!("Cleared {} unsaved products before crawling", cleared);

    let (session, records) = orchestrator.run(query, page_budget, adapters).await;

    let batch = normalizer.normalize_batch(&records, query);
    let accepted = batch.products.len();

    let counts = {
        let mut store = catalog.lock().map_err(|_| SweepError::LockPoisoned)?;
        merge_products(&mut *store, &batch.products)
    };

    tracing::info!(
        "Merged {} products ({} new, {} updated, {} failed)",
        accepted,
        counts.inserted,
        counts.updated,
        counts.failed
    );

    Ok(SessionReport {
        session,
        cleared,
        accepted,
        rejected: batch.rejected,
        inserted: counts.inserted,
        updated: counts.updated,
        merge_failed: counts.failed,
    })
}

/// Upserts every product, retrying a failed write once before counting it
pub fn merge_products<C: CatalogStore + ?Sized>(
    catalog: &mut C,
    products: &[CanonicalProduct],
) -> MergeCounts {
    let mut counts = MergeCounts::default();

    for product in products {
        let outcome = catalog.upsert(product).or_else(|err| {
            tracing::warn!(
                "Upsert of {} failed ({}), retrying once",
                product.product_url,
                err
            );
            catalog.upsert(product)
        });

        match outcome {
            Ok(UpsertOutcome::Inserted) => counts.inserted += 1,
            Ok(UpsertOutcome::Updated) => counts.updated += 1,
            Err(err) => {
                tracing::warn!("Giving up on {}: {}", product.product_url, err);
                counts.failed += 1;
            }
        }
    }

    counts
}
