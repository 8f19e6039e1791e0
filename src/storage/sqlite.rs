//! SQLite catalog implementation
//!
//! This module provides a SQLite-based implementation of the CatalogStore trait.

use crate::product::{CanonicalProduct, Price};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{CatalogStore, StorageError, StorageResult};
use crate::storage::{CatalogStats, ClearScope, UpsertOutcome};
use crate::SweepError;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const PRODUCT_COLUMNS: &str = "title, model, brand, category, price, product_url, image_url,
     store, search_query, saved, timestamp";

/// SQLite catalog backend
pub struct SqliteCatalog {
    conn: Connection,
}

impl SqliteCatalog {
    /// Creates a new SqliteCatalog instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteCatalog)` - Successfully opened/created database
    /// * `Err(SweepError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, SweepError> {
        let conn = Connection::open(path)?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
            PRAGMA mmap_size = 268435456;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory catalog, used by tests and dry runs
    pub fn new_in_memory() -> Result<Self, SweepError> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn query_products<P: rusqlite::Params>(
        &self,
        sql: &str,
        params: P,
    ) -> StorageResult<Vec<CanonicalProduct>> {
        let mut stmt = self.conn.prepare(sql)?;
        let products = stmt
            .query_map(params, product_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(products)
    }

    fn count_where(&self, condition: &str) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM products WHERE {}", condition),
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn grouped_counts(&self, column: &str) -> StorageResult<Vec<(String, u64)>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {col}, COUNT(*) AS n FROM products GROUP BY {col} ORDER BY n DESC, {col}",
            col = column
        ))?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn set_saved(&mut self, product_url: &str, saved: bool) -> StorageResult<bool> {
        let changed = self.conn.execute(
            "UPDATE products SET saved = ?1, timestamp = ?2 WHERE product_url = ?3",
            params![saved, now_string(), product_url],
        )?;
        Ok(changed > 0)
    }
}

impl CatalogStore for SqliteCatalog {
    // ===== Merge =====

    fn upsert(&mut self, product: &CanonicalProduct) -> StorageResult<UpsertOutcome> {
        if product.product_url.trim().is_empty() {
            return Err(StorageError::ConstraintViolation(
                "product_url must not be empty".to_string(),
            ));
        }

        let now = now_string();
        let tx = self.conn.transaction()?;

        let existing: Option<i64> = tx
            .query_row(
                "SELECT id FROM products WHERE product_url = ?1",
                params![product.product_url],
                |row| row.get(0),
            )
            .optional()?;

        let outcome = if let Some(id) = existing {
            tx.execute(
                "UPDATE products SET title = ?1, model = ?2, brand = ?3, category = ?4,
                 price = ?5, image_url = ?6, store = ?7, search_query = ?8, timestamp = ?9
                 WHERE id = ?10",
                params![
                    product.title,
                    product.model,
                    product.brand,
                    product.category,
                    product.price.amount(),
                    product.image_url,
                    product.store,
                    product.search_query,
                    now,
                    id
                ],
            )?;
            UpsertOutcome::Updated
        } else {
            tx.execute(
                "INSERT INTO products (title, model, brand, category, price, product_url,
                 image_url, store, search_query, saved, timestamp)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 0, ?10)",
                params![
                    product.title,
                    product.model,
                    product.brand,
                    product.category,
                    product.price.amount(),
                    product.product_url,
                    product.image_url,
                    product.store,
                    product.search_query,
                    now
                ],
            )?;
            UpsertOutcome::Inserted
        };

        tx.commit()?;
        Ok(outcome)
    }

    fn clear_unsaved(&mut self, scope: &ClearScope) -> StorageResult<usize> {
        let deleted = match scope {
            ClearScope::All => self
                .conn
                .execute("DELETE FROM products WHERE saved = 0 OR saved IS NULL", [])?,
            ClearScope::Query(query) => self.conn.execute(
                "DELETE FROM products WHERE (saved = 0 OR saved IS NULL) AND search_query = ?1",
                params![query.trim().to_lowercase()],
            )?,
        };
        Ok(deleted)
    }

    // ===== Curation =====

    fn mark_saved(&mut self, product_url: &str) -> StorageResult<bool> {
        self.set_saved(product_url, true)
    }

    fn unmark_saved(&mut self, product_url: &str) -> StorageResult<bool> {
        self.set_saved(product_url, false)
    }

    fn delete(&mut self, product_url: &str) -> StorageResult<bool> {
        let deleted = self.conn.execute(
            "DELETE FROM products WHERE product_url = ?1",
            params![product_url],
        )?;
        Ok(deleted > 0)
    }

    // ===== Reads =====

    fn get(&self, product_url: &str) -> StorageResult<Option<CanonicalProduct>> {
        let product = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM products WHERE product_url = ?1",
                    PRODUCT_COLUMNS
                ),
                params![product_url],
                product_from_row,
            )
            .optional()?;
        Ok(product)
    }

    fn list_all(&self) -> StorageResult<Vec<CanonicalProduct>> {
        self.query_products(
            &format!("SELECT {} FROM products ORDER BY id", PRODUCT_COLUMNS),
            params![],
        )
    }

    fn list_by_query(&self, filter: &str) -> StorageResult<Vec<CanonicalProduct>> {
        self.query_products(
            &format!(
                "SELECT {} FROM products
                 WHERE instr(lower(search_query), ?1) > 0
                 ORDER BY id",
                PRODUCT_COLUMNS
            ),
            params![filter.trim().to_lowercase()],
        )
    }

    fn list_saved(&self) -> StorageResult<Vec<CanonicalProduct>> {
        self.query_products(
            &format!(
                "SELECT {} FROM products WHERE saved = 1 ORDER BY timestamp DESC, id DESC",
                PRODUCT_COLUMNS
            ),
            params![],
        )
    }

    // ===== Statistics =====

    fn count(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn stats(&self) -> StorageResult<CatalogStats> {
        let (min_price, max_price): (Option<f64>, Option<f64>) = self.conn.query_row(
            "SELECT MIN(price), MAX(price) FROM products",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        Ok(CatalogStats {
            total_products: self.count()?,
            saved_products: self.count_where("saved = 1")?,
            unknown_price: self.count_where("price IS NULL")?,
            by_store: self.grouped_counts("store")?,
            by_category: self.grouped_counts("category")?,
            min_price,
            max_price,
        })
    }
}

/// Microsecond RFC 3339 in UTC, so timestamps sort as text
fn now_string() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn product_from_row(row: &Row<'_>) -> rusqlite::Result<CanonicalProduct> {
    let raw_timestamp: String = row.get(10)?;
    let timestamp = DateTime::parse_from_rfc3339(&raw_timestamp)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(10, Type::Text, Box::new(e)))?;

    Ok(CanonicalProduct {
        title: row.get(0)?,
        model: row.get(1)?,
        brand: row.get(2)?,
        category: row.get(3)?,
        price: Price::from_column(row.get(4)?),
        product_url: row.get(5)?,
        image_url: row.get(6)?,
        store: row.get(7)?,
        search_query: row.get(8)?,
        saved: row.get(9)?,
        timestamp,
    })
}
