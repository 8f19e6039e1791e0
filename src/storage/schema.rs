//! Database schema definitions
//!
//! This module contains the SQL schema for the catalog database.

/// SQL schema for the database
///
/// A NULL `price` means the price is unknown.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    model TEXT NOT NULL,
    brand TEXT NOT NULL,
    category TEXT NOT NULL,
    price REAL,
    product_url TEXT NOT NULL UNIQUE,
    image_url TEXT NOT NULL,
    store TEXT NOT NULL,
    search_query TEXT NOT NULL,
    saved INTEGER NOT NULL DEFAULT 0,
    timestamp TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_products_search_query ON products(search_query);
CREATE INDEX IF NOT EXISTS idx_products_saved ON products(saved);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
