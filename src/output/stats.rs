//! Console output for catalog statistics and product listings

use crate::product::CanonicalProduct;
use crate::storage::CatalogStats;
use std::fmt::Write;

/// Formats catalog statistics for the terminal
pub fn format_statistics(stats: &CatalogStats) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== Catalog Statistics ===\n");

    let _ = writeln!(out, "Overview:");
    let _ = writeln!(out, "  Total products: {}", stats.total_products);
    let _ = writeln!(out, "  Saved products: {}", stats.saved_products);
    let _ = writeln!(out, "  Unknown price: {}", stats.unknown_price);
    if let (Some(min), Some(max)) = (stats.min_price, stats.max_price) {
        let _ = writeln!(out, "  Price range: {:.2} - {:.2}", min, max);
    }
    let _ = writeln!(out);

    write_breakdown(&mut out, "Products by Store", &stats.by_store, stats.total_products);
    write_breakdown(
        &mut out,
        "Products by Category",
        &stats.by_category,
        stats.total_products,
    );

    out
}

fn write_breakdown(out: &mut String, heading: &str, rows: &[(String, u64)], total: u64) {
    if rows.is_empty() {
        return;
    }

    let _ = writeln!(out, "{}:", heading);
    for (name, count) in rows {
        let percentage = if total > 0 {
            (*count as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        let _ = writeln!(out, "  {}: {} ({:.1}%)", name, count, percentage);
    }
    let _ = writeln!(out);
}

/// Prints statistics to stdout
pub fn print_statistics(stats: &CatalogStats) {
    print!("{}", format_statistics(stats));
}

/// One line per product: saved marker, price, store, title and URL
pub fn format_products(products: &[CanonicalProduct]) -> String {
    let mut out = String::new();

    for product in products {
        let _ = writeln!(
            out,
            "{} {:>10}  {:<12} {} <{}>",
            if product.saved { "*" } else { " " },
            product.price.to_string(),
            product.store,
            product.title,
            product.product_url
        );
    }
    let _ = writeln!(out, "{} products", products.len());

    out
}

pub fn print_products(products: &[CanonicalProduct]) {
    print!("{}", format_products(products));
}
