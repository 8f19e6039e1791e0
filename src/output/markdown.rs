//! Markdown summary generation
//!
//! This module generates human-readable markdown for the catalog summary
//! export and for crawl session reports.

use crate::crawler::{AdapterStatus, SessionReport};
use crate::output::{CatalogSummary, OutputResult};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes a markdown document to disk
///
/// # Arguments
///
/// * `markdown` - The formatted markdown
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(OutputError)` - Failed to write summary
pub fn write_markdown_summary(markdown: &str, output_path: &Path) -> OutputResult<()> {
    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a catalog summary as markdown
pub fn format_markdown_summary(summary: &CatalogSummary) -> String {
    let stats = &summary.stats;
    let mut md = String::new();

    md.push_str("# Catalog-Sweep Summary\n\n");

    md.push_str("## Export Information\n\n");
    md.push_str(&format!(
        "- **Generated**: {}\n",
        summary.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    md.push_str(&format!("- **Config Hash**: {}\n\n", summary.config_hash));

    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Total Products**: {}\n", stats.total_products));
    md.push_str(&format!("- **Saved Products**: {}\n", stats.saved_products));
    md.push_str(&format!("- **Unknown Price**: {}\n", stats.unknown_price));
    md.push_str(&format!("- **Priced**: {:.2}%\n", summary.priced_rate()));
    if let (Some(min), Some(max)) = (stats.min_price, stats.max_price) {
        md.push_str(&format!("- **Price Range**: {:.2} - {:.2}\n", min, max));
    }
    md.push('\n');

    if !stats.by_store.is_empty() {
        md.push_str("## Products by Store\n\n");
        md.push_str("| Store | Products |\n");
        md.push_str("|-------|----------|\n");
        for (store, count) in &stats.by_store {
            md.push_str(&format!("| {} | {} |\n", store, count));
        }
        md.push('\n');
    }

    if !stats.by_category.is_empty() {
        md.push_str("## Products by Category\n\n");
        md.push_str("| Category | Products |\n");
        md.push_str("|----------|----------|\n");
        for (category, count) in &stats.by_category {
            md.push_str(&format!("| {} | {} |\n", category, count));
        }
        md.push('\n');
    }

    if !summary.saved.is_empty() {
        md.push_str("## Saved Products\n\n");
        md.push_str("| Title | Brand | Price | Store | Saved At |\n");
        md.push_str("|-------|-------|-------|-------|----------|\n");
        for product in &summary.saved {
            md.push_str(&format!(
                "| [{}]({}) | {} | {} | {} | {} |\n",
                escape_cell(&product.title),
                product.product_url,
                escape_cell(&product.brand),
                product.price,
                escape_cell(&product.store),
                product.timestamp.format("%Y-%m-%d %H:%M:%S")
            ));
        }
        md.push('\n');
    }

    md
}

/// Formats a crawl session report as markdown
pub fn format_session_report(report: &SessionReport) -> String {
    let session = &report.session;
    let mut md = String::new();

    md.push_str(&format!("## Crawl: \"{}\"\n\n", session.query));
    md.push_str(&format!("- **Started**: {}\n", session.started_at.to_rfc3339()));
    md.push_str(&format!(
        "- **Duration**: {:.1} seconds\n",
        session.duration().num_milliseconds() as f64 / 1000.0
    ));
    md.push_str(&format!("- **Page Budget**: {}\n", session.page_budget));
    md.push_str(&format!("- **Cleared Beforehand**: {}\n", report.cleared));
    md.push_str(&format!(
        "- **Records**: {} accepted, {} rejected\n",
        report.accepted, report.rejected
    ));
    md.push_str(&format!(
        "- **Merge**: {} inserted, {} updated, {} failed\n\n",
        report.inserted, report.updated, report.merge_failed
    ));

    md.push_str("| Source | Status | Records | Time |\n");
    md.push_str("|--------|--------|---------|------|\n");
    for result in &session.results {
        let (status, records) = match &result.status {
            AdapterStatus::Success(count) => ("ok".to_string(), count.to_string()),
            AdapterStatus::Failed(reason) => (format!("failed: {}", escape_cell(reason)), "-".to_string()),
        };
        md.push_str(&format!(
            "| {} | {} | {} | {:.1}s |\n",
            result.adapter,
            status,
            records,
            result.elapsed.as_secs_f64()
        ));
    }
    md.push('\n');

    md
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
