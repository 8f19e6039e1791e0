//! Catalog-Sweep main entry point
//!
//! This is the command-line interface for the Catalog-Sweep product aggregator.

use anyhow::{bail, Context};
use catalog_sweep::config::{load_config_with_hash, Config};
use catalog_sweep::crawler::{run_session, HttpClient, Orchestrator, SessionReport};
use catalog_sweep::normalize::Normalizer;
use catalog_sweep::output::{
    format_markdown_summary, format_session_report, generate_summary, print_products,
    print_statistics, write_markdown_summary,
};
use catalog_sweep::sources::build_adapters;
use catalog_sweep::storage::{open_catalog, CatalogStore, SqliteCatalog};
use catalog_sweep::SweepError;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

/// Catalog-Sweep: a product catalog aggregator
///
/// Catalog-Sweep crawls several store websites concurrently for a search
/// query, normalizes what it finds into one schema and merges it into a local
/// catalog. Saved products survive later crawls.
#[derive(Parser, Debug)]
#[command(name = "catalog-sweep")]
#[command(version = "1.0.0")]
#[command(about = "A concurrent product catalog aggregator", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Search query to crawl every enabled source for
    #[arg(long, value_name = "Q")]
    query: Option<String>,

    /// Listing pages per source (defaults to crawler.default-pages)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pages: Option<u32>,

    /// List catalog products, optionally only those whose query contains FILTER
    #[arg(long, value_name = "FILTER", num_args = 0..=1, default_missing_value = "")]
    list: Option<String>,

    /// List saved products, most recently updated first
    #[arg(long)]
    saved: bool,

    /// Mark the product with this URL as saved
    #[arg(long, value_name = "URL")]
    save: Option<String>,

    /// Clear the saved flag of the product with this URL
    #[arg(long, value_name = "URL")]
    unsave: Option<String>,

    /// Delete the product with this URL, saved or not
    #[arg(long, value_name = "URL")]
    delete: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with_all = ["stats", "export_summary"])]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with_all = ["dry_run", "query"])]
    stats: bool,

    /// Write a markdown summary of the catalog (after the crawl, if any)
    #[arg(long, conflicts_with_all = ["dry_run", "stats"])]
    export_summary: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        return handle_dry_run(&config, &config_hash, cli.query.as_deref(), cli.pages);
    }

    // Curation and read modes operate on the existing catalog only
    if cli.save.is_some() || cli.unsave.is_some() || cli.delete.is_some() {
        return handle_curation(&config, &cli);
    }
    if let Some(filter) = &cli.list {
        return handle_list(&config, filter);
    }
    if cli.saved {
        return handle_saved(&config);
    }
    if cli.stats {
        return handle_stats(&config);
    }

    match cli.query.as_deref() {
        Some(query) => {
            let report = handle_crawl(&config, query, cli.pages).await?;
            if cli.export_summary {
                handle_export_summary(&config, &config_hash, Some(&report))?;
            }
            Ok(())
        }
        None if cli.export_summary => handle_export_summary(&config, &config_hash, None),
        None => bail!("Nothing to do: pass --query to crawl, or --list/--saved/--stats to read"),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("catalog_sweep=info,warn"),
            1 => EnvFilter::new("catalog_sweep=debug,info"),
            2 => EnvFilter::new("catalog_sweep=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn open_store(config: &Config) -> anyhow::Result<SqliteCatalog> {
    open_catalog(Path::new(&config.output.database_path)).with_context(|| {
        format!(
            "Failed to open catalog at {}",
            config.output.database_path
        )
    })
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(
    config: &Config,
    config_hash: &str,
    query: Option<&str>,
    pages: Option<u32>,
) -> anyhow::Result<()> {
    println!("=== Catalog-Sweep Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Default pages per source: {}", config.crawler.default_pages);
    println!("  Delay between requests: {}ms", config.crawler.page_delay_ms);

    println!("\nHTTP:");
    println!("  Max attempts: {}", config.http.max_attempts);
    println!("  Base backoff: {}ms", config.http.base_backoff_ms);
    println!("  Timeout: {}s (connect {}s)", config.http.timeout_secs, config.http.connect_timeout_secs);

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);
    println!("  Summary: {}", config.output.summary_path);

    println!("\nNormalization:");
    println!("  Brand threshold: {}", config.normalize.brand_threshold);
    println!("  Extra brands: {}", config.normalize.extra_brands.join(", "));

    println!("\nSources ({}):", config.sources.len());
    for source in &config.sources {
        println!(
            "  - {} [{:?}] {}{}",
            source.name,
            source.kind,
            source.base_url,
            if source.enabled { "" } else { " (disabled)" }
        );
    }

    // Building the adapters checks every base URL
    let adapters = build_adapters(config)?;

    println!("\nConfig hash: {}", config_hash);
    println!("\n✓ Configuration is valid");
    match query {
        Some(query) => println!(
            "✓ Would crawl '{}' on {} sources, {} pages each",
            query,
            adapters.len(),
            pages.unwrap_or(config.crawler.default_pages)
        ),
        None => println!("✓ {} sources ready to crawl", adapters.len()),
    }

    Ok(())
}

/// Handles --save, --unsave and --delete
fn handle_curation(config: &Config, cli: &Cli) -> anyhow::Result<()> {
    let mut store = open_store(config)?;

    if let Some(url) = &cli.save {
        report_curation("Saved", url, store.mark_saved(url)?);
    }
    if let Some(url) = &cli.unsave {
        report_curation("Unsaved", url, store.unmark_saved(url)?);
    }
    if let Some(url) = &cli.delete {
        report_curation("Deleted", url, store.delete(url)?);
    }

    Ok(())
}

fn report_curation(action: &str, url: &str, found: bool) {
    if found {
        println!("✓ {}: {}", action, url);
    } else {
        println!("✗ No product with URL {}", url);
    }
}

/// Handles --list [FILTER]
fn handle_list(config: &Config, filter: &str) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let products = if filter.trim().is_empty() {
        store.list_all()?
    } else {
        store.list_by_query(filter)?
    };
    print_products(&products);
    Ok(())
}

/// Handles --saved
fn handle_saved(config: &Config) -> anyhow::Result<()> {
    let store = open_store(config)?;
    print_products(&store.list_saved()?);
    Ok(())
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.output.database_path);

    let store = open_store(config)?;
    print_statistics(&store.stats()?);

    Ok(())
}

/// Handles the --export-summary mode: generates markdown summary
fn handle_export_summary(
    config: &Config,
    config_hash: &str,
    report: Option<&SessionReport>,
) -> anyhow::Result<()> {
    let output_path = Path::new(&config.output.summary_path);
    let store = open_store(config)?;

    tracing::info!("Generating markdown summary...");
    let summary = generate_summary(&store, config_hash)?;
    let mut markdown = format_markdown_summary(&summary);
    if let Some(report) = report {
        markdown.push_str(&format_session_report(report));
    }
    write_markdown_summary(&markdown, output_path)?;

    println!("✓ Summary exported to: {}", config.output.summary_path);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: &Config,
    query: &str,
    pages: Option<u32>,
) -> anyhow::Result<SessionReport> {
    let page_budget = pages.unwrap_or(config.crawler.default_pages);
    let adapters = build_adapters(config)?;
    if adapters.is_empty() {
        tracing::warn!("No enabled sources in configuration");
    }

    let client = HttpClient::new(&config.http, &config.user_agent)
        .context("Failed to build HTTP client")?;
    let orchestrator = Orchestrator::new(client);
    let normalizer = Normalizer::new(&config.normalize);
    let catalog = Arc::new(Mutex::new(open_store(config)?));

    tracing::info!(
        "Crawling '{}' on {} sources ({} pages each)",
        query,
        adapters.len(),
        page_budget
    );

    let report = run_session(
        &catalog,
        &orchestrator,
        &normalizer,
        &adapters,
        query,
        page_budget,
    )
    .await?;

    print!("{}", format_session_report(&report));

    let total = catalog
        .lock()
        .map_err(|_| SweepError::LockPoisoned)?
        .count()?;
    tracing::info!("Catalog now holds {} products", total);

    Ok(report)
}
