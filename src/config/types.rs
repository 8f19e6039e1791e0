use serde::Deserialize;

/// Main configuration structure for Catalog-Sweep
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub normalize: NormalizeConfig,
    #[serde(default, rename = "source")]
    pub sources: Vec<SourceEntry>,
}

/// Crawl session behavior
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Page budget used when the CLI does not pass one
    #[serde(rename = "default-pages")]
    pub default_pages: u32,

    /// Minimum delay between two requests issued by one source (milliseconds)
    #[serde(rename = "page-delay-ms")]
    pub page_delay_ms: u64,
}

/// Shared HTTP client retry and timeout policy
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Total attempts per request, including the first one
    #[serde(rename = "max-attempts", default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Backoff before the second attempt; doubled for each further attempt
    #[serde(rename = "base-backoff-ms", default = "default_base_backoff_ms")]
    pub base_backoff_ms: u64,

    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connect timeout (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_backoff_ms() -> u64 {
    500
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_backoff_ms: default_base_backoff_ms(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite catalog file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Path to the markdown catalog summary
    #[serde(rename = "summary-path")]
    pub summary_path: String,
}

/// Data-cleaning knobs
#[derive(Debug, Clone, Deserialize)]
pub struct NormalizeConfig {
    /// Minimum normalized similarity for a brand correction to be accepted
    #[serde(rename = "brand-threshold", default = "default_brand_threshold")]
    pub brand_threshold: f64,

    /// Brands appended to the built-in reference vocabulary
    #[serde(rename = "extra-brands", default)]
    pub extra_brands: Vec<String>,
}

fn default_brand_threshold() -> f64 {
    0.7
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            brand_threshold: default_brand_threshold(),
            extra_brands: Vec::new(),
        }
    }
}

/// The store implementations this crate knows how to crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Bms,
    SmartBuy,
    Leaders,
    DiamondStar,
    NewVision,
}

/// One store to crawl
#[derive(Debug, Clone, Deserialize)]
pub struct SourceEntry {
    /// Display name, also the source tag on raw records
    pub name: String,

    pub kind: SourceKind,

    /// Site root, e.g. "https://bmsmena.com"
    #[serde(rename = "base-url")]
    pub base_url: String,

    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}
