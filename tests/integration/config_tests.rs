//! Loading configuration files from disk and turning them into adapters

use catalog_sweep::config::{load_config, load_config_with_hash, SourceKind};
use catalog_sweep::sources::build_adapters;
use catalog_sweep::ConfigError;
use std::io::Write;
use tempfile::NamedTempFile;

const VALID_CONFIG: &str = r#"
[crawler]
default-pages = 2
page-delay-ms = 500

[http]
max-attempts = 4
base-backoff-ms = 250

[user-agent]
crawler-name = "CatalogSweep"
crawler-version = "1.0"
contact-url = "https://example.com/about"
contact-email = "admin@example.com"

[output]
database-path = "./catalog.db"
summary-path = "./summary.md"

[normalize]
brand-threshold = 0.75
extra-brands = ["Hisense"]

[[source]]
name = "BMS"
kind = "bms"
base-url = "https://bmsmena.com"

[[source]]
name = "Smartbuy"
kind = "smartbuy"
base-url = "https://smartbuy-me.com"

[[source]]
name = "New Vision"
kind = "newvision"
base-url = "https://newvision.jo"
enabled = false
"#;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_config_from_disk() {
    let file = write_config(VALID_CONFIG);
    let (config, hash) = load_config_with_hash(file.path()).unwrap();

    assert_eq!(config.crawler.default_pages, 2);
    assert_eq!(config.http.max_attempts, 4);
    // Unset keys keep their defaults
    assert_eq!(config.http.timeout_secs, 30);
    assert_eq!(config.normalize.extra_brands, vec!["Hisense".to_string()]);
    assert_eq!(config.sources.len(), 3);
    assert_eq!(config.sources[1].kind, SourceKind::SmartBuy);
    assert!(!config.sources[2].enabled);
    assert_eq!(hash.len(), 64);
}

#[test]
fn test_disabled_sources_get_no_adapter() {
    let file = write_config(VALID_CONFIG);
    let config = load_config(file.path()).unwrap();

    let adapters = build_adapters(&config).unwrap();
    let names: Vec<&str> = adapters.iter().map(|a| a.name()).collect();
    assert_eq!(names, vec!["BMS", "Smartbuy"]);
}

#[test]
fn test_hash_changes_with_content() {
    let first = write_config(VALID_CONFIG);
    let second = write_config(&VALID_CONFIG.replace("default-pages = 2", "default-pages = 3"));

    let (_, hash_a) = load_config_with_hash(first.path()).unwrap();
    let (_, hash_b) = load_config_with_hash(second.path()).unwrap();
    assert_ne!(hash_a, hash_b);
}

#[test]
fn test_unknown_source_kind_is_a_parse_error() {
    let file = write_config(&VALID_CONFIG.replace("kind = \"bms\"", "kind = \"amazon\""));
    assert!(matches!(load_config(file.path()), Err(ConfigError::Parse(_))));
}

#[test]
fn test_duplicate_source_names_rejected() {
    let file = write_config(&VALID_CONFIG.replace("name = \"Smartbuy\"", "name = \"BMS\""));
    assert!(matches!(
        load_config(file.path()),
        Err(ConfigError::Validation(_))
    ));
}

#[test]
fn test_missing_file() {
    let result = load_config(std::path::Path::new("/nonexistent/catalog-sweep.toml"));
    assert!(matches!(result, Err(ConfigError::Io(_))));
}
