//! Full crawl sessions: clear, fan out, normalize and merge into an on-disk catalog

use crate::common::{bms_listing, bms_product, fast_client, product, timeout_client};
use async_trait::async_trait;
use catalog_sweep::config::NormalizeConfig;
use catalog_sweep::crawler::{run_session, AdapterStatus, HttpClient, Orchestrator};
use catalog_sweep::normalize::Normalizer;
use catalog_sweep::sources::{AdapterError, BmsAdapter, PageWalker, RawRecord, SourceAdapter};
use catalog_sweep::storage::{CatalogStore, SqliteCatalog};
use catalog_sweep::{Price, SweepError};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Adapter that answers without touching the network
struct StaticAdapter {
    name: String,
    records: Vec<RawRecord>,
}

#[async_trait]
impl SourceAdapter for StaticAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn crawl(
        &self,
        _query: &str,
        _page_budget: u32,
        _client: &HttpClient,
    ) -> Result<Vec<RawRecord>, AdapterError> {
        Ok(self.records.clone())
    }
}

/// Store with two products on page 1 and nothing on page 2
async fn start_healthy_store() -> MockServer {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(bms_listing(&["/products/oled", "/products/qled"])),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(bms_listing(&[])))
        .mount(&mock_server)
        .await;

    for (product_path, name, price) in [
        ("/products/oled", "LG OLED evo 65 TV", "JD 1,499.00"),
        ("/products/qled", "Samsung QLED 55", "Call for price"),
    ] {
        Mock::given(method("GET"))
            .and(path(product_path))
            .respond_with(ResponseTemplate::new(200).set_body_string(bms_product(name, price)))
            .mount(&mock_server)
            .await;
    }

    mock_server
}

/// Store whose every request fails with a 503
async fn start_broken_store() -> MockServer {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    mock_server
}

fn bms(name: &str, mock_server: &MockServer) -> Arc<dyn SourceAdapter> {
    Arc::new(BmsAdapter::new(
        name,
        Url::parse(&mock_server.uri()).unwrap(),
        PageWalker::new(Duration::ZERO),
    ))
}

fn static_adapter() -> Arc<dyn SourceAdapter> {
    Arc::new(StaticAdapter {
        name: "Leaders".to_string(),
        records: vec![RawRecord::new("Leaders")
            .with("title", "sony bravia 50")
            .with("brand", "Sonny")
            .with("price", "799")
            .with("url", "https://leaders.example/p/bravia")],
    })
}

fn open_catalog(dir: &TempDir) -> Arc<Mutex<SqliteCatalog>> {
    let catalog = SqliteCatalog::new(&dir.path().join("catalog.db")).unwrap();
    Arc::new(Mutex::new(catalog))
}

#[tokio::test]
async fn test_session_merges_successful_sources_and_reports_failures() {
    let healthy = start_healthy_store().await;
    let broken = start_broken_store().await;
    let dir = TempDir::new().unwrap();
    let catalog = open_catalog(&dir);

    {
        let mut store = catalog.lock().unwrap();
        store.upsert(&product("https://keep.example/1", "fridge")).unwrap();
        store.mark_saved("https://keep.example/1").unwrap();
        store.upsert(&product("https://stale.example/1", "fridge")).unwrap();
    }

    let adapters = vec![bms("BMS", &healthy), bms("Broken", &broken), static_adapter()];
    let orchestrator = Orchestrator::new(fast_client());
    let normalizer = Normalizer::new(&NormalizeConfig::default());

    let report = run_session(&catalog, &orchestrator, &normalizer, &adapters, " TV ", 2)
        .await
        .unwrap();

    assert_eq!(report.cleared, 1);
    assert_eq!(report.accepted, 3);
    assert_eq!(report.rejected, 0);
    assert_eq!(report.inserted, 3);
    assert_eq!(report.merge_failed, 0);

    assert_eq!(report.session.status_of("BMS"), Some(&AdapterStatus::Success(2)));
    assert_eq!(report.session.status_of("Leaders"), Some(&AdapterStatus::Success(1)));
    match report.session.status_of("Broken") {
        Some(AdapterStatus::Failed(reason)) => assert!(reason.contains("503")),
        other => panic!("expected Broken to fail, got {:?}", other),
    }

    let store = catalog.lock().unwrap();
    assert_eq!(store.count().unwrap(), 4);
    assert!(store.get("https://stale.example/1").unwrap().is_none());
    assert!(store.get("https://keep.example/1").unwrap().unwrap().saved);

    let crawled = store.list_by_query("tv").unwrap();
    assert_eq!(crawled.len(), 3);
    assert!(crawled.iter().all(|p| !p.saved && p.search_query == "tv"));

    let oled = store
        .get(&format!("{}/products/oled", healthy.uri()))
        .unwrap()
        .unwrap();
    assert_eq!(oled.price, Price::Known(1499.0));
    assert_eq!(oled.brand, "N/A");
    assert_eq!(oled.store, "Bms");
    assert_eq!(oled.category, "Television");

    let qled = store
        .get(&format!("{}/products/qled", healthy.uri()))
        .unwrap()
        .unwrap();
    assert_eq!(qled.price, Price::Unknown);

    let bravia = store.get("https://leaders.example/p/bravia").unwrap().unwrap();
    assert_eq!(bravia.brand, "Sony");
    assert_eq!(bravia.title, "Sony Bravia 50");
}

#[tokio::test]
async fn test_saved_flag_survives_recrawl() {
    let healthy = start_healthy_store().await;
    let dir = TempDir::new().unwrap();
    let catalog = open_catalog(&dir);
    let adapters = vec![bms("BMS", &healthy)];
    let orchestrator = Orchestrator::new(fast_client());
    let normalizer = Normalizer::new(&NormalizeConfig::default());
    let oled_url = format!("{}/products/oled", healthy.uri());

    run_session(&catalog, &orchestrator, &normalizer, &adapters, "tv", 2)
        .await
        .unwrap();
    assert!(catalog.lock().unwrap().mark_saved(&oled_url).unwrap());

    let report = run_session(&catalog, &orchestrator, &normalizer, &adapters, "tv", 2)
        .await
        .unwrap();

    // Only the unsaved product was cleared; the saved one is refreshed in place
    assert_eq!(report.cleared, 1);
    assert_eq!(report.inserted, 1);
    assert_eq!(report.updated, 1);

    let store = catalog.lock().unwrap();
    assert_eq!(store.count().unwrap(), 2);
    let saved = store.list_saved().unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].product_url, oled_url);
}

#[tokio::test]
async fn test_invalid_trigger_leaves_catalog_untouched() {
    let dir = TempDir::new().unwrap();
    let catalog = open_catalog(&dir);
    catalog
        .lock()
        .unwrap()
        .upsert(&product("https://stale.example/1", "fridge"))
        .unwrap();

    let orchestrator = Orchestrator::new(fast_client());
    let normalizer = Normalizer::new(&NormalizeConfig::default());
    let adapters = vec![static_adapter()];

    let err = run_session(&catalog, &orchestrator, &normalizer, &adapters, "   ", 2)
        .await
        .unwrap_err();
    assert!(matches!(err, SweepError::InvalidTrigger(_)));

    let err = run_session(&catalog, &orchestrator, &normalizer, &adapters, "tv", 0)
        .await
        .unwrap_err();
    assert!(matches!(err, SweepError::InvalidTrigger(_)));

    assert_eq!(catalog.lock().unwrap().count().unwrap(), 1);
}

#[tokio::test]
async fn test_session_with_every_source_failing_still_succeeds() {
    let broken = start_broken_store().await;
    let dir = TempDir::new().unwrap();
    let catalog = open_catalog(&dir);
    let adapters = vec![bms("Broken", &broken)];

    let report = run_session(
        &catalog,
        &Orchestrator::new(fast_client()),
        &Normalizer::new(&NormalizeConfig::default()),
        &adapters,
        "tv",
        1,
    )
    .await
    .unwrap();

    assert_eq!(report.session.failed().count(), 1);
    assert_eq!(report.accepted, 0);
    assert_eq!(catalog.lock().unwrap().count().unwrap(), 0);
}

#[tokio::test]
async fn test_timed_out_source_fails_while_sibling_succeeds() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(bms_listing(&[]))
                .set_delay(Duration::from_millis(500)),
        )
        .expect(3)
        .mount(&mock_server)
        .await;

    let adapters = vec![bms("Sluggish", &mock_server), static_adapter()];
    let orchestrator = Orchestrator::new(timeout_client(Duration::from_millis(100)));

    let (session, records) = orchestrator.run("tv", 1, &adapters).await;

    assert_eq!(records.len(), 1);
    assert_eq!(session.status_of("Leaders"), Some(&AdapterStatus::Success(1)));
    match session.status_of("Sluggish") {
        Some(AdapterStatus::Failed(reason)) => assert!(reason.contains("timed out"), "{}", reason),
        other => panic!("expected Sluggish to time out, got {:?}", other),
    }
}

#[tokio::test]
async fn test_session_with_unreachable_source() {
    let healthy = start_healthy_store().await;
    let dir = TempDir::new().unwrap();
    let catalog = open_catalog(&dir);

    // Nothing listens on port 1, so every connection attempt is refused
    let unreachable: Arc<dyn SourceAdapter> = Arc::new(BmsAdapter::new(
        "Unreachable",
        Url::parse("http://127.0.0.1:1/").unwrap(),
        PageWalker::new(Duration::ZERO),
    ));
    let adapters = vec![bms("BMS", &healthy), unreachable, static_adapter()];

    let report = run_session(
        &catalog,
        &Orchestrator::new(fast_client()),
        &Normalizer::new(&NormalizeConfig::default()),
        &adapters,
        "tv",
        2,
    )
    .await
    .unwrap();

    assert!(matches!(
        report.session.status_of("Unreachable"),
        Some(AdapterStatus::Failed(_))
    ));
    assert_eq!(report.session.succeeded().count(), 2);
    assert_eq!(report.inserted, 3);

    let store = catalog.lock().unwrap();
    assert_eq!(store.count().unwrap(), 3);
    assert!(store.list_saved().unwrap().is_empty());
}
