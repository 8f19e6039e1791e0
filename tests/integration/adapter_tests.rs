//! Adapter crawls end-to-end against a mock store

use crate::common::{bms_listing, bms_product, fast_client};
use catalog_sweep::sources::{
    BmsAdapter, DiamondStarAdapter, LeadersAdapter, NewVisionAdapter, PageWalker, SourceAdapter,
};
use std::time::Duration;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn bms_adapter(mock_server: &MockServer) -> BmsAdapter {
    BmsAdapter::new(
        "BMS",
        Url::parse(&mock_server.uri()).unwrap(),
        PageWalker::new(Duration::ZERO),
    )
}

async fn mount_listing(mock_server: &MockServer, page: &str, paths: &[&str], expected: u64) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "tv"))
        .and(query_param("page", page))
        .respond_with(ResponseTemplate::new(200).set_body_string(bms_listing(paths)))
        .expect(expected)
        .mount(mock_server)
        .await;
}

async fn mount_product(mock_server: &MockServer, product_path: &str, name: &str, price: &str) {
    Mock::given(method("GET"))
        .and(path(product_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(bms_product(name, price)))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_crawl_stops_at_first_empty_page() {
    let mock_server = MockServer::start().await;

    mount_listing(&mock_server, "1", &["/products/a", "/products/b"], 1).await;
    mount_listing(&mock_server, "2", &["/products/c"], 1).await;
    mount_listing(&mock_server, "3", &[], 1).await;
    // Page 4 is never requested; an unmatched request would 404 and fail the crawl
    mount_product(&mock_server, "/products/a", "Samsung Tv A", "JD 100.00").await;
    mount_product(&mock_server, "/products/b", "Lg Tv B", "JD 200.00").await;
    mount_product(&mock_server, "/products/c", "Sony Tv C", "JD 300.00").await;

    let records = bms_adapter(&mock_server)
        .crawl("tv", 5, &fast_client())
        .await
        .unwrap();

    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.source() == "BMS"));
    assert_eq!(records[0].get("Product Name"), Some("Samsung Tv A"));
    assert_eq!(records[2].get("Price (JD)"), Some("JD 300.00"));
    assert_eq!(
        records[1].get("Product URL"),
        Some(format!("{}/products/b", mock_server.uri()).as_str())
    );
}

#[tokio::test]
async fn test_crawl_respects_page_budget() {
    let mock_server = MockServer::start().await;

    mount_listing(&mock_server, "1", &["/products/a"], 1).await;
    mount_listing(&mock_server, "2", &["/products/b"], 0).await;
    mount_product(&mock_server, "/products/a", "Samsung Tv A", "JD 100.00").await;

    let records = bms_adapter(&mock_server)
        .crawl("tv", 1, &fast_client())
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn test_missing_product_page_is_skipped() {
    let mock_server = MockServer::start().await;

    mount_listing(&mock_server, "1", &["/products/a", "/products/gone"], 1).await;
    mount_listing(&mock_server, "2", &[], 1).await;
    mount_product(&mock_server, "/products/a", "Samsung Tv A", "JD 100.00").await;

    Mock::given(method("GET"))
        .and(path("/products/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let records = bms_adapter(&mock_server)
        .crawl("tv", 3, &fast_client())
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("Product Name"), Some("Samsung Tv A"));
}

#[tokio::test]
async fn test_listing_failure_fails_the_crawl() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&mock_server)
        .await;

    let err = bms_adapter(&mock_server)
        .crawl("tv", 2, &fast_client())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("HTTP 503"));
}

fn walker() -> PageWalker {
    PageWalker::new(Duration::ZERO)
}

fn base_url(mock_server: &MockServer) -> Url {
    Url::parse(&mock_server.uri()).unwrap()
}

async fn mount_page(mock_server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(mock_server)
        .await;
}

async fn mount_not_found(mock_server: &MockServer, page_path: &str, expected: u64) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(404))
        .expect(expected)
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_bms_not_found_listing_ends_pagination() {
    let mock_server = MockServer::start().await;

    mount_listing(&mock_server, "1", &["/products/a"], 1).await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_product(&mock_server, "/products/a", "Samsung Tv A", "JD 100.00").await;

    let records = bms_adapter(&mock_server)
        .crawl("tv", 3, &fast_client())
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn test_leaders_keeps_records_when_next_page_is_missing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/en/"))
        .and(query_param("s", "tv"))
        .and(query_param("post_type", "product"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<ul>
                <li><a class="woocommerce-LoopProduct-link" href="/en/product/qled/">QLED</a></li>
                <li><a class="woocommerce-LoopProduct-link" href="/en/product/qled/">QLED</a></li>
            </ul>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_not_found(&mock_server, "/en/page/2/", 1).await;
    mount_not_found(&mock_server, "/en/page/3/", 0).await;
    mount_page(
        &mock_server,
        "/en/product/qled/",
        r#"<html><body>
            <h1 class="product_title">Samsung 55 inch QLED TV</h1>
            <p class="price"><ins><span class="woocommerce-Price-amount amount">JD 499</span></ins></p>
            <span>Model Number: <strong>QA55Q60</strong></span>
        </body></html>"#
            .to_string(),
    )
    .await;

    let adapter = LeadersAdapter::new("Leaders", base_url(&mock_server), walker());
    let records = adapter.crawl("tv", 3, &fast_client()).await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("Brand"), Some("Samsung"));
    assert_eq!(records[0].get("Model"), Some("QA55Q60"));
    assert_eq!(records[0].get("Price"), Some("JD 499"));
}

#[tokio::test]
async fn test_diamondstar_keeps_records_when_next_page_is_missing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("s", "fridge"))
        .and(query_param("post_type", "product"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<h3 class="wd-entities-title"><a href="/product/cool-400/">Cool 400</a></h3>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_not_found(&mock_server, "/page/2", 1).await;
    mount_page(
        &mock_server,
        "/product/cool-400/",
        r#"<html><body>
            <h1 class="product_title">Toshiba Cool 400L Fridge</h1>
            <span class="sku">GR-RT400</span>
            <p class="price">
              <del><span class="woocommerce-Price-amount">449 JD</span></del>
              <ins><span class="woocommerce-Price-amount">399 JD</span></ins>
            </p>
            <a rel="tag" href="/tag/fridges/">Refrigerators</a>
        </body></html>"#
            .to_string(),
    )
    .await;

    let adapter = DiamondStarAdapter::new("Diamond Star", base_url(&mock_server), walker());
    let records = adapter.crawl("fridge", 2, &fast_client()).await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("Brand"), Some("Toshiba"));
    assert_eq!(records[0].get("Model"), Some("GR-RT400"));
    assert_eq!(records[0].get("Price"), Some("399 JD"));
    assert_eq!(records[0].get("Category"), Some("Refrigerators"));
}

#[tokio::test]
async fn test_newvision_keeps_records_when_next_page_is_missing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/en/"))
        .and(query_param("s", "washer"))
        .and(query_param("paged", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<h3 class="wd-entities-title"><a href="/en/product/f4r5/">F4R5</a></h3>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/en/"))
        .and(query_param("paged", "2"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(
        &mock_server,
        "/en/product/f4r5/",
        r#"<html><body>
            <h1 class="product_title">LG 9kg Front Load Washer</h1>
            <span class="sku">F4R5</span>
            <p class="price pewc-main-price">Original price was: 399 JOD. Current price is: 349 JOD.</p>
            <span class="posted_in">Categories: <a>Laundry</a>, <a>Washers</a></span>
        </body></html>"#
            .to_string(),
    )
    .await;

    let adapter = NewVisionAdapter::new("New Vision", base_url(&mock_server), walker());
    let records = adapter.crawl("washer", 4, &fast_client()).await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("Brand"), Some("LG"));
    assert_eq!(records[0].get("Price"), Some("349"));
    assert_eq!(records[0].get("Category"), Some("Laundry, Washers"));
}
