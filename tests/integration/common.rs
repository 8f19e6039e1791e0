//! Helpers shared by the integration tests

use catalog_sweep::crawler::{HttpClient, RetryPolicy};
use catalog_sweep::product::{CanonicalProduct, Price};
use chrono::Utc;
use std::time::Duration;

/// Client with three attempts and a backoff short enough for tests
pub fn fast_client() -> HttpClient {
    HttpClient::with_client(
        reqwest::Client::new(),
        RetryPolicy {
            max_attempts: 3,
            base_backoff: Duration::from_millis(5),
        },
    )
}

/// Same retry policy, but each request gives up after `timeout`
pub fn timeout_client(timeout: Duration) -> HttpClient {
    let client = reqwest::Client::builder().timeout(timeout).build().unwrap();
    HttpClient::with_client(
        client,
        RetryPolicy {
            max_attempts: 3,
            base_backoff: Duration::from_millis(5),
        },
    )
}

/// Search listing markup in the BMS layout
pub fn bms_listing(paths: &[&str]) -> String {
    let items: String = paths
        .iter()
        .map(|p| {
            format!(
                r#"<div class="product-collection__title"><a href="{}">item</a></div>"#,
                p
            )
        })
        .collect();
    format!("<html><body>{}</body></html>", items)
}

/// Product page markup in the BMS layout
pub fn bms_product(name: &str, price: &str) -> String {
    format!(
        r#"<html><body>
            <h4>{}</h4>
            <span id="js-product-price">{}</span>
            <img class="main-image" data-zoom-image="/img/tv.jpg">
        </body></html>"#,
        name, price
    )
}

pub fn product(url: &str, query: &str) -> CanonicalProduct {
    CanonicalProduct {
        title: "Old Listing".to_string(),
        model: "N/A".to_string(),
        brand: "N/A".to_string(),
        category: "Other".to_string(),
        price: Price::Known(10.0),
        product_url: url.to_string(),
        image_url: "N/A".to_string(),
        store: "Bms".to_string(),
        search_query: query.to_string(),
        saved: false,
        timestamp: Utc::now(),
    }
}
