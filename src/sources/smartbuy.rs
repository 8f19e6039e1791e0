//! SmartBuy (smartbuy-me.com) adapter
//!
//! Product pages embed a schema.org `Product` JSON-LD block, which carries
//! every field we need. Pages without one are skipped.

use crate::crawler::HttpClient;
use crate::sources::html::{collect_links, json_ld_blocks, resolve_link};
use crate::sources::{
    fetch_detail, fetch_listing, AdapterError, PageWalker, RawRecord, SourceAdapter,
};
use async_trait::async_trait;
use scraper::Html;
use serde_json::Value;
use url::Url;

pub struct SmartBuyAdapter {
    name: String,
    base_url: Url,
    walker: PageWalker,
}

impl SmartBuyAdapter {
    pub fn new(name: impl Into<String>, base_url: Url, walker: PageWalker) -> Self {
        Self {
            name: name.into(),
            base_url,
            walker,
        }
    }

    fn search_url(&self, query: &str, page: u32) -> Result<Url, AdapterError> {
        let mut url = self.base_url.join("search")?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("type", "product").append_pair("q", query);
            if page > 1 {
                pairs.append_pair("page", &page.to_string());
            }
        }
        Ok(url)
    }

    async fn listing_page(
        &self,
        client: &HttpClient,
        query: &str,
        page: u32,
    ) -> Result<Vec<String>, AdapterError> {
        let url = self.search_url(query, page)?;
        tracing::debug!("[{}] Listing page {}: {}", self.name, page, url);
        let Some(body) = fetch_listing(client, &self.name, url.as_str()).await? else {
            return Ok(Vec::new());
        };
        Ok(parse_listing(&body, &self.base_url))
    }

    async fn product(
        &self,
        client: &HttpClient,
        url: String,
    ) -> Result<Option<RawRecord>, AdapterError> {
        let Some(body) = fetch_detail(client, &self.name, &url).await? else {
            return Ok(None);
        };

        let record = parse_product(&body, &url, &self.base_url, &self.name);
        if record.is_none() {
            tracing::warn!("[{}] No product JSON-LD at {}, skipping", self.name, url);
        }
        Ok(record)
    }
}

#[async_trait]
impl SourceAdapter for SmartBuyAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn crawl(
        &self,
        query: &str,
        page_budget: u32,
        client: &HttpClient,
    ) -> Result<Vec<RawRecord>, AdapterError> {
        let urls = self
            .walker
            .collect_pages(page_budget, move |page| {
                self.listing_page(client, query, page)
            })
            .await?;

        tracing::info!("[{}] Found {} product URLs", self.name, urls.len());

        self.walker
            .visit_each(urls, move |url| self.product(client, url))
            .await
    }
}

fn parse_listing(body: &str, base_url: &Url) -> Vec<String> {
    let document = Html::parse_document(body);
    collect_links(&document, "a.product-item__image-wrapper[href]", base_url)
}

fn parse_product(body: &str, url: &str, base_url: &Url, source: &str) -> Option<RawRecord> {
    let document = Html::parse_document(body);
    let blocks = json_ld_blocks(&document);
    let product = blocks.iter().find_map(find_product)?;

    let offer = first_offer(product);
    let mut record = RawRecord::new(source);

    record.insert_opt("Title", json_text(product.get("name")));
    record.insert_opt("Model", offer.and_then(|o| json_text(o.get("name"))));
    record.insert_opt("Brand", named_text(product.get("brand")));
    record.insert_opt("Category", json_text(product.get("category")));
    record.insert_opt("Price", offer.and_then(|o| json_text(o.get("price"))));
    record.insert_opt(
        "Image URL",
        image_url(product.get("image")).and_then(|src| resolve_link(&src, base_url)),
    );

    let product_url = json_text(product.get("url"))
        .and_then(|u| resolve_link(&u, base_url))
        .unwrap_or_else(|| url.to_string());
    record.insert("Product URL", product_url);

    Some(record)
}

/// Finds a Product node, looking inside `@graph` containers too
fn find_product(value: &Value) -> Option<&Value> {
    match value {
        Value::Array(items) => items.iter().find_map(find_product),
        Value::Object(map) => {
            if map.get("@type").and_then(Value::as_str) == Some("Product") {
                Some(value)
            } else {
                map.get("@graph").and_then(find_product)
            }
        }
        _ => None,
    }
}

fn first_offer(product: &Value) -> Option<&Value> {
    let offers = product.get("offers")?;
    match offers {
        Value::Array(items) => items.first(),
        Value::Object(_) => Some(offers),
        _ => None,
    }
}

/// Strings as-is, numbers rendered; anything else is absent
fn json_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// `"brand": "Sony"` or `"brand": {"name": "Sony"}`
fn named_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Object(map) => json_text(map.get("name")),
        other => json_text(Some(other)),
    }
}

/// `"image": "..."`, `{"url": "..."}` or a list of either
fn image_url(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Array(items) => items.iter().find_map(|item| image_url(Some(item))),
        Value::Object(map) => json_text(map.get("url")),
        other => json_text(Some(other)),
    }
}
