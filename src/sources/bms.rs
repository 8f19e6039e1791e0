//! BMS (bmsmena.com) adapter
//!
//! Shopify-style search listing, then one request per product page. BMS does
//! not publish brand, model or category; those fields are left absent.

use crate::crawler::HttpClient;
use crate::sources::html::{collect_links, first_attr, first_text, resolve_link};
use crate::sources::{
    fetch_detail, fetch_listing, AdapterError, PageWalker, RawRecord, SourceAdapter,
};
use async_trait::async_trait;
use scraper::Html;
use url::Url;

pub struct BmsAdapter {
    name: String,
    base_url: Url,
    walker: PageWalker,
}

impl BmsAdapter {
    pub fn new(name: impl Into<String>, base_url: Url, walker: PageWalker) -> Self {
        Self {
            name: name.into(),
            base_url,
            walker,
        }
    }

    fn search_url(&self, query: &str, page: u32) -> Result<Url, AdapterError> {
        let mut url = self.base_url.join("search")?;
        url.query_pairs_mut()
            .append_pair("type", "product")
            .append_pair("options[unavailable_products]", "last")
            .append_pair("options[prefix]", "none")
            .append_pair("q", query)
            .append_pair("page", &page.to_string());
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
        Ok(Some(parse_product(&body, &url, &self.base_url, &self.name)))
    }
}

#[async_trait]
impl SourceAdapter for BmsAdapter {
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
    collect_links(&document, "div.product-collection__title a[href]", base_url)
}

fn parse_product(body: &str, url: &str, base_url: &Url, source: &str) -> RawRecord {
    let document = Html::parse_document(body);
    let mut record = RawRecord::new(source).with("Product URL", url);

    record.insert_opt("Product Name", first_text(&document, "h4"));
    record.insert_opt("Price (JD)", first_text(&document, "span#js-product-price"));
    record.insert_opt(
        "Image URL",
        first_attr(&document, "img.main-image", "data-zoom-image")
            .and_then(|src| resolve_link(&src, base_url)),
    );
    record
}
