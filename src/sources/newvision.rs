//! New Vision (newvision.jo) adapter
//!
//! LG-only reseller: every product is branded LG. The price block may read
//! "Original price was: ... Current price is: 349 JOD", in which case only the
//! current price is kept.

use crate::crawler::HttpClient;
use crate::sources::html::{all_texts, collect_links, first_attr, first_text, resolve_link};
use crate::sources::{
    fetch_detail, fetch_listing, AdapterError, PageWalker, RawRecord, SourceAdapter,
};
use async_trait::async_trait;
use scraper::Html;
use url::Url;

const BRAND: &str = "LG";
const CURRENT_PRICE_MARKER: &str = "Current price is:";

pub struct NewVisionAdapter {
    name: String,
    base_url: Url,
    walker: PageWalker,
}

impl NewVisionAdapter {
    pub fn new(name: impl Into<String>, base_url: Url, walker: PageWalker) -> Self {
        Self {
            name: name.into(),
            base_url,
            walker,
        }
    }

    fn search_url(&self, query: &str, page: u32) -> Result<Url, AdapterError> {
        let mut url = self.base_url.join("en/")?;
        url.query_pairs_mut()
            .append_pair("post_type", "product")
            .append_pair("s", query)
            .append_pair("wpml_lang", "en")
            .append_pair("woo_currency", "JOD")
            .append_pair("paged", &page.to_string());
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
impl SourceAdapter for NewVisionAdapter {
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
    collect_links(&document, "h3.wd-entities-title a[href]", base_url)
}

fn parse_product(body: &str, url: &str, base_url: &Url, source: &str) -> RawRecord {
    let document = Html::parse_document(body);

    let mut record = RawRecord::new(source)
        .with("Product URL", url)
        .with("Brand", BRAND);

    record.insert_opt(
        "Title",
        first_text(&document, "h1.product_title")
            .or_else(|| first_text(&document, "h3.wd-entities-title")),
    );
    record.insert_opt("Model", first_text(&document, "span.sku"));
    record.insert_opt(
        "Price",
        first_text(&document, "p.price.pewc-main-price")
            .or_else(|| first_text(&document, "span.woocommerce-Price-amount"))
            .map(|text| current_price(&text)),
    );

    let categories = all_texts(&document, "span.posted_in a");
    if !categories.is_empty() {
        record.insert("Category", categories.join(", "));
    }

    record.insert_opt(
        "Image URL",
        first_attr(
            &document,
            r#"a[data-elementor-open-lightbox="no"]"#,
            "href",
        )
        .and_then(|href| resolve_link(&href, base_url)),
    );
    record
}

/// Keeps only the current price out of a "was/is" price block
fn current_price(text: &str) -> String {
    match text.rsplit_once(CURRENT_PRICE_MARKER) {
        Some((_, current)) => current
            .split("JOD")
            .next()
            .unwrap_or(current)
            .trim()
            .to_string(),
        None => text.to_string(),
    }
}
