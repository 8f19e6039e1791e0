//! Leaders (leaders.jo) adapter
//!
//! WooCommerce storefront. The first listing page lives at `/en/`, later ones
//! at `/en/page/{n}/`. Brand is the first word of the product title.

use crate::crawler::HttpClient;
use crate::sources::html::{
    collect_links, element_text, first_attr, first_text, leading_word, resolve_link,
};
use crate::sources::{
    fetch_detail, fetch_listing, AdapterError, PageWalker, RawRecord, SourceAdapter,
};
use async_trait::async_trait;
use scraper::{Html, Selector};
use url::Url;

const STORE_NAME: &str = "Leaders";

pub struct LeadersAdapter {
    name: String,
    base_url: Url,
    walker: PageWalker,
}

impl LeadersAdapter {
    pub fn new(name: impl Into<String>, base_url: Url, walker: PageWalker) -> Self {
        Self {
            name: name.into(),
            base_url,
            walker,
        }
    }

    fn search_url(&self, query: &str, page: u32) -> Result<Url, AdapterError> {
        let path = if page == 1 {
            "en/".to_string()
        } else {
            format!("en/page/{}/", page)
        };
        let mut url = self.base_url.join(&path)?;
        url.query_pairs_mut()
            .append_pair("s", query)
            .append_pair("post_type", "product")
            .append_pair("dgwt_wcas", "1")
            .append_pair("lang", "en");
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
impl SourceAdapter for LeadersAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn crawl(
        &self,
        query: &str,
        page_budget: u32,
        client: &HttpClient,
    ) -> Result<Vec<RawRecord>, AdapterError> {
        let mut urls = self
            .walker
            .collect_pages(page_budget, move |page| {
                self.listing_page(client, query, page)
            })
            .await?;

        // The same product can show up on consecutive pages
        let mut seen = std::collections::HashSet::new();
        urls.retain(|url| seen.insert(url.clone()));

        tracing::info!("[{}] Found {} product URLs", self.name, urls.len());

        self.walker
            .visit_each(urls, move |url| self.product(client, url))
            .await
    }
}

fn parse_listing(body: &str, base_url: &Url) -> Vec<String> {
    let document = Html::parse_document(body);
    collect_links(&document, "a.woocommerce-LoopProduct-link[href]", base_url)
}

fn parse_product(body: &str, url: &str, base_url: &Url, source: &str) -> RawRecord {
    let document = Html::parse_document(body);
    let title = first_text(&document, "h1.product_title");

    let mut record = RawRecord::new(source)
        .with("Product URL", url)
        .with("Store", STORE_NAME);

    record.insert_opt("Brand", title.as_deref().and_then(leading_word));
    record.insert_opt("Title", title);
    record.insert_opt(
        "Price",
        first_text(&document, "ins .woocommerce-Price-amount")
            .or_else(|| first_text(&document, "span.woocommerce-Price-amount.amount")),
    );
    record.insert_opt("Model", model_number(&document));
    record.insert_opt(
        "Image URL",
        first_attr(&document, ".woocommerce-product-gallery__image a", "href")
            .and_then(|href| resolve_link(&href, base_url)),
    );
    record
}

/// `<span>Model Number: <strong>QA55Q60</strong></span>`
fn model_number(document: &Html) -> Option<String> {
    let spans = Selector::parse("span").ok()?;
    let strong = Selector::parse("strong").ok()?;

    document
        .select(&spans)
        .filter(|span| span.text().any(|t| t.contains("Model Number:")))
        .find_map(|span| span.select(&strong).find_map(|s| element_text(&s)))
}
