//! Diamond Star (diamondstarjo.com) adapter
//!
//! WooCommerce with the Woodmart theme. Sale prices sit inside `<ins>`; the
//! first `rel="tag"` link is the category.

use crate::crawler::HttpClient;
use crate::sources::html::{collect_links, first_attr, first_text, leading_word, resolve_link};
use crate::sources::{
    fetch_detail, fetch_listing, AdapterError, PageWalker, RawRecord, SourceAdapter,
};
use async_trait::async_trait;
use scraper::Html;
use url::Url;

pub struct DiamondStarAdapter {
    name: String,
    base_url: Url,
    walker: PageWalker,
}

impl DiamondStarAdapter {
    pub fn new(name: impl Into<String>, base_url: Url, walker: PageWalker) -> Self {
        Self {
            name: name.into(),
            base_url,
            walker,
        }
    }

    fn search_url(&self, query: &str, page: u32) -> Result<Url, AdapterError> {
        let mut url = if page == 1 {
            self.base_url.join("./")?
        } else {
            self.base_url.join(&format!("page/{}", page))?
        };
        url.query_pairs_mut()
            .append_pair("s", query)
            .append_pair("post_type", "product");
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
impl SourceAdapter for DiamondStarAdapter {
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
    let title = first_text(&document, "h1.product_title");

    let mut record = RawRecord::new(source).with("Product URL", url);

    record.insert_opt("Brand", title.as_deref().and_then(leading_word));
    record.insert_opt("Title", title);
    record.insert_opt("Model", first_text(&document, "span.sku"));
    record.insert_opt(
        "Price",
        first_text(&document, "p.price ins .woocommerce-Price-amount")
            .or_else(|| first_text(&document, "p.price .woocommerce-Price-amount")),
    );
    record.insert_opt("Category", first_text(&document, r#"a[rel="tag"]"#));
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
