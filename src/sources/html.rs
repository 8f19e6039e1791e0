//! HTML extraction helpers shared by the store adapters
//!
//! Everything here is synchronous and returns owned data, so adapters never
//! hold a parsed document across an await point.

use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use url::Url;

/// Collapses runs of whitespace and trims; empty text becomes `None`
pub fn clean_text(raw: &str) -> Option<String> {
    let text = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Text content of an element, cleaned
pub fn element_text(element: &ElementRef<'_>) -> Option<String> {
    clean_text(&element.text().collect::<String>())
}

/// Text of the first element matching `css`
pub fn first_text(document: &Html, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    document
        .select(&selector)
        .find_map(|element| element_text(&element))
}

/// Text of every element matching `css`
pub fn all_texts(document: &Html, css: &str) -> Vec<String> {
    match Selector::parse(css) {
        Ok(selector) => document
            .select(&selector)
            .filter_map(|element| element_text(&element))
            .collect(),
        Err(_) => Vec::new(),
    }
}

/// Attribute of the first element matching `css` that carries it
pub fn first_attr(document: &Html, css: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    document
        .select(&selector)
        .filter_map(|element| element.value().attr(attr))
        .find_map(clean_text)
}

/// Absolute URLs from the `href` of every element matching `css`
///
/// Order is preserved and duplicates are dropped.
pub fn collect_links(document: &Html, css: &str, base_url: &Url) -> Vec<String> {
    let Ok(selector) = Selector::parse(css) else {
        return Vec::new();
    };

    let mut links: Vec<String> = Vec::new();
    for element in document.select(&selector) {
        if let Some(link) = element
            .value()
            .attr("href")
            .and_then(|href| resolve_link(href, base_url))
        {
            if !links.contains(&link) {
                links.push(link);
            }
        }
    }
    links
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only links
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}

/// Parsed `application/ld+json` blocks; malformed blocks are skipped
pub fn json_ld_blocks(document: &Html) -> Vec<Value> {
    let Ok(selector) = Selector::parse(r#"script[type="application/ld+json"]"#) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| {
            let raw = element.text().collect::<String>();
            match serde_json::from_str::<Value>(&raw) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::debug!("Skipping malformed JSON-LD block: {}", e);
                    None
                }
            }
        })
        .collect()
}

/// First word of a product title, which several stores use as the brand
pub fn leading_word(title: &str) -> Option<String> {
    title.split_whitespace().next().map(str::to_string)
}
