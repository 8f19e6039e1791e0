//! Normalization pipeline: raw source records to canonical products
//!
//! Each record goes through the same ordered steps:
//!
//! 1. Map raw keys onto canonical fields (`fields`)
//! 2. Trim and title-case text; blank or missing becomes `N/A` (`text`)
//! 3. Snap the brand onto the known-brand vocabulary (`brand`)
//! 4. Parse the price, `Unknown` when unparsable (`price`)
//! 5. Infer a category from the title when none was supplied (`category`)
//! 6. Reject records without a product URL
//!
//! The pipeline is pure apart from stamping the current time on each product.

mod brand;
mod category;
mod fields;
mod price;
mod text;

pub use brand::{BrandCorrector, KNOWN_BRANDS};
pub use category::{infer_category, OTHER};
pub use fields::{canonical_key, CanonicalFields, Field};
pub use price::parse_price;
pub use text::{clean_text, clean_url, title_case};

use crate::config::NormalizeConfig;
use crate::product::{CanonicalProduct, UNKNOWN};
use crate::sources::RawRecord;
use chrono::Utc;
use thiserror::Error;

/// Why a raw record could not become a catalog row
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    #[error("record from {source_name} has no product URL")]
    MissingProductUrl { source_name: String },
}

/// Output of normalizing one crawl's worth of records
#[derive(Debug, Default)]
pub struct NormalizedBatch {
    pub products: Vec<CanonicalProduct>,
    pub rejected: usize,
}

/// Turns raw records into canonical products
#[derive(Debug, Clone)]
pub struct Normalizer {
    brands: BrandCorrector,
}

impl Normalizer {
    pub fn new(config: &NormalizeConfig) -> Self {
        Self {
            brands: BrandCorrector::new(config.brand_threshold, &config.extra_brands),
        }
    }

    /// Normalizes a single record produced for `query`
    pub fn normalize(
        &self,
        record: &RawRecord,
        query: &str,
    ) -> Result<CanonicalProduct, Rejection> {
        let fields = CanonicalFields::from_record(record);

        let product_url = clean_url(fields.get(Field::ProductUrl));
        if product_url == UNKNOWN {
            return Err(Rejection::MissingProductUrl {
                source_name: record.source().to_string(),
            });
        }

        let title = clean_text(fields.get(Field::Title));
        let mut category = clean_text(fields.get(Field::Category));
        if category == UNKNOWN {
            category = infer_category(&title).to_string();
        }

        Ok(CanonicalProduct {
            model: clean_text(fields.get(Field::Model)),
            brand: self.brands.correct(fields.get(Field::Brand)),
            category,
            price: parse_price(fields.get(Field::Price)),
            image_url: clean_url(fields.get(Field::ImageUrl)),
            store: clean_text(fields.get(Field::Store).or(Some(record.source()))),
            search_query: query.trim().to_lowercase(),
            saved: false,
            timestamp: Utc::now(),
            title,
            product_url,
        })
    }

    /// Normalizes a batch, counting rejected records instead of failing
    pub fn normalize_batch(&self, records: &[RawRecord], query: &str) -> NormalizedBatch {
        let mut batch = NormalizedBatch::default();

        for record in records {
            match self.normalize(record, query) {
                Ok(product) => batch.products.push(product),
                Err(rejection) => {
                    tracing::debug!("Rejected record: {}", rejection);
                    batch.rejected += 1;
                }
            }
        }

        if batch.rejected > 0 {
            tracing::warn!(
                "Rejected {} of {} records without a product URL",
                batch.rejected,
                records.len()
            );
        }

        batch
    }
}
