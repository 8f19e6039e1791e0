use crate::sources::RawRecord;
use std::collections::HashMap;

/// Canonical field names with the raw keys each one accepts, in priority order
///
/// Raw keys are compared after [`canonical_key`], so "Product Name" and
/// "product_name" are the same key.
const ALIASES: &[(Field, &[&str])] = &[
    (Field::Title, &["title", "product_name", "name", "product_title"]),
    (Field::Model, &["model", "model_number", "model_no", "sku"]),
    (Field::Brand, &["brand", "brand_name"]),
    (Field::Category, &["category", "categories"]),
    (Field::Price, &["price", "price_(jd)", "price_jd", "current_price"]),
    (Field::ProductUrl, &["product_url", "url", "link"]),
    (Field::ImageUrl, &["image_url", "image", "image_link"]),
    (Field::Store, &["store", "store_name"]),
];

/// A canonical product field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Model,
    Brand,
    Category,
    Price,
    ProductUrl,
    ImageUrl,
    Store,
}

/// Raw values mapped onto canonical fields, before any cleaning
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CanonicalFields {
    values: HashMap<Field, String>,
}

impl CanonicalFields {
    /// Maps a raw record's keys onto canonical fields
    ///
    /// Unknown keys are ignored. Blank values count as absent. When several
    /// raw keys alias the same field, the earliest alias in the table wins.
    pub fn from_record(record: &RawRecord) -> Self {
        let mut by_key: HashMap<String, &str> = HashMap::new();
        let mut raw: Vec<(&str, &str)> = record.fields().collect();
        // "Price" and "price " collapse to one key; keep the choice stable
        raw.sort_unstable();

        for (key, value) in raw {
            if value.trim().is_empty() {
                continue;
            }
            by_key.entry(canonical_key(key)).or_insert(value);
        }

        let mut values = HashMap::new();
        for (field, aliases) in ALIASES {
            if let Some(value) = aliases.iter().find_map(|alias| by_key.get(*alias)) {
                values.insert(*field, (*value).to_string());
            }
        }

        Self { values }
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }
}

/// Trims, lower-cases and replaces spaces with underscores
pub fn canonical_key(key: &str) -> String {
    key.trim().to_lowercase().replace(' ', "_")
}
