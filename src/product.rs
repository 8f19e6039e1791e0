//! Canonical product types shared by the normalization pipeline and the catalog

use chrono::{DateTime, Utc};
use std::fmt;

/// Marker used for any text field a source did not supply
pub const UNKNOWN: &str = "N/A";

/// A product price: either a valid non-negative amount or explicitly unknown
///
/// Unparsable source prices become `Unknown`, never zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Price {
    Known(f64),
    Unknown,
}

impl Price {
    /// Builds a price from a raw amount, rejecting negative and non-finite values
    pub fn from_amount(amount: f64) -> Self {
        if amount.is_finite() && amount >= 0.0 {
            Self::Known(amount)
        } else {
            Self::Unknown
        }
    }

    /// Returns the amount if known
    pub fn amount(&self) -> Option<f64> {
        match self {
            Self::Known(v) => Some(*v),
            Self::Unknown => None,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    /// Maps a nullable database column back to a price (NULL encodes `Unknown`)
    pub(crate) fn from_column(value: Option<f64>) -> Self {
        value.map(Self::from_amount).unwrap_or(Self::Unknown)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(v) => write!(f, "{:.2}", v),
            Self::Unknown => f.write_str(UNKNOWN),
        }
    }
}

/// A normalized, schema-conformant catalog row
///
/// `product_url` is the identity key. `saved` is only ever changed by explicit
/// user action through the catalog store, never by a crawl.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalProduct {
    pub title: String,
    pub model: String,
    pub brand: String,
    pub category: String,
    pub price: Price,
    pub product_url: String,
    pub image_url: String,
    pub store: String,
    /// Lower-cased query of the crawl that last wrote this row
    pub search_query: String,
    pub saved: bool,
    /// Last-write instant
    pub timestamp: DateTime<Utc>,
}
