use crate::normalize::text::clean_text;
use crate::product::UNKNOWN;
use strsim::normalized_levenshtein;

/// Reference vocabulary for brand correction
pub const KNOWN_BRANDS: &[&str] = &[
    "Samsung",
    "LG",
    "Sony",
    "Panasonic",
    "Toshiba",
    "Philips",
    "Hisense",
    "Sharp",
];

/// Snaps misspelled brands onto a fixed vocabulary
#[derive(Debug, Clone)]
pub struct BrandCorrector {
    vocabulary: Vec<String>,
    threshold: f64,
}

impl BrandCorrector {
    /// Builds a corrector over [`KNOWN_BRANDS`] plus `extra` brands
    pub fn new(threshold: f64, extra: &[String]) -> Self {
        let mut vocabulary: Vec<String> = KNOWN_BRANDS.iter().map(|b| b.to_string()).collect();
        for brand in extra {
            let brand = brand.trim();
            if !vocabulary.iter().any(|b| b.eq_ignore_ascii_case(brand)) {
                vocabulary.push(brand.to_string());
            }
        }

        Self {
            vocabulary,
            threshold,
        }
    }

    /// Cleans `raw` and replaces it with the closest known brand
    ///
    /// The best match is taken only when its similarity reaches the threshold;
    /// otherwise the cleaned value is kept. Ties go to the earlier vocabulary
    /// entry.
    pub fn correct(&self, raw: Option<&str>) -> String {
        let cleaned = clean_text(raw);
        if cleaned == UNKNOWN {
            return cleaned;
        }

        let needle = cleaned.to_lowercase();
        let mut best: Option<(&str, f64)> = None;
        for candidate in &self.vocabulary {
            let score = normalized_levenshtein(&needle, &candidate.to_lowercase());
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((candidate.as_str(), score));
            }
        }

        match best {
            Some((brand, score)) if score >= self.threshold => brand.to_string(),
            _ => cleaned,
        }
    }
}
