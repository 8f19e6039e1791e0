use crate::product::UNKNOWN;

/// Trims and title-cases a text field; blank or missing becomes [`UNKNOWN`]
///
/// A letter is capitalised when it follows a non-letter, every other letter is
/// lower-cased: `"samsung 55-inch tv"` becomes `"Samsung 55-Inch Tv"`.
pub fn clean_text(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => title_case(text),
        _ => UNKNOWN.to_string(),
    }
}

/// Trims a URL field without touching its case
pub fn clean_url(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => UNKNOWN.to_string(),
    }
}

pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_is_letter = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }

    out
}
