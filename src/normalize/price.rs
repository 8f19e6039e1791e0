use crate::product::Price;

/// Parses a free-form price string
///
/// Every character other than an ASCII digit or `.` is dropped before parsing,
/// so currency labels and thousands separators disappear. Anything that still
/// fails to parse is [`Price::Unknown`], never zero.
pub fn parse_price(raw: Option<&str>) -> Price {
    let Some(raw) = raw else {
        return Price::Unknown;
    };

    let digits: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    match digits.parse::<f64>() {
        Ok(amount) => Price::from_amount(amount),
        Err(_) => Price::Unknown,
    }
}
