/// Category assigned when no rule matches
pub const OTHER: &str = "Other";

/// Ordered inference rules; the first rule with a matching title token wins
const RULES: &[(&str, &[&str])] = &[
    ("Television", &["tv", "tvs", "television", "televisions"]),
    (
        "Refrigerator",
        &["fridge", "fridges", "refrigerator", "refrigerators", "freezer"],
    ),
    ("Washing Machine", &["washer", "washers", "washing"]),
    ("Dishwasher", &["dishwasher", "dishwashers"]),
    ("Air Conditioner", &["ac", "conditioner", "conditioners"]),
    ("Microwave", &["microwave", "microwaves"]),
];

/// Infers a category from a product title
///
/// Matching is on whole lower-cased alphanumeric tokens, so "Dishwasher" does
/// not trip the washing machine rule.
pub fn infer_category(title: &str) -> &'static str {
    let lowered = title.to_lowercase();
    let tokens: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();

    RULES
        .iter()
        .find(|(_, keywords)| tokens.iter().any(|t| keywords.contains(t)))
        .map(|(category, _)| *category)
        .unwrap_or(OTHER)
}
