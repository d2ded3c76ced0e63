//! Honey stock lookup.

/// Report whether a honey product is in stock.
///
/// Matching is a case-insensitive substring test, so "Raw COMB honey jar"
/// matches the comb entry. Unknown products get a polite fallback that
/// echoes the caller's wording.
pub fn check_inventory(product_name: &str) -> String {
    let needle = product_name.to_lowercase();

    if needle.contains("comb") {
        "We have 10 jars of raw Comb Honey in stock.".to_string()
    } else if needle.contains("moringa") {
        "We have 25 jars of Moringa Honey in stock.".to_string()
    } else {
        format!(
            "Let me check the hives! I don't see {} in our current inventory.",
            product_name
        )
    }
}
