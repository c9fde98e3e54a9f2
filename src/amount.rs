//! Amount extraction from free text
//!
//! Best-effort: looks for a currency-anchored value first, then any number.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Tried in order; the first that matches and parses wins
    static ref AMOUNT_PATTERNS: [Regex; 3] = [
        Regex::new(r"[€$]([0-9]+(?:[.,][0-9]{2})?)").unwrap(),
        Regex::new(r"([0-9]+(?:[.,][0-9]{2})?)[€$]").unwrap(),
        Regex::new(r"([0-9]+(?:[.,][0-9]{2})?)").unwrap(),
    ];
}

/// Pull a decimal amount out of `text`, normalizing a decimal comma
pub fn extract_amount(text: &str) -> Option<f64> {
    AMOUNT_PATTERNS.iter().find_map(|pattern| {
        let captured = pattern.captures(text)?.get(1)?.as_str();
        captured.replace(',', ".").parse::<f64>().ok()
    })
}

/// Format an amount the way the assistant echoes it back ("45.5", "100.0")
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.1}", amount)
    } else {
        amount.to_string()
    }
}
