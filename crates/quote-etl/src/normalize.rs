//! Turn raw listing text into numbers.
//!
//! Pure functions; anything that does not parse becomes `None`.

use crate::quote::{AssetQuote, RawQuote};

/// Parse a currency amount such as `$43,210.50`.
pub fn parse_currency(text: &str) -> Option<f64> {
    let cleaned: String = text.chars().filter(|c| !matches!(c, '$' | ',')).collect();
    parse_finite(&cleaned)
}

/// Parse a percentage such as `-5.00%` into a fraction (`-0.05`).
pub fn parse_percent(text: &str) -> Option<f64> {
    let cleaned: String = text.chars().filter(|&c| c != '%').collect();
    parse_finite(&cleaned).map(|v| v / 100.0)
}

fn parse_finite(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Normalize one row.
pub fn normalize_quote(raw: &RawQuote) -> AssetQuote {
    AssetQuote {
        name: raw.name.clone(),
        symbol: raw.symbol.clone(),
        price: parse_currency(&raw.price),
        percent_change_1h: parse_percent(&raw.percent_change_1h),
        percent_change_24h: parse_percent(&raw.percent_change_24h),
        percent_change_7d: parse_percent(&raw.percent_change_7d),
        market_cap: parse_currency(&raw.market_cap),
        volume_24h: parse_currency(&raw.volume_24h),
    }
}

/// Normalize a whole listing, keeping row order.
pub fn normalize(raw: &[RawQuote]) -> Vec<AssetQuote> {
    raw.iter().map(normalize_quote).collect()
}
