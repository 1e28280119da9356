//! Listing rows before and after normalization.

use serde::{Deserialize, Serialize};

/// One listing row exactly as read from the page.
///
/// Percent fields hold the empty string when the row had fewer than three
/// percent-change cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawQuote {
    pub name: String,
    pub symbol: String,
    pub price: String,
    pub percent_change_1h: String,
    pub percent_change_24h: String,
    pub percent_change_7d: String,
    pub market_cap: String,
    pub volume_24h: String,
}

/// One listing row with numeric fields parsed.
///
/// `None` marks a value that could not be parsed; it is stored as `NULL`.
/// Percent changes are fractions (`0.05` for 5%).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetQuote {
    pub name: String,
    pub symbol: String,
    pub price: Option<f64>,
    pub percent_change_1h: Option<f64>,
    pub percent_change_24h: Option<f64>,
    pub percent_change_7d: Option<f64>,
    pub market_cap: Option<f64>,
    pub volume_24h: Option<f64>,
}
