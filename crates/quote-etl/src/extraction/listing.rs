//! Parse the rendered listing table into raw quote rows.
//!
//! Synchronous: `scraper` documents are not `Send`, so async callers run
//! this under `tokio::task::spawn_blocking`.

use super::selectors::CompiledSelectors;
use super::ExtractError;
use crate::quote::RawQuote;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::{debug, error};

/// Why a single listing row was dropped.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RowError {
    #[error("missing {0} element")]
    MissingField(&'static str),
}

/// Parse every data row of the listing container, in document order.
///
/// The first row under the container is the header and is skipped. Rows
/// that fail to parse are logged and left out; a missing container is an
/// error.
pub fn parse_listing(
    html: &str,
    selectors: &CompiledSelectors,
) -> Result<Vec<RawQuote>, ExtractError> {
    let document = Html::parse_document(html);
    let container = document
        .select(&selectors.container)
        .next()
        .ok_or_else(|| ExtractError::ContainerNotFound(selectors.container_css.clone()))?;

    let mut quotes = Vec::new();
    let mut seen = 0usize;
    for (index, row) in container.select(&selectors.row).skip(1).enumerate() {
        seen += 1;
        match parse_row(row, selectors) {
            Ok(quote) => quotes.push(quote),
            Err(e) => error!("error scraping row {}: {e}", index + 1),
        }
    }

    debug!("parsed {} of {seen} listing rows", quotes.len());
    Ok(quotes)
}

/// Parse one `tr` of the listing.
pub fn parse_row(row: ElementRef<'_>, selectors: &CompiledSelectors) -> Result<RawQuote, RowError> {
    let name = required(row, &selectors.name, "name")?;
    let symbol = required(row, &selectors.symbol, "symbol")?;
    let price = required(row, &selectors.price, "price")?;

    let percents: Vec<String> = row.select(&selectors.percent_change).map(text_of).collect();
    let percent = |i: usize| percents.get(i).cloned().unwrap_or_default();

    let market_cap = required(row, &selectors.market_cap, "market cap")?;
    let volume_24h = required(row, &selectors.volume_24h, "volume")?;

    Ok(RawQuote {
        name: name.trim().to_string(),
        symbol: symbol.trim().to_string(),
        price,
        percent_change_1h: percent(0),
        percent_change_24h: percent(1),
        percent_change_7d: percent(2),
        market_cap,
        volume_24h,
    })
}

fn required(
    row: ElementRef<'_>,
    selector: &Selector,
    field: &'static str,
) -> Result<String, RowError> {
    row.select(selector)
        .next()
        .map(text_of)
        .ok_or(RowError::MissingField(field))
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect()
}
