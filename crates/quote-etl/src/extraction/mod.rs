//! Render the listing page and pull raw quote rows out of it.
//!
//! The flow is navigate → scroll sweep → settle → snapshot HTML → parse.
//! Everything page-specific is in [`selectors`].

pub mod listing;
pub mod scroll;
pub mod selectors;

use crate::quote::RawQuote;
use crate::renderer::{RenderContext, Renderer};
use anyhow::{Context, Result};
use scroll::ScrollPolicy;
use selectors::ListingSelectors;
use thiserror::Error;
use tracing::{info, warn};

/// Listing page to scrape.
pub const LISTING_URL: &str = "https://coinmarketcap.com/";

/// Navigation timeout for the listing page.
const NAVIGATION_TIMEOUT_MS: u64 = 30_000;

/// Failures that abort extraction as a whole.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("listing container not found ({0})")]
    ContainerNotFound(String),

    #[error("invalid selector {selector}: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("listing did not settle after {waited_ms}ms ({rows} rows)")]
    Unsettled { rows: usize, waited_ms: u64 },
}

/// Where and how to read the listing.
#[derive(Debug, Clone)]
pub struct ListingSource {
    pub url: String,
    pub selectors: ListingSelectors,
    pub scroll: ScrollPolicy,
}

impl Default for ListingSource {
    fn default() -> Self {
        Self {
            url: LISTING_URL.to_string(),
            selectors: ListingSelectors::default(),
            scroll: ScrollPolicy::default(),
        }
    }
}

/// Open a page, extract the listing, and close the page again whatever
/// the outcome.
pub async fn extract(renderer: &dyn Renderer, source: &ListingSource) -> Result<Vec<RawQuote>> {
    let mut context = renderer
        .new_context()
        .await
        .context("creating browser context")?;

    let result = extract_from(context.as_mut(), source).await;

    if let Err(e) = context.close().await {
        warn!("failed to close browser context: {e:#}");
    }

    result
}

/// Extract the listing using an already open context.
pub async fn extract_from(
    context: &mut dyn RenderContext,
    source: &ListingSource,
) -> Result<Vec<RawQuote>> {
    // Fail on a bad selector table before spending time in the browser.
    let compiled = source.selectors.compile()?;

    let nav = context.navigate(&source.url, NAVIGATION_TIMEOUT_MS).await?;
    info!("loaded {} in {}ms", nav.final_url, nav.load_time_ms);

    scroll::scroll_sweep(&*context, &source.scroll).await?;
    scroll::settle(&*context, &source.selectors.rows_css(), &source.scroll).await?;

    let html = context.get_html().await?;

    // scraper documents are not Send; parse on the blocking pool
    let quotes = tokio::task::spawn_blocking(move || listing::parse_listing(&html, &compiled))
        .await
        .context("listing parser panicked")??;

    info!("extracted {} listing rows", quotes.len());
    Ok(quotes)
}
