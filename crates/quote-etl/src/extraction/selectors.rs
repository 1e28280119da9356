//! Field-to-locator table for the listing page.
//!
//! The page keys every cell to generated style classes that change whenever
//! the site is rebuilt. All of them live here so a layout change touches
//! this table only.

use super::ExtractError;
use scraper::Selector;

/// An element of a given tag carrying all of the given classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    pub tag: String,
    pub classes: Vec<String>,
}

impl Locator {
    /// Build a locator from a tag and a space-separated class signature.
    pub fn new(tag: &str, classes: &str) -> Self {
        Self {
            tag: tag.to_string(),
            classes: classes.split_whitespace().map(String::from).collect(),
        }
    }

    /// CSS selector text, e.g. `p.coin-item-symbol`.
    pub fn css(&self) -> String {
        let mut css = self.tag.clone();
        for class in &self.classes {
            css.push('.');
            css.push_str(class);
        }
        css
    }

    fn compile(&self) -> Result<Selector, ExtractError> {
        let css = self.css();
        Selector::parse(&css).map_err(|e| ExtractError::InvalidSelector {
            selector: css.clone(),
            reason: e.to_string(),
        })
    }
}

/// Locators for every field read from the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingSelectors {
    /// The element wrapping the listing table.
    pub container: Locator,
    /// Rows inside the container; the first match is the header.
    pub row: Locator,
    pub name: Locator,
    pub symbol: Locator,
    pub price: Locator,
    /// Matches the 1h, 24h and 7d cells, in that order.
    pub percent_change: Locator,
    pub market_cap: Locator,
    pub volume_24h: Locator,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            container: Locator::new("div", "sc-ae0cff98-2 tLNRm"),
            row: Locator::new("tr", ""),
            name: Locator::new("p", "sc-71024e3e-0 ehyBa-d"),
            symbol: Locator::new("p", "sc-71024e3e-0 OqPKt coin-item-symbol"),
            price: Locator::new("div", "sc-a093f09c-0 gPTgRa"),
            percent_change: Locator::new("span", "sc-4ed47bb1-0"),
            market_cap: Locator::new("span", "sc-baf034bc-1 fTNuyx"),
            volume_24h: Locator::new("p", "sc-71024e3e-0 bbHOdE font_weight_500"),
        }
    }
}

impl ListingSelectors {
    /// CSS matching listing rows anywhere in the document.
    pub fn rows_css(&self) -> String {
        format!("{} {}", self.container.css(), self.row.css())
    }

    /// Parse every locator into a `scraper` selector.
    pub fn compile(&self) -> Result<CompiledSelectors, ExtractError> {
        Ok(CompiledSelectors {
            container_css: self.container.css(),
            container: self.container.compile()?,
            row: self.row.compile()?,
            name: self.name.compile()?,
            symbol: self.symbol.compile()?,
            price: self.price.compile()?,
            percent_change: self.percent_change.compile()?,
            market_cap: self.market_cap.compile()?,
            volume_24h: self.volume_24h.compile()?,
        })
    }
}

/// Parsed form of [`ListingSelectors`].
#[derive(Debug, Clone)]
pub struct CompiledSelectors {
    pub(crate) container_css: String,
    pub(crate) container: Selector,
    pub(crate) row: Selector,
    pub(crate) name: Selector,
    pub(crate) symbol: Selector,
    pub(crate) price: Selector,
    pub(crate) percent_change: Selector,
    pub(crate) market_cap: Selector,
    pub(crate) volume_24h: Selector,
}
