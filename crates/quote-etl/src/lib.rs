//! Scrape the cryptocurrency listing, normalize it, and replace a
//! PostgreSQL table with the result.
//!
//! The run is three stages in sequence: [`extraction`] renders the page in
//! Chromium and reads the listing rows, [`normalize`] parses the numbers,
//! and [`load`] rewrites the `cryptocurrency` table. [`pipeline`] ties them
//! together.

pub mod config;
pub mod extraction;
pub mod load;
pub mod normalize;
pub mod pipeline;
pub mod quote;
pub mod renderer;

pub use config::DatabaseConfig;
pub use pipeline::{Pipeline, RunSummary};
pub use quote::{AssetQuote, RawQuote};
