//! One ETL run: extract, clean, load, strictly in sequence.

use crate::config::DatabaseConfig;
use crate::extraction::{self, ListingSource};
use crate::load;
use crate::normalize;
use crate::quote::AssetQuote;
use crate::renderer::Renderer;
use anyhow::{Context, Result};
use tracing::{info, warn};

/// What a completed run produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Rows that survived extraction.
    pub extracted: usize,
    /// Rows written to the destination table.
    pub loaded: u64,
}

/// A configured ETL run.
#[derive(Debug, Clone)]
pub struct Pipeline {
    pub source: ListingSource,
    pub database: DatabaseConfig,
}

impl Pipeline {
    pub fn new(database: DatabaseConfig) -> Self {
        Self {
            source: ListingSource::default(),
            database,
        }
    }

    /// Run all three stages. Any stage failure aborts the run.
    ///
    /// The renderer is shut down as soon as extraction finishes, whether or
    /// not it succeeded; the browser is not kept alive during the load.
    pub async fn run(&self, renderer: &dyn Renderer) -> Result<RunSummary> {
        info!("Starting ETL process");

        let extracted = self.extract_and_clean(renderer).await;
        if let Err(e) = renderer.shutdown().await {
            warn!("browser shutdown failed: {e:#}");
        }
        let quotes = extracted?;

        info!("Loading data into PostgreSQL");
        let loaded = load::load(&self.database, &quotes)
            .await
            .context("loading quotes")?;

        info!("ETL process completed successfully");
        Ok(RunSummary {
            extracted: quotes.len(),
            loaded,
        })
    }

    /// The first two stages: render and parse the listing, then normalize it.
    pub async fn extract_and_clean(&self, renderer: &dyn Renderer) -> Result<Vec<AssetQuote>> {
        info!("Extract data");
        let raw = extraction::extract(renderer, &self.source)
            .await
            .context("extracting listing")?;

        info!("Cleaning data");
        Ok(normalize::normalize(&raw))
    }
}
