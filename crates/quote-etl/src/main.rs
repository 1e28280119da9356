//! `quote-etl`: run one extract/clean/load cycle and exit.
//!
//! Configuration comes from `DB_NAME`, `DB_USER`, `DB_PASSWORD`, `DB_HOST`
//! and `DB_PORT`, optionally via a `.env` file. Log verbosity follows
//! `RUST_LOG`.

use anyhow::{Context, Result};
use quote_etl::renderer::chrome::ChromeRenderer;
use quote_etl::{DatabaseConfig, Pipeline};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quote_etl=info".parse()?),
        )
        .init();

    let database = DatabaseConfig::from_env().context("reading database configuration")?;
    let pipeline = Pipeline::new(database);

    let renderer = ChromeRenderer::launch(true).await?;
    let summary = pipeline.run(&renderer).await?;
    info!(
        "{} rows extracted, {} rows loaded",
        summary.extracted, summary.loaded
    );
    Ok(())
}
