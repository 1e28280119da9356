//! Replace the `cryptocurrency` table with a fresh listing.
//!
//! Every run drops the table, recreates it and inserts the rows one
//! statement at a time, all inside a single transaction that is committed
//! once at the end.

use crate::config::DatabaseConfig;
use crate::quote::AssetQuote;
use anyhow::{Context, Result};
use sqlx::{Connection, PgConnection};
use tracing::{debug, info, warn};

/// Destination table.
pub const TABLE: &str = "cryptocurrency";

const DROP_TABLE: &str = "DROP TABLE IF EXISTS cryptocurrency";

const CREATE_TABLE: &str = r#"
    CREATE TABLE cryptocurrency (
        name VARCHAR(255),
        symbol VARCHAR(20),
        price FLOAT,
        percent_change_1h FLOAT,
        percent_change_24h FLOAT,
        percent_change_7d FLOAT,
        market_cap FLOAT,
        volume_24h FLOAT
    )
"#;

const INSERT_ROW: &str = r#"
    INSERT INTO cryptocurrency (
        name, symbol, price,
        percent_change_1h, percent_change_24h, percent_change_7d,
        market_cap, volume_24h
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
"#;

/// Open a connection to the configured database.
pub async fn connect(config: &DatabaseConfig) -> Result<PgConnection> {
    let conn = PgConnection::connect_with(&config.connect_options())
        .await
        .with_context(|| {
            format!(
                "connecting to postgres at {}:{}/{}",
                config.host, config.port, config.name
            )
        })?;
    debug!("connected to {}:{}/{}", config.host, config.port, config.name);
    Ok(conn)
}

/// Connect, replace the table, and close the connection whatever the outcome.
pub async fn load(config: &DatabaseConfig, quotes: &[AssetQuote]) -> Result<u64> {
    let mut conn = connect(config).await?;

    let result = replace_table(&mut conn, quotes).await;

    if let Err(e) = conn.close().await {
        warn!("failed to close database connection: {e}");
    }

    result
}

/// Drop and recreate the table, then insert `quotes` in order.
///
/// Returns the number of rows inserted. On error nothing is committed.
pub async fn replace_table(conn: &mut PgConnection, quotes: &[AssetQuote]) -> Result<u64> {
    let mut tx = conn.begin().await.context("starting transaction")?;

    sqlx::query(DROP_TABLE)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("dropping {TABLE}"))?;

    sqlx::query(CREATE_TABLE)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("creating {TABLE}"))?;

    let mut inserted = 0u64;
    for (index, quote) in quotes.iter().enumerate() {
        sqlx::query(INSERT_ROW)
            .bind(&quote.name)
            .bind(&quote.symbol)
            .bind(quote.price)
            .bind(quote.percent_change_1h)
            .bind(quote.percent_change_24h)
            .bind(quote.percent_change_7d)
            .bind(quote.market_cap)
            .bind(quote.volume_24h)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("inserting row {} ({})", index + 1, quote.symbol))?;
        inserted += 1;
    }

    tx.commit().await.context("committing load")?;

    info!("replaced {TABLE} with {inserted} rows");
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// First word of each top-level item in the first parenthesised list.
    fn columns(sql: &str) -> Vec<String> {
        let start = sql.find('(').unwrap() + 1;
        let mut depth = 0;
        let mut end = start;
        for (i, c) in sql[start..].char_indices() {
            match c {
                '(' => depth += 1,
                ')' if depth == 0 => {
                    end = start + i;
                    break;
                }
                ')' => depth -= 1,
                _ => {}
            }
        }
        sql[start..end]
            .split(',')
            .map(|c| c.split_whitespace().next().unwrap_or("").to_string())
            .collect()
    }

    #[test]
    fn test_insert_matches_schema() {
        let created = columns(CREATE_TABLE);
        let inserted = columns(INSERT_ROW);
        assert_eq!(created.len(), 8);
        assert_eq!(created, inserted);
        assert_eq!(INSERT_ROW.matches('$').count(), created.len());
    }

    #[test]
    fn test_schema_bounds_text_columns() {
        assert!(CREATE_TABLE.contains("name VARCHAR(255)"));
        assert!(CREATE_TABLE.contains("symbol VARCHAR(20)"));
    }
}
