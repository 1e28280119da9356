//! Scroll the listing so lazily rendered rows materialize.
//!
//! Two phases: a fixed sweep down the page in equal steps with a pause after
//! each, then a settle poll that waits for the row count to stop changing.

use super::ExtractError;
use crate::renderer::RenderContext;
use anyhow::{Context, Result};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

/// Timing of the sweep and settle phases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollPolicy {
    /// Number of equal scroll increments down the page.
    pub steps: u32,
    /// Pause after each increment.
    pub pause: Duration,
    /// Consecutive identical row counts required to call the page settled.
    pub stable_checks: u32,
    /// Interval between row-count polls.
    pub poll_interval: Duration,
    /// Give up settling after this long.
    pub settle_deadline: Duration,
}

impl Default for ScrollPolicy {
    fn default() -> Self {
        Self {
            steps: 10,
            pause: Duration::from_secs(2),
            stable_checks: 3,
            poll_interval: Duration::from_millis(500),
            settle_deadline: Duration::from_secs(60),
        }
    }
}

/// Scroll from top to bottom in `policy.steps` increments of the page height.
pub async fn scroll_sweep(context: &dyn RenderContext, policy: &ScrollPolicy) -> Result<()> {
    let height = context
        .execute_js("document.body.scrollHeight")
        .await
        .context("reading page height")?
        .as_f64()
        .unwrap_or(0.0) as i64;
    let part = height / i64::from(policy.steps.max(1));

    debug!("sweeping {height}px in {} steps of {part}px", policy.steps);

    for step in 1..=policy.steps {
        let y = i64::from(step) * part;
        context
            .execute_js(&format!("window.scrollTo(0, {y})"))
            .await
            .with_context(|| format!("scrolling to {y}"))?;
        tokio::time::sleep(policy.pause).await;
    }

    Ok(())
}

/// Poll the number of rows matching `rows_css` until it is non-zero and
/// unchanged for `policy.stable_checks` consecutive polls.
///
/// Returns the settled row count, or [`ExtractError::Unsettled`] once the
/// deadline passes.
pub async fn settle(
    context: &dyn RenderContext,
    rows_css: &str,
    policy: &ScrollPolicy,
) -> Result<usize> {
    let script = format!(
        "document.querySelectorAll({}).length",
        serde_json::to_string(rows_css)?
    );
    let started = Instant::now();
    let mut last = None;
    let mut stable = 0u32;

    loop {
        let count = context
            .execute_js(&script)
            .await
            .context("counting listing rows")?
            .as_u64()
            .unwrap_or(0) as usize;

        stable = if last == Some(count) { stable + 1 } else { 1 };
        last = Some(count);

        if count > 0 && stable >= policy.stable_checks {
            info!("listing settled at {count} rows");
            return Ok(count);
        }

        let waited = started.elapsed();
        if waited >= policy.settle_deadline {
            return Err(ExtractError::Unsettled {
                rows: count,
                waited_ms: waited.as_millis() as u64,
            }
            .into());
        }

        tokio::time::sleep(policy.poll_interval).await;
    }
}
