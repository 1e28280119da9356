//! Browser rendering abstraction.
//!
//! A [`Renderer`] owns the browser process and hands out [`RenderContext`]s,
//! one per page. Extraction code only ever talks to these traits, so tests
//! can drive it with an in-memory double instead of a real browser.

pub mod chrome;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Outcome of navigating a context to a URL.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NavigationResult {
    /// The final URL after redirects.
    pub final_url: String,
    /// Time until the load event fired, in milliseconds.
    pub load_time_ms: u64,
}

/// A launched browser able to open page contexts.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Open a fresh page context.
    async fn new_context(&self) -> Result<Box<dyn RenderContext>>;

    /// Shut the browser down. Contexts must be closed before calling this.
    async fn shutdown(&self) -> Result<()>;
}

/// A single page with scripting enabled.
#[async_trait]
pub trait RenderContext: Send + Sync {
    /// Navigate to `url`, failing if the load takes longer than `timeout_ms`.
    async fn navigate(&mut self, url: &str, timeout_ms: u64) -> Result<NavigationResult>;

    /// Evaluate a JavaScript expression and return its JSON value.
    async fn execute_js(&self, script: &str) -> Result<serde_json::Value>;

    /// Serialize the current DOM to HTML.
    async fn get_html(&self) -> Result<String>;

    /// Current URL of the page.
    async fn get_url(&self) -> Result<String>;

    /// Close the page and release its resources.
    async fn close(self: Box<Self>) -> Result<()>;
}
