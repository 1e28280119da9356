//! Shared helpers for integration tests.

#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use quote_etl::extraction::scroll::ScrollPolicy;
use quote_etl::extraction::ListingSource;
use quote_etl::renderer::{NavigationResult, RenderContext, Renderer};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// The rendered listing: a header, one complete row, one row without market cap.
pub const LISTING_HTML: &str = include_str!("../fixtures/listing.html");

/// Serves a fixed HTML page and counts lifecycle calls.
#[derive(Default)]
pub struct StaticRenderer {
    html: String,
    pub opened: Arc<AtomicUsize>,
    pub closed: Arc<AtomicUsize>,
    pub shutdowns: Arc<AtomicUsize>,
}

impl StaticRenderer {
    pub fn new(html: &str) -> Self {
        Self {
            html: html.to_string(),
            ..Self::default()
        }
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn shutdowns(&self) -> usize {
        self.shutdowns.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Renderer for StaticRenderer {
    async fn new_context(&self) -> Result<Box<dyn RenderContext>> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(StaticContext {
            html: self.html.clone(),
            closed: Arc::clone(&self.closed),
        }))
    }

    async fn shutdown(&self) -> Result<()> {
        self.shutdowns.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct StaticContext {
    html: String,
    closed: Arc<AtomicUsize>,
}

#[async_trait]
impl RenderContext for StaticContext {
    async fn navigate(&mut self, url: &str, _timeout_ms: u64) -> Result<NavigationResult> {
        Ok(NavigationResult {
            final_url: url.to_string(),
            load_time_ms: 1,
        })
    }

    async fn execute_js(&self, script: &str) -> Result<Value> {
        if script == "document.body.scrollHeight" {
            return Ok(json!(4000));
        }
        if script.starts_with("document.querySelectorAll") {
            return Ok(json!(self.html.matches("<tr>").count()));
        }
        Ok(Value::Null)
    }

    async fn get_html(&self) -> Result<String> {
        Ok(self.html.clone())
    }

    async fn get_url(&self) -> Result<String> {
        Ok("https://coinmarketcap.com/".to_string())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Default listing source with all waits collapsed.
pub fn fast_source() -> ListingSource {
    ListingSource {
        scroll: ScrollPolicy {
            pause: Duration::ZERO,
            poll_interval: Duration::ZERO,
            settle_deadline: Duration::from_secs(5),
            ..ScrollPolicy::default()
        },
        ..ListingSource::default()
    }
}
