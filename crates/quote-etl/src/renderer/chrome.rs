//! Chromium renderer driven over the DevTools protocol.

use super::{NavigationResult, RenderContext, Renderer};
use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// A Chromium process plus the task pumping its protocol events.
pub struct ChromeRenderer {
    browser: Mutex<Option<Browser>>,
    handler: Mutex<Option<JoinHandle<()>>>,
}

impl ChromeRenderer {
    /// Launch Chromium. Scripting is always enabled.
    pub async fn launch(headless: bool) -> Result<Self> {
        let mut builder = BrowserConfig::builder();
        if !headless {
            builder = builder.with_head();
        }
        let config = builder
            .build()
            .map_err(|e| anyhow!("invalid browser config: {e}"))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .context("launching chromium")?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("browser handler event error: {e}");
                }
            }
        });

        info!("chromium launched (headless: {headless})");

        Ok(Self {
            browser: Mutex::new(Some(browser)),
            handler: Mutex::new(Some(handler)),
        })
    }
}

#[async_trait]
impl Renderer for ChromeRenderer {
    async fn new_context(&self) -> Result<Box<dyn RenderContext>> {
        let guard = self.browser.lock().await;
        let Some(browser) = guard.as_ref() else {
            bail!("browser already shut down");
        };
        let page = browser
            .new_page("about:blank")
            .await
            .context("opening browser page")?;
        Ok(Box::new(ChromeContext { page }))
    }

    async fn shutdown(&self) -> Result<()> {
        let browser = self.browser.lock().await.take();
        let result = match browser {
            Some(mut browser) => {
                let closed = browser.close().await.context("closing chromium");
                if let Err(e) = browser.wait().await {
                    warn!("waiting for chromium to exit: {e}");
                }
                closed.map(|_| ())
            }
            None => Ok(()),
        };

        if let Some(handler) = self.handler.lock().await.take() {
            handler.abort();
        }

        result
    }
}

impl Drop for ChromeRenderer {
    fn drop(&mut self) {
        if let Some(handler) = self.handler.get_mut().take() {
            handler.abort();
        }
    }
}

/// One Chromium tab.
struct ChromeContext {
    page: Page,
}

#[async_trait]
impl RenderContext for ChromeContext {
    async fn navigate(&mut self, url: &str, timeout_ms: u64) -> Result<NavigationResult> {
        let started = Instant::now();
        tokio::time::timeout(Duration::from_millis(timeout_ms), self.page.goto(url))
            .await
            .map_err(|_| anyhow!("navigation to {url} timed out after {timeout_ms}ms"))?
            .with_context(|| format!("navigating to {url}"))?;

        let final_url = self.get_url().await.unwrap_or_else(|_| url.to_string());

        Ok(NavigationResult {
            final_url,
            load_time_ms: started.elapsed().as_millis() as u64,
        })
    }

    async fn execute_js(&self, script: &str) -> Result<serde_json::Value> {
        let result = self
            .page
            .evaluate(script)
            .await
            .context("evaluating script")?;
        Ok(result.value().cloned().unwrap_or_default())
    }

    async fn get_html(&self) -> Result<String> {
        self.page.content().await.context("reading page content")
    }

    async fn get_url(&self) -> Result<String> {
        self.page
            .url()
            .await
            .context("reading page url")?
            .ok_or_else(|| anyhow!("page has no url"))
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.page.close().await.context("closing page")
    }
}
