//! Headless browser module
//!
//! This module provides a scoped headless-Chrome session used to render a
//! page, capture a full-page screenshot, and hand the rendered document to
//! the content extractor. A session is opened and closed per logical
//! operation and never shared across unrelated requests.

mod error;
mod extract;

pub use error::BrowserError;
pub use extract::extract_page_content;

use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::{
    CaptureScreenshotFormat, EventLifecycleEvent, SetLifecycleEventsEnabledParams,
};
use chromiumoxide::page::{Page, ScreenshotParams};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

/// Upper bound on the wait for the network-idle lifecycle signal. Chrome
/// emits `networkIdle` once the page has had no in-flight requests for
/// 500ms; if that never happens the load event already fired and we proceed
/// with whatever rendered.
const NETWORK_IDLE_TIMEOUT: Duration = Duration::from_secs(30);

/// How long to wait for a navigation before giving up on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationWait {
    /// Wait for the document load event only
    Load,

    /// Wait for the load event, then for network quiescence
    NetworkIdle,
}

/// Structured content extracted from a rendered page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageContent {
    /// Document title
    pub title: String,

    /// Content of the `<meta name="description">` element, empty if absent
    #[serde(rename = "metaDescription")]
    pub meta_description: String,

    /// Heading text per level, index 0 holding `<h1>` through index 5 `<h6>`
    pub headings: [Vec<String>; 6],

    /// Paragraph text in document order
    pub paragraphs: Vec<String>,

    /// Ordered and unordered lists with their items
    pub lists: Vec<PageList>,

    /// Links with resolved targets
    pub links: Vec<PageLink>,

    /// Image alternative text
    pub images: Vec<PageImage>,
}

/// A list element and its items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageList {
    /// Whether the list is ordered or unordered
    #[serde(rename = "type")]
    pub kind: ListKind,

    /// Item text in document order
    pub items: Vec<String>,
}

/// List flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Ordered,
    Unordered,
}

/// A link with its resolved href and text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLink {
    pub href: String,
    pub text: String,
}

/// An image's alternative text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageImage {
    pub alt: String,
}

/// A headless Chrome process scoped to one logical operation
pub struct BrowserSession {
    browser: Browser,
    handler_task: Option<JoinHandle<()>>,
}

impl BrowserSession {
    /// Launch a headless browser
    #[instrument]
    pub async fn launch() -> Result<Self, BrowserError> {
        let config = BrowserConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-setuid-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu")
            .build()
            .map_err(BrowserError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserError::Launch(format!("Failed to launch browser: {}", e)))?;

        let handler_task = tokio::spawn(async move { while handler.next().await.is_some() {} });

        Ok(Self {
            browser,
            handler_task: Some(handler_task),
        })
    }

    /// Navigate to a URL and wait for the requested readiness condition
    #[instrument(skip(self))]
    pub async fn open(&self, url: &str, wait: NavigationWait) -> Result<PageHandle, BrowserError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::Navigation(format!("Failed to open page: {}", e)))?;

        // Lifecycle events must be enabled and subscribed before navigation
        // starts, otherwise the networkIdle signal can slip past unseen.
        page.execute(SetLifecycleEventsEnabledParams::new(true))
            .await
            .map_err(|e| {
                BrowserError::Navigation(format!("Failed to enable lifecycle events: {}", e))
            })?;

        let mut lifecycle = page
            .event_listener::<EventLifecycleEvent>()
            .await
            .map_err(|e| BrowserError::Navigation(format!("Failed to listen for events: {}", e)))?;

        page.goto(url)
            .await
            .map_err(|e| BrowserError::Navigation(format!("Failed to load {}: {}", url, e)))?;

        page.wait_for_navigation()
            .await
            .map_err(|e| BrowserError::Navigation(format!("Navigation to {} failed: {}", url, e)))?;

        if wait == NavigationWait::NetworkIdle {
            let idle = async {
                while let Some(event) = lifecycle.next().await {
                    if event.name == "networkIdle" {
                        break;
                    }
                }
            };

            if tokio::time::timeout(NETWORK_IDLE_TIMEOUT, idle).await.is_err() {
                debug!(url, "network-idle signal not observed, continuing with loaded page");
            }
        }

        Ok(PageHandle { page })
    }

    /// Close the browser process and its event handler
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!(error = %e, "Browser close error");
        }
        let _ = self.browser.wait().await;
        if let Some(task) = self.handler_task.take() {
            task.abort();
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        // close() normally aborts the handler; this is the crash-path cleanup.
        if let Some(task) = self.handler_task.take() {
            task.abort();
        }
    }
}

/// A navigated page within a [`BrowserSession`]
pub struct PageHandle {
    page: Page,
}

impl PageHandle {
    /// Capture a full-page PNG screenshot, base64-encoded
    #[instrument(skip(self))]
    pub async fn screenshot_base64(&self) -> Result<String, BrowserError> {
        let bytes = self
            .page
            .screenshot(
                ScreenshotParams::builder()
                    .format(CaptureScreenshotFormat::Png)
                    .full_page(true)
                    .build(),
            )
            .await
            .map_err(|e| BrowserError::Screenshot(format!("Failed to capture screenshot: {}", e)))?;

        debug!(bytes = bytes.len(), "captured screenshot");
        Ok(STANDARD.encode(bytes))
    }

    /// Return the rendered document HTML
    pub async fn html(&self) -> Result<String, BrowserError> {
        self.page
            .content()
            .await
            .map_err(|e| BrowserError::Content(format!("Failed to read rendered document: {}", e)))
    }
}
