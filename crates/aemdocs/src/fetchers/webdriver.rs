//! Rendered-page fetcher backed by a WebDriver server
//!
//! The browser session is shared: the first fetch connects it and later
//! fetches reuse it until [`ContentFetcher::shutdown`]. A window-level
//! failure drops the session so the next fetch reconnects. Each fetch drives
//! its own tab and closes it whether rendering succeeded or not.

use crate::error::DocError;
use crate::fetchers::{ContentFetcher, FETCH_TIMEOUT};
use crate::types::{FetchedPage, SessionId};
use async_trait::async_trait;
use fantoccini::error::CmdError;
use fantoccini::wd::WindowHandle;
use fantoccini::{Client, ClientBuilder, Locator};
use std::future::Future;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Elements signalling that the main content has rendered
const MAIN_CONTENT_SELECTOR: &str =
    "main, article, [role='main'], .article-content, .main-content, #content, .content";

/// How long to wait for the main content before reading the page anyway
const RENDER_WAIT: Duration = Duration::from_secs(10);

struct Browser {
    client: Client,
    /// Window open at connect time, focused between fetches
    home: WindowHandle,
}

/// Headless-browser fetch strategy
pub struct WebDriverFetcher {
    endpoint: String,
    // WebDriver focus is per session, so tabs are driven one at a time
    browser: Mutex<Option<Browser>>,
    render_wait: Duration,
    timeout: Duration,
}

impl WebDriverFetcher {
    /// Create a fetcher for the WebDriver server at `endpoint`
    ///
    /// No connection is made until the first fetch.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            browser: Mutex::new(None),
            render_wait: RENDER_WAIT,
            timeout: FETCH_TIMEOUT,
        }
    }

    /// Override the main-content wait
    pub fn with_render_wait(mut self, wait: Duration) -> Self {
        self.render_wait = wait;
        self
    }

    /// Set the per-page load timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn connect(&self) -> Result<Browser, DocError> {
        info!(endpoint = %self.endpoint, "Connecting to WebDriver");
        let client = ClientBuilder::native()
            .connect(&self.endpoint)
            .await
            .map_err(|e| {
                DocError::Browser(format!("failed to connect to {}: {}", self.endpoint, e))
            })?;
        let home = client.window().await.map_err(browser_error)?;
        Ok(Browser { client, home })
    }

    async fn render(&self, client: &Client, url: &str) -> Result<FetchedPage, DocError> {
        client.goto(url).await.map_err(|e| fetch_error(url, e))?;

        if let Err(e) = client
            .wait()
            .at_most(self.render_wait)
            .for_element(Locator::Css(MAIN_CONTENT_SELECTOR))
            .await
        {
            debug!(url, error = %e, "Main content did not appear, reading page as rendered");
        }

        let raw_body = client.source().await.map_err(|e| fetch_error(url, e))?;
        let final_url = match client.current_url().await {
            Ok(current) => current.to_string(),
            Err(_) => url.to_string(),
        };

        Ok(FetchedPage {
            raw_body,
            content_type: "text/html".to_string(),
            final_url,
        })
    }

    async fn render_with_timeout(
        &self,
        client: &Client,
        url: &str,
    ) -> Result<FetchedPage, DocError> {
        match tokio::time::timeout(self.timeout, self.render(client, url)).await {
            Ok(result) => result,
            Err(_) => Err(DocError::Fetch {
                url: url.to_string(),
                message: format!("page did not load within {:?}", self.timeout),
            }),
        }
    }
}

#[async_trait]
impl ContentFetcher for WebDriverFetcher {
    fn name(&self) -> &'static str {
        "webdriver"
    }

    async fn fetch(&self, url: &str, _session: &SessionId) -> Result<FetchedPage, DocError> {
        let mut slot = self.browser.lock().await;
        if slot.is_none() {
            *slot = Some(self.connect().await?);
        }
        let browser = slot
            .as_ref()
            .ok_or_else(|| DocError::Browser("WebDriver session unavailable".to_string()))?;

        let client = &browser.client;
        let result = in_new_tab(
            client,
            browser.home.clone(),
            self.render_with_timeout(client, url),
        )
        .await;

        if session_lost(&result) {
            if let Some(stale) = slot.take() {
                warn!(endpoint = %self.endpoint, "Dropping WebDriver session, next fetch reconnects");
                if let Err(e) = stale.client.close().await {
                    debug!(error = %e, "Stale session did not close cleanly");
                }
            }
        }

        result
    }

    async fn shutdown(&self) {
        if let Some(browser) = self.browser.lock().await.take() {
            info!(endpoint = %self.endpoint, "Closing WebDriver session");
            if let Err(e) = browser.client.close().await {
                warn!(error = %e, "Failed to close WebDriver session");
            }
        }
    }
}

/// Window operations of a browser session
#[async_trait]
trait TabControl: Sync {
    type Handle: Clone + Send + Sync;

    /// Open a tab without focusing it
    async fn open_tab(&self) -> Result<Self::Handle, DocError>;

    async fn focus(&self, handle: Self::Handle) -> Result<(), DocError>;

    /// Close the focused window
    async fn close_focused(&self) -> Result<(), DocError>;
}

#[async_trait]
impl TabControl for Client {
    type Handle = WindowHandle;

    async fn open_tab(&self) -> Result<WindowHandle, DocError> {
        Ok(self.new_window(true).await.map_err(browser_error)?.handle)
    }

    async fn focus(&self, handle: WindowHandle) -> Result<(), DocError> {
        self.switch_to_window(handle).await.map_err(browser_error)
    }

    async fn close_focused(&self) -> Result<(), DocError> {
        self.close_window().await.map_err(browser_error)
    }
}

/// Run `work` in a fresh tab
///
/// Once the tab exists it is closed and `home` refocused on every path,
/// including a failed first switch into the tab.
async fn in_new_tab<C, F, T>(control: &C, home: C::Handle, work: F) -> Result<T, DocError>
where
    C: TabControl,
    F: Future<Output = Result<T, DocError>>,
{
    let tab = control.open_tab().await?;

    let result = match control.focus(tab.clone()).await {
        Ok(()) => work.await,
        Err(e) => Err(e),
    };

    // close_window acts on the focused window, so never close without focusing the tab
    match control.focus(tab).await {
        Ok(()) => {
            if let Err(e) = control.close_focused().await {
                warn!(error = %e, "Failed to close tab");
            }
        }
        Err(e) => warn!(error = %e, "Could not focus tab to close it"),
    }
    if let Err(e) = control.focus(home).await {
        warn!(error = %e, "Failed to refocus home window");
    }

    result
}

/// Window-level failures mean the session itself is gone
fn session_lost<T>(result: &Result<T, DocError>) -> bool {
    matches!(result, Err(DocError::Browser(_)))
}

fn browser_error(err: CmdError) -> DocError {
    DocError::Browser(err.to_string())
}

fn fetch_error(url: &str, err: CmdError) -> DocError {
    DocError::Fetch {
        url: url.to_string(),
        message: err.to_string(),
    }
}
