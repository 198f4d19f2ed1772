//! Fetch strategies for documentation pages
//!
//! Design: the pipeline only consumes raw markup and a content-type hint,
//! so each way of obtaining a page (plain HTTP, rendered in a browser)
//! is a [`ContentFetcher`] selected by configuration.

mod http;
#[cfg(feature = "webdriver")]
mod webdriver;

pub use http::HttpFetcher;
#[cfg(feature = "webdriver")]
pub use webdriver::WebDriverFetcher;

use crate::error::DocError;
use crate::types::{FetchedPage, SessionId};
use async_trait::async_trait;
use std::time::Duration;

/// Upper bound for a single page fetch
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Header carrying the session identifier
pub const SESSION_HEADER: &str = "X-MCP-Session-Id";

/// Trait for page fetch strategies
///
/// A fetch is a single attempt: no retries, bounded by [`FETCH_TIMEOUT`].
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Identifier for logging
    fn name(&self) -> &'static str;

    /// Retrieve the page at `url`
    ///
    /// `url` is the already-derived fetch URL (fragment policy and session
    /// parameter applied).
    async fn fetch(&self, url: &str, session: &SessionId) -> Result<FetchedPage, DocError>;

    /// Release shared resources held by the strategy
    async fn shutdown(&self) {}
}
