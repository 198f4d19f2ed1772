//! Plain HTTP fetcher
//!
//! Issues one GET with redirects followed and a browser-like User-Agent.
//! Holds no state between requests, so it is safe under any concurrency.

use crate::error::DocError;
use crate::fetchers::{ContentFetcher, FETCH_TIMEOUT, SESSION_HEADER};
use crate::types::{FetchedPage, SessionId};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use std::time::Duration;
use tracing::{debug, error};

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE_EN: &str = "en-US,en;q=0.9";

/// HTTP client fetch strategy
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    user_agent: String,
    timeout: Duration,
}

impl HttpFetcher {
    /// Create a fetcher sending the given User-Agent
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            timeout: FETCH_TIMEOUT,
        }
    }

    /// Override the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn headers(&self, session: &SessionId) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&self.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static(crate::BASE_USER_AGENT)),
        );
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_EN));
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(SESSION_HEADER.as_bytes()),
            HeaderValue::from_str(session.as_str()),
        ) {
            headers.insert(name, value);
        }
        headers
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(crate::default_user_agent())
    }
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch(&self, url: &str, session: &SessionId) -> Result<FetchedPage, DocError> {
        let client = reqwest::Client::builder()
            .default_headers(self.headers(session))
            .timeout(self.timeout)
            .build()
            .map_err(DocError::ClientBuild)?;

        debug!(url, "Sending GET");
        let response = client.get(url).send().await.map_err(|e| {
            error!(url, error = %e, "Fetch failed");
            DocError::from_reqwest(url, e)
        })?;

        let status = response.status().as_u16();
        if status >= 400 {
            error!(url, status, "Fetch returned error status");
            return Err(DocError::HttpStatus {
                url: url.to_string(),
                status,
            });
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let raw_body = response
            .text()
            .await
            .map_err(|e| DocError::from_reqwest(url, e))?;

        Ok(FetchedPage {
            raw_body,
            content_type,
            final_url,
        })
    }
}
