//! Tool builder and contract for the documentation reader

use crate::error::DocError;
use crate::fetchers::{ContentFetcher, HttpFetcher, FETCH_TIMEOUT};
use crate::pipeline::DocumentationPipeline;
use crate::search::search_url_for;
use crate::services::available_services;
use crate::types::{DocumentRequest, SearchRequest, ServiceInfo, SessionId, DEFAULT_MAX_LENGTH};
use crate::{
    default_user_agent, SEARCH_TOOL_DESCRIPTION, SERVER_INSTRUCTIONS, SERVICES_TOOL_DESCRIPTION,
    TOOL_DESCRIPTION, TOOL_LLMTXT,
};
use schemars::schema_for;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Environment variable selecting the fetch strategy
pub const FETCHER_ENV: &str = "AEMDOCS_FETCHER";

/// Environment variable with the WebDriver endpoint
pub const WEBDRIVER_URL_ENV: &str = "WEBDRIVER_URL";

/// geckodriver / selenium default
const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:4444";

/// How pages are obtained
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchStrategy {
    /// Plain HTTP client
    #[default]
    Http,
    /// Rendered in a browser driven over WebDriver
    #[cfg(feature = "webdriver")]
    WebDriver,
}

impl FromStr for FetchStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "http" => Ok(FetchStrategy::Http),
            #[cfg(feature = "webdriver")]
            "webdriver" => Ok(FetchStrategy::WebDriver),
            #[cfg(not(feature = "webdriver"))]
            "webdriver" => Err("webdriver fetcher requires the `webdriver` feature".to_string()),
            other => Err(format!(
                "Invalid fetcher: {} (must be http or webdriver)",
                other
            )),
        }
    }
}

impl fmt::Display for FetchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchStrategy::Http => write!(f, "http"),
            #[cfg(feature = "webdriver")]
            FetchStrategy::WebDriver => write!(f, "webdriver"),
        }
    }
}

/// Reader configuration
#[derive(Debug, Clone)]
pub struct ReaderOptions {
    /// Full User-Agent sent by the HTTP fetcher
    pub user_agent: String,
    /// Hosts accepted in addition to the documentation allow-list
    pub allow_hosts: Vec<String>,
    pub fetch_strategy: FetchStrategy,
    /// WebDriver endpoint, used by the webdriver strategy only
    pub webdriver_url: String,
    /// Per-fetch timeout, applied by both fetch strategies
    pub timeout: Duration,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            allow_hosts: Vec::new(),
            fetch_strategy: FetchStrategy::default(),
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            timeout: FETCH_TIMEOUT,
        }
    }
}

impl ReaderOptions {
    /// Load options from `MCP_USER_AGENT`, `AEMDOCS_FETCHER` and `WEBDRIVER_URL`
    pub fn from_env() -> Result<Self, DocError> {
        let mut options = Self::default();

        if let Some(fetcher) = env_value(FETCHER_ENV) {
            options.fetch_strategy = fetcher.parse().map_err(DocError::InvalidParameter)?;
        }
        if let Some(endpoint) = env_value(WEBDRIVER_URL_ENV) {
            options.webdriver_url = endpoint;
        }

        Ok(options)
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Builder for configuring the reader tool
#[derive(Debug, Clone, Default)]
pub struct ToolBuilder {
    options: ReaderOptions,
    session: Option<SessionId>,
}

impl ToolBuilder {
    /// Create a builder with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing options
    pub fn options(mut self, options: ReaderOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the full User-Agent
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.options.user_agent = ua.into();
        self
    }

    /// Accept an extra host (mirrors, local test servers)
    pub fn allow_host(mut self, host: impl Into<String>) -> Self {
        self.options.allow_hosts.push(host.into());
        self
    }

    pub fn fetch_strategy(mut self, strategy: FetchStrategy) -> Self {
        self.options.fetch_strategy = strategy;
        self
    }

    pub fn webdriver_url(mut self, url: impl Into<String>) -> Self {
        self.options.webdriver_url = url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = timeout;
        self
    }

    /// Use a fixed session identifier instead of a random one
    pub fn session(mut self, session: SessionId) -> Self {
        self.session = Some(session);
        self
    }

    /// Build the tool
    pub fn build(self) -> Tool {
        let options = self.options;
        let session = self.session.unwrap_or_else(SessionId::generate);

        let fetcher: Arc<dyn ContentFetcher> = match options.fetch_strategy {
            FetchStrategy::Http => Arc::new(
                HttpFetcher::new(options.user_agent.clone()).with_timeout(options.timeout),
            ),
            #[cfg(feature = "webdriver")]
            FetchStrategy::WebDriver => Arc::new(
                crate::fetchers::WebDriverFetcher::new(options.webdriver_url.clone())
                    .with_timeout(options.timeout),
            ),
        };
        debug!(fetcher = fetcher.name(), session = %session, "Building reader");

        let pipeline = DocumentationPipeline::new(fetcher, session)
            .with_extra_hosts(options.allow_hosts.clone());

        Tool {
            pipeline: Arc::new(pipeline),
            options,
        }
    }
}

/// Configured reader tool
///
/// Cheap to clone; clones share the fetcher and session.
#[derive(Clone)]
pub struct Tool {
    pipeline: Arc<DocumentationPipeline>,
    options: ReaderOptions,
}

impl Default for Tool {
    fn default() -> Self {
        ToolBuilder::new().build()
    }
}

impl Tool {
    /// Create a new tool builder
    pub fn builder() -> ToolBuilder {
        ToolBuilder::new()
    }

    /// Get `read_documentation` description
    pub fn description(&self) -> &'static str {
        TOOL_DESCRIPTION
    }

    pub fn search_description(&self) -> &'static str {
        SEARCH_TOOL_DESCRIPTION
    }

    pub fn services_description(&self) -> &'static str {
        SERVICES_TOOL_DESCRIPTION
    }

    /// Get server instructions
    pub fn instructions(&self) -> &'static str {
        SERVER_INSTRUCTIONS
    }

    /// Get full documentation (llmtxt)
    pub fn llmtxt(&self) -> &'static str {
        TOOL_LLMTXT
    }

    pub fn options(&self) -> &ReaderOptions {
        &self.options
    }

    pub fn session(&self) -> &SessionId {
        self.pipeline.session()
    }

    /// Name of the active fetch strategy
    pub fn fetcher_name(&self) -> &'static str {
        self.pipeline.fetcher().name()
    }

    /// Input schema of `read_documentation`
    pub fn read_input_schema(&self) -> serde_json::Value {
        let schema = schema_for!(DocumentRequest);
        let mut value = serde_json::to_value(schema).unwrap_or_default();

        // max_length bounds are enforced at call time; advertise them too
        if let Some(max_length) = value.pointer_mut("/properties/max_length") {
            max_length["minimum"] = serde_json::json!(1);
            max_length["maximum"] = serde_json::json!(crate::MAX_MAX_LENGTH);
        }
        value
    }

    /// Input schema of `search_experience_league`
    pub fn search_input_schema(&self) -> serde_json::Value {
        let schema = schema_for!(SearchRequest);
        serde_json::to_value(schema).unwrap_or_default()
    }

    /// Input schema of `get_available_services` (no arguments)
    pub fn services_input_schema(&self) -> serde_json::Value {
        serde_json::json!({ "type": "object", "properties": {} })
    }

    /// Output schema of `get_available_services`
    pub fn services_output_schema(&self) -> serde_json::Value {
        let schema = schema_for!(Vec<ServiceInfo>);
        serde_json::to_value(schema).unwrap_or_default()
    }

    /// Read a documentation page
    ///
    /// Always returns text: failures are reported as messages.
    pub async fn read_documentation(&self, req: DocumentRequest) -> String {
        if let Err(e) = req.validate() {
            return e.to_string();
        }
        self.pipeline
            .read(&req.url, req.max_length, req.start_index)
            .await
    }

    /// Search Experience League and read the first results window
    pub async fn search_experience_league(&self, req: SearchRequest) -> String {
        info!(query = %req.query, "Searching Experience League");
        let url = search_url_for(&req);
        debug!(url = %url, "Search URL");
        self.pipeline.read(&url, DEFAULT_MAX_LENGTH, 0).await
    }

    /// Curated documentation areas
    pub fn available_services(&self) -> Vec<ServiceInfo> {
        available_services()
    }

    /// Release fetcher resources (browser session)
    pub async fn shutdown(&self) {
        self.pipeline.fetcher().shutdown().await;
    }
}
