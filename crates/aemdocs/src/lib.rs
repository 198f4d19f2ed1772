//! aemdocs - Adobe AEM documentation reader for LLM agents
//!
//! Fetches public AEM documentation pages from an allow-list of domains,
//! strips site chrome, converts the main content to Markdown and returns it
//! in paginated windows with continuation hints.
//!
//! ## Pipeline
//!
//! Every read goes through [`DocumentationPipeline`]: the URL is validated
//! and classified, YouTube and PDF links get a synthesized guidance document,
//! everything else is fetched by a [`ContentFetcher`] and converted.
//!
//! Fetch strategies:
//! - [`HttpFetcher`] - single GET with a browser-like User-Agent
//! - `WebDriverFetcher` - rendered page through a WebDriver server
//!   (feature `webdriver`)
//!
//! ## Example
//!
//! ```no_run
//! use aemdocs::{DocumentRequest, Tool};
//!
//! # async fn run() {
//! let tool = Tool::default();
//! let text = tool
//!     .read_documentation(DocumentRequest::new(
//!         "https://sling.apache.org/documentation/bundles/models.html",
//!     ))
//!     .await;
//! println!("{}", text);
//! # }
//! ```

pub mod classify;
mod convert;
mod error;
mod extract;
pub mod fetchers;
mod paginate;
mod pipeline;
pub mod search;
pub mod services;
mod tool;
mod types;

pub use classify::{classify, validate_url, ClassifiedUrl, UrlCategory};
pub use convert::{html_to_markdown, markdown_from_html};
pub use error::{DocError, ExtractionError};
pub use extract::{extract_main_content, extract_title};
pub use fetchers::{ContentFetcher, HttpFetcher};
#[cfg(feature = "webdriver")]
pub use fetchers::WebDriverFetcher;
pub use paginate::paginate;
pub use pipeline::{render_document, DocumentationPipeline};
pub use search::build_experience_league_search_url;
pub use services::available_services;
pub use tool::{FetchStrategy, ReaderOptions, Tool, ToolBuilder};
pub use types::{
    DocumentRequest, ExtractedDocument, FetchedPage, PaginatedResult, SearchRequest, ServiceInfo,
    SessionId, DEFAULT_MAX_LENGTH, MAX_MAX_LENGTH,
};

/// Product named in citation headers
pub const PRODUCT_NAME: &str = "Adobe AEM";

/// Browser User-Agent used unless `MCP_USER_AGENT` overrides it
pub const BASE_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Environment variable overriding the base User-Agent
pub const USER_AGENT_ENV: &str = "MCP_USER_AGENT";

/// Full User-Agent for a given browser base string
pub fn user_agent_with_base(base: &str) -> String {
    format!(
        "{} ModelContextProtocol/{} (Adobe AEM Documentation Server)",
        base,
        env!("CARGO_PKG_VERSION")
    )
}

/// User-Agent sent with every request
///
/// Reads `MCP_USER_AGENT` for the base, falling back to [`BASE_USER_AGENT`].
pub fn default_user_agent() -> String {
    let base = std::env::var(USER_AGENT_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| BASE_USER_AGENT.to_string());
    user_agent_with_base(&base)
}

/// Description of the `read_documentation` tool
pub const TOOL_DESCRIPTION: &str = r#"Fetch and convert an Adobe AEM documentation page to markdown format.

- Supported domains: experienceleague/developer/helpx/docs/business.adobe.com, github.com, *.github.io, sling.apache.org, adapt.to, youtube.com
- Navigation, headers and footers are removed
- Long pages are returned in windows; repeat the call with the start_index from the truncation hint to continue
- YouTube and PDF links return guidance instead of page content"#;

/// Description of the `search_experience_league` tool
pub const SEARCH_TOOL_DESCRIPTION: &str = r#"Search Adobe Experience League documentation with filters.

- content_types: Documentation, Tutorial, Troubleshooting, API Reference, Release Notes, Best Practices
- products: e.g. "Experience Manager", "Experience Manager|as a Cloud Service", "Experience Manager|6.5"
- roles: Developer, Admin, User, Leader, Architect, Business Practitioner
- include_all_aem_products: search every AEM variant when no products are given"#;

/// Description of the `get_available_services` tool
pub const SERVICES_TOOL_DESCRIPTION: &str = r#"Get a list of available Adobe AEM services and documentation areas.

Categories: cloud-service, on-premise, apis, tools, learning."#;

/// Server instructions sent on MCP initialize
pub const SERVER_INSTRUCTIONS: &str = r#"# Adobe AEM Documentation Server

This server provides tools to access public Adobe Experience Manager (AEM) documentation and convert it to markdown format.

## Best Practices

- Use `search_experience_league` to find relevant documentation before reading specific pages
- Use `get_available_services` to see available AEM documentation areas
- For long documentation pages, make multiple calls to `read_documentation` with different `start_index` values
- For very long documents (>30,000 characters), stop reading once you have found the needed information
- Always cite the documentation URL when providing information to users
- Hash fragments are preserved for search pages and adapt.to conference schedules

## Supported Domains

- experienceleague.adobe.com - Adobe Experience League documentation (including search)
- developer.adobe.com - Adobe Developer documentation and APIs
- helpx.adobe.com - Adobe Help documentation
- docs.adobe.com - Adobe technical documentation
- business.adobe.com - Adobe Summit and business resources
- github.com - GitHub repositories (any organization)
- *.github.io - GitHub Pages documentation sites
- sling.apache.org - Apache Sling documentation
- adapt.to - adaptTo() conference content (all years, including PDFs)
- youtube.com - YouTube videos"#;

/// Extended documentation for LLM consumption (llmtxt)
pub const TOOL_LLMTXT: &str = r#"# AEM Documentation Reader

Reads public Adobe Experience Manager documentation and returns clean markdown.

## Tools

### read_documentation
- `url` (required): documentation page URL from a supported domain
- `max_length` (optional): characters per window, 1 to 999999 (default: 10000)
- `start_index` (optional): character offset to start from (default: 0)

### search_experience_league
- `query` (required): search terms
- `content_types` (optional): default ["Documentation"]
- `products` (optional): product filters
- `roles` (optional): role filters
- `include_all_aem_products` (optional): default false

### get_available_services
No parameters. Returns `{name, url, description, category}` entries.

## Output

Every page starts with `Adobe AEM Documentation from <url>:` followed by markdown.
When more content remains, the text ends with:

<e>Content truncated. Call the read_documentation tool with start_index=N to get more content. Total length: T, Retrieved: R</e>

## Examples

### Read a page
```json
{"url": "https://sling.apache.org/documentation/bundles/models.html"}
```

### Continue a truncated page
```json
{"url": "https://experienceleague.adobe.com/en/docs/experience-manager-65", "start_index": 10000}
```

### Search tutorials for developers
```json
{"query": "components", "content_types": ["Tutorial"], "roles": ["Developer"]}
```

## Error Handling
- URLs outside the supported domains return an "Invalid URL" message
- Network failures and error statuses return "Failed to fetch <url>: ..."
- Pages that cannot be simplified return an <e>...</e> marker instead of content
"#;
