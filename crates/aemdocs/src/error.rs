//! Error types for the documentation reader

use thiserror::Error;

/// Errors that can occur while reading a documentation page
#[derive(Debug, Error)]
pub enum DocError {
    /// URL failed the domain allow-list check
    #[error(
        "Invalid URL: {0}. URL must be from supported domains: \
         Adobe domains (experienceleague, developer, helpx, docs, business), \
         GitHub (github.com, *.github.io), Apache Sling (sling.apache.org), \
         adaptTo() (adapt.to, including PDFs), or YouTube"
    )]
    InvalidUrl(String),

    /// Request parameter out of range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Failed to build HTTP client
    #[error("Failed to create HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    /// Network or timeout failure
    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    /// Server answered with an error status
    #[error("Failed to fetch {url}: status code {status}")]
    HttpStatus { url: String, status: u16 },

    /// Rendered-page strategy could not reach or drive the browser
    #[error("Browser error: {0}")]
    Browser(String),
}

impl DocError {
    /// Create an error from a reqwest transport error
    pub fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "request timed out after 30 seconds".to_string()
        } else if err.is_connect() {
            format!("failed to connect: {}", err)
        } else {
            err.to_string()
        };
        DocError::Fetch {
            url: url.to_string(),
            message,
        }
    }
}

/// Failures while turning HTML into Markdown
///
/// These never cross the tool boundary as errors: the pipeline renders them
/// with [`ExtractionError::sentinel`] and paginates the result like any
/// other content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    /// Input document was empty
    #[error("Empty HTML content")]
    EmptyHtml,

    /// Conversion produced nothing useful
    #[error("Page failed to be simplified from HTML or content too short")]
    TooShort,

    /// A selector in the built-in tables failed to parse
    #[error("Error converting HTML to Markdown: invalid selector {0}")]
    Selector(String),
}

impl ExtractionError {
    /// Inline marker embedded in place of page content
    pub fn sentinel(&self) -> String {
        format!("<e>{}</e>", self)
    }
}
