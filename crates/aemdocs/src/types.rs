//! Core types for the documentation reader

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Default page window size in characters
pub const DEFAULT_MAX_LENGTH: usize = 10_000;

/// Largest accepted `max_length`
pub const MAX_MAX_LENGTH: usize = 999_999;

fn default_max_length() -> usize {
    DEFAULT_MAX_LENGTH
}

fn default_content_types() -> Vec<String> {
    vec!["Documentation".to_string()]
}

/// Random identifier attached to every outbound request
///
/// Generated once per process; only used to correlate traffic at the
/// destination server.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a new random session identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Request to read a documentation page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DocumentRequest {
    /// URL of the Adobe AEM documentation page to read
    pub url: String,

    /// Maximum number of characters to return (1 to 999999, default 10000)
    #[serde(default = "default_max_length")]
    pub max_length: usize,

    /// Return output starting at this character index, useful if a previous
    /// fetch was truncated and more content is required
    #[serde(default)]
    pub start_index: usize,
}

impl DocumentRequest {
    /// Create a new request with default window
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_length: DEFAULT_MAX_LENGTH,
            start_index: 0,
        }
    }

    /// Set the maximum window length
    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Set the start index
    pub fn start_index(mut self, start_index: usize) -> Self {
        self.start_index = start_index;
        self
    }

    /// Check parameter ranges
    pub fn validate(&self) -> Result<(), crate::DocError> {
        if self.max_length == 0 || self.max_length > MAX_MAX_LENGTH {
            return Err(crate::DocError::InvalidParameter(format!(
                "max_length must be between 1 and {}, got {}",
                MAX_MAX_LENGTH, self.max_length
            )));
        }
        Ok(())
    }
}

/// Request to search Experience League
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SearchRequest {
    /// Search query string
    pub query: String,

    /// Content types to search (Documentation, Tutorial, Troubleshooting, etc.)
    #[serde(default = "default_content_types")]
    pub content_types: Vec<String>,

    /// Products to filter (e.g. "Experience Manager|as a Cloud Service")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<String>>,

    /// Roles to filter (Developer, Admin, User, etc.)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,

    /// Include all AEM product variants when no products are given
    #[serde(default)]
    pub include_all_aem_products: bool,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            content_types: default_content_types(),
            products: None,
            roles: None,
            include_all_aem_products: false,
        }
    }
}

/// Curated documentation entry point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ServiceInfo {
    pub name: String,
    pub url: String,
    pub description: String,
    /// One of cloud-service, on-premise, apis, tools, learning
    pub category: String,
}

/// Raw page returned by a fetch strategy
#[derive(Debug, Clone, Default)]
pub struct FetchedPage {
    pub raw_body: String,
    /// Content-Type header value, empty when absent
    pub content_type: String,
    /// URL after redirects
    pub final_url: String,
}

/// Title and Markdown body of a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDocument {
    pub title: Option<String>,
    pub markdown: String,
}

/// One window of a document, ready to return to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginatedResult {
    pub text: String,
    pub is_truncated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults_from_json() {
        let req: DocumentRequest =
            serde_json::from_str(r#"{"url": "https://adapt.to/2025/schedule"}"#).unwrap();
        assert_eq!(req.max_length, 10_000);
        assert_eq!(req.start_index, 0);
    }

    #[test]
    fn test_request_rejects_negative_start() {
        let res: Result<DocumentRequest, _> =
            serde_json::from_str(r#"{"url": "https://adapt.to/", "start_index": -1}"#);
        assert!(res.is_err());
    }

    #[test]
    fn test_request_validate() {
        assert!(DocumentRequest::new("u").validate().is_ok());
        assert!(DocumentRequest::new("u").max_length(1).validate().is_ok());
        assert!(DocumentRequest::new("u").max_length(999_999).validate().is_ok());
        assert!(DocumentRequest::new("u").max_length(0).validate().is_err());
        assert!(DocumentRequest::new("u")
            .max_length(1_000_000)
            .validate()
            .is_err());
    }

    #[test]
    fn test_search_request_defaults() {
        let req: SearchRequest = serde_json::from_str(r#"{"query": "sling models"}"#).unwrap();
        assert_eq!(req.content_types, vec!["Documentation"]);
        assert!(req.products.is_none());
        assert!(req.roles.is_none());
        assert!(!req.include_all_aem_products);
    }

    #[test]
    fn test_session_id_is_random() {
        let a = SessionId::generate();
        let b = SessionId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
    }
}
