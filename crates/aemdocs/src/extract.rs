//! Main-content isolation and title extraction
//!
//! The main region is the first match of an ordered selector table
//! (site-specific containers before generic ones). Boilerplate inside the
//! region is detached from the tree before the region is serialized back to
//! an HTML fragment for conversion.

use crate::error::ExtractionError;
use scraper::{ElementRef, Html, Selector};

/// Main content containers, highest priority first
const CONTENT_SELECTORS: &[&str] = &[
    // developer.adobe.com (Gatsby)
    "#___gatsby",
    "#gatsby-focus-wrapper",
    "main.css-7wiue4",
    // Experience League
    ".article-content",
    ".doc-content",
    ".documentation-content",
    ".page-content",
    ".sp-wrapper",
    ".content-container",
    "#article-content-body",
    // GitHub
    "article.markdown-body",
    ".repository-content",
    "#readme",
    ".Box-body",
    // Apache Sling
    ".content",
    "#content",
    // adaptTo()
    ".main-content",
    ".content-wrapper",
    // Generic
    "main",
    "article",
    "#main-content",
    "div[role='main']",
];

/// Navigation and page chrome removed from the main region
const BOILERPLATE_SELECTORS: &[&str] = &[
    "nav",
    "header",
    "footer",
    "aside",
    "[role='navigation']",
    "[role='banner']",
    "[role='contentinfo']",
    ".adobe-header",
    ".adobe-footer",
    ".navigation",
    ".breadcrumb",
    ".breadcrumbs",
    ".cookie-banner",
    ".cookie-notice",
    ".cookie-consent",
    ".feedback-widget",
    ".feedback-container",
    ".language-selector",
    ".lang-selector",
    ".page-nav",
    ".side-nav",
    ".sidebar",
    ".toc",
    ".table-of-contents",
    ".prev-next",
    ".pagination",
    ".social-share",
    ".share-buttons",
    // Experience League
    ".feds-header",
    ".feds-footer",
    ".feds-topnav",
    ".feds-navList",
    ".globalNav",
    ".spectrum-Accordion",
    ".mini-toc-container",
    // GitHub
    ".Box-header",
    ".pagehead",
    ".reponav",
    ".file-navigation",
    // Apache Sling
    "#navigation",
    ".nav",
    // adaptTo()
    ".site-header",
    ".site-footer",
    // Ads and tracking
    ".advertisement",
    ".ad-container",
    ".tracking",
];

/// Tags stripped wherever they occur in the main region
const STRIP_TAGS: &[&str] = &[
    "script", "style", "noscript", "meta", "link", "svg", "iframe",
];

fn parse_selector(selector: &str) -> Result<Selector, ExtractionError> {
    Selector::parse(selector).map_err(|_| ExtractionError::Selector(selector.to_string()))
}

/// Isolate the main content of a page as a cleaned HTML fragment
pub fn extract_main_content(html: &str) -> Result<String, ExtractionError> {
    if html.trim().is_empty() {
        return Err(ExtractionError::EmptyHtml);
    }

    let mut document = Html::parse_document(html);

    let mut region = None;
    for raw in CONTENT_SELECTORS {
        let selector = parse_selector(raw)?;
        if let Some(element) = document.select(&selector).next() {
            tracing::debug!(selector = raw, "Main content region found");
            region = Some(element.id());
            break;
        }
    }
    let region = match region {
        Some(id) => id,
        None => {
            let body = parse_selector("body")?;
            document
                .select(&body)
                .next()
                .unwrap_or_else(|| document.root_element())
                .id()
        }
    };

    let mut doomed = Vec::new();
    if let Some(root) = document.tree.get(region).and_then(ElementRef::wrap) {
        for raw in BOILERPLATE_SELECTORS.iter().chain(STRIP_TAGS) {
            let selector = parse_selector(raw)?;
            doomed.extend(
                root.select(&selector)
                    .map(|element| element.id())
                    .filter(|id| *id != region),
            );
        }
    }
    for id in doomed {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }

    Ok(document
        .tree
        .get(region)
        .and_then(ElementRef::wrap)
        .map(|element| element.html())
        .unwrap_or_default())
}

/// Extract the page title
///
/// Precedence: `<title>`, first `<h1>`, then the `og:title` meta tag.
pub fn extract_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    first_text(&document, "title")
        .or_else(|| first_text(&document, "h1"))
        .or_else(|| {
            let selector = Selector::parse("meta[property='og:title']").ok()?;
            document
                .select(&selector)
                .filter_map(|meta| meta.value().attr("content"))
                .map(str::trim)
                .find(|content| !content.is_empty())
                .map(str::to_string)
        })
}

fn first_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    let element = document.select(&selector).next()?;
    let text = element.text().collect::<String>();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
