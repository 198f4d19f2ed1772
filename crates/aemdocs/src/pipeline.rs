//! Single-pass read pipeline: validate, classify, fetch or synthesize,
//! convert, paginate

use crate::classify::{
    classify, effective_fetch_url, extract_video_id, last_path_segment, validate_url,
    UrlCategory, CONFERENCE_HOST,
};
use crate::convert::{is_html_content, markdown_from_html};
use crate::error::DocError;
use crate::extract::extract_title;
use crate::fetchers::ContentFetcher;
use crate::paginate::paginate;
use crate::types::{ExtractedDocument, FetchedPage, PaginatedResult, SessionId};
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

/// Orchestrates one documentation read per call
///
/// Holds no per-request state; share it behind an `Arc`.
pub struct DocumentationPipeline {
    fetcher: Arc<dyn ContentFetcher>,
    session: SessionId,
    extra_hosts: Vec<String>,
}

impl DocumentationPipeline {
    pub fn new(fetcher: Arc<dyn ContentFetcher>, session: SessionId) -> Self {
        Self {
            fetcher,
            session,
            extra_hosts: Vec::new(),
        }
    }

    /// Accept additional hosts beyond the documentation allow-list
    pub fn with_extra_hosts(mut self, hosts: Vec<String>) -> Self {
        self.extra_hosts = hosts;
        self
    }

    pub fn session(&self) -> &SessionId {
        &self.session
    }

    pub fn fetcher(&self) -> &Arc<dyn ContentFetcher> {
        &self.fetcher
    }

    /// Read a page and return the text handed back to the caller
    ///
    /// Validation and fetch failures come back as their message, without
    /// the citation header.
    pub async fn read(&self, url: &str, max_length: usize, start_index: usize) -> String {
        match self.try_read(url, max_length, start_index).await {
            Ok(page) => page.text,
            Err(e) => e.to_string(),
        }
    }

    /// Read a page, keeping failures typed
    pub async fn try_read(
        &self,
        url: &str,
        max_length: usize,
        start_index: usize,
    ) -> Result<PaginatedResult, DocError> {
        let parsed = validate_url(url, &self.extra_hosts)?;
        let classified = classify(&parsed);
        debug!(url, category = ?classified.category, "Classified URL");

        let content = match classified.category {
            UrlCategory::Youtube => match extract_video_id(&parsed) {
                Some(video_id) => {
                    info!(video_id = %video_id, "Detected YouTube video");
                    youtube_guidance(url, &video_id)
                }
                None => {
                    self.fetch_document(url, classified.preserve_fragment)
                        .await?
                        .into_content()
                }
            },
            UrlCategory::Pdf => {
                info!(url, "Detected PDF document");
                pdf_guidance(url, &parsed)
            }
            UrlCategory::Ordinary | UrlCategory::SearchLike => self
                .fetch_document(url, classified.preserve_fragment)
                .await?
                .into_content(),
        };

        let page = paginate(url, &content, start_index, max_length);
        if page.is_truncated {
            debug!(
                url,
                end = start_index.saturating_add(max_length),
                total = content.chars().count(),
                "Content truncated"
            );
        }
        Ok(page)
    }

    async fn fetch_document(
        &self,
        url: &str,
        preserve_fragment: bool,
    ) -> Result<ExtractedDocument, DocError> {
        let fetch_url = effective_fetch_url(url, preserve_fragment, &self.session);
        debug!(fetcher = self.fetcher.name(), url = %fetch_url, "Fetching page");

        let page = self
            .fetcher
            .fetch(&fetch_url, &self.session)
            .await
            .map_err(|e| reported_as(e, url))?;

        Ok(render_document(&page))
    }
}

/// Turn a fetched page into title plus Markdown
///
/// Non-HTML bodies pass through untouched; extraction failures become the
/// sentinel text.
pub fn render_document(page: &FetchedPage) -> ExtractedDocument {
    let title = extract_title(&page.raw_body);

    let markdown = if is_html_content(&page.raw_body, &page.content_type) {
        markdown_from_html(&page.raw_body).unwrap_or_else(|e| {
            debug!(error = %e, "Extraction failed");
            e.sentinel()
        })
    } else {
        page.raw_body.clone()
    };

    ExtractedDocument { title, markdown }
}

impl ExtractedDocument {
    /// Markdown with `# <title>` prepended unless it already opens with one
    pub fn into_content(self) -> String {
        match self.title {
            Some(title) if !self.markdown.starts_with("# ") => {
                format!("# {}\n\n{}", title, self.markdown)
            }
            _ => self.markdown,
        }
    }
}

// Fetchers see the session-tagged URL; callers should see the one they asked for.
fn reported_as(err: DocError, url: &str) -> DocError {
    match err {
        DocError::Fetch { message, .. } => DocError::Fetch {
            url: url.to_string(),
            message,
        },
        DocError::HttpStatus { status, .. } => DocError::HttpStatus {
            url: url.to_string(),
            status,
        },
        other => other,
    }
}

fn youtube_guidance(url: &str, video_id: &str) -> String {
    format!(
        "# YouTube Video: {id}\n\n\
         **Video URL**: {url}\n\n\
         **Video ID**: {id}\n\n\
         ## Note on Transcripts\n\n\
         To extract video transcripts, you can:\n\
         1. Visit the YouTube page directly: https://www.youtube.com/watch?v={id}\n\
         2. Use YouTube's transcript feature (click \"...\" → \"Show transcript\")\n\
         3. Use third-party tools or APIs like youtube-transcript-api\n\n\
         **Note**: Automatic transcript extraction requires additional dependencies \
         and API access not included in this version.\n",
        id = video_id,
        url = url,
    )
}

fn pdf_guidance(url: &str, parsed: &Url) -> String {
    let filename = last_path_segment(parsed);
    let mut content = format!(
        "# PDF Document: {name}\n\n\
         **PDF URL**: {url}\n\n\
         **Filename**: {name}\n\n\
         ## Note on PDF Access\n\n\
         This is a PDF document. To access the content:\n\n\
         1. **Direct Download**: Download the PDF from: {url}\n\
         2. **View in Browser**: Open the URL directly in your browser\n\
         3. **Extract Text**: Use a PDF text extraction tool\n\n\
         **Note**: Automatic PDF text extraction is not included in this version.\n\n",
        name = filename,
        url = url,
    );

    if parsed.host_str() == Some(CONFERENCE_HOST) && parsed.path().contains("/presentations/") {
        content.push_str(
            "## adaptTo() Presentation\n\n\
             This appears to be a presentation from the adaptTo() conference. \
             These presentations typically contain:\n\
             - Technical architecture diagrams\n\
             - Code examples and best practices\n\
             - Case studies and real-world implementations\n\
             - Performance optimization techniques\n\n",
        );
    }
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records requested URLs and serves a fixed page
    struct StubFetcher {
        page: Result<FetchedPage, u16>,
        requested: Mutex<Vec<String>>,
    }

    impl StubFetcher {
        fn html(body: &str) -> Arc<Self> {
            Arc::new(Self {
                page: Ok(FetchedPage {
                    raw_body: body.to_string(),
                    content_type: "text/html; charset=utf-8".to_string(),
                    final_url: String::new(),
                }),
                requested: Mutex::new(Vec::new()),
            })
        }

        fn status(status: u16) -> Arc<Self> {
            Arc::new(Self {
                page: Err(status),
                requested: Mutex::new(Vec::new()),
            })
        }

        fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ContentFetcher for StubFetcher {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn fetch(&self, url: &str, _session: &SessionId) -> Result<FetchedPage, DocError> {
            self.requested.lock().unwrap().push(url.to_string());
            match &self.page {
                Ok(page) => Ok(page.clone()),
                Err(status) => Err(DocError::HttpStatus {
                    url: url.to_string(),
                    status: *status,
                }),
            }
        }
    }

    fn pipeline(fetcher: Arc<StubFetcher>) -> DocumentationPipeline {
        DocumentationPipeline::new(fetcher, SessionId::from("sess-1"))
    }

    const PAGE: &str = r#"<html><head><title>Sling Models</title></head><body>
        <nav>Site menu</nav>
        <main><p>Sling Models let you map resources to Java objects.</p></main>
        </body></html>"#;

    #[tokio::test]
    async fn test_prepends_title() {
        let fetcher = StubFetcher::html(PAGE);
        let text = pipeline(fetcher.clone())
            .read("https://sling.apache.org/documentation/bundles/models.html", 10_000, 0)
            .await;
        assert!(text.starts_with(
            "Adobe AEM Documentation from https://sling.apache.org/documentation/bundles/models.html:\n\n# Sling Models\n\n"
        ));
        assert!(text.contains("map resources to Java objects"));
        assert!(!text.contains("Site menu"));
        assert_eq!(
            fetcher.requested(),
            vec!["https://sling.apache.org/documentation/bundles/models.html?session=sess-1"]
        );
    }

    #[tokio::test]
    async fn test_existing_heading_not_duplicated() {
        let fetcher = StubFetcher::html(
            "<html><head><title>T</title></head><body><main><h1>Heading</h1><p>Body text long enough.</p></main></body></html>",
        );
        let text = pipeline(fetcher)
            .read("https://experienceleague.adobe.com/en/docs/x", 10_000, 0)
            .await;
        assert!(text.contains(":\n\n# Heading\n\n"));
        assert!(!text.contains("# T\n"));
    }

    #[tokio::test]
    async fn test_invalid_url_returned_directly() {
        let fetcher = StubFetcher::html(PAGE);
        let text = pipeline(fetcher.clone()).read("https://example.com/x", 10_000, 0).await;
        assert!(text.starts_with("Invalid URL: https://example.com/x."));
        assert!(!text.contains("Documentation from"));
        assert!(fetcher.requested().is_empty());
    }

    #[tokio::test]
    async fn test_status_error_names_requested_url() {
        let fetcher = StubFetcher::status(404);
        let text = pipeline(fetcher)
            .read("https://helpx.adobe.com/missing.html#top", 10_000, 0)
            .await;
        assert_eq!(
            text,
            "Failed to fetch https://helpx.adobe.com/missing.html#top: status code 404"
        );
    }

    #[tokio::test]
    async fn test_youtube_guidance_without_fetch() {
        let fetcher = StubFetcher::html(PAGE);
        let text = pipeline(fetcher.clone())
            .read("https://www.youtube.com/watch?v=nJ8QTNQEkD8", 10_000, 0)
            .await;
        assert!(text.contains("# YouTube Video: nJ8QTNQEkD8"));
        assert!(text.contains("**Video ID**: nJ8QTNQEkD8"));
        assert!(text.contains("https://www.youtube.com/watch?v=nJ8QTNQEkD8"));
        assert!(fetcher.requested().is_empty());
    }

    #[tokio::test]
    async fn test_youtube_without_id_is_fetched() {
        let fetcher = StubFetcher::html(PAGE);
        pipeline(fetcher.clone())
            .read("https://www.youtube.com/@AdobeDevelopers", 10_000, 0)
            .await;
        assert_eq!(fetcher.requested().len(), 1);
    }

    #[tokio::test]
    async fn test_pdf_guidance_with_conference_note() {
        let fetcher = StubFetcher::html(PAGE);
        let text = pipeline(fetcher.clone())
            .read(
                "https://adapt.to/2025/presentations/adaptto-2025-challenges.pdf",
                10_000,
                0,
            )
            .await;
        assert!(text.contains("# PDF Document: adaptto-2025-challenges.pdf"));
        assert!(text.contains("**Filename**: adaptto-2025-challenges.pdf"));
        assert!(text.contains("## adaptTo() Presentation"));
        assert!(fetcher.requested().is_empty());
    }

    #[tokio::test]
    async fn test_pdf_guidance_without_conference_note() {
        let fetcher = StubFetcher::html(PAGE);
        let text = pipeline(fetcher)
            .read("https://helpx.adobe.com/guide.pdf", 10_000, 0)
            .await;
        assert!(text.contains("# PDF Document: guide.pdf"));
        assert!(!text.contains("adaptTo() Presentation"));
    }

    #[tokio::test]
    async fn test_search_fragment_preserved() {
        let fetcher = StubFetcher::html(PAGE);
        pipeline(fetcher.clone())
            .read("https://experienceleague.adobe.com/en/search#q=sling", 10_000, 0)
            .await;
        assert_eq!(
            fetcher.requested(),
            vec!["https://experienceleague.adobe.com/en/search?session=sess-1#q=sling"]
        );
    }

    #[tokio::test]
    async fn test_empty_page_becomes_sentinel() {
        let fetcher = StubFetcher::html("<html><body><main><p>hi</p></main></body></html>");
        let text = pipeline(fetcher)
            .read("https://docs.adobe.com/x", 10_000, 0)
            .await;
        assert!(text.ends_with(
            "<e>Page failed to be simplified from HTML or content too short</e>"
        ));
    }

    #[tokio::test]
    async fn test_heading_only_main_keeps_title() {
        let fetcher = StubFetcher::html(
            "<html><body><nav>Site menu</nav><header>Page header</header><main><h1>T</h1></main><footer>Page footer</footer></body></html>",
        );
        let text = pipeline(fetcher)
            .read("https://docs.adobe.com/x", 10_000, 0)
            .await;
        let body = text
            .strip_prefix("Adobe AEM Documentation from https://docs.adobe.com/x:\n\n")
            .unwrap();
        assert_eq!(
            body,
            "# T\n\n<e>Page failed to be simplified from HTML or content too short</e>"
        );
        for chrome in ["Site menu", "Page header", "Page footer"] {
            assert!(!body.contains(chrome), "{} leaked into output", chrome);
        }
    }

    #[tokio::test]
    async fn test_pagination_window() {
        let fetcher = StubFetcher::html(PAGE);
        let p = pipeline(fetcher);
        let page = p
            .try_read("https://sling.apache.org/x.html", 10, 0)
            .await
            .unwrap();
        assert!(page.is_truncated);
        assert!(page.text.contains("start_index=10"));

        let page = p
            .try_read("https://sling.apache.org/x.html", 10, 100_000)
            .await
            .unwrap();
        assert!(!page.is_truncated);
        assert!(page.text.ends_with("<e>No more content available.</e>"));
    }

    #[test]
    fn test_plain_text_passthrough() {
        let doc = render_document(&FetchedPage {
            raw_body: "plain *text* body".to_string(),
            content_type: "text/plain".to_string(),
            final_url: String::new(),
        });
        assert_eq!(doc.title, None);
        assert_eq!(doc.into_content(), "plain *text* body");
    }
}
