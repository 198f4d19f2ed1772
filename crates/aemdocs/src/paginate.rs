//! Windowed result formatting with continuation hints
//!
//! Indices and lengths count characters, not bytes.

use crate::types::PaginatedResult;
use crate::PRODUCT_NAME;

const NO_MORE_CONTENT: &str = "<e>No more content available.</e>";

/// Citation header placed before every window
pub fn citation_header(url: &str) -> String {
    format!("{} Documentation from {}:\n\n", PRODUCT_NAME, url)
}

/// Slice `content` into the window starting at `start_index`
///
/// When content remains after the window, a hint naming the next
/// `start_index` is appended.
pub fn paginate(url: &str, content: &str, start_index: usize, max_length: usize) -> PaginatedResult {
    let total = content.chars().count();
    let header = citation_header(url);

    if start_index >= total {
        return no_more_content(header);
    }

    let end_index = start_index.saturating_add(max_length).min(total);
    let window: String = content
        .chars()
        .skip(start_index)
        .take(end_index - start_index)
        .collect();

    if window.is_empty() {
        return no_more_content(header);
    }

    let retrieved = window.chars().count();
    let next_start = start_index + retrieved;
    let is_truncated = total > next_start;

    let mut text = header;
    text.push_str(&window);
    if is_truncated {
        text.push_str(&format!(
            "\n\n<e>Content truncated. Call the read_documentation tool with start_index={} \
             to get more content. Total length: {}, Retrieved: {}</e>",
            next_start, total, end_index
        ));
    }

    PaginatedResult { text, is_truncated }
}

fn no_more_content(mut header: String) -> PaginatedResult {
    header.push_str(NO_MORE_CONTENT);
    PaginatedResult {
        text: header,
        is_truncated: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_content() {
        let page = paginate("https://x", "Short content", 0, 1000);
        assert!(!page.is_truncated);
        assert_eq!(
            page.text,
            "Adobe AEM Documentation from https://x:\n\nShort content"
        );
    }

    #[test]
    fn test_truncated_content() {
        let content = "a".repeat(10_000);
        let page = paginate("https://x", &content, 0, 100);
        assert!(page.is_truncated);
        assert!(page.text.contains("start_index=100"));
        assert!(page.text.contains("Total length: 10000, Retrieved: 100"));

        let header = citation_header("https://x");
        let body = &page.text[header.len()..];
        let window: String = body.chars().take_while(|c| *c == 'a').collect();
        assert_eq!(window.len(), 100);
    }

    #[test]
    fn test_continuation_from_middle() {
        let content = "0123456789".repeat(5);
        let page = paginate("https://x", &content, 20, 10);
        assert!(page.is_truncated);
        assert!(page.text.contains(":\n\n0123456789\n\n<e>Content truncated."));
        assert!(page.text.contains("start_index=30"));
        assert!(page.text.contains("Retrieved: 30"));
    }

    #[test]
    fn test_last_window_not_truncated() {
        let content = "0123456789".repeat(3);
        let page = paginate("https://x", &content, 20, 10);
        assert!(!page.is_truncated);
        assert!(!page.text.contains("truncated"));
        assert!(page.text.ends_with("0123456789"));
    }

    #[test]
    fn test_start_past_end() {
        for start in [5, 6, 1000] {
            let page = paginate("https://x", "12345", start, 10);
            assert!(!page.is_truncated);
            assert!(page.text.ends_with("<e>No more content available.</e>"));
        }
        let page = paginate("https://x", "", 0, 10);
        assert!(page.text.contains("No more content available."));
    }

    #[test]
    fn test_zero_length_window() {
        let page = paginate("https://x", "content", 0, 0);
        assert!(!page.is_truncated);
        assert!(page.text.contains("No more content available."));
    }

    #[test]
    fn test_counts_characters() {
        let content = "ää".repeat(10);
        let page = paginate("https://x", &content, 0, 5);
        assert!(page.is_truncated);
        assert!(page.text.contains("ääää\u{e4}\n\n<e>"));
        assert!(page.text.contains("start_index=5"));
        assert!(page.text.contains("Total length: 20"));
    }

    #[test]
    fn test_huge_max_length() {
        let page = paginate("https://x", "content here", 3, usize::MAX);
        assert!(!page.is_truncated);
        assert!(page.text.ends_with("tent here"));
    }
}
