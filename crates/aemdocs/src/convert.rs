//! HTML to Markdown conversion
//!
//! Walks the parsed fragment and renders each element into a string.
//! Block elements return their output wrapped in blank lines; a final pass
//! collapses blank-line runs and trims trailing whitespace outside code
//! fences. Emphasis markers in text are passed through unescaped.
//!
//! The walk is bounded: elements nested deeper than [`MAX_RENDER_DEPTH`]
//! are emitted as a flat text paragraph.

use crate::error::ExtractionError;
use crate::extract::extract_main_content;
use scraper::{ElementRef, Html, Node};

/// Converted pages shorter than this are treated as failed extractions
const MIN_CONTENT_CHARS: usize = 10;

/// Element nesting rendered as structured Markdown
pub const MAX_RENDER_DEPTH: usize = 64;

/// Elements whose content never reaches the output
const SKIP_TAGS: &[&str] = &[
    "script", "style", "noscript", "meta", "link", "svg", "iframe", "head", "title", "template",
];

/// Elements rendered as paragraph-like blocks
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "section", "article", "main", "header", "footer", "aside", "nav", "body", "html",
    "figure", "figcaption", "details", "summary", "form", "fieldset", "address", "dl", "dt", "dd",
    "center",
];

/// Check if fetched content should go through HTML conversion
///
/// Empty content type defaults to HTML.
pub fn is_html_content(body: &str, content_type: &str) -> bool {
    let head: String = body.chars().take(200).collect();
    head.to_lowercase().contains("<html")
        || content_type.to_lowercase().contains("text/html")
        || content_type.is_empty()
}

/// Extract the main content of a page and convert it to Markdown
pub fn markdown_from_html(html: &str) -> Result<String, ExtractionError> {
    let fragment = extract_main_content(html)?;
    let markdown = html_to_markdown(&fragment);
    if markdown.trim().chars().count() < MIN_CONTENT_CHARS {
        return Err(ExtractionError::TooShort);
    }
    Ok(markdown)
}

/// Convert an HTML fragment to Markdown
pub fn html_to_markdown(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let raw = render_children(fragment.root_element(), Context::default());
    filter_excessive_newlines(&raw)
}

#[derive(Debug, Clone, Copy, Default)]
struct Context {
    list_depth: usize,
    depth: usize,
}

fn render_children(element: ElementRef<'_>, ctx: Context) -> String {
    let mut out = String::new();
    for child in element.children() {
        match child.value() {
            Node::Text(text) => push_text(&mut out, text),
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    let rendered = render_element(child, ctx);
                    push_piece(&mut out, &rendered);
                }
            }
            _ => {}
        }
    }
    out
}

fn render_element(element: ElementRef<'_>, ctx: Context) -> String {
    let name = element.value().name();
    if SKIP_TAGS.contains(&name) {
        return String::new();
    }
    if ctx.depth >= MAX_RENDER_DEPTH {
        return block(&flat_text(element));
    }
    let ctx = Context {
        depth: ctx.depth + 1,
        ..ctx
    };

    match name {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let level = usize::from(name.as_bytes()[1] - b'0');
            let text = flatten(&render_children(element, ctx));
            if text.is_empty() {
                String::new()
            } else {
                format!("\n\n{} {}\n\n", "#".repeat(level), text)
            }
        }
        "br" => "\n".to_string(),
        "hr" => "\n\n---\n\n".to_string(),
        "strong" | "b" => wrap_inline(&render_children(element, ctx), "**"),
        "em" | "i" => wrap_inline(&render_children(element, ctx), "*"),
        "del" | "s" | "strike" => wrap_inline(&render_children(element, ctx), "~~"),
        "code" => {
            let code: String = element.text().collect();
            if code.contains('`') {
                format!("`` {} ``", code)
            } else {
                format!("`{}`", code)
            }
        }
        "pre" => render_pre(element),
        "a" => render_link(element, ctx),
        "img" => {
            let alt = element.value().attr("alt").unwrap_or_default();
            match element.value().attr("src") {
                Some(src) if !src.is_empty() => format!("![{}]({})", alt, src),
                _ => String::new(),
            }
        }
        "ul" | "ol" => render_list(element, ctx),
        "blockquote" => {
            let inner = render_children(element, ctx);
            let quoted = filter_excessive_newlines(&inner)
                .lines()
                .map(|line| {
                    if line.is_empty() {
                        ">".to_string()
                    } else {
                        format!("> {}", line)
                    }
                })
                .collect::<Vec<_>>()
                .join("\n");
            block(&quoted)
        }
        "table" => render_table(element, ctx),
        "li" => block(&format!("- {}", render_children(element, ctx).trim())),
        _ if BLOCK_TAGS.contains(&name) => block(&render_children(element, ctx)),
        _ => render_children(element, ctx),
    }
}

/// Text of every descendant outside skipped elements, without recursion
fn flat_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in element.descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let skipped = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| SKIP_TAGS.contains(&el.name()))
        });
        if !skipped {
            push_text(&mut out, text);
        }
    }
    out
}

fn block(inner: &str) -> String {
    let inner = inner.trim();
    if inner.is_empty() {
        String::new()
    } else {
        format!("\n\n{}\n\n", inner)
    }
}

/// Append text, collapsing whitespace runs to one space
fn push_text(out: &mut String, text: &str) {
    for c in text.chars() {
        if c.is_whitespace() {
            if !at_break(out) {
                out.push(' ');
            }
        } else {
            out.push(c);
        }
    }
}

/// Append rendered child output
fn push_piece(out: &mut String, piece: &str) {
    let piece = if at_break(out) {
        piece.trim_start_matches(' ')
    } else {
        piece
    };
    if piece.starts_with('\n') {
        while out.ends_with(' ') {
            out.pop();
        }
    }
    out.push_str(piece);
}

fn at_break(out: &str) -> bool {
    out.ends_with(' ') || out.ends_with('\n')
}

fn flatten(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Wrap inline content in a marker, keeping surrounding spaces outside it
fn wrap_inline(inner: &str, marker: &str) -> String {
    let core = inner.trim();
    if core.is_empty() {
        return inner.to_string();
    }
    let lead = if inner.starts_with(char::is_whitespace) { " " } else { "" };
    let trail = if inner.ends_with(char::is_whitespace) { " " } else { "" };
    format!("{}{}{}{}{}", lead, marker, core, marker, trail)
}

fn render_link(element: ElementRef<'_>, ctx: Context) -> String {
    let inner = render_children(element, ctx);
    let href = match element.value().attr("href") {
        Some(href) if !href.is_empty() => href,
        _ => return inner,
    };
    let text = flatten(&inner);
    if text.is_empty() {
        return String::new();
    }
    if text == href {
        return format!("<{}>", href);
    }

    let lead = if inner.starts_with(char::is_whitespace) { " " } else { "" };
    let trail = if inner.ends_with(char::is_whitespace) { " " } else { "" };
    match element.value().attr("title") {
        Some(title) if !title.is_empty() => format!(
            "{}[{}]({} \"{}\"){}",
            lead,
            text,
            href,
            title.replace('"', "\\\""),
            trail
        ),
        _ => format!("{}[{}]({}){}", lead, text, href, trail),
    }
}

fn render_pre(element: ElementRef<'_>) -> String {
    let code: String = element.text().collect();
    let language = element
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == "code")
        .chain(std::iter::once(element))
        .filter_map(|el| el.value().attr("class"))
        .flat_map(str::split_whitespace)
        .find_map(|class| {
            class
                .strip_prefix("language-")
                .or_else(|| class.strip_prefix("lang-"))
        })
        .unwrap_or_default()
        .to_string();
    format!(
        "\n\n```{}\n{}\n```\n\n",
        language,
        code.trim_matches('\n')
    )
}

fn render_list(element: ElementRef<'_>, ctx: Context) -> String {
    let ordered = element.value().name() == "ol";
    let mut number: usize = element
        .value()
        .attr("start")
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(1);
    let nested = Context {
        list_depth: ctx.list_depth + 1,
        ..ctx
    };

    let mut items = Vec::new();
    for item in element.children().filter_map(ElementRef::wrap) {
        let name = item.value().name();
        if name != "li" {
            // Stray nested lists directly inside ul/ol
            let rendered = render_element(item, nested);
            let rendered = rendered.trim();
            if !rendered.is_empty() {
                items.push(indent(rendered, "  "));
            }
            continue;
        }

        let marker = if ordered {
            let marker = format!("{}. ", number);
            number += 1;
            marker
        } else {
            "- ".to_string()
        };
        let body = filter_excessive_newlines(&render_children(item, nested));
        let continuation = " ".repeat(marker.len());
        let mut lines = body.lines();
        let mut rendered = format!("{}{}", marker, lines.next().unwrap_or_default());
        for line in lines {
            rendered.push('\n');
            if !line.is_empty() {
                rendered.push_str(&continuation);
                rendered.push_str(line);
            }
        }
        items.push(rendered);
    }

    if items.is_empty() {
        return String::new();
    }
    let list = items.join("\n");
    if ctx.list_depth > 0 {
        format!("\n{}\n", list)
    } else {
        format!("\n\n{}\n\n", list)
    }
}

fn indent(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{}{}", prefix, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_table(element: ElementRef<'_>, ctx: Context) -> String {
    let rows: Vec<Vec<String>> = element
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "tr")
        .map(|row| {
            row.children()
                .filter_map(ElementRef::wrap)
                .filter(|cell| matches!(cell.value().name(), "th" | "td"))
                .map(|cell| flatten(&render_children(cell, ctx)).replace('|', "\\|"))
                .collect::<Vec<_>>()
        })
        .filter(|cells| !cells.is_empty())
        .collect();

    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    if columns == 0 {
        return String::new();
    }

    let format_row = |cells: &[String]| {
        let mut line = String::from("|");
        for i in 0..columns {
            line.push(' ');
            line.push_str(cells.get(i).map(String::as_str).unwrap_or_default());
            line.push_str(" |");
        }
        line
    };

    let mut lines = Vec::with_capacity(rows.len() + 1);
    for (i, row) in rows.iter().enumerate() {
        lines.push(format_row(row));
        if i == 0 {
            lines.push(format!("|{}", " --- |".repeat(columns)));
        }
    }
    format!("\n\n{}\n\n", lines.join("\n"))
}

/// Collapse blank-line runs to a single blank line
///
/// Lines outside code fences lose trailing whitespace; whitespace-only lines
/// count as blank. Fenced code is copied verbatim.
pub fn filter_excessive_newlines(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_fence = false;
    let mut pending_blank = false;

    for line in s.lines() {
        let is_fence = line.trim_start().starts_with("```");
        if in_fence && !is_fence {
            out.push_str(line);
            out.push('\n');
            continue;
        }
        if is_fence {
            in_fence = !in_fence;
        }

        let line = line.trim_end();
        if line.is_empty() {
            pending_blank = !out.is_empty();
            continue;
        }
        if pending_blank {
            out.push('\n');
            pending_blank = false;
        }
        out.push_str(line);
        out.push('\n');
    }

    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_html_content() {
        assert!(is_html_content("<!DOCTYPE html><HTML><body>", "text/plain"));
        assert!(is_html_content("plain", "text/html; charset=utf-8"));
        assert!(is_html_content("plain", ""));
        assert!(!is_html_content("{\"json\": true}", "application/json"));
        assert!(!is_html_content("Hello world", "text/plain"));

        let late = format!("{}<html>", " ".repeat(250));
        assert!(!is_html_content(&late, "text/plain"));
    }

    #[test]
    fn test_atx_headings() {
        let md = html_to_markdown("<h1>Title</h1><h2>Sub title</h2><h6>Deep</h6>");
        assert_eq!(md, "# Title\n\n## Sub title\n\n###### Deep");
    }

    #[test]
    fn test_paragraphs_single_blank_line() {
        let md = html_to_markdown("<p>First</p>\n\n\n<p>Second</p><div><div><p>Third</p></div></div>");
        assert_eq!(md, "First\n\nSecond\n\nThird");
        assert!(!md.contains("\n\n\n"));
    }

    #[test]
    fn test_whitespace_collapsed() {
        let md = html_to_markdown("<p>  hello \n   <b>bold</b>   world  </p>");
        assert_eq!(md, "hello **bold** world");
    }

    #[test]
    fn test_autolinks() {
        let md = html_to_markdown(
            r#"<p>See <a href="https://sling.apache.org/">https://sling.apache.org/</a></p>"#,
        );
        assert_eq!(md, "See <https://sling.apache.org/>");
    }

    #[test]
    fn test_links() {
        let md = html_to_markdown(r#"<p>Read <a href="/docs/models.html">Sling Models</a> now</p>"#);
        assert_eq!(md, "Read [Sling Models](/docs/models.html) now");

        let md = html_to_markdown(r#"<a href="/x" title="Tip">Text</a>"#);
        assert_eq!(md, "[Text](/x \"Tip\")");

        let md = html_to_markdown(r#"<a name="anchor">Plain</a>"#);
        assert_eq!(md, "Plain");
    }

    #[test]
    fn test_no_escaping() {
        let md = html_to_markdown("<p>use *wildcards* and my_variable_name</p>");
        assert_eq!(md, "use *wildcards* and my_variable_name");
    }

    #[test]
    fn test_emphasis() {
        let md = html_to_markdown("<p><strong>bold</strong> and <em>italic</em></p>");
        assert_eq!(md, "**bold** and *italic*");
    }

    #[test]
    fn test_lists() {
        let md = html_to_markdown("<ul><li>Item 1</li><li>Item 2<ul><li>Nested</li></ul></li></ul>");
        assert_eq!(md, "- Item 1\n- Item 2\n  - Nested");

        let md = html_to_markdown(r#"<ol start="3"><li>Three</li><li>Four</li></ol>"#);
        assert_eq!(md, "3. Three\n4. Four");
    }

    #[test]
    fn test_code() {
        let md = html_to_markdown(
            "<p>Call <code>adaptTo()</code></p><pre><code class=\"language-java\">@Model\nclass A {\n\n\n}</code></pre>",
        );
        assert!(md.contains("Call `adaptTo()`"));
        assert!(md.contains("```java\n@Model\nclass A {\n\n\n}\n```"));
    }

    #[test]
    fn test_blockquote() {
        let md = html_to_markdown("<blockquote><p>Note one</p><p>Note two</p></blockquote>");
        assert_eq!(md, "> Note one\n>\n> Note two");
    }

    #[test]
    fn test_table() {
        let md = html_to_markdown(
            "<table><tr><th>Name</th><th>Type</th></tr><tr><td>path</td><td>String</td></tr></table>",
        );
        assert_eq!(
            md,
            "| Name | Type |\n| --- | --- |\n| path | String |"
        );
    }

    #[test]
    fn test_image_and_rule() {
        let md = html_to_markdown(r#"<p><img src="/a.png" alt="Diagram"></p><hr><p>After</p>"#);
        assert_eq!(md, "![Diagram](/a.png)\n\n---\n\nAfter");
    }

    #[test]
    fn test_entities_decoded() {
        let md = html_to_markdown("<p>Tom &amp; Jerry &lt;3 &quot;quoted&quot;</p>");
        assert_eq!(md, "Tom & Jerry <3 \"quoted\"");
    }

    #[test]
    fn test_skips_script() {
        let md = html_to_markdown("<p>Before</p><script>alert('bad');</script><p>After</p>");
        assert_eq!(md, "Before\n\nAfter");
    }

    #[test]
    fn test_filter_excessive_newlines() {
        assert_eq!(filter_excessive_newlines("line1\n\n\n\n\nline2"), "line1\n\nline2");
        assert_eq!(filter_excessive_newlines("a   \n \n\t\nb"), "a\n\nb");
        assert_eq!(
            filter_excessive_newlines("```\nx\n\n\n\ny  \n```"),
            "```\nx\n\n\n\ny  \n```"
        );
    }

    #[test]
    fn test_markdown_from_html_main_only() {
        let html = r#"<html><body>
            <nav>Menu entries</nav>
            <header>Header text</header>
            <main><h1>T</h1><p>Welcome to the documentation.</p></main>
            <footer>Footer text</footer>
        </body></html>"#;
        let md = markdown_from_html(html).unwrap();
        assert!(md.contains("# T"));
        assert!(!md.contains("Menu entries"));
        assert!(!md.contains("Header text"));
        assert!(!md.contains("Footer text"));
    }

    #[test]
    fn test_deeply_nested_markup_flattened() {
        let depth = 3000;
        let html = format!(
            "<html><body><main>{}<p>Deep content here</p><script>hidden()</script>{}</main></body></html>",
            "<div>".repeat(depth),
            "</div>".repeat(depth)
        );
        let md = markdown_from_html(&html).unwrap();
        assert_eq!(md, "Deep content here");
    }

    #[test]
    fn test_structure_kept_below_depth_limit() {
        let html = format!(
            "{}<h2>Inner</h2><ul><li>Item</li></ul>{}",
            "<div>".repeat(MAX_RENDER_DEPTH - 4),
            "</div>".repeat(MAX_RENDER_DEPTH - 4)
        );
        assert_eq!(html_to_markdown(&html), "## Inner\n\n- Item");
    }

    #[test]
    fn test_markdown_from_html_too_short() {
        let html = "<html><body><main><p>Hi</p></main></body></html>";
        assert_eq!(markdown_from_html(html), Err(ExtractionError::TooShort));
        assert_eq!(markdown_from_html(""), Err(ExtractionError::EmptyHtml));
    }
}
