//! HTML readability: boilerplate removal and main-content extraction.
//!
//! Turns raw HTML into clean text suitable for relevance scoring and
//! prompt assembly. Non-content elements are removed before parsing, the
//! main content area is located by selector priority, and the result is
//! truncated to a budget at a sentence or paragraph boundary rather than
//! mid-word.

use scraper::{Html, Selector};
use text_splitter::TextSplitter;

/// Elements whose entire subtree is noise.
const NOISE_TAGS: &[&str] = &[
    "script", "style", "nav", "footer", "header", "aside", "noscript", "svg", "iframe",
];

/// Content-area selectors tried in priority order before falling back to
/// the whole body.
const CONTENT_SELECTORS: &[&str] = &[
    "article",
    "main",
    "[role=\"main\"]",
    "div.content",
    "div.article-body",
    "body",
];

/// Extracted page text plus the document title, if present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    pub title: String,
    pub body: String,
}

/// Extract readable text from an HTML document.
///
/// Returns `None` when the document contains no extractable text at all
/// (scripts-only pages, empty bodies).
pub fn extract_page_text(html: &str) -> Option<PageText> {
    let pruned = remove_noise(html);
    let document = Html::parse_document(&pruned);

    let title = document_title(&document);
    let body = collapse_whitespace(&main_content(&document));
    if body.is_empty() {
        return None;
    }

    Some(PageText { title, body })
}

/// Truncate `text` to at most `limit` characters, cutting at the largest
/// sentence/paragraph boundary that fits.
pub fn truncate_at_boundary(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let splitter = TextSplitter::new(limit);
    let chunk = splitter
        .chunks(text)
        .next()
        .unwrap_or_default()
        .trim_end()
        .to_string();
    chunk
}

fn document_title(document: &Html) -> String {
    let Ok(selector) = Selector::parse("title") else {
        return String::new();
    };
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>())
        .unwrap_or_default()
        .trim()
        .to_string()
}

fn main_content(document: &Html) -> String {
    for raw in CONTENT_SELECTORS {
        let Ok(selector) = Selector::parse(raw) else {
            continue;
        };
        if let Some(element) = document.select(&selector).next() {
            let text = element.text().collect::<Vec<_>>().join(" ");
            if !text.trim().is_empty() {
                return text;
            }
        }
    }
    String::new()
}

/// Delete every noise element together with its content.
///
/// scraper exposes no mutable DOM, so noise subtrees are cut out of the
/// raw markup before parsing. Matching is case-insensitive and verifies
/// the tag name ends at the match (so `nav` never matches `navigate`).
fn remove_noise(html: &str) -> String {
    let mut result = html.to_string();
    for tag in NOISE_TAGS {
        result = remove_tag(&result, tag);
    }
    result
}

fn remove_tag(html: &str, tag: &str) -> String {
    // ASCII lowering keeps byte offsets aligned with the original input.
    let lower = html.to_ascii_lowercase();
    let open = format!("<{tag}");
    let close = format!("</{tag}>");
    let mut out = String::with_capacity(html.len());
    let mut cursor = 0;

    while let Some(rel) = lower[cursor..].find(&open) {
        let start = cursor + rel;
        let name_end = start + open.len();

        // Only a whole-tag match counts; `<navbar>` is not `<nav>`.
        let is_tag_boundary = lower[name_end..]
            .chars()
            .next()
            .is_none_or(|c| c.is_whitespace() || c == '>' || c == '/');
        if !is_tag_boundary {
            out.push_str(&html[cursor..name_end]);
            cursor = name_end;
            continue;
        }

        out.push_str(&html[cursor..start]);

        cursor = match lower[start..].find(&close) {
            Some(rel_close) => start + rel_close + close.len(),
            // Unclosed: drop through the end of the opening tag only.
            None => match lower[start..].find('>') {
                Some(rel_gt) => start + rel_gt + 1,
                None => html.len(),
            },
        };
    }

    out.push_str(&html[cursor..]);
    out
}

/// Collapse runs of spaces and limit consecutive blank lines to one.
fn collapse_whitespace(text: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    for raw_line in text.lines() {
        let collapsed = raw_line.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            if lines.last().is_some_and(|l| l.is_empty()) {
                continue;
            }
            if !lines.is_empty() {
                lines.push(String::new());
            }
        } else {
            lines.push(collapsed);
        }
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}
