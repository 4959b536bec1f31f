//! HTML report renderer.
//!
//! Renders the Markdown document to a standalone HTML file with embedded
//! print styles. This is the portable, printable output; a dedicated PDF
//! engine would implement [`ReportRenderer`] the same way.

use crate::render::{MarkdownRenderer, ReportRenderer};
use crate::types::{Report, Result};
use pulldown_cmark::{html, Options, Parser};

const STYLE: &str = r#"
body { font-family: Georgia, 'Times New Roman', serif; max-width: 48rem;
       margin: 2rem auto; padding: 0 1rem; line-height: 1.6; color: #1a1a2e; }
h1 { border-bottom: 2px solid #2980b9; padding-bottom: 0.3rem; }
h2 { color: #2980b9; margin-top: 2rem; }
a { color: #2980b9; }
em { color: #555; }
@media print { body { margin: 0; max-width: none; } a { color: inherit; } }
"#;

/// Renders a report as a self-contained HTML document.
pub struct HtmlRenderer;

impl ReportRenderer for HtmlRenderer {
    fn render(&self, report: &Report) -> Result<String> {
        let markdown = MarkdownRenderer.render(report)?;

        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        let parser = Parser::new_ext(&markdown, options);

        let mut body = String::new();
        html::push_html(&mut body, parser);

        Ok(format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}</body>\n</html>\n",
            title = html_escape(report.topic.as_str()),
        ))
    }

    fn extension(&self) -> &'static str {
        "html"
    }
}

fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
