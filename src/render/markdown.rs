//! Markdown report renderer.

use crate::render::ReportRenderer;
use crate::types::{Report, Result};

/// Renders a report as a self-contained Markdown document: title block,
/// the synthesized sections, and a numbered bibliography whose positions
/// match the inline citation markers.
pub struct MarkdownRenderer;

impl ReportRenderer for MarkdownRenderer {
    fn render(&self, report: &Report) -> Result<String> {
        let mut doc = String::new();

        doc.push_str(&format!("# {}\n\n", report.topic));
        doc.push_str(&format!(
            "*Generated {} from {} sources*\n\n---\n\n",
            report.generated_at.format("%B %e, %Y at %H:%M UTC"),
            report.bibliography.len(),
        ));

        for section in &report.synthesis.sections {
            doc.push_str(&format!("## {}\n\n{}\n\n", section.heading, section.body));
        }

        doc.push_str("## Sources\n\n");
        for entry in &report.bibliography {
            doc.push_str(&format!(
                "{}. [{}]({})\n",
                entry.citation_id, entry.source.title, entry.source.url,
            ));
        }

        Ok(doc)
    }

    fn extension(&self) -> &'static str {
        "md"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::tests::sample_report;

    #[test]
    fn renders_title_and_sections() {
        let doc = MarkdownRenderer.render(&sample_report()).unwrap();
        assert!(doc.starts_with("# Climate change solutions 2024"));
        assert!(doc.contains("## Summary"));
        assert!(doc.contains("Key findings [1][2]."));
        assert!(doc.contains("## Detailed Analysis"));
    }

    #[test]
    fn bibliography_is_numbered_in_citation_order() {
        let doc = MarkdownRenderer.render(&sample_report()).unwrap();
        let first = doc.find("1. [First Report](https://a.example.com/report)").unwrap();
        let second = doc.find("2. [Second Study](https://b.example.com/study)").unwrap();
        assert!(first < second);
    }

    #[test]
    fn metadata_line_counts_sources() {
        let doc = MarkdownRenderer.render(&sample_report()).unwrap();
        assert!(doc.contains("from 2 sources"));
    }

    #[test]
    fn extension_is_md() {
        assert_eq!(MarkdownRenderer.extension(), "md");
    }
}
