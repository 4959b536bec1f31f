//! Report rendering boundary.
//!
//! Renderers consume an assembled [`Report`] and produce a document. The
//! pipeline core never depends on a concrete renderer; anything
//! implementing [`ReportRenderer`] (including an external PDF engine) can
//! sit behind this trait. The built-in implementations render Markdown
//! and a standalone printable HTML document.

pub mod html;
pub mod markdown;

pub use html::HtmlRenderer;
pub use markdown::MarkdownRenderer;

use crate::types::{Report, ResearchError, Result};
use std::path::{Path, PathBuf};

/// Rendering capability: report in, document out.
pub trait ReportRenderer {
    /// Render the report to a complete document.
    fn render(&self, report: &Report) -> Result<String>;

    /// File extension for this renderer's output, without the dot.
    fn extension(&self) -> &'static str;
}

/// Characters that are unsafe in filenames on common filesystems.
const INVALID_FILENAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Maximum filename stem length in characters.
const MAX_FILENAME_LEN: usize = 200;

/// Derive a safe filename stem from a topic.
///
/// Unsafe characters become underscores, runs of underscores collapse to
/// one, and the result is length-capped. An empty result falls back to a
/// generic stem.
pub fn sanitize_topic_filename(topic: &str) -> String {
    let mut stem = String::with_capacity(topic.len());
    let mut last_was_underscore = false;
    for c in topic.trim().chars() {
        let mapped = if INVALID_FILENAME_CHARS.contains(&c) || c.is_control() {
            '_'
        } else {
            c
        };
        if mapped == '_' {
            if !last_was_underscore {
                stem.push('_');
            }
            last_was_underscore = true;
        } else {
            stem.push(mapped);
            last_was_underscore = false;
        }
    }

    let stem: String = stem
        .trim_matches('_')
        .chars()
        .take(MAX_FILENAME_LEN)
        .collect();

    if stem.is_empty() {
        "research_report".to_string()
    } else {
        stem
    }
}

/// Render a report and write it into `dir`, returning the file path.
pub fn write_report(
    report: &Report,
    renderer: &dyn ReportRenderer,
    dir: impl AsRef<Path>,
) -> Result<PathBuf> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)
        .map_err(|e| ResearchError::Render(format!("failed to create {}: {e}", dir.display())))?;

    let filename = format!(
        "{}.{}",
        sanitize_topic_filename(report.topic.as_str()),
        renderer.extension()
    );
    let path = dir.join(filename);

    let document = renderer.render(report)?;
    std::fs::write(&path, document)
        .map_err(|e| ResearchError::Render(format!("failed to write {}: {e}", path.display())))?;

    tracing::info!(path = %path.display(), "report written");
    Ok(path)
}
