//! # S.A.G.E - Search, Assess, Generate, Export
//!
//! An automated research pipeline built in Rust: given a natural-language
//! topic, S.A.G.E discovers candidate web sources, extracts and filters
//! their content, asks a generative language model to synthesize a
//! structured report, and renders that report to portable documents.
//!
//! ## Overview
//!
//! S.A.G.E can be used in two ways:
//!
//! 1. **As a standalone CLI** - Run the `sage` binary
//! 2. **As a library** - Import the pipeline into your own Rust project
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use sage::pipeline::{ResearchPipeline, RunContext};
//! use sage::extract::HttpPageFetcher;
//! use sage::llm::GeminiClient;
//! use sage::search::DaedraProvider;
//! use sage::utils::ResearchConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ResearchConfig::load("sage.toml")?;
//!     let model = GeminiClient::new(
//!         config.synthesis.api_key()?,
//!         config.synthesis.model.clone(),
//!         std::time::Duration::from_secs(config.synthesis.request_timeout_secs),
//!     )?;
//!     let pages = HttpPageFetcher::new(config.extraction.per_source_timeout())?;
//!
//!     let pipeline = ResearchPipeline::new(DaedraProvider::new(), pages, model, config);
//!     let report = pipeline.run("solid state batteries", &RunContext::new()).await?;
//!     println!("{} sources cited", report.bibliography.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! One run moves through fixed stages: Searching, Extracting (concurrent
//! per source, failures isolated), Ranking, Synthesizing, Assembling.
//! Capability boundaries (search backend, page fetching, the language
//! model, and report rendering) are traits, so every external service can
//! be substituted in tests or replaced outright.
//!
//! ## Modules
//!
//! - [`search`] - Source discovery and query planning
//! - [`extract`] - Concurrent content extraction with politeness limits
//! - [`rank`] - Relevance scoring and source selection
//! - [`llm`] - Language-model clients
//! - [`synthesis`] - Prompt assembly and strict response parsing
//! - [`report`] - Citation-checked report assembly
//! - [`render`] - Markdown and HTML renderers
//! - [`pipeline`] - The staged orchestrator
//! - [`types`] - Common types and error handling

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

/// CLI argument parsing and terminal output.
pub mod cli;
/// Concurrent content extraction and the page-fetch boundary.
pub mod extract;
/// Language-model clients and abstractions.
pub mod llm;
/// Pipeline orchestration and progress reporting.
pub mod pipeline;
/// Relevance scoring and source selection.
pub mod rank;
/// Report rendering (Markdown, HTML).
pub mod render;
/// Citation-checked report assembly.
pub mod report;
/// Source discovery: search providers and query planning.
pub mod search;
/// Prompt assembly and model-response parsing.
pub mod synthesis;
/// Core types (sources, reports, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;

// Re-export commonly used types
pub use extract::{ContentExtractor, HttpPageFetcher, PageFetcher};
pub use llm::{GeminiClient, LanguageModel};
pub use pipeline::{ProgressUpdate, ResearchPipeline, RunContext, Stage};
pub use rank::SourceRanker;
pub use render::{HtmlRenderer, MarkdownRenderer, ReportRenderer};
pub use search::{DaedraProvider, SearchProvider, SourceFetcher};
pub use synthesis::SynthesisRequestor;
pub use types::{Report, ResearchError, Result, Topic};
pub use utils::ResearchConfig;
