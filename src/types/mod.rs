//! Core types for the research pipeline: topics, sources, synthesis
//! results, reports, and the crate-wide error taxonomy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============= Topic =============

/// Maximum topic length in characters, after trimming.
pub const MAX_TOPIC_LEN: usize = 500;

/// A validated research topic.
///
/// The only required pipeline input. Construction trims surrounding
/// whitespace and rejects empty or over-long strings before any network
/// activity happens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Topic(String);

impl Topic {
    /// Validate and construct a topic from raw user input.
    pub fn new(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ResearchError::EmptyTopic);
        }
        if trimmed.chars().count() > MAX_TOPIC_LEN {
            return Err(ResearchError::TopicTooLong {
                length: trimmed.chars().count(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercased topic words usable as relevance keywords.
    ///
    /// Very short words (articles, prepositions) carry no signal and are
    /// dropped.
    pub fn keywords(&self) -> Vec<String> {
        self.0
            .to_lowercase()
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
            .filter(|w| w.chars().count() > 2)
            .collect()
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ============= Search Types =============

/// A single candidate result returned by the search capability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub url: String,
    pub title: String,
    pub snippet: String,
}

// ============= Extraction Types =============

/// Outcome of one extraction attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceStatus {
    /// Body text was extracted successfully.
    Ok,
    /// The fetch or extraction failed; `failure_reason` explains why.
    Failed,
    /// The source was rejected before extraction completed (non-text
    /// content, insufficient content).
    Skipped,
}

/// The extracted content of one candidate source.
///
/// One of these exists per attempted [`SearchHit`]; it is never mutated
/// after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedSource {
    pub url: String,
    pub title: String,
    /// Cleaned body text, bounded by the configured content length.
    pub body_text: String,
    pub fetched_at: DateTime<Utc>,
    pub status: SourceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

impl ExtractedSource {
    pub fn ok(url: String, title: String, body_text: String) -> Self {
        Self {
            url,
            title,
            body_text,
            fetched_at: Utc::now(),
            status: SourceStatus::Ok,
            failure_reason: None,
        }
    }

    pub fn failed(url: String, title: String, reason: String) -> Self {
        Self {
            url,
            title,
            body_text: String::new(),
            fetched_at: Utc::now(),
            status: SourceStatus::Failed,
            failure_reason: Some(reason),
        }
    }

    pub fn skipped(url: String, title: String, reason: String) -> Self {
        Self {
            url,
            title,
            body_text: String::new(),
            fetched_at: Utc::now(),
            status: SourceStatus::Skipped,
            failure_reason: Some(reason),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == SourceStatus::Ok
    }
}

/// An extracted source with its relevance score and citation number.
///
/// Citation ids are 1-based and assigned in ranked order, so citation 1 is
/// always the highest-ranked source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedSource {
    #[serde(flatten)]
    pub source: ExtractedSource,
    pub relevance_score: f64,
    pub citation_id: usize,
}

// ============= Synthesis Types =============

/// The immutable input to one language-model synthesis call.
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    pub topic: Topic,
    pub sources: Vec<RankedSource>,
    pub prompt: String,
}

/// One section of a synthesized report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSection {
    pub heading: String,
    pub body: String,
}

/// The parsed, schema-validated model response.
///
/// `citations` maps every citation id used in the section bodies to the
/// URL of the source it refers to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisResult {
    pub sections: Vec<ReportSection>,
    pub citations: BTreeMap<usize, String>,
}

// ============= Report =============

/// The terminal artifact of one pipeline run.
///
/// Bibliography ordering matches the ranked order used during synthesis,
/// so citation numbers in rendered output line up with bibliography
/// positions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub topic: Topic,
    pub generated_at: DateTime<Utc>,
    pub synthesis: SynthesisResult,
    pub bibliography: Vec<RankedSource>,
}

// ============= Error Types =============

/// Crate-wide error taxonomy.
///
/// Per-source extraction failures are represented as values
/// ([`SourceStatus::Failed`]) and never appear here; every variant below
/// halts the run.
#[derive(Debug, thiserror::Error)]
pub enum ResearchError {
    #[error("topic must not be empty")]
    EmptyTopic,

    #[error("topic is {length} characters, maximum is {MAX_TOPIC_LEN}")]
    TopicTooLong { length: usize },

    #[error("search failed: {0}")]
    Search(String),

    #[error("only {found} usable sources after ranking, minimum is {required}")]
    InsufficientSources { found: usize, required: usize },

    #[error("synthesis transport error: {0}")]
    SynthesisTransport(String),

    #[error("synthesis authorization error: {0}")]
    SynthesisAuth(String),

    #[error("synthesis rate limited: {0}")]
    SynthesisRateLimit(String),

    #[error("synthesis parse error: {0}")]
    SynthesisParse(String),

    #[error("assembly invariant violated: {0}")]
    AssemblyInvariant(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("run cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, ResearchError>;
