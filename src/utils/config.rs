//! TOML-based configuration for S.A.G.E.
//!
//! Declarative configuration for the research pipeline via a TOML file
//! (`sage.toml`). Every field has a default, so an empty file (or no file
//! at all) yields a working configuration. Secrets are never stored in the
//! file itself: the model API key is referenced by environment variable
//! name and resolved at run time.

use crate::types::{ResearchError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

/// Root configuration structure loaded from sage.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResearchConfig {
    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub extraction: ExtractionConfig,

    #[serde(default)]
    pub ranking: RankingConfig,

    #[serde(default)]
    pub synthesis: SynthesisConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

// ============= Search Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum candidate results gathered across all query strategies.
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_max_results() -> usize {
    20
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
        }
    }
}

// ============= Extraction Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Per-source character cap on extracted body text.
    #[serde(default = "default_content_length")]
    pub content_length: usize,

    /// Extractions shorter than this are skipped as insufficient.
    #[serde(default = "default_min_content_length")]
    pub min_content_length: usize,

    /// Per-source fetch timeout in seconds.
    #[serde(default = "default_per_source_timeout_secs")]
    pub per_source_timeout_secs: u64,

    /// Maximum concurrent extraction workers.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Minimum delay between requests to the same host, in milliseconds.
    #[serde(default = "default_per_host_interval_ms")]
    pub per_host_interval_ms: u64,
}

fn default_content_length() -> usize {
    8000
}

fn default_min_content_length() -> usize {
    150
}

fn default_per_source_timeout_secs() -> u64 {
    15
}

fn default_concurrency() -> usize {
    4
}

fn default_per_host_interval_ms() -> u64 {
    300
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            content_length: default_content_length(),
            min_content_length: default_min_content_length(),
            per_source_timeout_secs: default_per_source_timeout_secs(),
            concurrency: default_concurrency(),
            per_host_interval_ms: default_per_host_interval_ms(),
        }
    }
}

impl ExtractionConfig {
    pub fn per_source_timeout(&self) -> Duration {
        Duration::from_secs(self.per_source_timeout_secs)
    }

    pub fn per_host_interval(&self) -> Duration {
        Duration::from_millis(self.per_host_interval_ms)
    }
}

// ============= Ranking Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Number of top-ranked sources passed to synthesis.
    #[serde(default = "default_max_sources")]
    pub max_sources: usize,

    /// Minimum qualifying sources for the run to proceed.
    #[serde(default = "default_min_sources")]
    pub min_sources: usize,

    /// Total character budget across all selected sources.
    #[serde(default = "default_total_content_budget")]
    pub total_content_budget: usize,
}

fn default_max_sources() -> usize {
    8
}

fn default_min_sources() -> usize {
    1
}

fn default_total_content_budget() -> usize {
    40_000
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            max_sources: default_max_sources(),
            min_sources: default_min_sources(),
            total_content_budget: default_total_content_budget(),
        }
    }
}

// ============= Synthesis Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisConfig {
    /// Model identifier sent to the generative API.
    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable name containing the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Retries for transport-class synthesis failures.
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Request timeout for one synthesis call, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_retry_count() -> u32 {
    2
}

fn default_request_timeout_secs() -> u64 {
    120
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key_env: default_api_key_env(),
            retry_count: default_retry_count(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl SynthesisConfig {
    /// Resolve the API key from the configured environment variable.
    pub fn api_key(&self) -> Result<String> {
        env::var(&self.api_key_env).map_err(|_| {
            ResearchError::Config(format!(
                "environment variable {} is not set",
                self.api_key_env
            ))
        })
    }
}

// ============= Output Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory for rendered report files.
    #[serde(default = "default_output_dir")]
    pub dir: String,
}

fn default_output_dir() -> String {
    "reports".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

// ============= Loading and Validation =============

impl ResearchConfig {
    /// Load configuration from a TOML file.
    ///
    /// A missing file yields the default configuration; a present but
    /// malformed file is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|e| ResearchError::Config(format!("failed to read {}: {e}", path.display())))?;
        let config: Self = toml::from_str(&raw)
            .map_err(|e| ResearchError::Config(format!("failed to parse {}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate cross-field constraints that serde defaults cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.search.max_results == 0 {
            return Err(ResearchError::Config("search.max_results must be > 0".into()));
        }
        if self.ranking.max_sources == 0 {
            return Err(ResearchError::Config("ranking.max_sources must be > 0".into()));
        }
        if self.ranking.min_sources == 0 || self.ranking.min_sources > self.ranking.max_sources {
            return Err(ResearchError::Config(
                "ranking.min_sources must be between 1 and ranking.max_sources".into(),
            ));
        }
        if self.extraction.concurrency == 0 {
            return Err(ResearchError::Config(
                "extraction.concurrency must be > 0".into(),
            ));
        }
        if self.extraction.per_source_timeout_secs == 0 {
            return Err(ResearchError::Config(
                "extraction.per_source_timeout_secs must be > 0".into(),
            ));
        }
        if self.extraction.content_length <= self.extraction.min_content_length {
            return Err(ResearchError::Config(
                "extraction.content_length must exceed extraction.min_content_length".into(),
            ));
        }
        if self.synthesis.model.is_empty() {
            return Err(ResearchError::Config("synthesis.model must not be empty".into()));
        }
        Ok(())
    }
}
