//! Report synthesis: prompt assembly, model invocation with bounded
//! retry, and strict response parsing.

pub mod parser;
pub mod prompt;

pub use prompt::{build_request, SECTION_HEADINGS};

use crate::llm::LanguageModel;
use crate::types::{RankedSource, ResearchError, Result, SynthesisResult, Topic};
use rand::Rng;
use std::time::Duration;

/// Base delay for the first retry; subsequent retries double it.
const BACKOFF_BASE: Duration = Duration::from_millis(500);

/// Invokes the language model and parses its response.
///
/// Transport and rate-limit failures are retried with exponential backoff
/// up to `retry_count` times. Authorization failures and parse failures
/// are surfaced immediately: the first because retrying cannot help, the
/// second because another model call is expensive and unlikely to change
/// the outcome.
pub struct SynthesisRequestor<M> {
    model: M,
    retry_count: u32,
}

impl<M: LanguageModel> SynthesisRequestor<M> {
    pub fn new(model: M, retry_count: u32) -> Self {
        Self { model, retry_count }
    }

    /// Synthesize a structured report from the ranked sources.
    pub async fn synthesize(
        &self,
        topic: &Topic,
        sources: Vec<RankedSource>,
    ) -> Result<SynthesisResult> {
        let request = prompt::build_request(topic, sources);
        tracing::debug!(
            model = self.model.model_name(),
            prompt_chars = request.prompt.chars().count(),
            sources = request.sources.len(),
            "invoking synthesis"
        );

        let raw = self.generate_with_retry(&request.prompt).await?;
        parser::parse_response(&raw, &request.sources)
    }

    async fn generate_with_retry(&self, prompt: &str) -> Result<String> {
        let mut attempt = 0u32;
        loop {
            match self.model.generate(prompt).await {
                Ok(text) => return Ok(text),
                Err(e) if attempt < self.retry_count && is_retryable(&e) => {
                    let delay = backoff_delay(attempt);
                    tracing::warn!(
                        attempt = attempt + 1,
                        max = self.retry_count,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "synthesis call failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn is_retryable(error: &ResearchError) -> bool {
    matches!(
        error,
        ResearchError::SynthesisTransport(_) | ResearchError::SynthesisRateLimit(_)
    )
}

/// Exponential backoff with ±25% jitter.
fn backoff_delay(attempt: u32) -> Duration {
    let base = BACKOFF_BASE.as_millis() as u64 * 2u64.pow(attempt);
    let jitter = rand::rng().random_range(0.75..=1.25);
    Duration::from_millis((base as f64 * jitter) as u64)
}
