//! Gemini language-model client.
//!
//! Talks to the Google generative language REST API. Error responses are
//! classified into the crate taxonomy so the synthesis stage can decide
//! what is retryable: 401/403 and invalid-key 400s are authorization
//! failures, 429 is rate limiting, and everything else network-shaped is
//! transport.

use crate::llm::client::LanguageModel;
use crate::types::{ResearchError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Client for the Gemini generateContent API.
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GeminiClient {
    /// Create a client against the production API endpoint.
    pub fn new(api_key: String, model: String, request_timeout: Duration) -> Result<Self> {
        Self::with_base_url(api_key, model, request_timeout, DEFAULT_BASE_URL.to_string())
    }

    /// Create a client against a custom endpoint, used by tests.
    pub fn with_base_url(
        api_key: String,
        model: String,
        request_timeout: Duration,
        base_url: String,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| {
                ResearchError::SynthesisTransport(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    async fn send(&self, prompt: &str, max_output_tokens: Option<u32>) -> Result<String> {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: max_output_tokens
                .map(|max| GenerationConfig {
                    max_output_tokens: max,
                }),
        };

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ResearchError::SynthesisTransport("request timed out".to_string())
                } else {
                    ResearchError::SynthesisTransport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_error(status.as_u16(), &body));
        }

        let parsed: GenerateResponse = response.json().await.map_err(|e| {
            ResearchError::SynthesisTransport(format!("unexpected response shape: {e}"))
        })?;

        let text: String = parsed
            .candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(ResearchError::SynthesisTransport(
                "response contained no candidates".to_string(),
            ));
        }

        Ok(text)
    }
}

/// Map a non-success HTTP status onto the error taxonomy.
fn classify_error(status: u16, body: &str) -> ResearchError {
    let snippet: String = body.chars().take(200).collect();
    match status {
        401 | 403 => ResearchError::SynthesisAuth(format!("status {status}: {snippet}")),
        400 if body.contains("API_KEY_INVALID") || body.contains("API key not valid") => {
            ResearchError::SynthesisAuth(format!("invalid API key: {snippet}"))
        }
        429 => ResearchError::SynthesisRateLimit(format!("status 429: {snippet}")),
        _ => ResearchError::SynthesisTransport(format!("status {status}: {snippet}")),
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.send(prompt, None).await
    }

    async fn verify_credentials(&self) -> Result<()> {
        // Minimal paid-for request: a few tokens is enough to prove the
        // key works.
        self.send("Reply with OK.", Some(10)).await.map(|_| ())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
