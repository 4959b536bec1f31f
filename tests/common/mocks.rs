//! Mock implementations for testing.
//!
//! This module provides mock search, page-fetch, and language-model
//! capabilities that can be used across different test files without
//! duplication.

use async_trait::async_trait;
use parking_lot::Mutex;
use sage::extract::{FetchError, FetchedPage, PageFetcher};
use sage::llm::LanguageModel;
use sage::search::SearchProvider;
use sage::types::{ResearchError, Result, SearchHit};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Search provider returning a fixed hit list, counting calls.
pub struct MockSearchProvider {
    hits: Vec<SearchHit>,
    calls: AtomicUsize,
}

impl MockSearchProvider {
    pub fn new(hits: Vec<SearchHit>) -> Self {
        Self {
            hits,
            calls: AtomicUsize::new(0),
        }
    }

    /// Generate `n` distinct, well-formed hits.
    pub fn with_hits(n: usize) -> Self {
        let hits = (0..n)
            .map(|i| SearchHit {
                url: format!("https://site{i}.example.com/article"),
                title: format!("Article {i}: a sufficiently descriptive title"),
                snippet: "a relevant snippet".into(),
            })
            .collect();
        Self::new(hits)
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchProvider for MockSearchProvider {
    async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<SearchHit>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.hits.clone())
    }
}

/// Page fetcher with per-URL behaviors keyed by substrings:
/// - `fail` in the URL: transport error
/// - `hang` in the URL: sleeps for an hour (to exercise timeouts)
/// - `binary` in the URL: returns a PDF content type
/// - anything else: a well-formed article page
pub struct MockPageFetcher {
    body_text: String,
}

impl MockPageFetcher {
    pub fn new() -> Self {
        Self {
            body_text: "Substantive discussion of the research subject, long enough \
                        to clear the minimum extraction threshold. "
                .repeat(8),
        }
    }
}

#[async_trait]
impl PageFetcher for MockPageFetcher {
    async fn fetch_page(&self, url: &str) -> std::result::Result<FetchedPage, FetchError> {
        if url.contains("fail") {
            return Err(FetchError::Transport("connection refused".into()));
        }
        if url.contains("hang") {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        if url.contains("binary") {
            return Ok(FetchedPage {
                content_type: "application/pdf".into(),
                body: vec![0x25, 0x50, 0x44, 0x46],
            });
        }
        let html = format!(
            "<html><head><title>Mock Page</title></head>\
             <body><article>{}</article></body></html>",
            self.body_text
        );
        Ok(FetchedPage {
            content_type: "text/html".into(),
            body: html.into_bytes(),
        })
    }
}

/// Language model returning scripted responses, one per call.
pub struct MockLanguageModel {
    responses: Mutex<Vec<Result<String>>>,
    calls: AtomicUsize,
}

impl MockLanguageModel {
    pub fn new(responses: Vec<Result<String>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            calls: AtomicUsize::new(0),
        }
    }

    /// A model that always answers with a schema-valid report citing [1].
    pub fn valid() -> Self {
        Self::new(vec![Ok(valid_report_response(&[1]))])
    }
}

#[async_trait]
impl LanguageModel for MockLanguageModel {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut responses = self.responses.lock();
        if responses.is_empty() {
            return Err(ResearchError::SynthesisTransport(
                "mock script exhausted".into(),
            ));
        }
        responses.remove(0)
    }

    async fn verify_credentials(&self) -> Result<()> {
        Ok(())
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// A schema-valid model response citing the given source numbers.
pub fn valid_report_response(citations: &[usize]) -> String {
    let markers: String = citations.iter().map(|id| format!("[{id}]")).collect();
    format!(
        "## Summary\nKey findings {markers}.\n\n\
         ## Detailed Analysis\nDeeper analysis of the evidence {markers}.\n\n\
         ## Applications\nPractical applications {markers}.\n\n\
         ## Future Outlook\nLikely developments {markers}."
    )
}
