//! Source discovery: search capability trait, query planning, URL
//! normalisation, and candidate filtering.
//!
//! The [`SourceFetcher`] runs a [`QueryPlan`] against a pluggable
//! [`SearchProvider`], deduplicates candidates by normalised URL, drops
//! known low-quality sources, and orders priority-domain hits first.

pub mod provider;
pub mod query;

pub use provider::DaedraProvider;
pub use query::{QueryPlan, TopicCategory};

use crate::types::{ResearchError, Result, SearchHit, Topic};
use async_trait::async_trait;
use std::collections::HashSet;
use url::Url;

/// Search capability boundary.
///
/// Implementations wrap a concrete search backend. Transport failures are
/// surfaced as errors; the [`SourceFetcher`] decides how they combine
/// across query strategies.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Run one query and return up to `limit` results.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>>;
}

#[async_trait]
impl<T: SearchProvider + ?Sized> SearchProvider for std::sync::Arc<T> {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        (**self).search(query, limit).await
    }
}

/// Domains that consistently yield unusable extraction results.
const LOW_QUALITY_DOMAINS: &[&str] = &[
    "pinterest.com",
    "instagram.com",
    "facebook.com",
    "twitter.com",
    "x.com",
    "tiktok.com",
    "reddit.com",
];

/// Normalise a URL to its deduplication key: lowercased scheme and host
/// plus path, with the trailing slash stripped and query/fragment ignored.
///
/// Returns `None` for unparsable or non-http(s) URLs.
pub fn normalize_url(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    let host = parsed.host_str()?.to_lowercase();
    let path = parsed.path().trim_end_matches('/');
    Some(format!("{}://{}{}", parsed.scheme(), host, path))
}

/// Whether a candidate should be dropped before extraction is attempted.
fn should_skip(hit: &SearchHit) -> bool {
    let url_lower = hit.url.to_lowercase();
    if LOW_QUALITY_DOMAINS.iter().any(|d| url_lower.contains(d)) {
        return true;
    }
    let title = hit.title.trim();
    if title.chars().count() < 10 {
        return true;
    }
    matches!(
        title.to_lowercase().as_str(),
        "no title" | "untitled" | "page not found"
    )
}

/// Runs the query plan and produces the deduplicated candidate set.
pub struct SourceFetcher<P> {
    provider: P,
}

impl<P: SearchProvider> SourceFetcher<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Discover candidate sources for a topic.
    ///
    /// Individual query strategies may fail without failing the fetch;
    /// only when every strategy errors is the whole operation a
    /// [`ResearchError::Search`]. Zero results with at least one working
    /// strategy is an empty (not erroneous) outcome.
    pub async fn fetch(&self, topic: &Topic, max_results: usize) -> Result<Vec<SearchHit>> {
        let plan = QueryPlan::build(topic, max_results);
        tracing::debug!(
            category = ?plan.category,
            queries = plan.queries.len(),
            "built query plan"
        );

        let priority_domains = plan.category.priority_domains();
        let mut seen: HashSet<String> = HashSet::new();
        let mut priority_hits: Vec<SearchHit> = Vec::new();
        let mut other_hits: Vec<SearchHit> = Vec::new();
        let mut attempted = 0usize;
        let mut errored = 0usize;

        for planned in &plan.queries {
            if priority_hits.len() + other_hits.len() >= max_results {
                break;
            }
            attempted += 1;

            let hits = match self.provider.search(&planned.query, planned.limit).await {
                Ok(hits) => hits,
                Err(e) => {
                    tracing::warn!(query = %planned.query, error = %e, "search strategy failed");
                    errored += 1;
                    continue;
                }
            };

            for hit in hits {
                let Some(key) = normalize_url(&hit.url) else {
                    continue;
                };
                if seen.contains(&key) || should_skip(&hit) {
                    continue;
                }
                seen.insert(key);
                let url_lower = hit.url.to_lowercase();
                if priority_domains.iter().any(|d| url_lower.contains(d)) {
                    priority_hits.push(hit);
                } else {
                    other_hits.push(hit);
                }
            }
        }

        if attempted > 0 && errored == attempted {
            return Err(ResearchError::Search(format!(
                "all {attempted} query strategies failed"
            )));
        }

        let mut results = priority_hits;
        results.extend(other_hits);
        results.truncate(max_results);
        tracing::info!(candidates = results.len(), "source discovery complete");
        Ok(results)
    }
}
