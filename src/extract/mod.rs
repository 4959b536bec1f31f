//! Concurrent content extraction with per-source failure isolation.
//!
//! Every candidate URL is fetched and extracted independently: a bounded
//! worker pool fans out over the candidate set, each worker applies the
//! per-host politeness policy and a per-source timeout, and failures are
//! recorded on the resulting [`ExtractedSource`] instead of aborting the
//! batch. Results come back in discovery order regardless of completion
//! order.

pub mod fetcher;
pub mod rate_limit;
pub mod readability;

pub use fetcher::{FetchError, FetchedPage, HttpPageFetcher, PageFetcher};
pub use rate_limit::HostRateLimiter;

use crate::types::{ExtractedSource, ResearchError, Result, SearchHit};
use crate::utils::config::ExtractionConfig;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Content types the extractor will attempt to parse.
fn is_text_content(content_type: &str) -> bool {
    content_type.is_empty()
        || content_type.starts_with("text/html")
        || content_type.starts_with("text/plain")
        || content_type.starts_with("application/xhtml+xml")
}

/// Fans extraction out over candidate sources with bounded concurrency.
pub struct ContentExtractor<F> {
    fetcher: Arc<F>,
    limiter: Arc<HostRateLimiter>,
    config: ExtractionConfig,
}

impl<F: PageFetcher + 'static> ContentExtractor<F> {
    pub fn new(fetcher: F, config: ExtractionConfig) -> Self {
        let limiter = Arc::new(HostRateLimiter::new(config.per_host_interval()));
        Self {
            fetcher: Arc::new(fetcher),
            limiter,
            config,
        }
    }

    /// Extract all candidates concurrently.
    ///
    /// Always returns one [`ExtractedSource`] per input hit, in input
    /// order. Individual failures and timeouts become `Failed`/`Skipped`
    /// statuses; the only error this method itself produces is
    /// [`ResearchError::Cancelled`] when the run token fires, after all
    /// in-flight workers have been joined.
    pub async fn extract_all(
        &self,
        hits: Vec<SearchHit>,
        cancel: &CancellationToken,
    ) -> Result<Vec<ExtractedSource>> {
        let total = hits.len();
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency));
        let mut workers: JoinSet<(usize, ExtractedSource)> = JoinSet::new();

        for (index, hit) in hits.into_iter().enumerate() {
            let fetcher = Arc::clone(&self.fetcher);
            let limiter = Arc::clone(&self.limiter);
            let semaphore = Arc::clone(&semaphore);
            let config = self.config.clone();
            let cancel = cancel.clone();

            workers.spawn(async move {
                let url = hit.url.clone();
                let title = hit.title.clone();

                let _permit = semaphore.acquire_owned().await;
                if cancel.is_cancelled() {
                    return (
                        index,
                        ExtractedSource::failed(url, title, "run cancelled".to_string()),
                    );
                }

                let source = tokio::select! {
                    _ = cancel.cancelled() => {
                        ExtractedSource::failed(url, title, "run cancelled".to_string())
                    }
                    source = extract_one(fetcher.as_ref(), limiter.as_ref(), &config, &hit) => source,
                };
                (index, source)
            });
        }

        let mut slots: Vec<Option<ExtractedSource>> = (0..total).map(|_| None).collect();
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok((index, source)) => slots[index] = Some(source),
                Err(e) => tracing::error!(error = %e, "extraction worker panicked"),
            }
        }

        if cancel.is_cancelled() {
            return Err(ResearchError::Cancelled);
        }

        let sources: Vec<ExtractedSource> = slots.into_iter().flatten().collect();
        let ok = sources.iter().filter(|s| s.is_ok()).count();
        tracing::info!(total, ok, "extraction complete");
        Ok(sources)
    }
}

/// Fetch and extract one candidate. Never fails: every outcome is encoded
/// in the returned source's status.
async fn extract_one<F: PageFetcher>(
    fetcher: &F,
    limiter: &HostRateLimiter,
    config: &ExtractionConfig,
    hit: &SearchHit,
) -> ExtractedSource {
    let host = Url::parse(&hit.url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_default();
    limiter.acquire(&host).await;

    tracing::debug!(url = %hit.url, "fetching source");
    let fetched = match tokio::time::timeout(
        config.per_source_timeout(),
        fetcher.fetch_page(&hit.url),
    )
    .await
    {
        Err(_) => {
            return ExtractedSource::failed(
                hit.url.clone(),
                hit.title.clone(),
                format!("timed out after {}s", config.per_source_timeout_secs),
            );
        }
        Ok(Err(e)) => {
            return ExtractedSource::failed(hit.url.clone(), hit.title.clone(), e.to_string());
        }
        Ok(Ok(page)) => page,
    };

    if !is_text_content(&fetched.content_type) {
        return ExtractedSource::skipped(
            hit.url.clone(),
            hit.title.clone(),
            format!("unsupported content type: {}", fetched.content_type),
        );
    }

    let html = String::from_utf8_lossy(&fetched.body);
    let Some(page) = readability::extract_page_text(&html) else {
        return ExtractedSource::skipped(
            hit.url.clone(),
            hit.title.clone(),
            "no extractable content".to_string(),
        );
    };

    let char_count = page.body.chars().count();
    if char_count < config.min_content_length {
        return ExtractedSource::skipped(
            hit.url.clone(),
            hit.title.clone(),
            format!("insufficient content ({char_count} chars)"),
        );
    }

    let body = readability::truncate_at_boundary(&page.body, config.content_length);
    let title = if hit.title.trim().is_empty() {
        page.title
    } else {
        hit.title.clone()
    };

    ExtractedSource::ok(hit.url.clone(), title, body)
}
