//! Pipeline orchestration: the staged state machine that turns a topic
//! string into an assembled [`Report`].
//!
//! Stages run strictly in sequence (Searching, Extracting, Ranking,
//! Synthesizing, Assembling); only extraction fans out internally. A
//! failure in any stage moves the run to the terminal Failed state with
//! the stage and cause recorded, and no partial report escapes. Progress
//! is reported through an observer callback; it is an observation
//! channel only and cannot influence the run.
//!
//! Every invocation owns its own [`RunContext`]; there is no shared
//! mutable state between runs and no process-wide configuration.

use crate::extract::{ContentExtractor, PageFetcher};
use crate::llm::LanguageModel;
use crate::rank::SourceRanker;
use crate::report;
use crate::search::{SearchProvider, SourceFetcher};
use crate::synthesis::SynthesisRequestor;
use crate::types::{Report, ResearchError, Result, Topic};
use crate::utils::config::ResearchConfig;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

// ============= Progress Reporting =============

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Searching,
    Extracting,
    Ranking,
    Synthesizing,
    Assembling,
    Done,
    Failed,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Searching => "searching",
            Self::Extracting => "extracting",
            Self::Ranking => "ranking",
            Self::Synthesizing => "synthesizing",
            Self::Assembling => "assembling",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }

    /// Approximate overall completion when this stage begins.
    pub fn fraction(&self) -> f32 {
        match self {
            Self::Idle => 0.0,
            Self::Searching => 0.05,
            Self::Extracting => 0.25,
            Self::Ranking => 0.60,
            Self::Synthesizing => 0.70,
            Self::Assembling => 0.95,
            Self::Done => 1.0,
            Self::Failed => 1.0,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One progress notification, emitted at each stage transition.
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    pub stage: Stage,
    pub fraction: f32,
    pub detail: String,
}

/// Observer callback for progress updates.
pub type ProgressObserver = Box<dyn Fn(ProgressUpdate) + Send + Sync>;

// ============= Run Context =============

/// Per-invocation state: identity, cancellation, and the progress
/// observer. Created fresh for every run.
pub struct RunContext {
    pub run_id: Uuid,
    cancel: CancellationToken,
    observer: Option<ProgressObserver>,
}

impl RunContext {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            cancel: CancellationToken::new(),
            observer: None,
        }
    }

    /// Attach a progress observer.
    pub fn with_observer(mut self, observer: ProgressObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Token that aborts the run when cancelled; hand a clone to whatever
    /// owns the abort decision.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    fn notify(&self, stage: Stage, detail: impl Into<String>) {
        let detail = detail.into();
        tracing::info!(run_id = %self.run_id, stage = %stage, detail = %detail, "stage transition");
        if let Some(observer) = &self.observer {
            observer(ProgressUpdate {
                stage,
                fraction: stage.fraction(),
                detail,
            });
        }
    }

    fn check_cancelled(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            Err(ResearchError::Cancelled)
        } else {
            Ok(())
        }
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}

// ============= Pipeline =============

/// The research pipeline, generic over its three capability boundaries.
///
/// Holds no mutable state; construct one per run (or share immutably) and
/// call [`run`](Self::run) with a fresh [`RunContext`].
pub struct ResearchPipeline<P, F, M> {
    fetcher: SourceFetcher<P>,
    extractor: ContentExtractor<F>,
    ranker: SourceRanker,
    requestor: SynthesisRequestor<M>,
    config: ResearchConfig,
}

impl<P, F, M> ResearchPipeline<P, F, M>
where
    P: SearchProvider,
    F: PageFetcher + 'static,
    M: LanguageModel,
{
    pub fn new(search: P, pages: F, model: M, config: ResearchConfig) -> Self {
        Self {
            fetcher: SourceFetcher::new(search),
            extractor: ContentExtractor::new(pages, config.extraction.clone()),
            ranker: SourceRanker::new(config.ranking.clone(), config.extraction.min_content_length),
            requestor: SynthesisRequestor::new(model, config.synthesis.retry_count),
            config,
        }
    }

    /// Execute one run: topic in, report out.
    ///
    /// The topic is validated before any network call. On failure the
    /// observer sees a Failed transition naming the stage, and the error
    /// carries the cause.
    pub async fn run(&self, raw_topic: &str, ctx: &RunContext) -> Result<Report> {
        let topic = Topic::new(raw_topic)?;
        ctx.check_cancelled()?;

        let mut stage = Stage::Searching;
        ctx.notify(stage, format!("searching for: {topic}"));
        let hits = match self.fetcher.fetch(&topic, self.config.search.max_results).await {
            Ok(hits) => hits,
            Err(e) => return Self::fail(ctx, stage, e),
        };

        ctx.check_cancelled()?;
        stage = Stage::Extracting;
        ctx.notify(stage, format!("extracting {} candidate sources", hits.len()));
        let extracted = match self
            .extractor
            .extract_all(hits, &ctx.cancellation_token())
            .await
        {
            Ok(extracted) => extracted,
            Err(e) => return Self::fail(ctx, stage, e),
        };

        ctx.check_cancelled()?;
        stage = Stage::Ranking;
        ctx.notify(stage, format!("ranking {} extractions", extracted.len()));
        let ranked = self.ranker.rank(&topic, &extracted);
        if ranked.is_empty() {
            let found = extracted.iter().filter(|s| s.is_ok()).count();
            let e = ResearchError::InsufficientSources {
                found,
                required: self.config.ranking.min_sources,
            };
            return Self::fail(ctx, stage, e);
        }

        ctx.check_cancelled()?;
        stage = Stage::Synthesizing;
        ctx.notify(stage, format!("synthesizing from {} sources", ranked.len()));
        let synthesis = match self.requestor.synthesize(&topic, ranked.clone()).await {
            Ok(synthesis) => synthesis,
            Err(e) => return Self::fail(ctx, stage, e),
        };

        ctx.check_cancelled()?;
        stage = Stage::Assembling;
        ctx.notify(stage, "assembling report");
        let report = match report::assemble(&topic, synthesis, ranked) {
            Ok(report) => report,
            Err(e) => return Self::fail(ctx, stage, e),
        };

        ctx.notify(Stage::Done, "report complete");
        Ok(report)
    }

    fn fail(ctx: &RunContext, stage: Stage, error: ResearchError) -> Result<Report> {
        tracing::error!(run_id = %ctx.run_id, stage = %stage, error = %error, "run failed");
        ctx.notify(Stage::Failed, format!("{stage} failed: {error}"));
        Err(error)
    }
}
