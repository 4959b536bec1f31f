//! sage binary: CLI entry point for the research pipeline.

use anyhow::{bail, Context};
use sage::cli::output::Output;
use sage::cli::{Cli, Commands, OutputFormat};
use sage::extract::HttpPageFetcher;
use sage::llm::{GeminiClient, LanguageModel};
use sage::pipeline::{ResearchPipeline, RunContext, Stage};
use sage::render::{write_report, HtmlRenderer, MarkdownRenderer};
use sage::search::DaedraProvider;
use sage::utils::ResearchConfig;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();
    dotenvy::dotenv().ok();
    init_tracing(cli.verbose);

    let out = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    let mut config =
        ResearchConfig::load(&cli.config).context("failed to load configuration")?;
    if let Some(dir) = &cli.output_dir {
        config.output.dir = dir.display().to_string();
    }
    if let Some(max_sources) = cli.max_sources {
        config.ranking.max_sources = max_sources;
        config.validate().context("invalid configuration")?;
    }

    match &cli.command {
        Some(Commands::CheckKey) => check_key(&config, &out).await,
        Some(Commands::Config { full, validate }) => show_config(&config, *full, *validate, &out),
        None => {
            let Some(topic) = cli.topic.as_deref() else {
                bail!("no topic given; run `sage \"your research topic\"` or `sage --help`");
            };
            research(topic, config, cli.format, &out).await
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "sage=debug" } else { "sage=warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn build_model(config: &ResearchConfig) -> anyhow::Result<GeminiClient> {
    let api_key = config.synthesis.api_key()?;
    let model = GeminiClient::new(
        api_key,
        config.synthesis.model.clone(),
        Duration::from_secs(config.synthesis.request_timeout_secs),
    )?;
    Ok(model)
}

async fn check_key(config: &ResearchConfig, out: &Output) -> anyhow::Result<()> {
    let model = build_model(config)?;
    out.info(&format!("checking credentials for {}", model.model_name()));
    match model.verify_credentials().await {
        Ok(()) => {
            out.success("API key is valid and working");
            Ok(())
        }
        Err(e) => {
            out.error(&e.to_string());
            out.hint(&format!(
                "set {} to a valid key, or point synthesis.api_key_env at another variable",
                config.synthesis.api_key_env
            ));
            Err(e.into())
        }
    }
}

fn show_config(
    config: &ResearchConfig,
    full: bool,
    validate: bool,
    out: &Output,
) -> anyhow::Result<()> {
    if validate {
        config.validate().context("configuration is invalid")?;
        out.success("configuration is valid");
    }

    out.header("Configuration");
    out.kv("model", &config.synthesis.model);
    out.kv("api key env", &config.synthesis.api_key_env);
    out.kv("max results", &config.search.max_results.to_string());
    out.kv("max sources", &config.ranking.max_sources.to_string());
    out.kv("output dir", &config.output.dir);

    if full {
        let rendered =
            toml::to_string_pretty(config).context("failed to serialize configuration")?;
        out.newline();
        println!("{rendered}");
    }
    Ok(())
}

async fn research(
    topic: &str,
    config: ResearchConfig,
    format: OutputFormat,
    out: &Output,
) -> anyhow::Result<()> {
    out.banner();

    let model = build_model(&config)?;
    let pages = HttpPageFetcher::new(config.extraction.per_source_timeout())
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    let output_dir = config.output.dir.clone();
    let pipeline = ResearchPipeline::new(DaedraProvider::new(), pages, model, config);

    let progress_out = *out;
    let ctx = RunContext::new().with_observer(Box::new(move |update| {
        let step = match update.stage {
            Stage::Searching => 1,
            Stage::Extracting => 2,
            Stage::Ranking => 3,
            Stage::Synthesizing => 4,
            Stage::Assembling => 5,
            Stage::Done => {
                progress_out.success(&update.detail);
                return;
            }
            Stage::Failed => {
                progress_out.error(&update.detail);
                return;
            }
            Stage::Idle => return,
        };
        progress_out.step(step, 5, &update.detail);
    }));

    let report = pipeline.run(topic, &ctx).await?;

    out.newline();
    if matches!(format, OutputFormat::Markdown | OutputFormat::Both) {
        let path = write_report(&report, &MarkdownRenderer, &output_dir)?;
        out.created("markdown", &path.display().to_string());
    }
    if matches!(format, OutputFormat::Html | OutputFormat::Both) {
        let path = write_report(&report, &HtmlRenderer, &output_dir)?;
        out.created("html", &path.display().to_string());
    }

    out.complete(&format!(
        "research complete: {} sections, {} sources cited",
        report.synthesis.sections.len(),
        report.bibliography.len(),
    ));
    Ok(())
}
