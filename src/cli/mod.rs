//! CLI module for S.A.G.E
//!
//! Provides command-line interface parsing and handling for the sage
//! binary. Uses clap for argument parsing and owo-colors for colored
//! terminal output.

pub mod output;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// S.A.G.E - Search, Assess, Generate, Export
///
/// An automated research pipeline: give it a topic and it searches the
/// web, extracts and ranks source content, synthesizes a cited report
/// with a generative language model, and renders it to Markdown and HTML.
#[derive(Parser, Debug)]
#[command(
    name = "sage",
    author = "Dirmacs <build@dirmacs.com>",
    version,
    about = "S.A.G.E - Search, Assess, Generate, Export",
    long_about = "An automated research pipeline: give it a topic and it searches the web,\n\
                  extracts and ranks source content, synthesizes a cited report with a\n\
                  generative language model, and renders it to Markdown and HTML.",
    after_help = "EXAMPLES:\n    \
                  sage \"solid state battery breakthroughs\"   # Research a topic\n    \
                  sage --format html \"ocean iron fertilization\"\n    \
                  sage check-key                             # Verify the model API key\n    \
                  sage config --validate                     # Validate sage.toml"
)]
pub struct Cli {
    /// The research topic
    pub topic: Option<String>,

    /// Path to the configuration file
    #[arg(short, long, default_value = "sage.toml", global = true)]
    pub config: PathBuf,

    /// Output directory for rendered reports (overrides config)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Report output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Both)]
    pub format: OutputFormat,

    /// Number of sources to cite (overrides config)
    #[arg(long)]
    pub max_sources: Option<usize>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Report output formats.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Markdown only
    Markdown,
    /// Standalone HTML only
    Html,
    /// Both Markdown and HTML
    Both,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Verify that the configured model API key works
    ///
    /// Sends a minimal test generation and reports whether the key is
    /// accepted, rate limited, or rejected.
    CheckKey,

    /// Show configuration information
    Config {
        /// Show the full configuration
        #[arg(short = 'f', long)]
        full: bool,

        /// Validate the configuration file
        #[arg(long)]
        validate: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
