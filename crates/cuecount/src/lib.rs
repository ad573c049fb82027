//! Library interface for the `cuecount` CLI.
//!
//! This crate exposes the CLI's argument parser and command structure as a library,
//! primarily for documentation generation and testing. The actual entry point is
//! in `main.rs`.
//!
//! # Structure
//!
//! - [`Cli`] - The root argument parser (clap derive)
//! - [`Commands`] - Available subcommands
//! - [`commands`] - Command implementations
//!
//! # Documentation Generation
//!
//! The [`command()`] function returns the clap `Command` for generating man pages
//! and shell completions via `xtask`.

pub mod commands;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{CommandFactory, Parser, Subcommand};
use cuecount_core::config::{Config, ConfigLoader, ConfigSources};
use std::path::PathBuf;

/// Color output preference.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect terminal capabilities automatically.
    #[default]
    Auto,
    /// Always emit colors.
    Always,
    /// Never emit colors.
    Never,
}

impl ColorChoice {
    /// Configure global color output based on this choice.
    ///
    /// Call this once at startup to set the color mode.
    pub fn apply(self) {
        match self {
            Self::Auto => {} // owo-colors auto-detects
            Self::Always => owo_colors::set_override(true),
            Self::Never => owo_colors::set_override(false),
        }
    }
}

const ENV_HELP: &str = "\
ENVIRONMENT VARIABLES:
    RUST_LOG                        Log filter (e.g., debug, cuecount=trace)
    CUECOUNT_LOG_PATH               Explicit log file path
    CUECOUNT_LOG_DIR                Log directory
    CUECOUNT_OUTPUT_DIR             Directory receiving generated files
    CUECOUNT_VOCABULARY_THRESHOLD   Minimum distinct words (exclusive)
    CUECOUNT_TOP_N                  Ranked words per character
";

/// Command-line interface definition for cuecount.
#[derive(Parser)]
#[command(name = "cuecount")]
#[command(
    about = "Per-character word frequency statistics for dialogue scripts",
    long_about = None
)]
#[command(version, arg_required_else_help = true)]
#[command(after_long_help = ENV_HELP)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Print only the version number (for scripting)
    #[arg(long)]
    pub version_only: bool,

    /// Path to configuration file (overrides discovery)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Run as if started in DIR
    #[arg(short = 'C', long, global = true)]
    pub chdir: Option<PathBuf>,

    /// Only print errors (suppresses warnings/info)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// More detail (repeatable; e.g. -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Colorize output
    #[arg(long, global = true, value_enum, default_value_t)]
    pub color: ColorChoice,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,
}

/// Available subcommands for the CLI.
#[derive(Subcommand)]
pub enum Commands {
    /// Extract (speaker, line) pairs and write the dialogue dump
    Extract(commands::extract::ExtractArgs),

    /// Write one dialogue file per character
    Separate(commands::separate::SeparateArgs),

    /// Rank each character's most frequent words and write the CSV table
    Frequency(commands::frequency::FrequencyArgs),

    /// Draw per-character bar charts of the ranked words
    Plot(commands::plot::PlotArgs),

    /// Show package information
    Info(commands::info::InfoArgs),
}

impl Cli {
    /// Load configuration discovered from `cwd`, plus the `--config` file.
    pub fn load_config(&self, cwd: &Utf8Path) -> anyhow::Result<(Config, ConfigSources)> {
        let mut loader = ConfigLoader::new().with_project_search(cwd);
        if let Some(ref path) = self.config {
            loader = loader.with_file(utf8_path(path.clone(), "config path")?);
        }
        loader.load().context("failed to load configuration")
    }
}

impl Commands {
    /// Run the selected subcommand.
    pub fn run(self, json: bool, config: &Config, sources: &ConfigSources) -> anyhow::Result<()> {
        match self {
            Self::Extract(args) => commands::extract::cmd_extract(args, json, config),
            Self::Separate(args) => commands::separate::cmd_separate(args, json, config),
            Self::Frequency(args) => commands::frequency::cmd_frequency(args, json, config),
            Self::Plot(args) => commands::plot::cmd_plot(args, json, config),
            Self::Info(args) => commands::info::cmd_info(args, json, config, sources),
        }
    }
}

/// Convert an OS path to UTF-8, naming `what` it is on failure.
pub fn utf8_path(path: PathBuf, what: &str) -> anyhow::Result<Utf8PathBuf> {
    Utf8PathBuf::try_from(path)
        .map_err(|e| anyhow::anyhow!("{what} is not valid UTF-8: {}", e.into_path_buf().display()))
}

/// Returns the clap command for documentation generation
pub fn command() -> clap::Command {
    Cli::command()
}
