//! Core library for cuecount.
//!
//! This crate provides the script parser, the per-character word
//! frequency ranking, and the chart renderer used by the `cuecount` CLI
//! and any downstream consumers.
//!
//! # Modules
//!
//! - [`parser`] - Dialogue extraction from script text
//! - [`corpus`] - Parsed dialogue and its per-character partition
//! - [`frequency`] - Word counting and ranking
//! - [`table`] - Flattened ranking table and its CSV form
//! - [`chart`] - Bar chart panels and SVG rendering
//! - [`pipeline`] - File-level stages tying the above together
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```no_run
//! use camino::Utf8Path;
//! use cuecount_core::{ConfigLoader, FrequencyAnalyzer};
//!
//! let (config, _sources) = ConfigLoader::new()
//!     .with_user_config(true)
//!     .load()
//!     .expect("Failed to load configuration");
//!
//! let report = FrequencyAnalyzer::from_config(&config)
//!     .plot_graph(Utf8Path::new("script.txt"))
//!     .expect("analysis failed");
//! println!("chart written to {}", report.chart_path);
//! ```
#![deny(unsafe_code)]

pub mod chart;
pub mod config;
pub mod corpus;
pub mod error;
pub mod frequency;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod repr;
pub mod table;

/// Default input size limit: 5 MiB.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 5 * 1024 * 1024;

pub use chart::{Chart, ChartStyle, Panel};
pub use config::{CharacterOrder, Config, ConfigLoader, ConfigSources, LogLevel};
pub use corpus::{CharacterDialogue, DialogueEntry, ScriptCorpus};
pub use error::{
    AnalysisError, ConfigError, ConfigResult, CueDefect, Error, OutputError, ParseError, Result,
};
pub use frequency::{CharacterProfile, FrequencyOptions, WordCount};
pub use output::OutputLayout;
pub use parser::{ParseOptions, ParseStats, ParsedScript, parse_script};
pub use pipeline::{
    CharacterFile, FrequencyAnalyzer, FrequencyReport, PlotReport, ScriptParser, Separation,
};
pub use table::{ResultRow, ResultTable};
