//! Info command implementation

use clap::Args;
use cuecount_core::config::{Config, ConfigSources};
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

/// Arguments for the `info` subcommand.
#[derive(Args, Debug, Default)]
pub struct InfoArgs {
    // No subcommand-specific arguments; uses global --json flag
}

#[derive(Serialize)]
struct PackageInfo {
    name: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    repository: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    license: &'static str,
}

impl PackageInfo {
    const fn new() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            description: env!("CARGO_PKG_DESCRIPTION"),
            repository: env!("CARGO_PKG_REPOSITORY"),
            license: env!("CARGO_PKG_LICENSE"),
        }
    }
}

#[derive(Serialize)]
struct ConfigInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    config_file: Option<String>,
    log_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_dir: Option<String>,
    output_dir: String,
    vocabulary_threshold: usize,
    top_n: usize,
    y_axis_max: u32,
    panel_rows: usize,
    panel_cols: usize,
    palette: Vec<String>,
    character_order: String,
    allow_extra_separators: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_input_bytes: Option<usize>,
}

impl ConfigInfo {
    fn from_config(config: &Config, sources: &ConfigSources) -> Self {
        Self {
            config_file: sources.primary_file().map(|p| p.to_string()),
            log_level: config.log_level.as_str().to_string(),
            log_dir: config.log_dir.as_ref().map(|p| p.to_string()),
            output_dir: config.output_dir().to_string(),
            vocabulary_threshold: config.vocabulary_threshold,
            top_n: config.top_n,
            y_axis_max: config.y_axis_max,
            panel_rows: config.panel_rows,
            panel_cols: config.panel_cols,
            palette: config.palette.clone(),
            character_order: config.character_order.as_str().to_string(),
            allow_extra_separators: config.allow_extra_separators,
            max_input_bytes: config.input_limit(),
        }
    }
}

#[derive(Serialize)]
struct FullInfo {
    #[serde(flatten)]
    package: PackageInfo,
    config: ConfigInfo,
}

/// Print package information and the effective configuration.
#[instrument(name = "cmd_info", skip_all, fields(json_output))]
pub fn cmd_info(
    _args: InfoArgs,
    global_json: bool,
    config: &Config,
    sources: &ConfigSources,
) -> anyhow::Result<()> {
    debug!(json_output = global_json, "executing info command");

    let full_info = FullInfo {
        package: PackageInfo::new(),
        config: ConfigInfo::from_config(config, sources),
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&full_info)?);
        return Ok(());
    }

    let package = &full_info.package;
    println!("{} {}", package.name.bold(), package.version.green());
    if !package.description.is_empty() {
        println!("{}", package.description);
    }
    if !package.license.is_empty() {
        println!("{}: {}", "License".dimmed(), package.license);
    }
    if !package.repository.is_empty() {
        println!("{}: {}", "Repository".dimmed(), package.repository.cyan());
    }

    let cfg = &full_info.config;
    println!();
    println!("{}", "Configuration".bold().underline());
    match cfg.config_file {
        Some(ref path) => println!("{}: {}", "Config file".dimmed(), path.cyan()),
        None => println!("{}: {}", "Config file".dimmed(), "none loaded".yellow()),
    }
    println!("{}: {}", "Log level".dimmed(), cfg.log_level);
    if let Some(ref dir) = cfg.log_dir {
        println!("{}: {}", "Log directory".dimmed(), dir);
    }
    println!("{}: {}", "Output directory".dimmed(), cfg.output_dir);
    match cfg.max_input_bytes {
        Some(max) => println!("{}: {} bytes", "Input limit".dimmed(), max),
        None => println!("{}: {}", "Input limit".dimmed(), "disabled".yellow()),
    }

    println!();
    println!("{}", "Analysis".bold().underline());
    println!(
        "{}: more than {} distinct words",
        "Vocabulary threshold".dimmed(),
        cfg.vocabulary_threshold
    );
    println!("{}: {}", "Top words".dimmed(), cfg.top_n);
    println!("{}: {}", "Character order".dimmed(), cfg.character_order);
    println!(
        "{}: {}",
        "Extra separators".dimmed(),
        if cfg.allow_extra_separators { "kept" } else { "rejected" }
    );

    println!();
    println!("{}", "Chart".bold().underline());
    println!("{}: 0..{}", "Frequency axis".dimmed(), cfg.y_axis_max);
    println!(
        "{}: {} x {}",
        "Panel grid".dimmed(),
        cfg.panel_rows,
        cfg.panel_cols
    );
    println!("{}: {}", "Palette".dimmed(), cfg.palette.join(", "));

    Ok(())
}
