//! Extract command: script text to `(speaker, line)` pairs.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Args;
use cuecount_core::config::Config;
use cuecount_core::corpus::DialogueEntry;
use cuecount_core::parser::ParseStats;
use cuecount_core::pipeline::ScriptParser;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use super::{ScriptArgs, effective_config};

/// Arguments for the `extract` subcommand.
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Script and output location.
    #[command(flatten)]
    pub script: ScriptArgs,

    /// Also print every extracted cue.
    #[arg(long)]
    pub show: bool,
}

#[derive(Serialize)]
struct ExtractOutput<'a> {
    file: &'a Utf8PathBuf,
    dump: Utf8PathBuf,
    stats: ParseStats,
    entries: &'a [DialogueEntry],
}

/// Parse a script and write the dialogue dump.
#[instrument(name = "cmd_extract", skip_all, fields(file = %args.script.file))]
pub fn cmd_extract(args: ExtractArgs, global_json: bool, config: &Config) -> anyhow::Result<()> {
    debug!(file = %args.script.file, show = args.show, "executing extract command");

    let config = effective_config(config, &args.script, None)?;
    let parser = ScriptParser::from_config(&config);
    let parsed = parser
        .extract(&args.script.file)
        .with_context(|| format!("failed to extract dialogue from {}", args.script.file))?;

    let output = ExtractOutput {
        file: &args.script.file,
        dump: parser.layout().dump_path(),
        stats: parsed.stats,
        entries: parsed.corpus.entries(),
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if args.show {
        for entry in output.entries {
            println!("{}: {}", entry.speaker.bold(), entry.line);
        }
        println!();
    }
    println!(
        "{} {} cues from {}",
        "Extracted".green(),
        output.stats.cues,
        output.file
    );
    println!(
        "{}: {} lines, {} with ':', {} front matter, {} scene markers",
        "Lines".dimmed(),
        output.stats.total_lines,
        output.stats.colon_lines,
        output.stats.front_matter,
        output.stats.scene_markers
    );
    println!("{}: {}", "Dump".dimmed(), output.dump.cyan());

    Ok(())
}
