//! Plot command: per-character bar charts.
//!
//! Always writes the SVG chart; also draws the panels in the terminal
//! unless `--no-terminal` is given.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Args;
use cuecount_core::chart::{Panel, palette_rgb};
use cuecount_core::config::Config;
use cuecount_core::pipeline::FrequencyAnalyzer;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use super::{RankingArgs, ScriptArgs, effective_config};

/// Terminal width of a bar reaching the top of the frequency axis.
const BAR_COLUMNS: usize = 40;

/// Arguments for the `plot` subcommand.
#[derive(Args, Debug)]
pub struct PlotArgs {
    /// Script and output location.
    #[command(flatten)]
    pub script: ScriptArgs,

    /// Ranking overrides.
    #[command(flatten)]
    pub ranking: RankingArgs,

    /// Only write the SVG file.
    #[arg(long)]
    pub no_terminal: bool,
}

#[derive(Serialize)]
struct PlotOutput<'a> {
    chart: &'a Utf8PathBuf,
    table: &'a Utf8PathBuf,
    grid: [usize; 2],
    panels: &'a [Panel],
}

/// Rank words and draw the bar charts.
#[instrument(name = "cmd_plot", skip_all, fields(file = %args.script.file))]
pub fn cmd_plot(args: PlotArgs, global_json: bool, config: &Config) -> anyhow::Result<()> {
    debug!(
        file = %args.script.file,
        no_terminal = args.no_terminal,
        "executing plot command"
    );

    let config = effective_config(config, &args.script, Some(&args.ranking))?;
    let report = FrequencyAnalyzer::from_config(&config)
        .plot_graph(&args.script.file)
        .with_context(|| format!("failed to plot word frequency of {}", args.script.file))?;

    if global_json {
        let (rows, cols) = report.chart.grid();
        let output = PlotOutput {
            chart: &report.chart_path,
            table: &report.frequency.table_path,
            grid: [rows, cols],
            panels: report.chart.panels(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if !args.no_terminal {
        for panel in report.chart.panels() {
            print_panel(panel, report.chart.style().y_axis_max);
            println!();
        }
    }
    if report.chart.panels().is_empty() {
        println!(
            "{} no character uses more than {} distinct words",
            "Note:".yellow(),
            config.vocabulary_threshold
        );
    }
    println!("{}: {}", "Table".dimmed(), report.frequency.table_path.cyan());
    println!("{}: {}", "Chart".dimmed(), report.chart_path.cyan());

    Ok(())
}

fn print_panel(panel: &Panel, y_axis_max: u32) {
    println!("{}", panel.title.bold());
    let width = panel
        .bars
        .iter()
        .map(|b| b.word.chars().count())
        .max()
        .unwrap_or(0);
    let (r, g, b) = palette_rgb(&panel.color).unwrap_or((128, 128, 128));
    for bar in &panel.bars {
        let blocks = "█".repeat(bar_length(bar.freq, y_axis_max));
        println!(
            "  {:>width$} │{} {}",
            bar.word,
            blocks.truecolor(r, g, b),
            bar.freq
        );
    }
}

/// Bar length in columns, clipped at the axis maximum.
fn bar_length(freq: usize, y_axis_max: u32) -> usize {
    let max = y_axis_max.max(1) as usize;
    let clipped = freq.min(max);
    let len = (clipped * BAR_COLUMNS).div_ceil(max);
    if freq > 0 { len.max(1) } else { 0 }
}
