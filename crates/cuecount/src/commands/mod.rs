//! Command implementations.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Args;
use cuecount_core::config::{CharacterOrder, Config};

pub mod extract;
pub mod frequency;
pub mod info;
pub mod plot;
pub mod separate;

/// Input script and where to put the generated files.
#[derive(Args, Debug, Clone)]
pub struct ScriptArgs {
    /// Script file to read.
    pub file: Utf8PathBuf,

    /// Directory receiving the generated files (default: current directory).
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<Utf8PathBuf>,

    /// Keep cues whose dialogue contains another ": " instead of failing.
    #[arg(long)]
    pub allow_extra_separators: bool,
}

/// Ranking overrides shared by `frequency` and `plot`.
#[derive(Args, Debug, Clone, Default)]
pub struct RankingArgs {
    /// Rank only characters with more distinct words than this.
    #[arg(long, value_name = "N")]
    pub threshold: Option<usize>,

    /// Number of top words per character.
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,

    /// Character order in the table and chart.
    #[arg(long, value_enum)]
    pub order: Option<CharacterOrder>,
}

/// Layer command-line overrides on top of the loaded config.
///
/// The result is validated again, since flags can reintroduce values the
/// loader would have rejected.
pub fn effective_config(
    config: &Config,
    script: &ScriptArgs,
    ranking: Option<&RankingArgs>,
) -> anyhow::Result<Config> {
    let mut config = config.clone();
    if let Some(ref dir) = script.output_dir {
        config.output_dir = Some(dir.clone());
    }
    if script.allow_extra_separators {
        config.allow_extra_separators = true;
    }
    if let Some(ranking) = ranking {
        if let Some(threshold) = ranking.threshold {
            config.vocabulary_threshold = threshold;
        }
        if let Some(top) = ranking.top {
            config.top_n = top;
        }
        if let Some(order) = ranking.order {
            config.character_order = order;
        }
    }
    config.validate().context("invalid command-line override")?;
    Ok(config)
}
