//! Frequency command: top words per character, written as CSV.

use anyhow::Context;
use clap::Args;
use cuecount_core::config::Config;
use cuecount_core::pipeline::{FrequencyAnalyzer, FrequencyReport};
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use super::{RankingArgs, ScriptArgs, effective_config};

/// Arguments for the `frequency` subcommand.
#[derive(Args, Debug)]
pub struct FrequencyArgs {
    /// Script and output location.
    #[command(flatten)]
    pub script: ScriptArgs,

    /// Ranking overrides.
    #[command(flatten)]
    pub ranking: RankingArgs,
}

/// Rank each qualifying character's most frequent words.
#[instrument(name = "cmd_frequency", skip_all, fields(file = %args.script.file))]
pub fn cmd_frequency(args: FrequencyArgs, global_json: bool, config: &Config) -> anyhow::Result<()> {
    debug!(
        file = %args.script.file,
        threshold = ?args.ranking.threshold,
        top = ?args.ranking.top,
        "executing frequency command"
    );

    let config = effective_config(config, &args.script, Some(&args.ranking))?;
    let report = FrequencyAnalyzer::from_config(&config)
        .word_frequency(&args.script.file)
        .with_context(|| format!("failed to rank words of {}", args.script.file))?;

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, config.vocabulary_threshold);
    }

    Ok(())
}

/// Print the ranking grouped by character.
fn print_report(report: &FrequencyReport, threshold: usize) {
    if report.profiles.is_empty() {
        println!(
            "{} no character uses more than {} distinct words",
            "Note:".yellow(),
            threshold
        );
    }

    for profile in &report.profiles {
        println!(
            "{} {}",
            profile.character.bold(),
            format!("({} distinct words)", profile.vocabulary_size).dimmed()
        );
        for (rank, word) in profile.top_words.iter().enumerate() {
            println!("  {:>2}. {:<16} {}", rank + 1, word.word, word.count);
        }
    }

    println!(
        "{} {} of {} characters, {} rows",
        "Ranked".green(),
        report.profiles.len(),
        report.files.len(),
        report.table.len()
    );
    println!("{}: {}", "Table".dimmed(), report.table_path.cyan());
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    fn args(root: &Utf8PathBuf, threshold: Option<usize>, top: Option<usize>) -> FrequencyArgs {
        FrequencyArgs {
            script: ScriptArgs {
                file: root.join("script.txt"),
                output_dir: Some(root.join("out")),
                allow_extra_separators: false,
            },
            ranking: RankingArgs {
                threshold,
                top,
                order: None,
            },
        }
    }

    fn setup() -> (TempDir, Utf8PathBuf) {
        let tmp = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        std::fs::write(
            root.join("script.txt"),
            "Pilot: ]\nRoss: we were on a break\nRachel: no we were not\nRoss: we were\n",
        )
        .unwrap();
        (tmp, root)
    }

    #[test]
    fn default_threshold_gives_header_only_table() {
        let (_tmp, root) = setup();
        cmd_frequency(args(&root, None, None), false, &Config::default()).unwrap();
        let csv = std::fs::read_to_string(root.join("out/word_frequency.csv")).unwrap();
        assert_eq!(csv, "role,word,freq\n");
    }

    #[test]
    fn low_threshold_ranks_characters() {
        let (_tmp, root) = setup();
        cmd_frequency(args(&root, Some(2), Some(2)), true, &Config::default()).unwrap();
        let csv = std::fs::read_to_string(root.join("out/word_frequency.csv")).unwrap();
        assert_eq!(
            csv,
            "role,word,freq\nross,we,2\nross,were,2\nrachel,no,1\nrachel,we,1\n"
        );
    }

    #[test]
    fn top_larger_than_vocabulary_fails() {
        let (_tmp, root) = setup();
        let err = cmd_frequency(args(&root, Some(0), Some(9)), false, &Config::default())
            .unwrap_err();
        assert!(format!("{err:#}").contains("distinct words"));
    }
}
