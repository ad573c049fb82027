//! Separate command: one dialogue file per character.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Args;
use cuecount_core::config::{CharacterOrder, Config};
use cuecount_core::pipeline::{CharacterFile, ScriptParser};
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use super::{ScriptArgs, effective_config};

/// Arguments for the `separate` subcommand.
#[derive(Args, Debug)]
pub struct SeparateArgs {
    /// Script and output location.
    #[command(flatten)]
    pub script: ScriptArgs,

    /// Character order in the listing.
    #[arg(long, value_enum)]
    pub order: Option<CharacterOrder>,
}

#[derive(Serialize)]
struct SeparateOutput<'a> {
    file: &'a Utf8PathBuf,
    characters: &'a [CharacterFile],
}

/// Split a script's dialogue into per-character files.
#[instrument(name = "cmd_separate", skip_all, fields(file = %args.script.file))]
pub fn cmd_separate(args: SeparateArgs, global_json: bool, config: &Config) -> anyhow::Result<()> {
    debug!(file = %args.script.file, order = ?args.order, "executing separate command");

    let config = effective_config(config, &args.script, None)?;
    let order = args.order.unwrap_or(config.character_order);
    let separation = ScriptParser::from_config(&config)
        .separate(&args.script.file, order)
        .with_context(|| format!("failed to separate dialogue of {}", args.script.file))?;

    if global_json {
        let output = SeparateOutput {
            file: &args.script.file,
            characters: &separation.files,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let width = separation
        .files
        .iter()
        .map(|f| f.name.chars().count())
        .max()
        .unwrap_or(0);
    for file in &separation.files {
        println!(
            "{:<width$}  {:>6} lines  {}",
            file.name.bold(),
            file.lines,
            file.path.dimmed(),
        );
    }
    println!(
        "{} {} characters from {} cues",
        "Separated".green(),
        separation.files.len(),
        separation.parsed.corpus.len()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn writes_character_files() {
        let tmp = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        std::fs::write(
            root.join("script.txt"),
            "Pilot: ]\nRoss: Hi\nMonica: Hey\nROSS: Bye\n",
        )
        .unwrap();
        let args = SeparateArgs {
            script: ScriptArgs {
                file: root.join("script.txt"),
                output_dir: Some(root.join("out")),
                allow_extra_separators: false,
            },
            order: Some(CharacterOrder::Alphabetical),
        };

        cmd_separate(args, false, &Config::default()).unwrap();

        let ross = std::fs::read_to_string(root.join("out/characters/ross.txt")).unwrap();
        assert_eq!(ross, "Hi\nBye\n");
        assert!(root.join("out/characters/monica.txt").is_file());
    }
}
