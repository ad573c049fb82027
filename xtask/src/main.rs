//! Development tasks for the cuecount workspace.
//!
//! ```text
//! cargo run -p xtask -- man          # man pages into target/dist/man
//! cargo run -p xtask -- completions  # shell completions into target/dist/completions
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "xtask", about = "cuecount development tasks")]
struct Xtask {
    #[command(subcommand)]
    task: Task,

    /// Output directory (default: target/dist)
    #[arg(long, global = true)]
    out_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Task {
    /// Generate man pages for the CLI and every subcommand
    Man,
    /// Generate shell completion scripts
    Completions {
        /// Shells to generate for (default: all supported)
        #[arg(long, value_enum)]
        shell: Vec<Shell>,
    },
}

fn main() -> anyhow::Result<()> {
    let xtask = Xtask::parse();
    let out_dir = xtask
        .out_dir
        .unwrap_or_else(|| workspace_root().join("target").join("dist"));

    match xtask.task {
        Task::Man => generate_man(&out_dir.join("man")),
        Task::Completions { shell } => {
            let shells = if shell.is_empty() {
                Shell::value_variants().to_vec()
            } else {
                shell
            };
            generate_completions(&out_dir.join("completions"), &shells)
        }
    }
}

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

fn generate_man(dir: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let cmd = cuecount::command();
    clap_mangen::generate_to(cmd, dir)
        .with_context(|| format!("failed to write man pages to {}", dir.display()))?;
    println!("man pages written to {}", dir.display());
    Ok(())
}

fn generate_completions(dir: &Path, shells: &[Shell]) -> anyhow::Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let mut cmd = cuecount::command();
    for &shell in shells {
        let path = clap_complete::generate_to(shell, &mut cmd, "cuecount", dir)
            .with_context(|| format!("failed to write {shell} completions"))?;
        println!("{shell}: {}", path.display());
    }
    Ok(())
}
