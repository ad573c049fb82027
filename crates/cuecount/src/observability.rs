//! Logging setup: human-readable events on stderr, JSONL events in a log file.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const LOG_PATH_ENV: &str = "CUECOUNT_LOG_PATH";
const LOG_DIR_ENV: &str = "CUECOUNT_LOG_DIR";
const LOG_FILE_NAME: &str = "cuecount.jsonl";

/// Where the JSONL log goes, if anywhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// JSONL log destination; `None` logs to stderr only.
    pub log_file: Option<PathBuf>,
}

impl ObservabilityConfig {
    /// Resolve the log file from the environment, then `config_log_dir`.
    ///
    /// With neither set, events only go to stderr.
    pub fn from_env_with_overrides(config_log_dir: Option<PathBuf>) -> Self {
        Self {
            log_file: resolve_log_file(
                std::env::var_os(LOG_PATH_ENV).map(PathBuf::from),
                std::env::var_os(LOG_DIR_ENV).map(PathBuf::from),
                config_log_dir,
            ),
        }
    }
}

fn resolve_log_file(
    explicit_path: Option<PathBuf>,
    env_dir: Option<PathBuf>,
    config_dir: Option<PathBuf>,
) -> Option<PathBuf> {
    let non_empty = |p: &PathBuf| !p.as_os_str().is_empty();
    if let Some(path) = explicit_path.filter(non_empty) {
        return Some(path);
    }
    env_dir
        .filter(non_empty)
        .or(config_dir)
        .map(|dir| dir.join(LOG_FILE_NAME))
}

/// Build the event filter.
///
/// `RUST_LOG` wins when set; otherwise `--quiet` and `-v` adjust the
/// configured level.
pub fn env_filter(quiet: bool, verbose: u8, default_level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => default_level,
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    EnvFilter::new(level)
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop; keep it alive for
/// the whole run. A log file that cannot be opened only disables file
/// logging.
pub fn init_observability(
    cfg: &ObservabilityConfig,
    filter: EnvFilter,
) -> anyhow::Result<Option<WorkerGuard>> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    let (file_layer, guard) = match cfg.log_file.as_deref().and_then(open_log_file) {
        Some(file) => {
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = fmt::layer().json().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    Ok(guard)
}

fn open_log_file(path: &Path) -> Option<std::fs::File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).ok()?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .ok()
}
