//! Error types for cuecount-core.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// Configuration file not found after searching all locations.
    #[error("no configuration file found")]
    NotFound,

    /// A setting has a value the pipeline cannot work with.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        /// Name of the offending setting.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Why a retained script line could not be turned into a cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueDefect {
    /// The cleaned line has no `": "` separator.
    MissingSeparator,
    /// The dialogue part still contains a `": "` separator.
    ExtraSeparator,
    /// Nothing precedes the separator.
    EmptySpeaker,
}

impl std::fmt::Display for CueDefect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::MissingSeparator => "no \": \" separator",
            Self::ExtraSeparator => "more than one \": \" separator",
            Self::EmptySpeaker => "empty speaker name",
        })
    }
}

/// Errors raised while turning raw script text into a corpus.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No colon line contains a `]`, so the start of the dialogue is unknown.
    #[error("no scene marker (`]`) found among cue lines; cannot locate where dialogue begins")]
    MalformedInput,

    /// A retained line does not have the `Speaker: dialogue` shape.
    #[error("malformed cue on line {line_number} ({defect}): {line:?}")]
    MalformedCue {
        /// 1-based line number in the source file.
        line_number: usize,
        /// The cleaned line text.
        line: String,
        /// What was wrong with it.
        defect: CueDefect,
    },
}

/// Result type alias using [`ParseError`].
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Errors that can occur during frequency analysis.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// A qualifying character has fewer distinct words than the ranking needs.
    #[error("{character} has {distinct} distinct words, need at least {required} for the ranking")]
    InsufficientData {
        /// Lowercase character name.
        character: String,
        /// Distinct word count for the character.
        distinct: usize,
        /// The configured top-N.
        required: usize,
    },
}

/// Result type alias using [`AnalysisError`].
pub type AnalysisResult<T> = std::result::Result<T, AnalysisError>;

/// Filesystem and encoding failures around pipeline artifacts.
#[derive(Error, Debug)]
pub enum OutputError {
    /// Reading an input or intermediate file failed.
    #[error("failed to read {path}")]
    Read {
        /// File that could not be read.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Writing an artifact failed.
    #[error("failed to write {path}")]
    Write {
        /// File that could not be written.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The input file exceeds the configured size limit.
    #[error("input too large: {path} is {size} bytes (limit: {limit} bytes)")]
    TooLarge {
        /// Offending file.
        path: Utf8PathBuf,
        /// Actual size in bytes.
        size: u64,
        /// Configured limit in bytes.
        limit: usize,
    },

    /// Encoding the result table as CSV failed.
    #[error("failed to write table {path}")]
    Csv {
        /// Table file being written.
        path: Utf8PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },
}

/// Result type alias using [`OutputError`].
pub type OutputResult<T> = std::result::Result<T, OutputError>;

/// Any failure of a pipeline run.
#[derive(Error, Debug)]
pub enum Error {
    /// Settings were rejected before the run started.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Script text could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Frequency ranking could not be computed.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    /// An input or artifact file could not be read or written.
    #[error(transparent)]
    Output(#[from] OutputError),
}

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
