//! Script cleaning and cue extraction.
//!
//! Turns a transcript such as
//!
//! ```text
//! The One Where Monica Gets a Roommate [Pilot]
//! [Scene: Central Perk, the gang is there.]
//! Monica: There's nothing to tell! (She sits down.)
//! ```
//!
//! into ordered `(speaker, line)` pairs. Only lines with a `:` are cue
//! candidates; front matter up to and including the first line with a
//! `]` is skipped; scene markers (`[...]` at line start) are dropped; stage
//! directions (`(...)`) are removed and whitespace runs collapse to one
//! space.
//!
//! Stage directions are stripped innermost first until none remain, so
//! nested pairs disappear entirely. An unmatched `(` or `)` is kept as
//! text. Each line is cleaned in isolation; a direction never spans
//! lines.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::corpus::{DialogueEntry, ScriptCorpus};
use crate::error::{CueDefect, ParseError, ParseResult};

/// Innermost parenthesized span.
static STAGE_DIRECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^()]*\)").expect("valid regex"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Separator between speaker and dialogue.
pub const CUE_SEPARATOR: &str = ": ";

/// Parser behavior switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Keep dialogue that contains another `": "` instead of failing.
    pub allow_extra_separators: bool,
}

/// How many lines each cleaning step let through or dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    /// Lines in the source text.
    pub total_lines: usize,
    /// Lines containing a `:`.
    pub colon_lines: usize,
    /// Colon lines skipped as front matter.
    pub front_matter: usize,
    /// Scene markers dropped after the front matter.
    pub scene_markers: usize,
    /// Cues in the resulting corpus.
    pub cues: usize,
}

/// Output of [`parse_script`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedScript {
    /// The extracted dialogue.
    pub corpus: ScriptCorpus,
    /// Per-step line counts.
    pub stats: ParseStats,
}

/// Extract the dialogue from script text.
///
/// # Errors
///
/// * [`ParseError::MalformedInput`] if no colon line contains `]`.
/// * [`ParseError::MalformedCue`] if a retained line is not
///   `Speaker: dialogue` after cleaning.
#[tracing::instrument(skip(text), fields(text_len = text.len()))]
pub fn parse_script(text: &str, options: ParseOptions) -> ParseResult<ParsedScript> {
    let mut stats = ParseStats::default();

    // (1-based line number, text)
    let colon_lines: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .inspect(|_| stats.total_lines += 1)
        .filter(|(_, line)| line.contains(':'))
        .map(|(i, line)| (i + 1, line))
        .collect();
    stats.colon_lines = colon_lines.len();

    let first_marker = colon_lines
        .iter()
        .position(|(_, line)| line.contains(']'))
        .ok_or(ParseError::MalformedInput)?;
    stats.front_matter = first_marker + 1;

    let body = &colon_lines[first_marker + 1..];
    let mut entries = Vec::with_capacity(body.len());
    for &(line_number, line) in body {
        if is_scene_marker(line) {
            stats.scene_markers += 1;
            continue;
        }
        let cleaned = clean_line(line);
        entries.push(split_cue(&cleaned, line_number, options)?);
    }
    stats.cues = entries.len();

    tracing::debug!(
        total_lines = stats.total_lines,
        colon_lines = stats.colon_lines,
        front_matter = stats.front_matter,
        scene_markers = stats.scene_markers,
        cues = stats.cues,
        "script parsed"
    );

    Ok(ParsedScript {
        corpus: ScriptCorpus::new(entries),
        stats,
    })
}

/// Whether a line is a scene-boundary marker such as `[Scene: ...]`.
pub fn is_scene_marker(line: &str) -> bool {
    line.starts_with('[')
}

/// Remove stage directions, then collapse whitespace runs to one space.
pub fn clean_line(line: &str) -> String {
    let stripped = strip_stage_directions(line);
    WHITESPACE_RUN.replace_all(&stripped, " ").into_owned()
}

/// Remove every `(...)` span, innermost first.
pub fn strip_stage_directions(line: &str) -> Cow<'_, str> {
    let mut current = Cow::Borrowed(line);
    while STAGE_DIRECTION.is_match(&current) {
        current = Cow::Owned(STAGE_DIRECTION.replace_all(&current, "").into_owned());
    }
    current
}

/// Split a cleaned line on the first `": "`.
///
/// The speaker is trimmed; the dialogue is kept as is (a trailing space
/// left behind by a removed direction survives).
pub fn split_cue(
    line: &str,
    line_number: usize,
    options: ParseOptions,
) -> ParseResult<DialogueEntry> {
    let malformed = |defect| ParseError::MalformedCue {
        line_number,
        line: line.to_string(),
        defect,
    };

    let (speaker, dialogue) = line
        .split_once(CUE_SEPARATOR)
        .ok_or_else(|| malformed(CueDefect::MissingSeparator))?;

    let speaker = speaker.trim();
    if speaker.is_empty() {
        return Err(malformed(CueDefect::EmptySpeaker));
    }
    if !options.allow_extra_separators && dialogue.contains(CUE_SEPARATOR) {
        return Err(malformed(CueDefect::ExtraSeparator));
    }

    Ok(DialogueEntry::new(speaker, dialogue))
}
