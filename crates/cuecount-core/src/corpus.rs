//! Parsed dialogue and its per-character partition.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::CharacterOrder;

/// One cue: who spoke, and what they said.
///
/// The speaker keeps the casing found in the script but is trimmed of
/// surrounding whitespace; the parser rejects a cue whose speaker is empty
/// after trimming. Everything downstream compares speakers through
/// [`DialogueEntry::character`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueEntry {
    /// Speaker name as written, without surrounding whitespace.
    pub speaker: String,
    /// Cleaned dialogue text.
    pub line: String,
}

impl DialogueEntry {
    /// Create an entry from a speaker and a line.
    pub fn new(speaker: impl Into<String>, line: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            line: line.into(),
        }
    }

    /// Lowercase speaker name used for grouping.
    pub fn character(&self) -> String {
        self.speaker.to_lowercase()
    }
}

/// Ordered dialogue of one script file.
///
/// Built once by the parser and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScriptCorpus {
    entries: Vec<DialogueEntry>,
}

impl ScriptCorpus {
    /// Wrap an ordered list of entries.
    pub const fn new(entries: Vec<DialogueEntry>) -> Self {
        Self { entries }
    }

    /// Entries in script order.
    pub fn entries(&self) -> &[DialogueEntry] {
        &self.entries
    }

    /// Number of cues.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the script had no cues at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct lowercase character names in the requested order.
    pub fn characters(&self, order: CharacterOrder) -> Vec<String> {
        self.partition(order).into_iter().map(|c| c.name).collect()
    }

    /// Group the dialogue by lowercase speaker.
    ///
    /// Speakers that differ only by case end up in the same group. Lines
    /// inside a group keep script order.
    pub fn partition(&self, order: CharacterOrder) -> Vec<CharacterDialogue> {
        let mut groups: Vec<CharacterDialogue> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for entry in &self.entries {
            let name = entry.character();
            let slot = *index.entry(name.clone()).or_insert_with(|| {
                groups.push(CharacterDialogue {
                    name,
                    lines: Vec::new(),
                });
                groups.len() - 1
            });
            groups[slot].lines.push(entry.line.clone());
        }

        if order == CharacterOrder::Alphabetical {
            groups.sort_by(|a, b| a.name.cmp(&b.name));
        }
        groups
    }
}

impl<'a> IntoIterator for &'a ScriptCorpus {
    type Item = &'a DialogueEntry;
    type IntoIter = std::slice::Iter<'a, DialogueEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// All lines spoken by one character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterDialogue {
    /// Lowercase character name.
    pub name: String,
    /// Dialogue lines in script order.
    pub lines: Vec<String>,
}
