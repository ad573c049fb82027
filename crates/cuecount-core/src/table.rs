//! Flattened ranking table and its CSV form.

use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use crate::error::{OutputError, OutputResult};
use crate::frequency::CharacterProfile;
use crate::output::ensure_parent;

/// CSV header, in column order.
pub const COLUMNS: [&str; 3] = ["role", "word", "freq"];

/// One `(character, word, frequency)` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRow {
    /// Lowercase character name.
    pub role: String,
    /// Ranked word.
    pub word: String,
    /// Occurrences of the word.
    pub freq: usize,
}

/// Ranked words of every qualifying character.
///
/// Rows come in contiguous blocks of `top_n` per character, in character
/// order, each block ordered by rank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultTable {
    rows: Vec<ResultRow>,
}

impl ResultTable {
    /// Flatten character profiles into rows.
    pub fn from_profiles(profiles: &[CharacterProfile]) -> Self {
        let rows = profiles
            .iter()
            .flat_map(|profile| {
                profile.top_words.iter().map(|wc| ResultRow {
                    role: profile.character.clone(),
                    word: wc.word.clone(),
                    freq: wc.count,
                })
            })
            .collect();
        Self { rows }
    }

    /// All rows.
    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    /// Row count.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no character qualified.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Consecutive blocks of `size` rows, one per character.
    ///
    /// Relies on the block layout produced by [`ResultTable::from_profiles`];
    /// it is not re-checked here.
    pub fn blocks(&self, size: usize) -> std::slice::Chunks<'_, ResultRow> {
        self.rows.chunks(size.max(1))
    }

    /// Write the table as CSV (`role,word,freq`, no index column).
    ///
    /// The header is written even when the table is empty.
    #[tracing::instrument(skip(self), fields(rows = self.rows.len()))]
    pub fn write_csv(&self, path: &Utf8Path) -> OutputResult<()> {
        ensure_parent(path)?;
        let csv_err = |source| OutputError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path.as_std_path())
            .map_err(csv_err)?;
        writer.write_record(COLUMNS).map_err(csv_err)?;
        for row in &self.rows {
            writer.serialize(row).map_err(csv_err)?;
        }
        writer.flush().map_err(|source| OutputError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(path = %path, "result table written");
        Ok(())
    }

    /// Read a table previously written by [`ResultTable::write_csv`].
    pub fn read_csv(path: &Utf8Path) -> OutputResult<Self> {
        let csv_err = |source| OutputError::Csv {
            path: path.to_path_buf(),
            source,
        };
        let mut reader = csv::Reader::from_path(path.as_std_path()).map_err(csv_err)?;
        let rows = reader
            .deserialize()
            .collect::<Result<Vec<ResultRow>, _>>()
            .map_err(csv_err)?;
        Ok(Self { rows })
    }
}
