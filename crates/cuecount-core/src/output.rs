//! Artifact layout and file helpers.
//!
//! Every run writes into one output directory:
//!
//! ```text
//! <output_dir>/
//!   clean_dialogue.txt      diagnostic dump of the parsed cues
//!   characters/<name>.txt   one file per character
//!   word_frequency.csv      ranked table (role,word,freq)
//!   word_frequency.svg      bar-chart panels
//! ```

use std::collections::HashSet;

use camino::{Utf8Path, Utf8PathBuf};

use crate::error::{OutputError, OutputResult};

/// File name of the diagnostic dialogue dump.
pub const DUMP_FILE: &str = "clean_dialogue.txt";

/// Directory holding one dialogue file per character.
pub const CHARACTERS_DIR: &str = "characters";

/// File name of the ranked word table.
pub const TABLE_FILE: &str = "word_frequency.csv";

/// File name of the rendered chart.
pub const CHART_FILE: &str = "word_frequency.svg";

/// Paths of every artifact below one output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: Utf8PathBuf,
}

impl OutputLayout {
    /// Lay out artifacts below `root`.
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The output directory itself.
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Diagnostic dump path.
    pub fn dump_path(&self) -> Utf8PathBuf {
        self.root.join(DUMP_FILE)
    }

    /// Directory of the per-character files.
    pub fn characters_dir(&self) -> Utf8PathBuf {
        self.root.join(CHARACTERS_DIR)
    }

    /// Result table path.
    pub fn table_path(&self) -> Utf8PathBuf {
        self.root.join(TABLE_FILE)
    }

    /// Chart path.
    pub fn chart_path(&self) -> Utf8PathBuf {
        self.root.join(CHART_FILE)
    }
}

/// Assigns each character a unique, filesystem-safe file path.
///
/// Names that sanitize to the same stem get a numeric suffix, in the
/// order they are requested.
#[derive(Debug)]
pub struct CharacterFileNamer {
    dir: Utf8PathBuf,
    taken: HashSet<String>,
}

impl CharacterFileNamer {
    /// Start naming files inside `layout`'s character directory.
    pub fn new(layout: &OutputLayout) -> Self {
        Self {
            dir: layout.characters_dir(),
            taken: HashSet::new(),
        }
    }

    /// Path for the next character.
    pub fn path_for(&mut self, name: &str) -> Utf8PathBuf {
        let stem = sanitize_file_stem(name);
        let mut candidate = stem.clone();
        let mut n = 2;
        while !self.taken.insert(candidate.clone()) {
            candidate = format!("{stem}-{n}");
            n += 1;
        }
        self.dir.join(format!("{candidate}.txt"))
    }
}

/// Turn a character name into a file stem.
///
/// Path separators, characters reserved on common filesystems, and
/// control characters become `_`. Names that would be empty or a
/// relative path component (`.`/`..`) become `_`.
pub fn sanitize_file_stem(name: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if stem.is_empty() || stem.chars().all(|c| c == '.') {
        "_".to_string()
    } else {
        stem
    }
}

/// Read the script file, refusing files above `max_bytes`.
pub fn read_input(path: &Utf8Path, max_bytes: Option<usize>) -> OutputResult<String> {
    // Preflight via metadata before reading into memory.
    let metadata = std::fs::metadata(path.as_std_path()).map_err(|source| OutputError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if let Some(limit) = max_bytes {
        let size = metadata.len();
        if size > limit as u64 {
            return Err(OutputError::TooLarge {
                path: path.to_path_buf(),
                size,
                limit,
            });
        }
    }
    read_text(path)
}

/// Read a UTF-8 text file.
pub fn read_text(path: &Utf8Path) -> OutputResult<String> {
    std::fs::read_to_string(path.as_std_path()).map_err(|source| OutputError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `contents` to `path`, creating parent directories as needed.
pub fn write_text(path: &Utf8Path, contents: &str) -> OutputResult<()> {
    ensure_parent(path)?;
    std::fs::write(path.as_std_path(), contents).map_err(|source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Create the parent directory of `path` if it is missing.
pub fn ensure_parent(path: &Utf8Path) -> OutputResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => std::fs::create_dir_all(parent)
            .map_err(|source| OutputError::Write {
                path: parent.to_path_buf(),
                source,
            }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn utf8(tmp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap()
    }

    #[test]
    fn layout_paths() {
        let layout = OutputLayout::new("out");
        assert_eq!(layout.dump_path(), Utf8PathBuf::from("out/clean_dialogue.txt"));
        assert_eq!(layout.characters_dir(), Utf8PathBuf::from("out/characters"));
        assert_eq!(layout.table_path(), Utf8PathBuf::from("out/word_frequency.csv"));
        assert_eq!(layout.chart_path(), Utf8PathBuf::from("out/word_frequency.svg"));
    }

    #[test]
    fn sanitizes_separators() {
        assert_eq!(sanitize_file_stem("ross/rachel"), "ross_rachel");
        assert_eq!(sanitize_file_stem("mr. geller"), "mr. geller");
        assert_eq!(sanitize_file_stem(".."), "_");
        assert_eq!(sanitize_file_stem("  "), "_");
    }

    #[test]
    fn namer_disambiguates_collisions() {
        let layout = OutputLayout::new("out");
        let mut namer = CharacterFileNamer::new(&layout);
        assert_eq!(namer.path_for("a/b"), Utf8PathBuf::from("out/characters/a_b.txt"));
        assert_eq!(namer.path_for("a_b"), Utf8PathBuf::from("out/characters/a_b-2.txt"));
        assert_eq!(namer.path_for("a:b"), Utf8PathBuf::from("out/characters/a_b-3.txt"));
    }

    #[test]
    fn write_creates_parent_dirs() {
        let tmp = TempDir::new().unwrap();
        let path = utf8(&tmp).join("nested").join("deep").join("file.txt");
        write_text(&path, "hello").unwrap();
        assert_eq!(read_text(&path).unwrap(), "hello");
    }

    #[test]
    fn read_input_enforces_limit() {
        let tmp = TempDir::new().unwrap();
        let path = utf8(&tmp).join("script.txt");
        write_text(&path, "0123456789").unwrap();

        assert!(read_input(&path, Some(100)).is_ok());
        assert!(read_input(&path, None).is_ok());
        let err = read_input(&path, Some(5)).unwrap_err();
        assert!(matches!(err, OutputError::TooLarge { size: 10, limit: 5, .. }));
    }

    #[test]
    fn missing_file_is_read_error() {
        let tmp = TempDir::new().unwrap();
        let err = read_input(&utf8(&tmp).join("nope.txt"), None).unwrap_err();
        assert!(matches!(err, OutputError::Read { .. }));
    }
}
