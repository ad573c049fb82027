//! File-level pipeline stages.
//!
//! [`ScriptParser`] reads the script and writes the dialogue artifacts;
//! [`FrequencyAnalyzer`] ranks the per-character files and renders the
//! chart. Each stage hands its result to the next as a value, so a caller
//! can start from any stage:
//!
//! ```no_run
//! use camino::Utf8Path;
//! use cuecount_core::{Config, FrequencyAnalyzer};
//!
//! let analyzer = FrequencyAnalyzer::from_config(&Config::default());
//! let report = analyzer.word_frequency(Utf8Path::new("script.txt")).unwrap();
//! for row in report.table.rows() {
//!     println!("{} {} {}", row.role, row.word, row.freq);
//! }
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;

use crate::chart::{Chart, ChartStyle};
use crate::config::{CharacterOrder, Config};
use crate::corpus::ScriptCorpus;
use crate::error::Result;
use crate::frequency::{CharacterProfile, FrequencyOptions, profile_character};
use crate::output::{self, CharacterFileNamer, OutputLayout};
use crate::parser::{ParseOptions, ParsedScript, parse_script};
use crate::repr;
use crate::table::ResultTable;

/// A written per-character dialogue file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterFile {
    /// Lowercase character name.
    pub name: String,
    /// Where the lines were written.
    pub path: Utf8PathBuf,
    /// Number of dialogue lines in the file.
    pub lines: usize,
}

/// Result of [`ScriptParser::separate`].
#[derive(Debug, Clone)]
pub struct Separation {
    /// The parsed script the files were written from.
    pub parsed: ParsedScript,
    /// One entry per distinct character, in the requested order.
    pub files: Vec<CharacterFile>,
}

/// Reads scripts and writes the dump and character files.
#[derive(Debug, Clone)]
pub struct ScriptParser {
    options: ParseOptions,
    layout: OutputLayout,
    input_limit: Option<usize>,
}

impl ScriptParser {
    /// Create a parser writing below `output_dir`.
    pub fn new(output_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            options: ParseOptions::default(),
            layout: OutputLayout::new(output_dir),
            input_limit: Some(crate::DEFAULT_MAX_INPUT_BYTES),
        }
    }

    /// Create a parser from loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            options: config.parse_options(),
            layout: OutputLayout::new(config.output_dir()),
            input_limit: config.input_limit(),
        }
    }

    /// Override the parse options.
    pub const fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Override the input size limit (`None` disables it).
    pub const fn with_input_limit(mut self, limit: Option<usize>) -> Self {
        self.input_limit = limit;
        self
    }

    /// Artifact locations.
    pub const fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// Parse in-memory script text with this parser's options.
    ///
    /// Nothing is read or written.
    pub fn extract_str(&self, text: &str) -> Result<ParsedScript> {
        Ok(parse_script(text, self.options)?)
    }

    /// Parse the script at `path` and write the diagnostic dump.
    ///
    /// The dump is overwritten on every call, so repeated runs over the
    /// same input leave identical files.
    #[tracing::instrument(skip_all, fields(path = %path))]
    pub fn extract(&self, path: &Utf8Path) -> Result<ParsedScript> {
        let text = output::read_input(path, self.input_limit)?;
        let parsed = parse_script(&text, self.options)?;

        let dump_path = self.layout.dump_path();
        output::write_text(&dump_path, &format!("{}\n", repr::render_corpus(&parsed.corpus)))?;
        tracing::info!(
            cues = parsed.corpus.len(),
            dump = %dump_path,
            "dialogue extracted"
        );
        Ok(parsed)
    }

    /// Write one dialogue file per character of an already parsed corpus.
    #[tracing::instrument(skip_all, fields(cues = corpus.len(), order = %order))]
    pub fn write_character_files(
        &self,
        corpus: &ScriptCorpus,
        order: CharacterOrder,
    ) -> Result<Vec<CharacterFile>> {
        let mut namer = CharacterFileNamer::new(&self.layout);
        let mut files = Vec::new();

        for group in corpus.partition(order) {
            let path = namer.path_for(&group.name);
            let mut contents = String::new();
            for line in &group.lines {
                contents.push_str(line);
                contents.push('\n');
            }
            output::write_text(&path, &contents)?;
            tracing::debug!(character = %group.name, lines = group.lines.len(), path = %path, "character file written");
            files.push(CharacterFile {
                name: group.name,
                lines: group.lines.len(),
                path,
            });
        }

        tracing::info!(characters = files.len(), "character files written");
        Ok(files)
    }

    /// Parse the script and write one dialogue file per character.
    pub fn separate(&self, path: &Utf8Path, order: CharacterOrder) -> Result<Separation> {
        let parsed = self.extract(path)?;
        let files = self.write_character_files(&parsed.corpus, order)?;
        Ok(Separation { parsed, files })
    }
}

/// Result of [`FrequencyAnalyzer::word_frequency`].
#[derive(Debug, Clone, Serialize)]
pub struct FrequencyReport {
    /// Character files the ranking was computed from.
    pub files: Vec<CharacterFile>,
    /// Characters that passed the vocabulary threshold.
    pub profiles: Vec<CharacterProfile>,
    /// The flattened ranking.
    pub table: ResultTable,
    /// Where the table was written.
    pub table_path: Utf8PathBuf,
}

/// Result of [`FrequencyAnalyzer::plot_graph`].
#[derive(Debug, Clone)]
pub struct PlotReport {
    /// Ranking the chart was drawn from.
    pub frequency: FrequencyReport,
    /// The chart.
    pub chart: Chart,
    /// Where the SVG was written.
    pub chart_path: Utf8PathBuf,
}

/// Ranks per-character vocabulary and draws the chart.
#[derive(Debug, Clone)]
pub struct FrequencyAnalyzer {
    parser: ScriptParser,
    options: FrequencyOptions,
    style: ChartStyle,
}

impl FrequencyAnalyzer {
    /// Create an analyzer around a parser with default ranking and style.
    pub fn new(parser: ScriptParser) -> Self {
        Self {
            parser,
            options: FrequencyOptions::default(),
            style: ChartStyle::default(),
        }
    }

    /// Create an analyzer from loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            parser: ScriptParser::from_config(config),
            options: config.frequency_options(),
            style: config.chart_style(),
        }
    }

    /// Override the ranking settings.
    pub fn with_options(mut self, options: FrequencyOptions) -> Self {
        self.options = options;
        self.style.top_n = options.top_n;
        self
    }

    /// Override the chart style.
    ///
    /// Bars per panel always follow the ranking's `top_n`.
    pub fn with_style(mut self, style: ChartStyle) -> Self {
        self.style = ChartStyle {
            top_n: self.options.top_n,
            ..style
        };
        self
    }

    /// The parser stage this analyzer runs first.
    pub const fn parser(&self) -> &ScriptParser {
        &self.parser
    }

    /// Rank characters from their dialogue files.
    ///
    /// Each file is read back from disk, so the ranking reflects exactly
    /// what [`ScriptParser::write_character_files`] produced.
    #[tracing::instrument(skip_all, fields(characters = files.len()))]
    pub fn rank_files(&self, files: &[CharacterFile]) -> Result<Vec<CharacterProfile>> {
        let mut profiles = Vec::new();
        for file in files {
            let text = output::read_text(&file.path)?;
            if let Some(profile) = profile_character(&file.name, &text, &self.options)? {
                tracing::debug!(
                    character = %profile.character,
                    vocabulary_size = profile.vocabulary_size,
                    "character ranked"
                );
                profiles.push(profile);
            }
        }
        Ok(profiles)
    }

    /// Separate the script, rank every character, and write the CSV table.
    #[tracing::instrument(skip_all, fields(path = %path))]
    pub fn word_frequency(&self, path: &Utf8Path) -> Result<FrequencyReport> {
        let separation = self.parser.separate(path, self.options.order)?;
        let profiles = self.rank_files(&separation.files)?;
        let table = ResultTable::from_profiles(&profiles);

        let table_path = self.parser.layout().table_path();
        table.write_csv(&table_path)?;
        tracing::info!(
            characters = separation.files.len(),
            ranked = profiles.len(),
            rows = table.len(),
            table = %table_path,
            "word frequency computed"
        );

        Ok(FrequencyReport {
            files: separation.files,
            profiles,
            table,
            table_path,
        })
    }

    /// Run [`FrequencyAnalyzer::word_frequency`] and render the chart as SVG.
    #[tracing::instrument(skip_all, fields(path = %path))]
    pub fn plot_graph(&self, path: &Utf8Path) -> Result<PlotReport> {
        let frequency = self.word_frequency(path)?;
        let chart = Chart::from_table(&frequency.table, self.style.clone());

        let chart_path = self.parser.layout().chart_path();
        output::write_text(&chart_path, &chart.to_svg())?;
        tracing::info!(panels = chart.panels().len(), chart = %chart_path, "chart rendered");

        Ok(PlotReport {
            frequency,
            chart,
            chart_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AnalysisError, Error, OutputError, ParseError};
    use tempfile::TempDir;

    struct Fixture {
        _tmp: TempDir,
        script: Utf8PathBuf,
        out: Utf8PathBuf,
    }

    fn fixture(script: &str) -> Fixture {
        let tmp = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        let path = root.join("script.txt");
        std::fs::write(&path, script).unwrap();
        Fixture {
            script: path,
            out: root.join("out"),
            _tmp: tmp,
        }
    }

    /// `distinct` distinct words spread over a few lines, `w0` said `top` times.
    fn speech(prefix: &str, distinct: usize, top: usize) -> Vec<String> {
        let mut words: Vec<String> = (0..distinct).map(|i| format!("{prefix}{i}")).collect();
        words.extend((1..top).map(|_| format!("{prefix}0")));
        words.chunks(12).map(|c| c.join(" ")).collect()
    }

    fn script_with(characters: &[(&str, Vec<String>)]) -> String {
        let mut script = String::from("The One With the Tests [Season 1]\n[Scene: Central Perk]\n");
        for (name, lines) in characters {
            for line in lines {
                script.push_str(&format!("{name}: {line}\n"));
            }
        }
        script
    }

    const SAMPLE: &str = "\
Episode: Pilot [Written by Someone]
[Scene: Intro]
Bob: Hi there (waves)
Alice: Hello Bob
Bob: (laughs) Nice
";

    #[test]
    fn extract_writes_python_style_dump() {
        let fx = fixture(SAMPLE);
        let parser = ScriptParser::new(&fx.out);
        let parsed = parser.extract(&fx.script).unwrap();

        assert_eq!(parsed.corpus.len(), 3);
        let dump = std::fs::read_to_string(parser.layout().dump_path()).unwrap();
        assert_eq!(
            dump,
            "[('Bob', 'Hi there '), ('Alice', 'Hello Bob'), ('Bob', 'Nice')]\n"
        );
    }

    #[test]
    fn extract_str_touches_no_files() {
        let fx = fixture(SAMPLE);
        let parser = ScriptParser::new(&fx.out);
        let parsed = parser.extract_str(SAMPLE).unwrap();

        assert_eq!(parsed.corpus.len(), 3);
        assert!(!fx.out.exists());
    }

    #[test]
    fn extract_is_idempotent() {
        let fx = fixture(SAMPLE);
        let parser = ScriptParser::new(&fx.out);

        let first = parser.extract(&fx.script).unwrap();
        let first_dump = std::fs::read_to_string(parser.layout().dump_path()).unwrap();
        let second = parser.extract(&fx.script).unwrap();
        let second_dump = std::fs::read_to_string(parser.layout().dump_path()).unwrap();

        assert_eq!(first, second);
        assert_eq!(first_dump, second_dump);
    }

    #[test]
    fn separate_writes_one_file_per_character() {
        let fx = fixture(SAMPLE);
        let parser = ScriptParser::new(&fx.out);
        let separation = parser.separate(&fx.script, CharacterOrder::FirstSeen).unwrap();

        let names: Vec<_> = separation.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["bob", "alice"]);

        let bob = std::fs::read_to_string(&separation.files[0].path).unwrap();
        assert_eq!(bob, "Hi there \nNice\n");
        let alice = std::fs::read_to_string(&separation.files[1].path).unwrap();
        assert_eq!(alice, "Hello Bob\n");
    }

    #[test]
    fn separate_merges_case_variants_and_is_complete() {
        let script = "Episode: 1 [Pilot]\nROSS: One\nRoss: Two\nross: Three\nJoey: Four\n";
        let fx = fixture(script);
        let parser = ScriptParser::new(&fx.out);
        let separation = parser.separate(&fx.script, CharacterOrder::Alphabetical).unwrap();

        assert_eq!(separation.files.len(), 2);
        assert_eq!(separation.files[0].name, "joey");
        assert_eq!(separation.files[1].lines, 3);

        let written: usize = separation
            .files
            .iter()
            .map(|f| std::fs::read_to_string(&f.path).unwrap().lines().count())
            .sum();
        assert_eq!(written, separation.parsed.corpus.len());
    }

    #[test]
    fn malformed_input_aborts_before_writing() {
        let fx = fixture("Ross: no markers here\n");
        let parser = ScriptParser::new(&fx.out);
        let err = parser.extract(&fx.script).unwrap_err();

        assert!(matches!(err, Error::Parse(ParseError::MalformedInput)));
        assert!(!parser.layout().dump_path().exists());
    }

    #[test]
    fn bracket_line_without_colon_is_not_front_matter() {
        let fx = fixture("Pilot [Season 1]\nRoss: Hi\n");
        let parser = ScriptParser::new(&fx.out);
        let err = parser.extract(&fx.script).unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::MalformedInput)));

        let parsed = parser
            .extract_str("Pilot [Season 1]\n[Scene: Pier]\nRoss: Hi\n")
            .unwrap();
        assert_eq!(parsed.corpus.len(), 1);
        assert_eq!(parsed.corpus.entries()[0].speaker, "Ross");
    }

    #[test]
    fn missing_script_is_output_error() {
        let fx = fixture(SAMPLE);
        let parser = ScriptParser::new(&fx.out);
        let err = parser.extract(&fx.out.join("missing.txt")).unwrap_err();
        assert!(matches!(err, Error::Output(OutputError::Read { .. })));
    }

    #[test]
    fn oversized_script_is_rejected() {
        let fx = fixture(SAMPLE);
        let parser = ScriptParser::new(&fx.out).with_input_limit(Some(8));
        let err = parser.extract(&fx.script).unwrap_err();
        assert!(matches!(err, Error::Output(OutputError::TooLarge { .. })));
    }

    #[test]
    fn word_frequency_applies_threshold() {
        let mut chandler = speech("c", 100, 3);
        chandler.push(" I".repeat(26).trim().to_string());
        let script = script_with(&[
            ("Chandler", chandler),
            ("Ross", speech("r", 100, 5)),
            ("Gunther", vec!["Rachel.".to_string()]),
        ]);
        let fx = fixture(&script);
        let analyzer = FrequencyAnalyzer::new(ScriptParser::new(&fx.out));
        let report = analyzer.word_frequency(&fx.script).unwrap();

        // chandler: 101 distinct, ross: exactly 100, gunther: 1
        assert_eq!(report.profiles.len(), 1);
        assert_eq!(report.table.len(), 5);
        let first = &report.table.rows()[0];
        assert_eq!(
            (first.role.as_str(), first.word.as_str(), first.freq),
            ("chandler", "i", 26)
        );
        assert!(!report.table.rows().iter().any(|r| r.role == "ross"));

        let persisted = ResultTable::read_csv(&report.table_path).unwrap();
        assert_eq!(persisted, report.table);
    }

    #[test]
    fn table_blocks_are_ranked_and_shaped() {
        let script = script_with(&[
            ("Monica", speech("m", 130, 20)),
            ("Joey", speech("j", 140, 18)),
            ("Phoebe", speech("p", 120, 6)),
        ]);
        let fx = fixture(&script);
        let analyzer = FrequencyAnalyzer::new(ScriptParser::new(&fx.out));
        let report = analyzer.word_frequency(&fx.script).unwrap();

        assert_eq!(report.table.len() % 5, 0);
        let roles: Vec<_> = report.table.blocks(5).map(|b| b[0].role.clone()).collect();
        assert_eq!(roles, vec!["monica", "joey", "phoebe"]);
        for block in report.table.blocks(5) {
            assert!(block.iter().all(|r| r.role == block[0].role));
            assert!(block.windows(2).all(|pair| pair[0].freq >= pair[1].freq));
        }
    }

    #[test]
    fn threshold_holds_against_character_files() {
        let script = script_with(&[
            ("Monica", speech("m", 130, 2)),
            ("Ross", speech("r", 90, 2)),
            ("Rachel", speech("x", 101, 1)),
        ]);
        let fx = fixture(&script);
        let analyzer = FrequencyAnalyzer::new(ScriptParser::new(&fx.out));
        let report = analyzer.word_frequency(&fx.script).unwrap();

        for file in &report.files {
            let text = std::fs::read_to_string(&file.path).unwrap().to_lowercase();
            let distinct: std::collections::HashSet<_> = text.split_whitespace().collect();
            let ranked = report.table.rows().iter().any(|r| r.role == file.name);
            assert_eq!(ranked, distinct.len() > 100, "{}", file.name);
        }
    }

    #[test]
    fn no_qualifying_character_gives_empty_table() {
        let fx = fixture(SAMPLE);
        let analyzer = FrequencyAnalyzer::new(ScriptParser::new(&fx.out));
        let report = analyzer.word_frequency(&fx.script).unwrap();

        assert!(report.table.is_empty());
        assert_eq!(
            std::fs::read_to_string(&report.table_path).unwrap(),
            "role,word,freq\n"
        );
    }

    #[test]
    fn insufficient_data_surfaces() {
        let fx = fixture(SAMPLE);
        let analyzer = FrequencyAnalyzer::new(ScriptParser::new(&fx.out)).with_options(
            FrequencyOptions {
                vocabulary_threshold: 0,
                top_n: 5,
                order: CharacterOrder::FirstSeen,
            },
        );
        let err = analyzer.word_frequency(&fx.script).unwrap_err();
        assert!(matches!(
            err,
            Error::Analysis(AnalysisError::InsufficientData { .. })
        ));
    }

    #[test]
    fn plot_graph_writes_svg() {
        let script = script_with(&[
            ("Ross", speech("r", 120, 21)),
            ("Rachel", speech("x", 110, 8)),
        ]);
        let fx = fixture(&script);
        let analyzer = FrequencyAnalyzer::new(ScriptParser::new(&fx.out));
        let report = analyzer.plot_graph(&fx.script).unwrap();

        assert_eq!(report.chart.panels().len(), 2);
        let svg = std::fs::read_to_string(&report.chart_path).unwrap();
        assert!(svg.contains("Top 5 words used by ross"));
        assert!(svg.contains("Top 5 words used by rachel"));
    }

    #[test]
    fn style_override_keeps_ranking_top_n() {
        let script = script_with(&[
            ("Ross", speech("r", 120, 9)),
            ("Rachel", speech("x", 110, 4)),
        ]);
        let fx = fixture(&script);
        let analyzer = FrequencyAnalyzer::new(ScriptParser::new(&fx.out))
            .with_options(FrequencyOptions {
                vocabulary_threshold: 100,
                top_n: 3,
                order: CharacterOrder::FirstSeen,
            })
            .with_style(ChartStyle::default());
        let report = analyzer.plot_graph(&fx.script).unwrap();

        assert_eq!(report.chart.panels().len(), 2);
        for panel in report.chart.panels() {
            assert_eq!(panel.bars.len(), 3);
            assert!(panel.title.starts_with("Top 3 words"));
        }
        let owners: Vec<_> = report
            .frequency
            .table
            .blocks(3)
            .map(|block| block.iter().all(|r| r.role == block[0].role))
            .collect();
        assert_eq!(owners, vec![true, true]);
    }

    #[test]
    fn from_config_uses_output_dir_and_top_n() {
        let fx = fixture(&script_with(&[("Ross", speech("r", 120, 9))]));
        let config = Config {
            output_dir: Some(fx.out.clone()),
            top_n: 3,
            ..Config::default()
        };
        let analyzer = FrequencyAnalyzer::from_config(&config);
        let report = analyzer.plot_graph(&fx.script).unwrap();

        assert_eq!(report.frequency.table.len(), 3);
        assert_eq!(report.chart.panels()[0].title, "Top 3 words used by ross");
        assert!(fx.out.join("word_frequency.svg").is_file());
    }
}
