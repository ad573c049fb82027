//! Per-character word frequency ranking.
//!
//! Words are lowercase, whitespace-delimited tokens. Punctuation stays
//! attached, so `"i"` and `"i'm"` and `"i,"` are three different words.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::{CharacterOrder, DEFAULT_TOP_N, DEFAULT_VOCABULARY_THRESHOLD};
use crate::error::{AnalysisError, AnalysisResult};

/// Ranking settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyOptions {
    /// A character is ranked only with strictly more distinct words than this.
    pub vocabulary_threshold: usize,
    /// Words kept per ranked character.
    pub top_n: usize,
    /// Character iteration order.
    pub order: CharacterOrder,
}

impl Default for FrequencyOptions {
    fn default() -> Self {
        Self {
            vocabulary_threshold: DEFAULT_VOCABULARY_THRESHOLD,
            top_n: DEFAULT_TOP_N,
            order: CharacterOrder::default(),
        }
    }
}

/// A word and how often one character said it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCount {
    /// Lowercase token.
    pub word: String,
    /// Occurrences in the character's dialogue.
    pub count: usize,
}

/// Top words of one character with a large enough vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterProfile {
    /// Lowercase character name.
    pub character: String,
    /// Distinct words the character used.
    pub vocabulary_size: usize,
    /// Exactly `top_n` words, most frequent first.
    pub top_words: Vec<WordCount>,
}

/// Word counts of a text, in order of first occurrence.
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn count_words(text: &str) -> Vec<WordCount> {
    let lowered = text.to_lowercase();
    let mut counts: Vec<WordCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for word in lowered.split_whitespace() {
        match index.get(word) {
            Some(&slot) => counts[slot].count += 1,
            None => {
                index.insert(word, counts.len());
                counts.push(WordCount {
                    word: word.to_string(),
                    count: 1,
                });
            }
        }
    }

    counts
}

/// Rank the words of one character's dialogue.
///
/// Returns `Ok(None)` when the vocabulary is not larger than the
/// threshold. Equal counts keep first-occurrence order.
///
/// # Errors
///
/// [`AnalysisError::InsufficientData`] when a qualifying character has
/// fewer than `top_n` distinct words. Only reachable with a threshold
/// below `top_n`.
pub fn profile_character(
    character: &str,
    text: &str,
    options: &FrequencyOptions,
) -> AnalysisResult<Option<CharacterProfile>> {
    let mut counts = count_words(text);
    let vocabulary_size = counts.len();

    if vocabulary_size <= options.vocabulary_threshold {
        tracing::debug!(
            character,
            vocabulary_size,
            threshold = options.vocabulary_threshold,
            "vocabulary below threshold, skipping"
        );
        return Ok(None);
    }
    if vocabulary_size < options.top_n {
        return Err(AnalysisError::InsufficientData {
            character: character.to_string(),
            distinct: vocabulary_size,
            required: options.top_n,
        });
    }

    // stable: ties keep first-occurrence order
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(options.top_n);

    Ok(Some(CharacterProfile {
        character: character.to_string(),
        vocabulary_size,
        top_words: counts,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Text with `distinct` distinct words where `w0` is said `top` times.
    fn vocabulary(distinct: usize, top: usize) -> String {
        let mut words: Vec<String> = (0..distinct).map(|i| format!("w{i}")).collect();
        words.extend((1..top).map(|_| "w0".to_string()));
        words.join(" ")
    }

    #[test]
    fn counts_in_first_occurrence_order() {
        let counts = count_words("b a b c a b");
        let pairs: Vec<_> = counts.iter().map(|w| (w.word.as_str(), w.count)).collect();
        assert_eq!(pairs, vec![("b", 3), ("a", 2), ("c", 1)]);
    }

    #[test]
    fn counting_is_case_insensitive_but_punctuation_sensitive() {
        let counts = count_words("I i I'm i,\nI");
        let pairs: Vec<_> = counts.iter().map(|w| (w.word.as_str(), w.count)).collect();
        assert_eq!(pairs, vec![("i", 3), ("i'm", 1), ("i,", 1)]);
    }

    #[test]
    fn exactly_threshold_is_excluded() {
        let text = vocabulary(100, 1);
        let profile = profile_character("ross", &text, &FrequencyOptions::default()).unwrap();
        assert!(profile.is_none());
    }

    #[test]
    fn one_above_threshold_is_ranked() {
        let mut text = vocabulary(101, 1);
        text.push_str(&" i".repeat(26));
        // "i" is the 102nd distinct word
        let profile = profile_character("chandler", &text, &FrequencyOptions::default())
            .unwrap()
            .unwrap();
        assert_eq!(profile.vocabulary_size, 102);
        assert_eq!(profile.top_words.len(), 5);
        assert_eq!(profile.top_words[0].word, "i");
        assert_eq!(profile.top_words[0].count, 26);
    }

    #[test]
    fn i_twenty_six_times_with_101_distinct_words() {
        // 100 filler words plus "i"
        let mut text = vocabulary(100, 3);
        text.push_str(&" I".repeat(26));
        let profile = profile_character("chandler", &text, &FrequencyOptions::default())
            .unwrap()
            .unwrap();
        assert_eq!(profile.vocabulary_size, 101);
        assert_eq!(
            profile.top_words[0],
            WordCount {
                word: "i".to_string(),
                count: 26
            }
        );
        assert_eq!(profile.top_words[1].word, "w0");
        assert_eq!(profile.top_words[1].count, 3);
    }

    #[test]
    fn ranking_is_non_increasing() {
        let mut text = vocabulary(150, 1);
        for (i, n) in [4, 9, 2, 7, 7, 3].iter().enumerate() {
            text.push_str(&format!(" w{i}").repeat(*n));
        }
        let profile = profile_character("joey", &text, &FrequencyOptions::default())
            .unwrap()
            .unwrap();
        let counts: Vec<_> = profile.top_words.iter().map(|w| w.count).collect();
        assert!(counts.windows(2).all(|pair| pair[0] >= pair[1]));
        assert_eq!(counts, vec![10, 8, 8, 5, 4]);
    }

    #[test]
    fn ties_keep_first_occurrence() {
        let options = FrequencyOptions {
            vocabulary_threshold: 2,
            top_n: 3,
            ..FrequencyOptions::default()
        };
        let profile = profile_character("monica", "d c b a", &options)
            .unwrap()
            .unwrap();
        let words: Vec<_> = profile.top_words.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(words, vec!["d", "c", "b"]);
    }

    #[test]
    fn insufficient_data_with_low_threshold() {
        let options = FrequencyOptions {
            vocabulary_threshold: 1,
            top_n: 5,
            ..FrequencyOptions::default()
        };
        let err = profile_character("phoebe", "smelly cat", &options).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::InsufficientData {
                character: "phoebe".to_string(),
                distinct: 2,
                required: 5,
            }
        );
    }

    #[test]
    fn empty_text_is_skipped() {
        let profile = profile_character("gunther", "", &FrequencyOptions::default()).unwrap();
        assert!(profile.is_none());
    }
}
