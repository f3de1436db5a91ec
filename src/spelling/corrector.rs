//! Frequency based spelling corrector.

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use ahash::AHashMap;
use log::debug;
use parking_lot::Mutex;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{LazyRegex, Result, compiled};
use crate::spelling::edits::{edits1, edits2};
use crate::spelling::model::FrequencyModel;

/// Name of the default language model.
pub const DEFAULT_LANGUAGE_MODEL: &str = "crudesc_lm_en";

static WORD_RUN: LazyRegex = LazyLock::new(|| Regex::new(r"\w+"));

/// A word that `correct_string` changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correction {
    /// The whitespace separated token as it appeared in the input.
    pub original: String,
    /// The token after correction.
    pub corrected: String,
}

/// Statistics about a spelling corrector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectorStats {
    /// Number of words in the model.
    pub model_words: usize,
    /// Total frequency count in the model.
    pub model_total_frequency: u64,
    /// Number of cached corrections.
    pub cached_corrections: usize,
}

/// Corrects words to the most probable known word within two edits.
///
/// Candidates are taken from the first non-empty of: the word itself if
/// known, known words one edit away, known words two edits away, and finally
/// the word unchanged. The candidate with the highest model probability wins;
/// ties go to the alphabetically first word.
///
/// The correction cache is behind a mutex, so one corrector can serve
/// several threads.
pub struct SpellCorrector {
    model: FrequencyModel,
    caching: bool,
    cache: Mutex<AHashMap<String, String>>,
}

impl SpellCorrector {
    /// Create a corrector over an already loaded model.
    pub fn new(model: FrequencyModel, caching: bool) -> Self {
        SpellCorrector {
            model,
            caching,
            cache: Mutex::new(AHashMap::new()),
        }
    }

    /// Load the named model from `models_dir`.
    pub fn open<P: AsRef<Path>>(models_dir: P, language_model: &str, caching: bool) -> Result<Self> {
        let model = FrequencyModel::open(models_dir, language_model)?;
        Ok(Self::new(model, caching))
    }

    /// The frequency model backing this corrector.
    pub fn model(&self) -> &FrequencyModel {
        &self.model
    }

    /// Probability of a lowercase word under the model.
    pub fn probability(&self, word: &str) -> f64 {
        self.model.probability(word)
    }

    /// The most probable spelling of `word`.
    ///
    /// Only an initial capital is preserved; the rest of the result is
    /// lowercase.
    pub fn correction(&self, word: &str) -> String {
        let Some(first) = word.chars().next() else {
            return String::new();
        };
        let capitalized = first.is_uppercase();
        let word = word.to_lowercase();

        if let Some(cached) = self.cache.lock().get(&word) {
            return restore_case(cached, capitalized);
        }

        let correction = self
            .candidates(&word)
            .into_iter()
            .max_by(|a, b| {
                self.probability(a)
                    .total_cmp(&self.probability(b))
                    .then_with(|| b.cmp(a))
            })
            .unwrap_or_else(|| word.clone());

        if correction != word {
            debug!("Corrected '{word}' to '{correction}'");
        }

        if self.caching {
            self.cache.lock().insert(word, correction.clone());
        }

        restore_case(&correction, capitalized)
    }

    /// Candidate corrections for a lowercase word, in the preference order
    /// exact, one edit, two edits, unchanged.
    pub fn candidates(&self, word: &str) -> HashSet<String> {
        if self.model.contains(word) {
            return HashSet::from([word.to_string()]);
        }

        let known = self.known(edits1(word));
        if !known.is_empty() {
            return known;
        }

        let known = self.known(edits2(word));
        if !known.is_empty() {
            return known;
        }

        HashSet::from([word.to_string()])
    }

    /// The subset of `words` present in the model.
    pub fn known<I: IntoIterator<Item = String>>(&self, words: I) -> HashSet<String> {
        words
            .into_iter()
            .filter(|w| self.model.contains(w))
            .collect()
    }

    /// Correct every whitespace separated token of `text`.
    ///
    /// The first run of word characters in each token is corrected while the
    /// surrounding punctuation is kept. Tokens are re-joined with single
    /// spaces.
    pub fn correct_string(&self, text: &str) -> Result<String> {
        Ok(self.correct_string_with_corrections(text)?.0)
    }

    /// Like [`correct_string`](Self::correct_string), also returning the
    /// tokens that changed.
    pub fn correct_string_with_corrections(&self, text: &str) -> Result<(String, Vec<Correction>)> {
        let word_run = compiled(&WORD_RUN)?;
        let mut corrected = Vec::new();
        let mut corrections = Vec::new();

        for token in text.split_whitespace() {
            let Some(m) = word_run.find(token) else {
                corrected.push(token.to_string());
                continue;
            };

            let replacement = format!(
                "{}{}{}",
                &token[..m.start()],
                self.correction(m.as_str()),
                &token[m.end()..]
            );

            if replacement != token {
                corrections.push(Correction {
                    original: token.to_string(),
                    corrected: replacement.clone(),
                });
            }
            corrected.push(replacement);
        }

        Ok((corrected.join(" "), corrections))
    }

    /// Get statistics about the corrector.
    pub fn stats(&self) -> CorrectorStats {
        CorrectorStats {
            model_words: self.model.word_count(),
            model_total_frequency: self.model.total_frequency(),
            cached_corrections: self.cache.lock().len(),
        }
    }

    /// Forget all cached corrections.
    pub fn clear_cache(&self) {
        self.cache.lock().clear();
    }
}

fn restore_case(word: &str, capitalized: bool) -> String {
    if !capitalized {
        return word.to_string();
    }
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corrector() -> SpellCorrector {
        let mut model = FrequencyModel::new();
        for (word, freq) in [
            ("there", 500),
            ("are", 800),
            ("two", 300),
            ("spelling", 20),
            ("mistakes", 15),
            ("in", 900),
            ("here", 400),
            ("something", 60),
            ("the", 1000),
            ("then", 200),
            ("than", 150),
        ] {
            model.add_word(word, freq);
        }
        SpellCorrector::new(model, true)
    }

    #[test]
    fn test_known_words_are_kept() {
        let corrector = corrector();
        assert_eq!(corrector.correction("spelling"), "spelling");
        assert_eq!(corrector.correction("the"), "the");
    }

    #[test]
    fn test_one_and_two_edits() {
        let corrector = corrector();
        assert_eq!(corrector.correction("spellling"), "spelling");
        assert_eq!(corrector.correction("mistaces"), "mistakes");
        assert_eq!(corrector.correction("sommthingg"), "something");
        assert_eq!(corrector.correction("somthin"), "something");
        assert_eq!(corrector.correction("qqqqq"), "qqqqq");
    }

    #[test]
    fn test_higher_frequency_wins() {
        // "thxn" is one edit from both "then" and "than".
        let corrector = corrector();
        assert_eq!(corrector.correction("thxn"), "then");
    }

    #[test]
    fn test_initial_capital_preserved() {
        let corrector = corrector();
        assert_eq!(corrector.correction("Spellling"), "Spelling");
        assert_eq!(corrector.correction("SPELLLING"), "Spelling");
    }

    #[test]
    fn test_unknown_word_unchanged_and_cached() {
        let corrector = corrector();
        assert_eq!(corrector.correction("zzzzzzzz"), "zzzzzzzz");
        assert_eq!(corrector.stats().cached_corrections, 1);
        corrector.clear_cache();
        assert_eq!(corrector.stats().cached_corrections, 0);
    }

    #[test]
    fn test_cache_keyed_by_input() {
        let corrector = corrector();
        corrector.correction("mistaces");
        assert_eq!(corrector.cache.lock().get("mistaces").map(String::as_str), Some("mistakes"));
    }

    #[test]
    fn test_no_caching() {
        let corrector = SpellCorrector::new(FrequencyModel::from_corpus("word").unwrap(), false);
        corrector.correction("wrd");
        assert_eq!(corrector.stats().cached_corrections, 0);
    }

    #[test]
    fn test_correct_string() {
        let corrector = corrector();
        let (text, corrections) = corrector
            .correct_string_with_corrections("There are two spellling mistaces in here.")
            .unwrap();
        assert_eq!(text, "There are two spelling mistakes in here.");
        assert_eq!(
            corrections,
            vec![
                Correction {
                    original: "spellling".to_string(),
                    corrected: "spelling".to_string()
                },
                Correction {
                    original: "mistaces".to_string(),
                    corrected: "mistakes".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_correct_string_keeps_punctuation_tokens() {
        let corrector = corrector();
        assert_eq!(
            corrector.correct_string("(spellling)  --  here").unwrap(),
            "(spelling) -- here"
        );
    }
}
