//! Word frequency models for spelling correction.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use ahash::AHashMap;
use log::{debug, info};
use regex::Regex;

use crate::error::{LazyRegex, Result, TextDirectoryError, compiled};
use crate::transform::text::remove_html_tags;

/// File extension of serialized models.
pub const MODEL_EXTENSION: &str = "lm";

/// Runs of letters; digits and underscores break a word.
static WORD: LazyRegex = LazyLock::new(|| Regex::new(r"\b[^\d\W]+\b"));

/// A closed mapping from lowercase word to occurrence count.
///
/// The total count is the denominator for word probabilities.
#[derive(Debug, Clone, Default)]
pub struct FrequencyModel {
    frequencies: AHashMap<String, u64>,
    total_count: u64,
}

impl FrequencyModel {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the frequency of a word, replacing any previous count.
    pub fn add_word(&mut self, word: &str, frequency: u64) {
        let normalized = word.to_lowercase();
        let old = self.frequencies.insert(normalized, frequency).unwrap_or(0);
        self.total_count = self.total_count - old + frequency;
    }

    /// Increment the frequency of a word by one.
    pub fn increment_word(&mut self, word: &str) {
        let normalized = word.to_lowercase();
        *self.frequencies.entry(normalized).or_insert(0) += 1;
        self.total_count += 1;
    }

    /// Whether the word (already lowercase) is in the model.
    pub fn contains(&self, word: &str) -> bool {
        self.frequencies.contains_key(word)
    }

    /// Occurrence count of a lowercase word, 0 when unknown.
    pub fn frequency(&self, word: &str) -> u64 {
        self.frequencies.get(word).copied().unwrap_or(0)
    }

    /// `frequency(word) / total_frequency()`.
    pub fn probability(&self, word: &str) -> f64 {
        if self.total_count == 0 {
            return 0.0;
        }
        self.frequency(word) as f64 / self.total_count as f64
    }

    /// Number of distinct words.
    pub fn word_count(&self) -> usize {
        self.frequencies.len()
    }

    /// Sum of all counts.
    pub fn total_frequency(&self) -> u64 {
        self.total_count
    }

    /// The most frequent words, highest first, ties alphabetical.
    pub fn most_frequent_words(&self, limit: usize) -> Vec<(String, u64)> {
        let mut word_freq: Vec<(String, u64)> = self
            .frequencies
            .iter()
            .map(|(word, freq)| (word.clone(), *freq))
            .collect();

        word_freq.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        word_freq.truncate(limit);
        word_freq
    }

    /// Add the counts of another model to this one.
    pub fn merge(&mut self, other: &FrequencyModel) {
        for (word, frequency) in &other.frequencies {
            *self.frequencies.entry(word.clone()).or_insert(0) += frequency;
            self.total_count += frequency;
        }
    }

    /// Count every run of letters in `text`, lowercased.
    pub fn from_corpus(text: &str) -> Result<Self> {
        let mut model = FrequencyModel::new();
        model.count_text(text)?;
        Ok(model)
    }

    /// Build a model from every `*.txt` file directly inside `directory`.
    ///
    /// With `strip_tags` set, markup tags are removed before counting.
    pub fn from_corpus_dir<P: AsRef<Path>>(directory: P, strip_tags: bool) -> Result<Self> {
        let directory = directory.as_ref();
        if !directory.is_dir() {
            return Err(TextDirectoryError::DirectoryNotFound(directory.to_path_buf()));
        }

        let mut model = FrequencyModel::new();
        let mut files = 0;
        for entry in fs::read_dir(directory)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "txt") && path.is_file() {
                let bytes = fs::read(&path)?;
                let text = String::from_utf8_lossy(&bytes).to_lowercase();
                let text = if strip_tags {
                    remove_html_tags(&text)?
                } else {
                    text
                };
                model.count_text(&text)?;
                files += 1;
            }
        }

        info!(
            "Built model from {} files: {} words, {} tokens",
            files,
            model.word_count(),
            model.total_frequency()
        );

        Ok(model)
    }

    /// Load a model in the `word frequency` per line format.
    ///
    /// Lines that do not parse are skipped.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut model = FrequencyModel::new();
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        for line in reader.lines() {
            let line = line?;
            let mut parts = line.split_whitespace();
            if let (Some(word), Some(frequency)) = (parts.next(), parts.next())
                && let Ok(frequency) = frequency.parse::<u64>()
            {
                model.add_word(word, frequency);
            }
        }

        Ok(model)
    }

    /// Resolve `<models_dir>/<name>.lm` and load it.
    pub fn open<P: AsRef<Path>>(models_dir: P, name: &str) -> Result<Self> {
        let path = Self::model_path(models_dir, name);
        if !path.is_file() {
            return Err(TextDirectoryError::model_not_found(format!(
                "{name} ({})",
                path.display()
            )));
        }

        debug!("Loading language model {}", path.display());
        Self::load_from_file(path)
    }

    /// Path a named model is stored at.
    pub fn model_path<P: AsRef<Path>>(models_dir: P, name: &str) -> PathBuf {
        models_dir.as_ref().join(format!("{name}.{MODEL_EXTENSION}"))
    }

    /// Save in the `word frequency` per line format, most frequent first.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        for (word, frequency) in self.most_frequent_words(self.word_count()) {
            writeln!(writer, "{word} {frequency}")?;
        }
        writer.flush()?;
        Ok(())
    }

    fn count_text(&mut self, text: &str) -> Result<()> {
        let words = compiled(&WORD)?;
        for m in words.find_iter(text) {
            self.increment_word(m.as_str());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_add_and_probability() {
        let mut model = FrequencyModel::new();
        model.add_word("Hello", 3);
        model.add_word("world", 1);
        assert!(model.contains("hello"));
        assert_eq!(model.frequency("hello"), 3);
        assert_eq!(model.total_frequency(), 4);
        assert_eq!(model.probability("hello"), 0.75);
        assert_eq!(model.probability("missing"), 0.0);

        model.add_word("hello", 1);
        assert_eq!(model.total_frequency(), 2);
    }

    #[test]
    fn test_from_corpus_skips_digits() {
        let model = FrequencyModel::from_corpus("The cat, the hat and 42 cats2go").unwrap();
        assert_eq!(model.frequency("the"), 2);
        assert_eq!(model.frequency("cat"), 1);
        assert!(!model.contains("42"));
        assert!(!model.contains("cats2go"));
    }

    #[test]
    fn test_save_and_open() {
        let dir = TempDir::new().unwrap();
        let mut model = FrequencyModel::new();
        model.add_word("spelling", 10);
        model.add_word("mistakes", 4);
        model.save_to_file(FrequencyModel::model_path(dir.path(), "tiny")).unwrap();

        let loaded = FrequencyModel::open(dir.path(), "tiny").unwrap();
        assert_eq!(loaded.frequency("spelling"), 10);
        assert_eq!(loaded.total_frequency(), 14);

        let missing = FrequencyModel::open(dir.path(), "absent");
        assert!(matches!(missing, Err(TextDirectoryError::ModelNotFound(_))));
    }

    #[test]
    fn test_from_corpus_dir_strips_tags() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "<p>Word word</p>").unwrap();
        fs::write(dir.path().join("b.md"), "ignored").unwrap();

        let model = FrequencyModel::from_corpus_dir(dir.path(), true).unwrap();
        assert_eq!(model.frequency("word"), 2);
        assert!(!model.contains("p"));
        assert!(!model.contains("ignored"));
    }

    #[test]
    fn test_merge() {
        let mut a = FrequencyModel::from_corpus("one two").unwrap();
        let b = FrequencyModel::from_corpus("two three").unwrap();
        a.merge(&b);
        assert_eq!(a.frequency("two"), 2);
        assert_eq!(a.total_frequency(), 4);
    }
}
