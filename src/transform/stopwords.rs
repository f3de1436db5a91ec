//! Stopword lists and stopword removal.
//!
//! A stopword list is a newline delimited file whose first line is a header
//! and is skipped. The `internal` source resolves to a per-language list in
//! the configured stopwords directory, falling back to the lists compiled
//! into the crate.
//!
//! # Examples
//!
//! ```
//! use textdirectory::transform::annotate::RuleBasedAnnotator;
//! use textdirectory::transform::stopwords::{load_stopwords, remove_stopwords};
//!
//! let stopwords = load_stopwords("internal", "en", None).unwrap();
//! let text = remove_stopwords(&RuleBasedAnnotator::new(), "There is a house on the hill.", &stopwords).unwrap();
//! assert_eq!(text, "There is house hill.");
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use log::debug;

use crate::error::{Result, TextDirectoryError};
use crate::transform::annotate::Annotator;

/// Name of the source that resolves to the bundled lists.
pub const INTERNAL_STOPWORDS: &str = "internal";

const ENGLISH_STOPWORDS: &str = include_str!("../../data/stopwords/en.txt");

static BUILTIN_ENGLISH: LazyLock<HashSet<String>> =
    LazyLock::new(|| parse_stopword_list(ENGLISH_STOPWORDS));

/// Parse a stopword list, skipping the header line and blank lines.
pub fn parse_stopword_list(content: &str) -> HashSet<String> {
    content
        .lines()
        .skip(1)
        .map(|line| line.trim().to_lowercase())
        .filter(|word| !word.is_empty())
        .collect()
}

/// Load a stopword set.
///
/// `source` is either [`INTERNAL_STOPWORDS`] or the path of a list file.
/// Missing lists are reported as [`TextDirectoryError::ModelNotFound`].
pub fn load_stopwords(
    source: &str,
    language: &str,
    stopwords_dir: Option<&Path>,
) -> Result<HashSet<String>> {
    if source != INTERNAL_STOPWORDS {
        return read_list(Path::new(source));
    }

    if let Some(dir) = stopwords_dir {
        let path = dir.join(format!("{language}.txt"));
        if path.is_file() {
            return read_list(&path);
        }
    }

    match language {
        "en" => Ok(BUILTIN_ENGLISH.clone()),
        other => Err(TextDirectoryError::model_not_found(format!(
            "no internal stopword list for language '{other}'"
        ))),
    }
}

fn read_list(path: &Path) -> Result<HashSet<String>> {
    if !path.is_file() {
        return Err(TextDirectoryError::model_not_found(format!(
            "stopword list {}",
            path.display()
        )));
    }
    let words = parse_stopword_list(&fs::read_to_string(path)?);
    debug!("Loaded {} stopwords from {}", words.len(), path.display());
    Ok(words)
}

/// Add comma separated custom stopwords to a set.
pub fn extend_stopwords(stopwords: &mut HashSet<String>, custom: &str) {
    stopwords.extend(
        custom
            .split(',')
            .map(|word| word.trim().to_lowercase())
            .filter(|word| !word.is_empty()),
    );
}

/// Drop every token whose lowercase form is a stopword.
///
/// Kept tokens are re-joined with the whitespace that followed them.
pub fn remove_stopwords(
    annotator: &dyn Annotator,
    text: &str,
    stopwords: &HashSet<String>,
) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    for token in annotator.annotate(text)? {
        if stopwords.contains(&token.text.to_lowercase()) {
            continue;
        }
        out.push_str(&token.text);
        out.push_str(&token.whitespace);
    }
    Ok(out)
}
