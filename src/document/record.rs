//! A single document and its load-time metadata.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One file in the document universe.
///
/// Character and token counts are computed once at load time. The transformed
/// text cache is the only field that changes afterwards, and only through
/// [`DocumentStore::set_cache`](crate::document::store::DocumentStore::set_cache).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Path of the file, stable for the lifetime of the store.
    pub path: PathBuf,
    /// Final path component.
    pub filename: String,
    /// Number of characters, `None` when loaded in fast mode.
    pub characters: Option<usize>,
    /// Number of space separated tokens, `None` when loaded in fast mode.
    pub tokens: Option<usize>,
    pub(crate) transformed_text: Option<String>,
}

impl DocumentRecord {
    /// Create a record without a populated cache.
    pub fn new(path: PathBuf, characters: Option<usize>, tokens: Option<usize>) -> Self {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        DocumentRecord {
            path,
            filename,
            characters,
            tokens,
            transformed_text: None,
        }
    }

    /// Character count as seen by threshold filters.
    ///
    /// Records loaded without metadata count as empty.
    pub fn character_count(&self) -> usize {
        self.characters.unwrap_or(0)
    }

    /// Token count as seen by threshold filters.
    pub fn token_count(&self) -> usize {
        self.tokens.unwrap_or(0)
    }

    /// The cached transformed text, if any.
    pub fn transformed_text(&self) -> Option<&str> {
        self.transformed_text.as_deref()
    }

    /// Whether a transformation has been materialized into this record.
    pub fn is_transformed(&self) -> bool {
        self.transformed_text.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_filename() {
        let record = DocumentRecord::new(PathBuf::from("corpus/level_2/Text_2_B.txt"), Some(10), Some(2));
        assert_eq!(record.filename, "Text_2_B.txt");
        assert_eq!(record.character_count(), 10);
        assert!(!record.is_transformed());
    }

    #[test]
    fn test_fast_record_counts_as_empty() {
        let record = DocumentRecord::new(PathBuf::from("a.txt"), None, None);
        assert_eq!(record.character_count(), 0);
        assert_eq!(record.token_count(), 0);
    }
}
