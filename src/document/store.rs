//! The document universe.

use std::path::Path;

use log::info;

use crate::config::Encoding;
use crate::document::loader::{FileDescriptor, read_text};
use crate::document::record::DocumentRecord;
use crate::error::{Result, TextDirectoryError};

/// Holds every document loaded for a working set.
///
/// The store never shrinks and record order never changes, so an index into
/// the store is a stable document reference.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    records: Vec<DocumentRecord>,
}

impl DocumentStore {
    /// Populate the universe from file descriptors.
    pub fn load(descriptors: Vec<FileDescriptor>) -> Result<Self> {
        if descriptors.is_empty() {
            return Err(TextDirectoryError::EmptyCorpus(Default::default()));
        }

        let records: Vec<DocumentRecord> = descriptors
            .into_iter()
            .map(|d| DocumentRecord::new(d.path, d.characters, d.tokens))
            .collect();

        info!("Loaded {} documents", records.len());

        Ok(DocumentStore { records })
    }

    /// Get a record by reference.
    pub fn get(&self, reference: usize) -> Option<&DocumentRecord> {
        self.records.get(reference)
    }

    /// Populate the transformed-text cache of one record.
    pub fn set_cache(&mut self, reference: usize, text: String) -> Result<()> {
        let record = self.records.get_mut(reference).ok_or_else(|| {
            TextDirectoryError::invalid_argument(format!("no document with reference {reference}"))
        })?;
        record.transformed_text = Some(text);
        Ok(())
    }

    /// Drop every cached transformed text.
    pub fn clear_caches(&mut self) {
        for record in &mut self.records {
            record.transformed_text = None;
        }
    }

    /// Read the untransformed content of a record from disk.
    pub fn raw_text(&self, reference: usize, encoding: Encoding) -> Result<String> {
        let record = self.require(reference)?;
        read_text(&record.path, encoding)
    }

    /// The text consumers should see: the cache when populated, otherwise the
    /// raw file content.
    pub fn text(&self, reference: usize, encoding: Encoding) -> Result<String> {
        let record = self.require(reference)?;
        match record.transformed_text() {
            Some(text) => Ok(text.to_string()),
            None => read_text(&record.path, encoding),
        }
    }

    /// Position of the first record with the given path.
    pub fn position(&self, path: &Path) -> Option<usize> {
        self.records.iter().position(|r| r.path == path)
    }

    /// Number of documents in the universe.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the universe is empty. A loaded store never is.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in load order.
    pub fn records(&self) -> &[DocumentRecord] {
        &self.records
    }

    fn require(&self, reference: usize) -> Result<&DocumentRecord> {
        self.records.get(reference).ok_or_else(|| {
            TextDirectoryError::invalid_argument(format!("no document with reference {reference}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn descriptor(path: PathBuf) -> FileDescriptor {
        FileDescriptor {
            path,
            characters: Some(5),
            tokens: Some(1),
        }
    }

    #[test]
    fn test_load_empty_fails() {
        let result = DocumentStore::load(Vec::new());
        assert!(matches!(result, Err(TextDirectoryError::EmptyCorpus(_))));
    }

    #[test]
    fn test_text_prefers_cache() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "hello").unwrap();

        let mut store = DocumentStore::load(vec![descriptor(path.clone())]).unwrap();
        assert_eq!(store.text(0, Encoding::Utf8).unwrap(), "hello");

        store.set_cache(0, "HELLO".to_string()).unwrap();
        assert_eq!(store.text(0, Encoding::Utf8).unwrap(), "HELLO");
        assert_eq!(store.raw_text(0, Encoding::Utf8).unwrap(), "hello");
        assert_eq!(store.position(&path), Some(0));

        store.clear_caches();
        assert!(!store.get(0).unwrap().is_transformed());
    }

    #[test]
    fn test_set_cache_out_of_range() {
        let mut store = DocumentStore::load(vec![descriptor(PathBuf::from("a.txt"))]).unwrap();
        assert!(store.set_cache(3, String::new()).is_err());
    }
}
