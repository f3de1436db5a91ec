//! Shared resources for transformation functions.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ahash::AHashMap;
use log::info;
use parking_lot::Mutex;

use crate::config::TextDirectoryConfig;
use crate::error::Result;
use crate::spelling::SpellCorrector;
use crate::transform::annotate::{Annotator, RuleBasedAnnotator};
use crate::transform::stopwords::load_stopwords;

/// Everything a transformation may need besides its text and arguments.
///
/// Spelling correctors and stopword lists are loaded on first use and kept
/// for the lifetime of the context, so a pipeline applied to many documents
/// reads each resource once.
pub struct TransformContext {
    annotator: Arc<dyn Annotator>,
    models_dir: PathBuf,
    stopwords_dir: Option<PathBuf>,
    spell_cache: bool,
    correctors: Mutex<AHashMap<String, Arc<SpellCorrector>>>,
    stopwords: Mutex<AHashMap<(String, String), Arc<HashSet<String>>>>,
}

impl TransformContext {
    /// Create a context using the built-in annotator.
    pub fn new(config: &TextDirectoryConfig) -> Self {
        Self::with_annotator(config, Arc::new(RuleBasedAnnotator::new()))
    }

    /// Create a context with a custom annotator.
    pub fn with_annotator(config: &TextDirectoryConfig, annotator: Arc<dyn Annotator>) -> Self {
        TransformContext {
            annotator,
            models_dir: config.models_dir.clone(),
            stopwords_dir: config.stopwords_dir.clone(),
            spell_cache: config.spell_cache,
            correctors: Mutex::new(AHashMap::new()),
            stopwords: Mutex::new(AHashMap::new()),
        }
    }

    pub fn annotator(&self) -> &dyn Annotator {
        self.annotator.as_ref()
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    /// The corrector for a language model, loading it on first use.
    pub fn corrector(&self, language_model: &str) -> Result<Arc<SpellCorrector>> {
        let mut correctors = self.correctors.lock();
        if let Some(corrector) = correctors.get(language_model) {
            return Ok(Arc::clone(corrector));
        }

        let corrector = Arc::new(SpellCorrector::open(
            &self.models_dir,
            language_model,
            self.spell_cache,
        )?);
        info!(
            "Loaded language model '{}' ({} words)",
            language_model,
            corrector.model().word_count()
        );
        correctors.insert(language_model.to_string(), Arc::clone(&corrector));
        Ok(corrector)
    }

    /// A stopword list, loading it on first use.
    pub fn stopwords(&self, source: &str, language: &str) -> Result<Arc<HashSet<String>>> {
        let key = (source.to_string(), language.to_string());
        let mut lists = self.stopwords.lock();
        if let Some(list) = lists.get(&key) {
            return Ok(Arc::clone(list));
        }

        let list = Arc::new(load_stopwords(
            source,
            language,
            self.stopwords_dir.as_deref(),
        )?);
        lists.insert(key, Arc::clone(&list));
        Ok(list)
    }
}

impl Default for TransformContext {
    fn default() -> Self {
        Self::new(&TextDirectoryConfig::default())
    }
}

impl std::fmt::Debug for TransformContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformContext")
            .field("annotator", &self.annotator.name())
            .field("models_dir", &self.models_dir)
            .field("stopwords_dir", &self.stopwords_dir)
            .field("spell_cache", &self.spell_cache)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TextDirectoryError;
    use crate::spelling::FrequencyModel;
    use tempfile::TempDir;

    #[test]
    fn test_corrector_loaded_once() {
        let dir = TempDir::new().unwrap();
        let model = FrequencyModel::from_corpus("the house on the hill").unwrap();
        model
            .save_to_file(FrequencyModel::model_path(dir.path(), "tiny"))
            .unwrap();

        let config = TextDirectoryConfig {
            models_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let context = TransformContext::new(&config);
        let first = context.corrector("tiny").unwrap();
        let second = context.corrector("tiny").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_missing_model() {
        let dir = TempDir::new().unwrap();
        let config = TextDirectoryConfig {
            models_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let context = TransformContext::new(&config);
        assert!(matches!(
            context.corrector("nope"),
            Err(TextDirectoryError::ModelNotFound(_))
        ));
    }

    #[test]
    fn test_stopwords_cached() {
        let context = TransformContext::default();
        let first = context.stopwords("internal", "en").unwrap();
        let second = context.stopwords("internal", "en").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
