//! The working set: a text directory narrowed by filters.
//!
//! A [`WorkingSet`] owns the [`DocumentStore`] of a directory, the current
//! aggregation (ordered references into the store), the checkpoint history
//! and the transformation pipeline.
//!
//! Every filter goes through [`WorkingSet::apply_filter`], which appends the
//! filter name to the trail and records the aggregation as it stood before
//! the filter ran. [`WorkingSet::load_checkpoint`] rewinds to any recorded
//! state without discarding the ones after it.
//!
//! # Examples
//!
//! ```no_run
//! use textdirectory::config::TextDirectoryConfig;
//! use textdirectory::working_set::WorkingSet;
//!
//! let mut set = WorkingSet::open("corpus", TextDirectoryConfig::default()).unwrap();
//! set.filter_by_min_chars(100).unwrap();
//! set.filter_by_contains("lorem").unwrap();
//! set.stage_transformation("transformation_lowercase", Vec::new()).unwrap();
//!
//! let text = set.aggregate_to_memory().unwrap();
//! println!("{text}");
//! ```

pub mod materialize;
pub mod report;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

use crate::checkpoint::{Checkpoint, CheckpointHistory};
use crate::config::TextDirectoryConfig;
use crate::document::loader::{FileDescriptor, describe_file, list_files, read_text};
use crate::document::record::DocumentRecord;
use crate::document::store::DocumentStore;
use crate::error::{Result, TextDirectoryError};
use crate::filter::{Filter, OutlierBounds, SequenceMatcher, SimilarityRatio};
use crate::transform::annotate::Annotator;
use crate::transform::context::TransformContext;
use crate::transform::pipeline::{Pipeline, StagedTransformation};
use crate::transform::registry::TransformationRegistry;

/// A filterable, transformable view over a directory of text files.
pub struct WorkingSet {
    directory: PathBuf,
    config: TextDirectoryConfig,
    store: DocumentStore,
    aggregation: Vec<usize>,
    applied_filters: Vec<String>,
    history: CheckpointHistory,
    pipeline: Pipeline,
    rng: StdRng,
    similarity: Box<dyn SimilarityRatio>,
}

impl WorkingSet {
    /// Load every matching file below `directory`.
    ///
    /// Fails with [`TextDirectoryError::DirectoryNotFound`] when the
    /// directory is missing and [`TextDirectoryError::EmptyCorpus`] when no
    /// file matches the configured filetype.
    pub fn open<P: AsRef<Path>>(directory: P, config: TextDirectoryConfig) -> Result<Self> {
        let directory = directory.as_ref();
        let paths = list_files(directory, config.recursive, &config.filetype, config.sort)?;
        if paths.is_empty() {
            return Err(TextDirectoryError::EmptyCorpus(directory.to_path_buf()));
        }

        let descriptors = paths
            .iter()
            .map(|path| describe_file(path, config.encoding, config.fast))
            .collect::<Result<Vec<_>>>()?;

        Self::from_descriptors(directory, descriptors, config)
    }

    /// Build a working set from descriptors collected elsewhere.
    pub fn from_descriptors<P: AsRef<Path>>(
        directory: P,
        descriptors: Vec<FileDescriptor>,
        config: TextDirectoryConfig,
    ) -> Result<Self> {
        let directory = directory.as_ref().to_path_buf();
        let store = DocumentStore::load(descriptors).map_err(|e| match e {
            TextDirectoryError::EmptyCorpus(_) => TextDirectoryError::EmptyCorpus(directory.clone()),
            other => other,
        })?;

        let aggregation: Vec<usize> = (0..store.len()).collect();
        let mut history = CheckpointHistory::new();
        history.save(&aggregation, &[]);

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let pipeline = Pipeline::new(
            Arc::new(TransformationRegistry::builtin()),
            Arc::new(TransformContext::new(&config)),
        );

        info!(
            "Working set over {} with {} documents",
            directory.display(),
            store.len()
        );

        Ok(WorkingSet {
            directory,
            config,
            store,
            aggregation,
            applied_filters: Vec::new(),
            history,
            pipeline,
            rng,
            similarity: Box::new(SequenceMatcher::new()),
        })
    }

    /// Replace the annotator used by annotation based transformations.
    pub fn with_annotator(mut self, annotator: Arc<dyn Annotator>) -> Self {
        self.pipeline
            .set_context(Arc::new(TransformContext::with_annotator(&self.config, annotator)));
        self
    }

    /// Replace the similarity measure used by the similar-documents filter.
    pub fn with_similarity(mut self, similarity: Box<dyn SimilarityRatio>) -> Self {
        self.similarity = similarity;
        self
    }

    /// Reseed the random source used for sampling.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn config(&self) -> &TextDirectoryConfig {
        &self.config
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// References of the current aggregation, in order.
    pub fn aggregation(&self) -> &[usize] {
        &self.aggregation
    }

    /// Names of the filters that produced the current aggregation.
    pub fn applied_filters(&self) -> &[String] {
        &self.applied_filters
    }

    pub fn history(&self) -> &CheckpointHistory {
        &self.history
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Number of documents in the aggregation.
    pub fn len(&self) -> usize {
        self.aggregation.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aggregation.is_empty()
    }

    /// Records of the current aggregation, in order.
    pub fn iter(&self) -> impl Iterator<Item = &DocumentRecord> {
        self.aggregation
            .iter()
            .filter_map(|&reference| self.store.get(reference))
    }

    /// Transformed text of a document if it was materialized, otherwise its
    /// raw content.
    pub fn get_text(&self, reference: usize) -> Result<String> {
        self.store.text(reference, self.config.encoding)
    }

    /// Run a filter, recording a checkpoint of the aggregation it starts
    /// from.
    ///
    /// The character outlier filter returns the bounds it computed and runs
    /// its minimum and maximum character filters through this same method.
    /// Every other filter returns `None`. A filter that fails leaves the
    /// aggregation and history untouched.
    pub fn apply_filter(&mut self, filter: &Filter) -> Result<Option<OutlierBounds>> {
        if let Filter::CharsOutliers { sigmas } = filter {
            return self.apply_outlier_filter(filter, *sigmas);
        }

        let filtered = self.evaluate(filter)?;
        self.checkpoint(filter);
        debug!(
            "{} kept {} of {} documents",
            filter,
            filtered.len(),
            self.aggregation.len()
        );
        self.aggregation = filtered;
        Ok(None)
    }

    fn apply_outlier_filter(&mut self, filter: &Filter, sigmas: f64) -> Result<Option<OutlierBounds>> {
        let counts: Vec<usize> = self.iter().map(DocumentRecord::character_count).collect();
        let bounds = OutlierBounds::compute(&counts, sigmas);
        self.checkpoint(filter);

        let Some(bounds) = bounds else {
            return Ok(None);
        };
        debug!(
            "Character outliers: mean {:.1}, std {:.1}, keeping [{}, {}]",
            bounds.mean, bounds.std, bounds.min, bounds.max
        );

        // Counts are whole, so rounding inward keeps the float bounds exact.
        self.apply_filter(&Filter::MinChars(bounds.min.ceil() as i64))?;
        self.apply_filter(&Filter::MaxChars(bounds.max.floor() as i64))?;
        Ok(Some(bounds))
    }

    fn checkpoint(&mut self, filter: &Filter) {
        self.applied_filters.push(filter.name().to_string());
        self.history.save(&self.aggregation, &self.applied_filters);
    }

    /// Compute the aggregation a filter would produce.
    fn evaluate(&mut self, filter: &Filter) -> Result<Vec<usize>> {
        let encoding = self.config.encoding;
        let filtered = match filter {
            Filter::MaxChars(max) => self.keep(|r| r.character_count() as i64 <= *max),
            Filter::MinChars(min) => self.keep(|r| r.character_count() as i64 >= *min),
            Filter::MaxTokens(max) => self.keep(|r| r.token_count() as i64 <= *max),
            Filter::MinTokens(min) => self.keep(|r| r.token_count() as i64 >= *min),
            Filter::FilenameContains(needle) => self.keep(|r| r.filename.contains(needle.as_str())),
            Filter::FilenameNotContains(needle) => {
                self.keep(|r| !r.filename.contains(needle.as_str()))
            }
            Filter::Filenames(filenames) => self.keep(|r| filenames.contains(&r.filename)),
            Filter::Contains(needle) => {
                self.try_keep(|r| Ok(read_text(&r.path, encoding)?.contains(needle.as_str())))?
            }
            Filter::NotContains(needle) => {
                self.try_keep(|r| Ok(!read_text(&r.path, encoding)?.contains(needle.as_str())))?
            }
            Filter::MaxFilesize { max_kb } => {
                self.try_keep(|r| Ok(filesize_kb(&r.path)? <= *max_kb))?
            }
            Filter::MinFilesize { min_kb } => {
                self.try_keep(|r| Ok(filesize_kb(&r.path)? >= *min_kb))?
            }
            Filter::SimilarDocuments {
                reference_file,
                threshold,
            } => {
                if !(0.0..=1.0).contains(threshold) {
                    return Err(TextDirectoryError::InvalidThreshold(*threshold));
                }
                let reference = read_text(reference_file, encoding)?;
                let similarity = self.similarity.as_ref();
                self.try_keep(|r| {
                    let text = read_text(&r.path, encoding)?;
                    Ok(similarity.ratio(&reference, &text) >= *threshold)
                })?
            }
            Filter::RandomSampling { n, replace } => self.sample(*n, *replace)?,
            Filter::CharsOutliers { .. } => self.aggregation.clone(),
        };
        Ok(filtered)
    }

    fn keep<F>(&self, predicate: F) -> Vec<usize>
    where
        F: Fn(&DocumentRecord) -> bool,
    {
        self.aggregation
            .iter()
            .copied()
            .filter(|&reference| self.store.get(reference).is_some_and(&predicate))
            .collect()
    }

    fn try_keep<F>(&self, predicate: F) -> Result<Vec<usize>>
    where
        F: Fn(&DocumentRecord) -> Result<bool>,
    {
        let mut kept = Vec::with_capacity(self.aggregation.len());
        for &reference in &self.aggregation {
            if let Some(record) = self.store.get(reference)
                && predicate(record)?
            {
                kept.push(reference);
            }
        }
        Ok(kept)
    }

    fn sample(&mut self, n: usize, replace: bool) -> Result<Vec<usize>> {
        let available = self.aggregation.len();
        if n == 0 {
            return Ok(Vec::new());
        }
        if available == 0 || (!replace && n > available) {
            return Err(TextDirectoryError::SampleTooLarge {
                requested: n,
                available,
            });
        }

        let sampled = if replace {
            (0..n)
                .map(|_| {
                    let index = self.rng.random_range(0..available);
                    self.aggregation[index]
                })
                .collect()
        } else {
            rand::seq::index::sample(&mut self.rng, available, n)
                .into_iter()
                .map(|i| self.aggregation[i])
                .collect()
        };
        Ok(sampled)
    }

    /// Parse and run filters given by name and string arguments, in order.
    pub fn run_filters<S: AsRef<str>>(&mut self, filters: &[(S, Vec<String>)]) -> Result<()> {
        for (name, args) in filters {
            let filter = Filter::parse(name.as_ref(), args)?;
            self.apply_filter(&filter)?;
        }
        Ok(())
    }

    /// Restore the aggregation and filter trail recorded at `index`.
    pub fn load_checkpoint(&mut self, index: usize) -> Result<&Checkpoint> {
        let checkpoint = self.history.load(index)?;
        self.aggregation = checkpoint.aggregation.clone();
        self.applied_filters = checkpoint.applied_filters.clone();
        debug!(
            "Rewound to checkpoint {} with {} documents",
            index,
            self.aggregation.len()
        );
        Ok(checkpoint)
    }

    pub fn filter_by_max_chars(&mut self, max_chars: i64) -> Result<()> {
        self.apply_filter(&Filter::MaxChars(max_chars)).map(drop)
    }

    pub fn filter_by_min_chars(&mut self, min_chars: i64) -> Result<()> {
        self.apply_filter(&Filter::MinChars(min_chars)).map(drop)
    }

    pub fn filter_by_max_tokens(&mut self, max_tokens: i64) -> Result<()> {
        self.apply_filter(&Filter::MaxTokens(max_tokens)).map(drop)
    }

    pub fn filter_by_min_tokens(&mut self, min_tokens: i64) -> Result<()> {
        self.apply_filter(&Filter::MinTokens(min_tokens)).map(drop)
    }

    /// Keep documents whose raw content contains `contains`.
    pub fn filter_by_contains(&mut self, contains: &str) -> Result<()> {
        self.apply_filter(&Filter::Contains(contains.to_string())).map(drop)
    }

    /// Keep documents whose raw content does not contain `not_contains`.
    pub fn filter_by_not_contains(&mut self, not_contains: &str) -> Result<()> {
        self.apply_filter(&Filter::NotContains(not_contains.to_string()))
            .map(drop)
    }

    pub fn filter_by_filename_contains(&mut self, contains: &str) -> Result<()> {
        self.apply_filter(&Filter::FilenameContains(contains.to_string()))
            .map(drop)
    }

    pub fn filter_by_filename_not_contains(&mut self, not_contains: &str) -> Result<()> {
        self.apply_filter(&Filter::FilenameNotContains(not_contains.to_string()))
            .map(drop)
    }

    /// Keep only the listed filenames.
    pub fn filter_by_filenames<S: AsRef<str>>(&mut self, filenames: &[S]) -> Result<()> {
        let filenames = filenames.iter().map(|s| s.as_ref().to_string()).collect();
        self.apply_filter(&Filter::Filenames(filenames)).map(drop)
    }

    /// Draw `n` documents from the aggregation.
    ///
    /// Without replacement the draws are distinct and `n` may not exceed the
    /// aggregation size.
    pub fn filter_by_random_sampling(&mut self, n: usize, replace: bool) -> Result<()> {
        self.apply_filter(&Filter::RandomSampling { n, replace })
            .map(drop)
    }

    /// Drop documents whose character count lies more than `sigmas`
    /// standard deviations from the mean. Returns the computed bounds, or
    /// `None` for an empty aggregation.
    pub fn filter_by_chars_outliers(&mut self, sigmas: f64) -> Result<Option<OutlierBounds>> {
        self.apply_filter(&Filter::CharsOutliers { sigmas })
    }

    pub fn filter_by_max_filesize(&mut self, max_kb: f64) -> Result<()> {
        self.apply_filter(&Filter::MaxFilesize { max_kb }).map(drop)
    }

    pub fn filter_by_min_filesize(&mut self, min_kb: f64) -> Result<()> {
        self.apply_filter(&Filter::MinFilesize { min_kb }).map(drop)
    }

    /// Keep documents at least `threshold` similar to `reference_file`.
    pub fn filter_by_similar_documents<P: AsRef<Path>>(
        &mut self,
        reference_file: P,
        threshold: f64,
    ) -> Result<()> {
        self.apply_filter(&Filter::SimilarDocuments {
            reference_file: reference_file.as_ref().to_path_buf(),
            threshold,
        })
        .map(drop)
    }

    /// Queue a transformation by registered name.
    pub fn stage_transformation(&mut self, name: &str, args: Vec<String>) -> Result<()> {
        self.pipeline.stage(name, args)
    }

    /// Remove the first staged transformation with this name and arguments.
    pub fn unstage_transformation(&mut self, name: &str, args: &[String]) -> Result<()> {
        self.pipeline.unstage(name, args)
    }

    /// Destage every transformation and drop every cached text.
    pub fn clear_transformations(&mut self) {
        self.pipeline.clear();
        self.store.clear_caches();
    }

    pub fn staged_transformations(&self) -> &[StagedTransformation] {
        self.pipeline.staged()
    }
}

fn filesize_kb(path: &Path) -> Result<f64> {
    Ok(fs::metadata(path)?.len() as f64 / 1024.0)
}

impl std::fmt::Debug for WorkingSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkingSet")
            .field("directory", &self.directory)
            .field("documents", &self.store.len())
            .field("aggregation", &self.aggregation.len())
            .field("applied_filters", &self.applied_filters)
            .field("similarity", &self.similarity.name())
            .finish()
    }
}
