//! Running the pipeline over the aggregation.
//!
//! [`WorkingSet::materialize_to_memory`] is the only operation that writes
//! transformed-text caches. The file and aggregate variants read raw content
//! and leave the caches alone.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;
use rayon::prelude::*;

use crate::error::{Result, TextDirectoryError};
use crate::working_set::WorkingSet;

impl WorkingSet {
    /// Raw content of a document run through the staged pipeline.
    pub fn transform_document(&self, reference: usize) -> Result<String> {
        let raw = self.store.raw_text(reference, self.config.encoding)?;
        self.pipeline.apply(&raw)
    }

    /// Distinct references of the aggregation, first occurrence order.
    fn distinct_references(&self) -> Vec<usize> {
        let mut seen = vec![false; self.store.len()];
        self.aggregation
            .iter()
            .copied()
            .filter(|&reference| {
                let fresh = !seen[reference];
                seen[reference] = true;
                fresh
            })
            .collect()
    }

    fn transform_all(&self, references: &[usize]) -> Result<Vec<String>> {
        if self.config.parallel {
            references
                .par_iter()
                .map(|&reference| self.transform_document(reference))
                .collect()
        } else {
            references
                .iter()
                .map(|&reference| self.transform_document(reference))
                .collect()
        }
    }

    /// Transform every document of the aggregation and cache the result.
    pub fn materialize_to_memory(&mut self) -> Result<()> {
        let references = self.distinct_references();
        let texts = self.transform_all(&references)?;
        for (reference, text) in references.iter().copied().zip(texts) {
            self.store.set_cache(reference, text)?;
        }
        info!("Materialized {} documents in memory", references.len());
        Ok(())
    }

    /// Transform every document of the aggregation and write it to
    /// `output_dir/<filename>`. Returns the number of files written.
    pub fn materialize_to_files<P: AsRef<Path>>(&self, output_dir: P) -> Result<usize> {
        let output_dir = output_dir.as_ref();
        if !output_dir.is_dir() {
            return Err(TextDirectoryError::DirectoryNotFound(output_dir.to_path_buf()));
        }

        let references = self.distinct_references();
        let texts = self.transform_all(&references)?;
        for (reference, text) in references.iter().copied().zip(texts) {
            if let Some(record) = self.store.get(reference) {
                fs::write(output_dir.join(&record.filename), text)?;
            }
        }

        info!(
            "Wrote {} documents to {}",
            references.len(),
            output_dir.display()
        );
        Ok(references.len())
    }

    /// Concatenate the transformed text of every document in the
    /// aggregation, without separators.
    pub fn aggregate_to_memory(&self) -> Result<String> {
        let mut aggregated = String::new();
        for &reference in &self.aggregation {
            aggregated.push_str(&self.transform_document(reference)?);
        }
        Ok(aggregated)
    }

    /// Stream the aggregated text to `path`.
    pub fn aggregate_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        for &reference in &self.aggregation {
            writer.write_all(self.transform_document(reference)?.as_bytes())?;
        }
        writer.flush()?;
        info!(
            "Aggregated {} documents into {}",
            self.aggregation.len(),
            path.display()
        );
        Ok(())
    }
}
