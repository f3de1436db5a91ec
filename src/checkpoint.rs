//! Checkpoint history of a working set.
//!
//! Every filter records a [`Checkpoint`] before it runs, so the history
//! holds the pre-image of each filter together with the trail of filter
//! names up to and including that filter. The history only grows; rewinding
//! moves the current pointer without discarding later checkpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TextDirectoryError};

/// A recorded aggregation and the filter trail at capture time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// References into the document store, in aggregation order.
    pub aggregation: Vec<usize>,
    /// Cumulative filter names at capture time.
    pub applied_filters: Vec<String>,
    /// When the checkpoint was taken.
    pub created_at: DateTime<Utc>,
}

/// Append-only log of checkpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckpointHistory {
    checkpoints: Vec<Checkpoint>,
    current: usize,
}

impl CheckpointHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a checkpoint and make it current. Returns its index.
    pub fn save(&mut self, aggregation: &[usize], applied_filters: &[String]) -> usize {
        self.checkpoints.push(Checkpoint {
            aggregation: aggregation.to_vec(),
            applied_filters: applied_filters.to_vec(),
            created_at: Utc::now(),
        });
        self.current = self.checkpoints.len() - 1;
        self.current
    }

    /// Make checkpoint `index` current and return it.
    pub fn load(&mut self, index: usize) -> Result<&Checkpoint> {
        if index >= self.checkpoints.len() {
            return Err(TextDirectoryError::CheckpointOutOfRange {
                index,
                len: self.checkpoints.len(),
            });
        }
        self.current = index;
        Ok(&self.checkpoints[index])
    }

    /// Get a checkpoint without moving the pointer.
    pub fn get(&self, index: usize) -> Option<&Checkpoint> {
        self.checkpoints.get(index)
    }

    /// Index of the active checkpoint.
    pub fn current(&self) -> usize {
        self.current
    }

    /// Number of recorded checkpoints.
    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    /// Iterate over all checkpoints in recording order.
    pub fn iter(&self) -> impl Iterator<Item = &Checkpoint> {
        self.checkpoints.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load() {
        let mut history = CheckpointHistory::new();
        assert!(history.is_empty());

        history.save(&[0, 1, 2], &[]);
        history.save(&[0, 1, 2], &["filter_by_max_chars".to_string()]);
        history.save(&[1], &["filter_by_max_chars".to_string(), "filter_by_contains".to_string()]);
        assert_eq!(history.len(), 3);
        assert_eq!(history.current(), 2);

        let checkpoint = history.load(1).unwrap().clone();
        assert_eq!(checkpoint.aggregation, vec![0, 1, 2]);
        assert_eq!(checkpoint.applied_filters, vec!["filter_by_max_chars"]);
        assert_eq!(history.current(), 1);

        // Rewinding keeps later checkpoints.
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_load_out_of_range() {
        let mut history = CheckpointHistory::new();
        history.save(&[0], &[]);
        let result = history.load(4);
        assert!(matches!(
            result,
            Err(TextDirectoryError::CheckpointOutOfRange { index: 4, len: 1 })
        ));
    }
}
