//! Filters that narrow a working set.
//!
//! A [`Filter`] is a value describing one narrowing step. Filters are run by
//! [`WorkingSet::apply_filter`](crate::working_set::WorkingSet::apply_filter),
//! which records a checkpoint before every effect.

#[allow(clippy::module_inception)]
pub mod filter;
pub mod similarity;

pub use filter::{AVAILABLE_FILTERS, Filter, FilterInfo, OutlierBounds};
pub use similarity::{SequenceMatcher, SimilarityRatio};
