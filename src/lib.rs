//! # textdirectory
//!
//! Treat a directory of text files as a working set: narrow it down with
//! filters, rewind through the checkpoint recorded before every filter, and
//! run the surviving documents through a staged chain of transformations.
//!
//! ## Features
//!
//! - Threshold, substring, filename, sampling, outlier and similarity filters
//! - Append-only checkpoint history with rewinding
//! - Registry of named transformations applied as an ordered pipeline
//! - Frequency based spelling correction with candidate caching
//! - Pluggable annotation and similarity capabilities
//!
//! ## Example
//!
//! ```no_run
//! use textdirectory::prelude::*;
//!
//! let mut set = WorkingSet::open("corpus", TextDirectoryConfig::default())?;
//! set.filter_by_max_chars(5_000)?;
//! set.filter_by_random_sampling(10, false)?;
//! set.stage_transformation("transformation_remove_htmltags", Vec::new())?;
//! set.aggregate_to_file("aggregated.txt")?;
//! # Ok::<(), TextDirectoryError>(())
//! ```

pub mod checkpoint;
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod filter;
pub mod spelling;
pub mod transform;
pub mod working_set;

pub mod prelude {
    pub use crate::config::{Encoding, TextDirectoryConfig};
    pub use crate::error::{Result, TextDirectoryError};
    pub use crate::filter::{Filter, OutlierBounds};
    pub use crate::spelling::SpellCorrector;
    pub use crate::transform::Pipeline;
    pub use crate::working_set::WorkingSet;
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
