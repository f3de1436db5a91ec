//! Documents of a text directory.
//!
//! This module holds the universe of documents a working set draws from.
//!
//! # Core Components
//!
//! - [`record::DocumentRecord`] - One file with its load-time metadata and
//!   transformed-text cache
//! - [`store::DocumentStore`] - The immutable, append-once universe of records
//! - [`loader`] - File discovery and metadata collection
//!
//! # Examples
//!
//! ```
//! use std::path::PathBuf;
//! use textdirectory::document::loader::FileDescriptor;
//! use textdirectory::document::store::DocumentStore;
//!
//! let store = DocumentStore::load(vec![FileDescriptor {
//!     path: PathBuf::from("a.txt"),
//!     characters: Some(12),
//!     tokens: Some(3),
//! }])
//! .unwrap();
//!
//! assert_eq!(store.len(), 1);
//! assert_eq!(store.get(0).unwrap().filename, "a.txt");
//! ```

pub mod loader;
pub mod record;
pub mod store;

pub use loader::{FileDescriptor, describe_file, list_files, read_text};
pub use record::DocumentRecord;
pub use store::DocumentStore;
