//! File discovery and metadata collection.
//!
//! This is the boundary between the file system and the document store:
//! [`list_files`] finds candidate paths, [`describe_file`] turns a path into a
//! [`FileDescriptor`] with its character and token counts.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use walkdir::WalkDir;

use crate::config::Encoding;
use crate::error::{Result, TextDirectoryError};

/// Externally collected description of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    /// Path of the file.
    pub path: PathBuf,
    /// Length in characters.
    pub characters: Option<usize>,
    /// Length in tokens.
    pub tokens: Option<usize>,
}

/// Read a file and decode it, dropping undecodable bytes.
pub fn read_text<P: AsRef<Path>>(path: P, encoding: Encoding) -> Result<String> {
    let bytes = fs::read(path)?;
    Ok(encoding.decode(&bytes))
}

/// Count tokens the way the loader does: newlines become spaces and the text
/// is split on single spaces, so consecutive spaces yield empty tokens.
pub fn count_tokens(text: &str) -> usize {
    text.replace('\n', " ").split(' ').count()
}

/// Build a descriptor for `path`. With `fast` set the file is not read.
pub fn describe_file<P: AsRef<Path>>(path: P, encoding: Encoding, fast: bool) -> Result<FileDescriptor> {
    let path = path.as_ref().to_path_buf();

    if fast {
        return Ok(FileDescriptor {
            path,
            characters: None,
            tokens: None,
        });
    }

    let text = read_text(&path, encoding)?;
    Ok(FileDescriptor {
        characters: Some(text.chars().count()),
        tokens: Some(count_tokens(&text)),
        path,
    })
}

/// List files below `directory` whose extension matches `filetype`.
///
/// `filetype` is compared without the leading dot; `*` accepts any file that
/// has an extension. Paths are sorted when `sort` is set.
pub fn list_files<P: AsRef<Path>>(
    directory: P,
    recursive: bool,
    filetype: &str,
    sort: bool,
) -> Result<Vec<PathBuf>> {
    let directory = directory.as_ref();
    if !directory.is_dir() {
        return Err(TextDirectoryError::DirectoryNotFound(directory.to_path_buf()));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let filetype = filetype.trim_start_matches('.');
    let mut files = Vec::new();

    for entry in WalkDir::new(directory).min_depth(1).max_depth(max_depth) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {e}");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let matches = match entry.path().extension() {
            Some(ext) => filetype == "*" || ext.to_string_lossy() == filetype,
            None => false,
        };

        if matches {
            files.push(entry.into_path());
        }
    }

    if sort {
        files.sort();
    }

    debug!(
        "Found {} '{}' files in {}",
        files.len(),
        filetype,
        directory.display()
    );

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_count_tokens() {
        assert_eq!(count_tokens("one two\nthree"), 3);
        assert_eq!(count_tokens("one  two"), 3);
        assert_eq!(count_tokens(""), 1);
    }

    #[test]
    fn test_describe_file() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "a.txt", "Hello world\nagain");

        let descriptor = describe_file(&path, Encoding::Utf8, false).unwrap();
        assert_eq!(descriptor.characters, Some(17));
        assert_eq!(descriptor.tokens, Some(3));

        let fast = describe_file(&path, Encoding::Utf8, true).unwrap();
        assert_eq!(fast.characters, None);
    }

    #[test]
    fn test_list_files_recursive_and_filetype() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "b.txt", "b");
        write(dir.path(), "a.txt", "a");
        write(dir.path(), "c.md", "c");
        write(dir.path(), "nested/d.txt", "d");

        let flat = list_files(dir.path(), false, "txt", true).unwrap();
        let names: Vec<_> = flat
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);

        let deep = list_files(dir.path(), true, "txt", true).unwrap();
        assert_eq!(deep.len(), 3);

        let any = list_files(dir.path(), true, "*", true).unwrap();
        assert_eq!(any.len(), 4);
    }

    #[test]
    fn test_list_files_missing_directory() {
        let result = list_files("/definitely/not/here", true, "txt", true);
        assert!(matches!(result, Err(TextDirectoryError::DirectoryNotFound(_))));
    }
}
