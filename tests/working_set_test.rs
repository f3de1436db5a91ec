use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tempfile::{TempDir, tempdir};
use textdirectory::config::TextDirectoryConfig;
use textdirectory::error::TextDirectoryError;
use textdirectory::working_set::WorkingSet;

fn write(dir: &Path, name: &str, content: &str) {
    if let Some(parent) = dir.join(name).parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(dir.join(name), content).unwrap();
}

/// Five documents of increasing length, one of them nested.
fn corpus() -> TempDir {
    let dir = tempdir().unwrap();
    write(dir.path(), "01_tiny.txt", "Tiny.");
    write(dir.path(), "02_short.txt", "A short text about a house.");
    write(dir.path(), "03_medium.txt", &"The house on the hill. ".repeat(10));
    write(dir.path(), "04_long.txt", &"Lorem ipsum dolor sit amet. ".repeat(40));
    write(dir.path(), "nested/05_deep.txt", "A house in a nested directory.");
    dir
}

fn open(dir: &Path) -> WorkingSet {
    let config = TextDirectoryConfig {
        seed: Some(1234),
        ..Default::default()
    };
    WorkingSet::open(dir, config).unwrap()
}

fn filenames(set: &WorkingSet) -> Vec<String> {
    set.iter().map(|r| r.filename.clone()).collect()
}

#[test]
fn test_load_recursive_and_flat() {
    let dir = corpus();
    assert_eq!(open(dir.path()).len(), 5);

    let flat = WorkingSet::open(
        dir.path(),
        TextDirectoryConfig {
            recursive: false,
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(flat.len(), 4);
}

#[test]
fn test_fast_mode_counts_as_zero() {
    let dir = corpus();
    let mut set = WorkingSet::open(
        dir.path(),
        TextDirectoryConfig {
            fast: true,
            ..Default::default()
        },
    )
    .unwrap();
    assert!(set.iter().all(|r| r.characters.is_none()));

    set.filter_by_max_chars(0).unwrap();
    assert_eq!(set.len(), 5);
}

#[test]
fn test_max_then_larger_min_is_empty() {
    let dir = corpus();
    let mut set = open(dir.path());
    set.filter_by_max_chars(100).unwrap();
    set.filter_by_min_chars(101).unwrap();
    assert!(set.is_empty());
}

#[test]
fn test_checkpoint_round_trip() {
    let dir = corpus();
    let mut set = open(dir.path());

    let mut pre_images = Vec::new();
    pre_images.push(set.aggregation().to_vec());
    set.filter_by_contains("house").unwrap();
    pre_images.push(set.aggregation().to_vec());
    set.filter_by_max_tokens(20).unwrap();
    pre_images.push(set.aggregation().to_vec());
    set.filter_by_filename_not_contains("deep").unwrap();

    assert_eq!(filenames(&set), vec!["02_short.txt"]);
    assert_eq!(set.history().len(), 4);

    for (k, pre_image) in pre_images.iter().enumerate() {
        let checkpoint = set.load_checkpoint(k + 1).unwrap().clone();
        assert_eq!(&checkpoint.aggregation, pre_image);
        assert_eq!(checkpoint.applied_filters.len(), k + 1);
        assert_eq!(set.aggregation(), pre_image.as_slice());
    }

    // Filtering after a rewind appends instead of truncating.
    set.load_checkpoint(1).unwrap();
    set.filter_by_min_chars(1000).unwrap();
    assert_eq!(set.history().len(), 5);
    assert_eq!(set.history().current(), 4);
    assert_eq!(
        set.applied_filters(),
        &["filter_by_contains", "filter_by_min_chars"]
    );
}

#[test]
fn test_random_sampling_without_replacement() {
    let dir = corpus();
    let mut set = open(dir.path());
    set.filter_by_random_sampling(3, false).unwrap();
    assert_eq!(set.len(), 3);
    let distinct: HashSet<usize> = set.aggregation().iter().copied().collect();
    assert_eq!(distinct.len(), 3);

    assert!(matches!(
        set.filter_by_random_sampling(4, false),
        Err(TextDirectoryError::SampleTooLarge {
            requested: 4,
            available: 3
        })
    ));
}

#[test]
fn test_random_sampling_with_replacement() {
    let dir = corpus();
    let mut set = open(dir.path());
    set.filter_by_filenames(&["01_tiny.txt"]).unwrap();
    set.filter_by_random_sampling(4, true).unwrap();
    assert_eq!(set.len(), 4);
    assert!(set.iter().all(|r| r.filename == "01_tiny.txt"));
}

#[test]
fn test_sampling_is_reproducible_with_seed() {
    let dir = corpus();
    let mut first = open(dir.path());
    let mut second = open(dir.path());
    first.filter_by_random_sampling(3, false).unwrap();
    second.filter_by_random_sampling(3, false).unwrap();
    assert_eq!(first.aggregation(), second.aggregation());
}

#[test]
fn test_similarity_thresholds() {
    let dir = corpus();
    let reference = dir.path().join("02_short.txt");

    let mut set = open(dir.path());
    set.filter_by_similar_documents(&reference, 1.0).unwrap();
    assert_eq!(filenames(&set), vec!["02_short.txt"]);

    let mut set = open(dir.path());
    set.filter_by_similar_documents(&reference, 0.0).unwrap();
    assert_eq!(set.len(), 5);

    assert!(matches!(
        set.filter_by_similar_documents(&reference, 1.5),
        Err(TextDirectoryError::InvalidThreshold(_))
    ));
}

#[test]
fn test_filesize_filters() {
    let dir = corpus();
    let mut set = open(dir.path());
    // 04_long.txt is 1120 bytes, a little over one kilobyte.
    set.filter_by_min_filesize(1.0).unwrap();
    assert_eq!(filenames(&set), vec!["04_long.txt"]);

    let mut set = open(dir.path());
    set.filter_by_max_filesize(1.0).unwrap();
    assert_eq!(set.len(), 4);
}

#[test]
fn test_outlier_filter() {
    let dir = corpus();
    let mut set = open(dir.path());
    let bounds = set.filter_by_chars_outliers(1.0).unwrap().unwrap();

    assert!(bounds.min <= bounds.mean && bounds.mean <= bounds.max);
    assert!(!filenames(&set).contains(&"04_long.txt".to_string()));
    assert_eq!(set.history().len(), 4);
    assert_eq!(set.applied_filters().len(), 3);
}

#[test]
fn test_outlier_filter_on_empty_aggregation() {
    let dir = corpus();
    let mut set = open(dir.path());
    set.filter_by_filenames::<&str>(&[]).unwrap();
    assert!(set.filter_by_chars_outliers(2.0).unwrap().is_none());
}

#[test]
fn test_run_filters_from_strings() {
    let dir = corpus();
    let mut set = open(dir.path());
    set.run_filters(&[
        ("contains", vec!["house".to_string()]),
        ("filter_by_min_tokens", vec!["6".to_string()]),
    ])
    .unwrap();
    assert_eq!(filenames(&set), vec!["02_short.txt", "03_medium.txt", "05_deep.txt"]);
}
