//! Filter definitions and their string form.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TextDirectoryError};

/// Static description of a filter for help output.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FilterInfo {
    /// Name used for dispatch and in the checkpoint trail.
    pub name: &'static str,
    /// Label for people.
    pub human_name: &'static str,
    /// Positional parameters, defaults in parentheses.
    pub params: &'static [&'static str],
}

/// Every filter a working set understands.
pub const AVAILABLE_FILTERS: &[FilterInfo] = &[
    FilterInfo { name: "filter_by_max_chars", human_name: "Maximum characters", params: &["max_chars (100)"] },
    FilterInfo { name: "filter_by_min_chars", human_name: "Minimum characters", params: &["min_chars (100)"] },
    FilterInfo { name: "filter_by_max_tokens", human_name: "Maximum tokens", params: &["max_tokens (100)"] },
    FilterInfo { name: "filter_by_min_tokens", human_name: "Minimum tokens", params: &["min_tokens (1)"] },
    FilterInfo { name: "filter_by_contains", human_name: "Contains string", params: &["contains"] },
    FilterInfo { name: "filter_by_not_contains", human_name: "Does not contain string", params: &["not_contains"] },
    FilterInfo { name: "filter_by_filename_contains", human_name: "Filename contains string", params: &["contains"] },
    FilterInfo { name: "filter_by_filename_not_contains", human_name: "Filename does not contain string", params: &["not_contains"] },
    FilterInfo { name: "filter_by_filenames", human_name: "Filenames", params: &["filenames..."] },
    FilterInfo { name: "filter_by_random_sampling", human_name: "Random sampling", params: &["n", "replace (false)"] },
    FilterInfo { name: "filter_by_chars_outliers", human_name: "Character outliers", params: &["sigmas (2)"] },
    FilterInfo { name: "filter_by_max_filesize", human_name: "Maximum filesize", params: &["max_kb (100)"] },
    FilterInfo { name: "filter_by_min_filesize", human_name: "Minimum filesize", params: &["min_kb (10)"] },
    FilterInfo { name: "filter_by_similar_documents", human_name: "Similar documents", params: &["reference_file", "threshold (0.8)"] },
];

/// A single filter invocation with its arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Filter {
    /// Keep documents with at most this many characters.
    MaxChars(i64),
    /// Keep documents with at least this many characters.
    MinChars(i64),
    /// Keep documents with at most this many tokens.
    MaxTokens(i64),
    /// Keep documents with at least this many tokens.
    MinTokens(i64),
    /// Keep documents whose content contains the string.
    Contains(String),
    /// Keep documents whose content does not contain the string.
    NotContains(String),
    /// Keep documents whose filename contains the string.
    FilenameContains(String),
    /// Keep documents whose filename does not contain the string.
    FilenameNotContains(String),
    /// Keep documents whose filename is listed.
    Filenames(Vec<String>),
    /// Replace the aggregation with `n` uniformly drawn references.
    RandomSampling { n: usize, replace: bool },
    /// Drop documents more than `sigmas` standard deviations from the mean
    /// character count.
    CharsOutliers { sigmas: f64 },
    /// Keep files of at most `max_kb` kilobytes on disk.
    MaxFilesize { max_kb: f64 },
    /// Keep files of at least `min_kb` kilobytes on disk.
    MinFilesize { min_kb: f64 },
    /// Keep documents whose similarity to the reference is at least
    /// `threshold`.
    SimilarDocuments {
        reference_file: PathBuf,
        threshold: f64,
    },
}

impl Filter {
    /// Name recorded in the checkpoint trail.
    pub fn name(&self) -> &'static str {
        match self {
            Filter::MaxChars(_) => "filter_by_max_chars",
            Filter::MinChars(_) => "filter_by_min_chars",
            Filter::MaxTokens(_) => "filter_by_max_tokens",
            Filter::MinTokens(_) => "filter_by_min_tokens",
            Filter::Contains(_) => "filter_by_contains",
            Filter::NotContains(_) => "filter_by_not_contains",
            Filter::FilenameContains(_) => "filter_by_filename_contains",
            Filter::FilenameNotContains(_) => "filter_by_filename_not_contains",
            Filter::Filenames(_) => "filter_by_filenames",
            Filter::RandomSampling { .. } => "filter_by_random_sampling",
            Filter::CharsOutliers { .. } => "filter_by_chars_outliers",
            Filter::MaxFilesize { .. } => "filter_by_max_filesize",
            Filter::MinFilesize { .. } => "filter_by_min_filesize",
            Filter::SimilarDocuments { .. } => "filter_by_similar_documents",
        }
    }

    /// Human readable label.
    pub fn human_name(&self) -> &'static str {
        let name = self.name();
        AVAILABLE_FILTERS
            .iter()
            .find(|info| info.name == name)
            .map(|info| info.human_name)
            .unwrap_or(name)
    }

    /// Build a filter from its name and positional string arguments.
    ///
    /// Missing optional arguments take the documented defaults. The
    /// `filter_by_` prefix may be omitted.
    pub fn parse(name: &str, args: &[String]) -> Result<Self> {
        let full_name = if name.starts_with("filter_by_") {
            name.to_string()
        } else {
            format!("filter_by_{name}")
        };
        let arg = |i: usize| args.get(i).map(|s| s.trim());

        let filter = match full_name.as_str() {
            "filter_by_max_chars" => Filter::MaxChars(parse_int(arg(0), 100)?),
            "filter_by_min_chars" => Filter::MinChars(parse_int(arg(0), 100)?),
            "filter_by_max_tokens" => Filter::MaxTokens(parse_int(arg(0), 100)?),
            "filter_by_min_tokens" => Filter::MinTokens(parse_int(arg(0), 1)?),
            "filter_by_contains" => Filter::Contains(required(args, 0, "contains")?),
            "filter_by_not_contains" => Filter::NotContains(required(args, 0, "not_contains")?),
            "filter_by_filename_contains" => {
                Filter::FilenameContains(required(args, 0, "contains")?)
            }
            "filter_by_filename_not_contains" => {
                Filter::FilenameNotContains(required(args, 0, "not_contains")?)
            }
            "filter_by_filenames" => Filter::Filenames(args.to_vec()),
            "filter_by_random_sampling" => {
                let n = arg(0).ok_or_else(|| {
                    TextDirectoryError::invalid_argument("filter_by_random_sampling needs n")
                })?;
                let n = parse_int(Some(n), 0)?;
                if n < 0 {
                    return Err(TextDirectoryError::invalid_argument(format!(
                        "sample size must not be negative, got {n}"
                    )));
                }
                Filter::RandomSampling {
                    n: n as usize,
                    replace: parse_bool(arg(1), false)?,
                }
            }
            "filter_by_chars_outliers" => Filter::CharsOutliers {
                sigmas: parse_float(arg(0), 2.0)?,
            },
            "filter_by_max_filesize" => Filter::MaxFilesize {
                max_kb: parse_float(arg(0), 100.0)?,
            },
            "filter_by_min_filesize" => Filter::MinFilesize {
                min_kb: parse_float(arg(0), 10.0)?,
            },
            "filter_by_similar_documents" => Filter::SimilarDocuments {
                reference_file: PathBuf::from(required(args, 0, "reference_file")?),
                threshold: parse_float(arg(1), 0.8)?,
            },
            _ => return Err(TextDirectoryError::unknown_filter(name)),
        };

        Ok(filter)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Bounds computed by the character outlier filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlierBounds {
    /// Population standard deviation of character counts.
    pub std: f64,
    /// Mean character count.
    pub mean: f64,
    /// Lower bound, rounded to one decimal.
    pub min: f64,
    /// Upper bound, rounded to one decimal.
    pub max: f64,
}

impl OutlierBounds {
    /// Compute the bounds for a list of character counts.
    ///
    /// Returns `None` for an empty list.
    pub fn compute(counts: &[usize], sigmas: f64) -> Option<Self> {
        if counts.is_empty() {
            return None;
        }

        let n = counts.len() as f64;
        let mean = counts.iter().map(|&c| c as f64).sum::<f64>() / n;
        let variance = counts
            .iter()
            .map(|&c| {
                let d = c as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / n;
        let std = variance.sqrt();

        Some(OutlierBounds {
            std,
            mean,
            min: round1(mean - sigmas * std),
            max: round1(mean + sigmas * std),
        })
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn required(args: &[String], index: usize, param: &str) -> Result<String> {
    args.get(index)
        .cloned()
        .ok_or_else(|| TextDirectoryError::invalid_argument(format!("missing argument '{param}'")))
}

/// Integer arguments truncate decimals, so "12.7" reads as 12.
fn parse_int(value: Option<&str>, default: i64) -> Result<i64> {
    match value {
        None | Some("") => Ok(default),
        Some(v) => match v.parse::<i64>() {
            Ok(n) => Ok(n),
            Err(_) => v
                .parse::<f64>()
                .map(|f| f.trunc() as i64)
                .map_err(|_| TextDirectoryError::invalid_argument(format!("'{v}' is not a number"))),
        },
    }
}

fn parse_float(value: Option<&str>, default: f64) -> Result<f64> {
    match value {
        None | Some("") => Ok(default),
        Some(v) => f64::from_str(v)
            .map_err(|_| TextDirectoryError::invalid_argument(format!("'{v}' is not a number"))),
    }
}

fn parse_bool(value: Option<&str>, default: bool) -> Result<bool> {
    match value {
        None | Some("") => Ok(default),
        Some(v) => match v.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(TextDirectoryError::invalid_argument(format!(
                "'{v}' is not a boolean"
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_with_defaults() {
        assert_eq!(Filter::parse("filter_by_max_chars", &[]).unwrap(), Filter::MaxChars(100));
        assert_eq!(Filter::parse("min_tokens", &[]).unwrap(), Filter::MinTokens(1));
        assert_eq!(
            Filter::parse("filter_by_random_sampling", &args(&["3", "True"])).unwrap(),
            Filter::RandomSampling { n: 3, replace: true }
        );
        assert_eq!(
            Filter::parse("filter_by_similar_documents", &args(&["ref.txt"])).unwrap(),
            Filter::SimilarDocuments {
                reference_file: PathBuf::from("ref.txt"),
                threshold: 0.8
            }
        );
    }

    #[test]
    fn test_parse_truncates_integers() {
        assert_eq!(Filter::parse("filter_by_min_chars", &args(&["12.7"])).unwrap(), Filter::MinChars(12));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            Filter::parse("filter_by_magic", &[]),
            Err(TextDirectoryError::UnknownFilter(_))
        ));
        assert!(Filter::parse("filter_by_contains", &[]).is_err());
        assert!(Filter::parse("filter_by_max_chars", &args(&["many"])).is_err());
        assert!(Filter::parse("filter_by_random_sampling", &[]).is_err());
    }

    #[test]
    fn test_every_filter_has_info() {
        let filter = Filter::CharsOutliers { sigmas: 1.0 };
        assert_eq!(filter.human_name(), "Character outliers");
        assert_eq!(AVAILABLE_FILTERS.len(), 14);
    }

    #[test]
    fn test_outlier_bounds() {
        let bounds = OutlierBounds::compute(&[2, 4, 4, 4, 5, 5, 7, 9], 1.0).unwrap();
        assert_eq!(bounds.mean, 5.0);
        assert_eq!(bounds.std, 2.0);
        assert_eq!(bounds.min, 3.0);
        assert_eq!(bounds.max, 7.0);
        assert!(OutlierBounds::compute(&[], 2.0).is_none());
    }
}
