//! Command line argument parsing for the textdirectory CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::spelling::DEFAULT_LANGUAGE_MODEL;

/// textdirectory - filter, checkpoint and transform directories of text files
#[derive(Parser, Debug, Clone)]
#[command(name = "textdirectory")]
#[command(about = "Filter, checkpoint and transform directories of text files")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct TextDirectoryArgs {
    /// Verbosity, repeatable (-vv info, -vvv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl TextDirectoryArgs {
    /// Log verbosity: 0 quiet, 1 warnings, 2 info, 3 and up debug.
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Filter and transform a directory, then aggregate it
    Run(RunArgs),

    /// List the available filters
    Filters,

    /// List the available transformations
    Transformations,

    /// Spell-correct a string
    Correct(CorrectArgs),

    /// Build a spelling model from a directory of text files
    #[command(name = "build-model")]
    BuildModel(BuildModelArgs),
}

/// Arguments for a run over a directory
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Directory holding the text files
    #[arg(value_name = "DIRECTORY")]
    pub directory: PathBuf,

    /// Write the aggregated text here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// File extension to load, `*` for any
    #[arg(long)]
    pub filetype: Option<String>,

    /// Encoding of the input files
    #[arg(short, long)]
    pub encoding: Option<String>,

    /// Descend into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Filters, e.g. "filter_by_min_chars,100/filter_by_contains,lorem"
    #[arg(long)]
    pub filters: Option<String>,

    /// Transformations, e.g. "transformation_lowercase/transformation_replace_digits,#"
    #[arg(short, long)]
    pub transformations: Option<String>,

    /// Seed for random sampling
    #[arg(long)]
    pub seed: Option<u64>,

    /// JSON configuration file
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding spelling models
    #[arg(long)]
    pub models_dir: Option<PathBuf>,

    /// Directory holding stopword lists
    #[arg(long)]
    pub stopwords_dir: Option<PathBuf>,

    /// Skip character and token counting
    #[arg(long)]
    pub fast: bool,

    /// Transform documents in parallel
    #[arg(long)]
    pub parallel: bool,
}

/// Arguments for spell correction
#[derive(Parser, Debug, Clone)]
pub struct CorrectArgs {
    /// Text to correct
    #[arg(value_name = "TEXT")]
    pub text: String,

    /// Language model name
    #[arg(short, long, default_value = DEFAULT_LANGUAGE_MODEL)]
    pub model: String,

    /// Directory holding spelling models
    #[arg(long, default_value = "language_models")]
    pub models_dir: PathBuf,

    /// List every changed token
    #[arg(long)]
    pub show_corrections: bool,
}

/// Arguments for building a spelling model
#[derive(Parser, Debug, Clone)]
pub struct BuildModelArgs {
    /// Directory of `.txt` files to count words in
    #[arg(value_name = "CORPUS_DIR")]
    pub corpus_dir: PathBuf,

    /// Name of the model
    #[arg(short, long)]
    pub name: String,

    /// Directory to save the model in
    #[arg(long, default_value = "language_models")]
    pub models_dir: PathBuf,

    /// Remove markup tags before counting
    #[arg(long)]
    pub strip_tags: bool,

    /// Replace an existing model of the same name
    #[arg(long)]
    pub force: bool,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}

/// Split a `/`-separated list of `,`-separated operations into names and
/// positional arguments. Empty groups are skipped.
pub fn parse_operations(input: &str) -> Vec<(String, Vec<String>)> {
    input
        .split('/')
        .filter(|group| !group.trim().is_empty())
        .map(|group| {
            let mut tokens = group.split(',').map(|token| token.trim().to_string());
            let name = tokens.next().unwrap_or_default();
            (name, tokens.collect())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        // Default verbosity
        let args = TextDirectoryArgs::try_parse_from(["textdirectory", "filters"]).unwrap();
        assert_eq!(args.verbosity(), 1);

        // Multiple verbose flags
        let args = TextDirectoryArgs::try_parse_from(["textdirectory", "-vv", "filters"]).unwrap();
        assert_eq!(args.verbosity(), 2);

        // Quiet flag
        let args =
            TextDirectoryArgs::try_parse_from(["textdirectory", "--quiet", "filters"]).unwrap();
        assert_eq!(args.verbosity(), 0);
    }

    #[test]
    fn test_output_format() {
        let args =
            TextDirectoryArgs::try_parse_from(["textdirectory", "--format", "json", "filters"])
                .unwrap();
        assert_eq!(args.output_format, OutputFormat::Json);
    }

    #[test]
    fn test_run_args() {
        let args = TextDirectoryArgs::try_parse_from([
            "textdirectory",
            "run",
            "corpus",
            "--filters",
            "filter_by_min_chars,100/filter_by_contains,lorem",
            "--transformations",
            "transformation_lowercase",
            "--recursive",
            "--seed",
            "42",
        ])
        .unwrap();

        let Command::Run(run) = args.command else {
            panic!("Expected Run command");
        };
        assert_eq!(run.directory, PathBuf::from("corpus"));
        assert!(run.recursive);
        assert_eq!(run.seed, Some(42));
        assert!(run.output_file.is_none());
    }

    #[test]
    fn test_correct_defaults() {
        let args =
            TextDirectoryArgs::try_parse_from(["textdirectory", "correct", "speling"]).unwrap();
        let Command::Correct(correct) = args.command else {
            panic!("Expected Correct command");
        };
        assert_eq!(correct.model, DEFAULT_LANGUAGE_MODEL);
        assert!(!correct.show_corrections);
    }

    #[test]
    fn test_parse_operations() {
        assert_eq!(
            parse_operations("filter_by_min_chars,100/filter_by_contains, lorem /"),
            vec![
                ("filter_by_min_chars".to_string(), vec!["100".to_string()]),
                ("filter_by_contains".to_string(), vec!["lorem".to_string()]),
            ]
        );
        assert_eq!(
            parse_operations("transformation_lowercase"),
            vec![("transformation_lowercase".to_string(), Vec::new())]
        );
        assert!(parse_operations("").is_empty());
    }
}
