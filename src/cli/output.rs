//! Output formatting for CLI commands.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, TextDirectoryArgs};
use crate::error::Result;
use crate::filter::FilterInfo;
use crate::spelling::Correction;
use crate::transform::registry::Transformation;
use crate::working_set::report::tabulate;

/// Summary of a run.
#[derive(Debug, Serialize, Deserialize)]
pub struct RunSummary {
    pub directory: String,
    pub documents_loaded: usize,
    pub documents_selected: usize,
    pub applied_filters: Vec<String>,
    pub staged_transformations: Vec<String>,
    pub output_file: Option<String>,
    pub duration_ms: u64,
    /// Aggregated text when it was not written to a file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Result of a spell correction.
#[derive(Debug, Serialize, Deserialize)]
pub struct CorrectionResult {
    pub model: String,
    pub text: String,
    pub corrections: Vec<Correction>,
}

/// Result of building a spelling model.
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelBuildResult {
    pub name: String,
    pub path: String,
    pub unique_words: usize,
    pub total_words: u64,
    pub duration_ms: u64,
}

#[derive(Serialize)]
struct TransformationListing<'a> {
    name: &'a str,
    human_name: Option<&'a str>,
    params: &'a [&'a str],
}

fn output_json<T: Serialize + ?Sized>(result: &T, args: &TextDirectoryArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{json}");
    Ok(())
}

/// Print the available filters.
pub fn output_filters(filters: &[FilterInfo], args: &TextDirectoryArgs) -> Result<()> {
    if args.output_format == OutputFormat::Json {
        return output_json(filters, args);
    }

    let rows: Vec<Vec<String>> = filters
        .iter()
        .map(|info| {
            vec![
                info.name.to_string(),
                info.human_name.to_string(),
                info.params.join(", "),
            ]
        })
        .collect();
    println!("{}", tabulate(&["filter", "description", "parameters"], &rows, None));
    Ok(())
}

/// Print the registered transformations.
pub fn output_transformations<'a, I>(transformations: I, args: &TextDirectoryArgs) -> Result<()>
where
    I: IntoIterator<Item = &'a Transformation>,
{
    let transformations: Vec<&Transformation> = transformations.into_iter().collect();

    if args.output_format == OutputFormat::Json {
        let listing: Vec<TransformationListing<'_>> = transformations
            .iter()
            .map(|t| TransformationListing {
                name: t.name,
                human_name: t.human_name,
                params: t.params,
            })
            .collect();
        return output_json(&listing, args);
    }

    let rows: Vec<Vec<String>> = transformations
        .iter()
        .map(|t| {
            vec![
                t.name.to_string(),
                t.human_name.unwrap_or_default().to_string(),
                t.params.join(", "),
            ]
        })
        .collect();
    println!(
        "{}",
        tabulate(&["transformation", "description", "parameters"], &rows, None)
    );
    Ok(())
}

/// Print a spell correction.
pub fn output_correction(result: &CorrectionResult, args: &TextDirectoryArgs, show_corrections: bool) -> Result<()> {
    if args.output_format == OutputFormat::Json {
        return output_json(result, args);
    }

    println!("{}", result.text);
    if show_corrections {
        if result.corrections.is_empty() {
            println!("No corrections.");
        }
        for correction in &result.corrections {
            println!("  {} -> {}", correction.original, correction.corrected);
        }
    }
    Ok(())
}

/// Print a model build summary.
pub fn output_model_build(result: &ModelBuildResult, args: &TextDirectoryArgs) -> Result<()> {
    if args.output_format == OutputFormat::Json {
        return output_json(result, args);
    }

    if args.verbosity() > 0 {
        println!("Model '{}' saved to {}", result.name, result.path);
        println!("Unique words: {}", result.unique_words);
        println!("Total words: {}", result.total_words);
        println!("Build time: {}ms", result.duration_ms);
    }
    Ok(())
}

/// Print the outcome of a run.
///
/// In human format the aggregated text goes to stdout untouched and the
/// summary to stderr, so the text can be piped.
pub fn output_run(summary: &RunSummary, args: &TextDirectoryArgs) -> Result<()> {
    if args.output_format == OutputFormat::Json {
        return output_json(summary, args);
    }

    if let Some(text) = &summary.text {
        let mut stdout = io::stdout().lock();
        stdout.write_all(text.as_bytes())?;
        stdout.flush()?;
    }

    if args.verbosity() > 1 {
        eprintln!(
            "{} of {} documents selected in {}ms",
            summary.documents_selected, summary.documents_loaded, summary.duration_ms
        );
        if let Some(path) = &summary.output_file {
            eprintln!("Aggregated text written to {path}");
        }
    }
    Ok(())
}
