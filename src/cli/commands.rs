//! Command implementations for the textdirectory CLI.

use std::str::FromStr;
use std::time::Instant;

use log::{debug, info};

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::{Encoding, TextDirectoryConfig};
use crate::error::{Result, TextDirectoryError};
use crate::filter::AVAILABLE_FILTERS;
use crate::spelling::{FrequencyModel, SpellCorrector};
use crate::transform::registry::TransformationRegistry;
use crate::working_set::WorkingSet;

/// Execute a CLI command.
pub fn execute_command(args: TextDirectoryArgs) -> Result<()> {
    match &args.command {
        Command::Run(run_args) => run(run_args.clone(), &args),
        Command::Filters => output_filters(AVAILABLE_FILTERS, &args),
        Command::Transformations => {
            let registry = TransformationRegistry::builtin();
            output_transformations(registry.iter(), &args)
        }
        Command::Correct(correct_args) => correct(correct_args.clone(), &args),
        Command::BuildModel(build_args) => build_model(build_args.clone(), &args),
    }
}

/// Merge the configuration file, if any, with command line overrides.
pub fn build_config(args: &RunArgs) -> Result<TextDirectoryConfig> {
    let mut config = match &args.config {
        Some(path) => TextDirectoryConfig::from_file(path)?,
        None => TextDirectoryConfig {
            recursive: false,
            ..Default::default()
        },
    };

    if let Some(filetype) = &args.filetype {
        config.filetype = filetype.clone();
    }
    if let Some(encoding) = &args.encoding {
        config.encoding = Encoding::from_str(encoding)?;
    }
    if args.recursive {
        config.recursive = true;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(models_dir) = &args.models_dir {
        config.models_dir = models_dir.clone();
    }
    if args.stopwords_dir.is_some() {
        config.stopwords_dir = args.stopwords_dir.clone();
    }
    if args.fast {
        config.fast = true;
    }
    if args.parallel {
        config.parallel = true;
    }

    Ok(config)
}

/// Load, filter, transform and aggregate a directory.
fn run(args: RunArgs, cli_args: &TextDirectoryArgs) -> Result<()> {
    let start_time = Instant::now();
    let config = build_config(&args)?;
    debug!("Configuration: {config:?}");

    let mut working_set = WorkingSet::open(&args.directory, config)?;
    let documents_loaded = working_set.store().len();

    if let Some(filters) = &args.filters {
        working_set.run_filters(&parse_operations(filters))?;
    }

    if let Some(transformations) = &args.transformations {
        for (name, transformation_args) in parse_operations(transformations) {
            working_set.stage_transformation(&name, transformation_args)?;
        }
    }

    if cli_args.verbosity() > 1 {
        eprintln!("{working_set}");
        eprintln!("{}", working_set.pipeline_report());
    }

    let text = match &args.output_file {
        Some(path) => {
            working_set.aggregate_to_file(path)?;
            None
        }
        None => Some(working_set.aggregate_to_memory()?),
    };

    let summary = RunSummary {
        directory: args.directory.display().to_string(),
        documents_loaded,
        documents_selected: working_set.len(),
        applied_filters: working_set.applied_filters().to_vec(),
        staged_transformations: working_set
            .staged_transformations()
            .iter()
            .map(ToString::to_string)
            .collect(),
        output_file: args.output_file.as_ref().map(|p| p.display().to_string()),
        duration_ms: start_time.elapsed().as_millis() as u64,
        text,
    };

    output_run(&summary, cli_args)
}

/// Spell-correct a string.
fn correct(args: CorrectArgs, cli_args: &TextDirectoryArgs) -> Result<()> {
    let corrector = SpellCorrector::open(&args.models_dir, &args.model, false)?;
    let (text, corrections) = corrector.correct_string_with_corrections(&args.text)?;

    output_correction(
        &CorrectionResult {
            model: args.model,
            text,
            corrections,
        },
        cli_args,
        args.show_corrections,
    )
}

/// Count the words of a corpus directory and save them as a model.
fn build_model(args: BuildModelArgs, cli_args: &TextDirectoryArgs) -> Result<()> {
    let start_time = Instant::now();
    let path = FrequencyModel::model_path(&args.models_dir, &args.name);

    if path.exists() && !args.force {
        return Err(TextDirectoryError::invalid_argument(format!(
            "model {} already exists, use --force to overwrite",
            path.display()
        )));
    }
    if !args.models_dir.is_dir() {
        return Err(TextDirectoryError::DirectoryNotFound(args.models_dir.clone()));
    }

    let model = FrequencyModel::from_corpus_dir(&args.corpus_dir, args.strip_tags)?;
    if model.word_count() == 0 {
        return Err(TextDirectoryError::EmptyCorpus(args.corpus_dir.clone()));
    }
    model.save_to_file(&path)?;
    info!("Saved model {} to {}", args.name, path.display());

    output_model_build(
        &ModelBuildResult {
            name: args.name,
            path: path.display().to_string(),
            unique_words: model.word_count(),
            total_words: model.total_frequency(),
            duration_ms: start_time.elapsed().as_millis() as u64,
        },
        cli_args,
    )
}
