mod export;
mod logger;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};
use serde::Deserialize;
use thiserror::Error;
use u_timetable::catalog::{Catalog, CatalogSpec};
use u_timetable::ga::{GaConfig, RuleWeights, TimetableRunner};
use u_timetable::report::{LogReporter, TimetableSink, TimetableSummary};
use u_timetable::TimetableError;

use crate::export::{ExportError, JsonFileSink};

/// Searches for a conflict-free weekly school timetable.
#[derive(Parser, Debug)]
#[command(name = "u-timetable", version, about)]
struct Args {
    /// JSON file with optional `catalog`, `ga` and `weights` sections.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Random seed, overriding the config file.
    #[arg(long)]
    seed: Option<u64>,

    /// Fresh runs to attempt before giving up, overriding the config file.
    #[arg(long)]
    attempts: Option<usize>,

    /// Where to write the best timetable.
    #[arg(short, long, default_value = "timetable.json")]
    output: PathBuf,

    /// Where to write the conflict snapshots.
    #[arg(long, default_value = "conflicts.json")]
    conflicts: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RunConfig {
    /// Falls back to the built-in school when absent.
    catalog: Option<CatalogSpec>,
    ga: GaConfig,
    weights: RuleWeights,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config file: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Timetable(#[from] TimetableError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

fn main() -> ExitCode {
    logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether a conflict-free timetable was found.
fn run(args: &Args) -> Result<bool, CliError> {
    let RunConfig {
        catalog,
        mut ga,
        weights,
    } = load_config(args.config.as_ref())?;
    if let Some(seed) = args.seed {
        ga.seed = Some(seed);
    }
    if let Some(attempts) = args.attempts {
        ga.max_attempts = attempts;
    }

    let catalog = match catalog {
        Some(spec) => Catalog::new(spec)?,
        None => Catalog::school_default(),
    };
    info!(
        "scheduling {} groups, {} teachers, {} classrooms ({} lessons per timetable)",
        catalog.groups().len(),
        catalog.teachers().len(),
        catalog.classrooms().len(),
        catalog.lessons_per_timetable()
    );

    let result = TimetableRunner::find_solution(&catalog, &ga, &weights, LogReporter)?;
    println!("{}", TimetableSummary::new(&catalog, &result.best));
    info!(
        "{:?} after {} generations (attempt {}); best fitness {:.1} reached at generation {}",
        result.termination,
        result.generations,
        result.attempts,
        result.best_fitness(),
        result.best.generation
    );

    let mut sink = JsonFileSink::new(&args.output, &args.conflicts);
    sink.store_timetable(&result.best)?;
    sink.store_snapshots(&result.snapshots)?;

    Ok(result.is_solution())
}

fn load_config(path: Option<&PathBuf>) -> Result<RunConfig, CliError> {
    let Some(path) = path else {
        return Ok(RunConfig::default());
    };
    let text = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.clone(),
        source,
    })?;
    let config = serde_json::from_str(&text)?;
    info!("loaded configuration from {}", path.display());
    Ok(config)
}
