//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves saved preferences
//! - runs generation + chart adaptation
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;

use crate::cli::{CohortArgs, Command, ForecastArgs, ModelsArgs, PlotArgs, ResultsArgs};
use crate::cohort::CohortSpec;
use crate::error::AppError;
use crate::models::{PREDICTION_HORIZON_OPTIONS, TrainingConfig, find_prediction};
use crate::prefs::JsonFileStore;

pub mod pipeline;

/// Entry point for the `ltv` binary.
pub fn run() -> Result<(), AppError> {
    // We want `ltv` and `ltv -m payer` to behave like `ltv tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Forecast(args) => handle_forecast(args),
        Command::Results(args) => handle_results(args),
        Command::Cohort(args) => handle_cohort(args),
        Command::Models(args) => handle_models(args),
        Command::Plot(args) => handle_plot(args),
        Command::Tui(args) => crate::tui::run(args),
    }
}

fn handle_forecast(args: ForecastArgs) -> Result<(), AppError> {
    let store = JsonFileStore::from_env();
    let run = pipeline::run_forecast(&args, &store)?;

    if run.flat {
        println!(
            "{}",
            crate::report::format_flat_summary(&run.config, &run.series, run.rows.len())
        );
    } else {
        println!(
            "{}",
            crate::report::format_forecast_summary(&run.config, &run.records)
        );
    }

    if args.plot && !args.no_plot {
        let plot = if run.flat {
            crate::plot::render_series_plot(&run.series[0], args.width, args.height)
        } else {
            crate::plot::render_forecast_plot(&run.records, args.width, args.height)
        };
        println!("{plot}");
    }

    // Optional exports.
    if let Some(path) = &args.export {
        crate::io::write_rows_csv(path, &run.rows)?;
    }
    if let Some(path) = &args.export_dataset {
        if run.flat {
            return Err(AppError::input(
                "Dataset export covers the combined forecast; drop --flat.",
            ));
        }
        crate::io::write_dataset_json(path, &run.config, &run.records)?;
    }

    Ok(())
}

fn handle_results(args: ResultsArgs) -> Result<(), AppError> {
    if !PREDICTION_HORIZON_OPTIONS.contains(&args.days) {
        return Err(AppError::input(format!(
            "Results window must be one of {PREDICTION_HORIZON_OPTIONS:?} days."
        )));
    }
    let prediction = find_prediction(&args.prediction).ok_or_else(|| {
        AppError::input(format!("Unknown prediction id '{}'.", args.prediction))
    })?;

    let records = crate::data::generate_results(
        args.days,
        &mut crate::data::results_rng(args.days, args.seed),
    );
    println!(
        "{}",
        crate::report::format_results_summary(prediction, &records)
    );

    if args.plot && !args.no_plot {
        println!(
            "{}",
            crate::plot::render_results_plot(&records, args.width, args.height)
        );
    }

    Ok(())
}

fn handle_cohort(args: CohortArgs) -> Result<(), AppError> {
    let spec = CohortSpec {
        name: args.name,
        rules: args.rules,
        exclude_test_users: !args.include_test_users,
    };
    println!("{}", crate::report::format_cohort_estimate(&spec));
    Ok(())
}

fn handle_models(args: ModelsArgs) -> Result<(), AppError> {
    let training = TrainingConfig {
        feature_window_days: args.feature_window,
        target_window_days: args.target_window,
        prediction_horizon_days: args.horizon,
        confidence_level_pct: args.confidence,
        auto_retrain: !args.no_auto_retrain,
    };
    training.validate()?;

    println!("{}", crate::report::format_models_report(&training));
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let dataset = crate::io::read_dataset_json(&args.dataset)?;

    println!(
        "Dataset: {} | metric={} | horizon={} days | seed={}",
        args.dataset.display(),
        dataset.metric.display_name(),
        dataset.horizon_days,
        dataset.seed,
    );
    println!(
        "{}",
        crate::plot::render_forecast_plot(&dataset.records, args.width, args.height)
    );
    Ok(())
}

/// Rewrite argv so `ltv` defaults to `ltv tui`.
///
/// Rules:
/// - `ltv`                      -> `ltv tui`
/// - `ltv -m payer ...`         -> `ltv tui -m payer ...`
/// - `ltv --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(
        arg1.as_str(),
        "forecast" | "results" | "cohort" | "models" | "plot" | "tui"
    );
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
