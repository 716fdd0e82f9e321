//! Command-line parsing for the LTV forecast lab.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the generation/adaptation code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::cohort::CohortRule;
use crate::domain::{Metric, Overlay, Platform, RangePreset, Region, SpendRank, Tenure};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "ltv", version, about = "LTV forecast series lab")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate the combined actual + predicted forecast, print a summary
    /// and plot, and optionally export rows/datasets.
    Forecast(ForecastArgs),
    /// Generate the per-day results dataset (cumulative LTV, survival,
    /// revenue, incremental LTV) for a sample prediction run.
    Results(ResultsArgs),
    /// Estimate the audience size for a set of cohort rules.
    Cohort(CohortArgs),
    /// Print model scorecards, feature importances, and the training
    /// configuration.
    Models(ModelsArgs),
    /// Re-render a previously exported forecast dataset JSON.
    Plot(PlotArgs),
    /// Launch the interactive TUI dashboard.
    ///
    /// This uses the same underlying generation pipeline as `ltv forecast`,
    /// but renders the chart with Plotters inside a Ratatui layout.
    Tui(ForecastArgs),
}

/// Common options for forecast generation (CLI and TUI).
#[derive(Debug, Parser, Clone)]
pub struct ForecastArgs {
    /// Metric to chart (defaults to the saved preference).
    #[arg(short, long, value_enum)]
    pub metric: Option<Metric>,

    /// Chart window preset (defaults to the saved preference).
    #[arg(short, long, value_enum)]
    pub range: Option<RangePreset>,

    /// Explicit horizon in days (overrides --range).
    #[arg(long)]
    pub horizon: Option<u32>,

    /// Platform filter.
    #[arg(long, value_enum, default_value_t = Platform::All)]
    pub platform: Platform,

    /// Region filter.
    #[arg(long, value_enum, default_value_t = Region::All)]
    pub region: Region,

    /// Player tenure filter.
    #[arg(long, value_enum, default_value_t = Tenure::All)]
    pub tenure: Tenure,

    /// Spend-rank filter.
    #[arg(long, value_enum, default_value_t = SpendRank::All)]
    pub rank: SpendRank,

    /// Overlay series to draw on the flat chart (repeatable).
    #[arg(long = "overlay", value_enum)]
    pub overlays: Vec<Overlay>,

    /// Render the flat single-segment chart (primary + overlays) instead of
    /// the actual/predicted split.
    #[arg(long)]
    pub flat: bool,

    /// Hide the confidence band.
    #[arg(long)]
    pub no_confidence: bool,

    /// Random seed for generation.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// As-of date (YYYY-MM-DD); defaults to today.
    #[arg(long)]
    pub asof: Option<NaiveDate>,

    /// Leading share of the horizon rendered as observed history.
    #[arg(long, default_value_t = 0.7)]
    pub actual_fraction: f64,

    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export merged chart rows to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the dataset (request echo + records) to JSON.
    #[arg(long = "export-dataset")]
    pub export_dataset: Option<PathBuf>,

    /// Do not persist metric/range back to the preference file.
    #[arg(long)]
    pub no_save_prefs: bool,
}

/// Options for the results view.
#[derive(Debug, Parser)]
pub struct ResultsArgs {
    /// Day window for the results charts (7, 14, or 30).
    #[arg(long, default_value_t = 7)]
    pub days: u32,

    /// Which sample prediction run to view (by id).
    #[arg(long, default_value = "1")]
    pub prediction: String,

    /// Random seed for generation.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Render an ASCII plot of the cumulative-LTV chart.
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

/// Options for cohort size estimation.
#[derive(Debug, Parser)]
pub struct CohortArgs {
    /// Cohort name.
    #[arg(long, default_value = "Untitled cohort")]
    pub name: String,

    /// Rule as `field:op:value`, e.g. `total_sessions:gte:5` (repeatable).
    #[arg(long = "rule")]
    pub rules: Vec<CohortRule>,

    /// Keep players flagged as internal test users in the audience.
    #[arg(long)]
    pub include_test_users: bool,
}

/// Options for the models report.
#[derive(Debug, Parser)]
pub struct ModelsArgs {
    /// Feature window in days (7, 14, 30, or 60).
    #[arg(long, default_value_t = 7)]
    pub feature_window: u32,

    /// Target window in days (7, 14, or 30).
    #[arg(long, default_value_t = 7)]
    pub target_window: u32,

    /// Prediction horizon in days (7, 14, or 30).
    #[arg(long, default_value_t = 7)]
    pub horizon: u32,

    /// Confidence level percent (80, 90, 95, or 99).
    #[arg(long, default_value_t = 95)]
    pub confidence: u32,

    /// Disable automatic retraining in the printed configuration.
    #[arg(long)]
    pub no_auto_retrain: bool,
}

/// Options for re-plotting a saved dataset.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Dataset JSON file produced by `ltv forecast --export-dataset`.
    #[arg(long, value_name = "JSON")]
    pub dataset: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}
