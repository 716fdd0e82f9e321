//! Shared forecast pipeline used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! preferences -> config -> series generation -> chart-row adaptation
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use chrono::Local;

use crate::chart::{forecast_rows, merge_series};
use crate::cli::ForecastArgs;
use crate::data::{forecast_rng, generate_forecast, simple_series};
use crate::domain::{ChartRow, ForecastConfig, ForecastRecord, Preferences, Series};
use crate::error::AppError;
use crate::prefs::PrefStore;

/// All computed outputs of a single forecast run.
#[derive(Debug, Clone)]
pub struct ForecastRun {
    pub config: ForecastConfig,
    /// Combined-mode records (empty in flat mode).
    pub records: Vec<ForecastRecord>,
    /// Flat-mode series, primary first (empty in combined mode).
    pub series: Vec<Series>,
    pub rows: Vec<ChartRow>,
    pub include_ci: bool,
    pub flat: bool,
}

/// Resolve the effective metric/range: explicit flags win, then saved
/// preferences, then defaults.
pub fn effective_preferences(args: &ForecastArgs, store: &dyn PrefStore) -> Preferences {
    let saved = store.load().unwrap_or_default();
    Preferences {
        metric: args.metric.unwrap_or(saved.metric),
        range: args.range.unwrap_or(saved.range),
    }
}

/// Build the full generation config from CLI args + effective preferences.
pub fn config_from_args(
    args: &ForecastArgs,
    prefs: Preferences,
) -> Result<ForecastConfig, AppError> {
    let horizon = args.horizon.unwrap_or_else(|| prefs.range.days());
    let asof = args.asof.unwrap_or_else(|| Local::now().date_naive());

    let mut config = ForecastConfig::new(prefs.metric, horizon, asof, args.seed);
    config.actual_fraction = args.actual_fraction;
    config.platform = args.platform;
    config.region = args.region;
    config.tenure = args.tenure;
    config.rank = args.rank;
    config.validate()?;
    Ok(config)
}

/// Execute the full pipeline and persist the effective selections back to
/// the preference store.
pub fn run_forecast(args: &ForecastArgs, store: &dyn PrefStore) -> Result<ForecastRun, AppError> {
    let prefs = effective_preferences(args, store);
    let config = config_from_args(args, prefs)?;
    let include_ci = !args.no_confidence;

    let mut rng = forecast_rng(&config);
    let run = if args.flat {
        let series = simple_series(&config, &args.overlays, &mut rng)?;
        let rows = merge_series(&series[0], &series[1..], include_ci);
        ForecastRun {
            config,
            records: Vec::new(),
            series,
            rows,
            include_ci,
            flat: true,
        }
    } else {
        let records = generate_forecast(&config, &mut rng);
        let rows = forecast_rows(&records, include_ci);
        ForecastRun {
            config,
            records,
            series: Vec::new(),
            rows,
            include_ci,
            flat: false,
        }
    };

    if !args.no_save_prefs {
        store.save(&prefs)?;
    }

    Ok(run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{ACTUAL_KEY, CI_UPPER_KEY, PREDICTED_KEY};
    use crate::domain::{Metric, RangePreset};
    use crate::prefs::MemoryStore;
    use clap::Parser;

    fn args(extra: &[&str]) -> ForecastArgs {
        let mut argv = vec!["forecast"];
        argv.extend_from_slice(extra);
        ForecastArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn flags_beat_saved_preferences_beat_defaults() {
        let store = MemoryStore::default();

        let effective = effective_preferences(&args(&[]), &store);
        assert_eq!(effective, Preferences::default());

        store
            .save(&Preferences {
                metric: Metric::Payer,
                range: RangePreset::D60,
            })
            .unwrap();
        let effective = effective_preferences(&args(&[]), &store);
        assert_eq!(effective.metric, Metric::Payer);
        assert_eq!(effective.range, RangePreset::D60);

        let effective = effective_preferences(&args(&["--metric", "overall", "-r", "7d"]), &store);
        assert_eq!(effective.metric, Metric::Overall);
        assert_eq!(effective.range, RangePreset::D7);
    }

    #[test]
    fn combined_run_adapts_every_record_to_a_row() {
        let store = MemoryStore::default();
        let run = run_forecast(&args(&["-r", "30d", "--asof", "2025-06-01"]), &store).unwrap();

        assert!(!run.flat);
        assert_eq!(run.records.len(), 30);
        assert_eq!(run.rows.len(), 30);
        assert!(run.rows[0].get(ACTUAL_KEY).is_some());
        assert!(run.rows[29].get(PREDICTED_KEY).is_some());
        assert!(run.rows[29].get(CI_UPPER_KEY).is_some());

        // The run persisted the effective selections.
        assert_eq!(
            store.load(),
            Some(Preferences {
                metric: Metric::Overall,
                range: RangePreset::D30,
            })
        );
    }

    #[test]
    fn flat_run_merges_primary_and_overlays() {
        let store = MemoryStore::default();
        let run = run_forecast(
            &args(&[
                "--flat",
                "-r",
                "14d",
                "--asof",
                "2025-06-01",
                "--overlay",
                "cohort-comparison",
                "--overlay",
                "seasonal-trends",
            ]),
            &store,
        )
        .unwrap();

        assert!(run.flat);
        assert_eq!(run.series.len(), 3);
        assert_eq!(run.rows.len(), 14);
        assert!(run.rows[0].get("Overall LTV").is_some());
        assert!(run.rows[0].get("Cohort Comparison").is_some());
        assert!(run.rows[0].get("Seasonal Trends").is_some());
    }

    #[test]
    fn confidence_toggle_strips_band_keys() {
        let store = MemoryStore::default();
        let run = run_forecast(
            &args(&["-r", "7d", "--asof", "2025-06-01", "--no-confidence"]),
            &store,
        )
        .unwrap();
        assert!(run.rows.iter().all(|row| row.get(CI_UPPER_KEY).is_none()));
    }

    #[test]
    fn horizon_flag_overrides_the_range_preset() {
        let store = MemoryStore::default();
        let run = run_forecast(
            &args(&["-r", "7d", "--horizon", "45", "--asof", "2025-06-01"]),
            &store,
        )
        .unwrap();
        assert_eq!(run.records.len(), 45);
    }

    #[test]
    fn invalid_fraction_is_rejected_before_generation() {
        let store = MemoryStore::default();
        let err = run_forecast(&args(&["--actual-fraction", "1.5"]), &store).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn no_save_prefs_leaves_the_store_untouched() {
        let store = MemoryStore::default();
        run_forecast(&args(&["-r", "7d", "--no-save-prefs"]), &store).unwrap();
        assert_eq!(store.load(), None);
    }
}
