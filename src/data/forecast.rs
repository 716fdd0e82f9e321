//! Synthetic combined forecast generation: an observed LTV history followed
//! by a forward prediction with a widening confidence band.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::prelude::*;
use rand::rngs::StdRng;

use super::jitter;
use crate::domain::{ForecastConfig, ForecastRecord};

/// Build the seeded RNG for a forecast run.
///
/// The stream is a function of every knob that shapes the output, so the same
/// request re-renders the same chart while any parameter change reshuffles it.
pub fn forecast_rng(config: &ForecastConfig) -> StdRng {
    StdRng::seed_from_u64(forecast_seed(config))
}

fn forecast_seed(config: &ForecastConfig) -> u64 {
    let mut hasher = DefaultHasher::new();
    config.metric.hash(&mut hasher);
    config.horizon_days.hash(&mut hasher);
    config.actual_fraction.to_bits().hash(&mut hasher);
    config.platform.hash(&mut hasher);
    config.region.hash(&mut hasher);
    config.tenure.hash(&mut hasher);
    config.rank.hash(&mut hasher);
    config.asof_date.hash(&mut hasher);
    config.seed.hash(&mut hasher);
    config.actual_step_min.to_bits().hash(&mut hasher);
    config.actual_step_span.to_bits().hash(&mut hasher);
    config.predicted_step_min.to_bits().hash(&mut hasher);
    config.predicted_step_span.to_bits().hash(&mut hasher);
    config.ci_slope.to_bits().hash(&mut hasher);
    config.ci_jitter.to_bits().hash(&mut hasher);
    hasher.finish()
}

/// Generate the combined chart dataset.
///
/// Output is exactly `horizon_days` records: all observed-history records
/// first (calendar-dated, no confidence fields), then the forecast records
/// (offset-labeled, always banded). Total over any horizon: degenerate
/// requests yield shorter (possibly empty) output, never an error.
pub fn generate_forecast(config: &ForecastConfig, rng: &mut impl Rng) -> Vec<ForecastRecord> {
    let actual_days = config.actual_days();
    let predicted_days = config.horizon_days - actual_days;

    let mut records = Vec::with_capacity(config.horizon_days as usize);

    // Observed history counts back from the as-of date and only ever rises:
    // each day adds a strictly positive increment to the running level.
    let mut ltv = config.base_ltv();
    for i in 0..actual_days {
        records.push(ForecastRecord::Actual {
            date: config.actual_date(i, actual_days),
            ltv,
        });
        ltv += config.actual_step_min + jitter(rng, config.actual_step_span);
    }

    // The forecast continues from the last observed level (or the base level
    // when there is no history). Bounds widen linearly with the offset, each
    // side jittered independently, and the lower bound never goes negative.
    let mut predicted = ltv;
    for offset in 1..=predicted_days {
        let half_width = config.ci_slope * offset as f64;
        let ci_upper = predicted + half_width + jitter(rng, config.ci_jitter);
        let ci_lower = (predicted - half_width - jitter(rng, config.ci_jitter)).max(0.0);

        records.push(ForecastRecord::Predicted {
            offset,
            ltv: predicted,
            ci_upper,
            ci_lower,
        });

        predicted += config.predicted_step_min + jitter(rng, config.predicted_step_span);
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Metric;
    use chrono::NaiveDate;

    fn test_config(horizon_days: u32) -> ForecastConfig {
        let asof = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        ForecastConfig::new(Metric::Overall, horizon_days, asof, 42)
    }

    #[test]
    fn record_count_matches_horizon() {
        for horizon in [0, 1, 2, 7, 14, 30, 60, 61] {
            let config = test_config(horizon);
            let records = generate_forecast(&config, &mut forecast_rng(&config));
            assert_eq!(
                records.len(),
                horizon as usize,
                "horizon {horizon}: expected {horizon} records, got {}",
                records.len()
            );
        }
    }

    #[test]
    fn seven_day_horizon_splits_four_three() {
        let config = test_config(7);
        let records = generate_forecast(&config, &mut forecast_rng(&config));

        let actual: Vec<_> = records.iter().filter(|r| r.is_actual()).collect();
        let predicted: Vec<_> = records.iter().filter(|r| !r.is_actual()).collect();
        assert_eq!(actual.len(), 4);
        assert_eq!(predicted.len(), 3);

        // Segments are contiguous: all actual records precede all predicted.
        assert!(records[..4].iter().all(|r| r.is_actual()));
        assert!(records[4..].iter().all(|r| !r.is_actual()));
    }

    #[test]
    fn zero_horizon_is_empty() {
        let config = test_config(0);
        assert!(generate_forecast(&config, &mut forecast_rng(&config)).is_empty());
    }

    #[test]
    fn one_day_horizon_predicts_from_base() {
        let config = test_config(1);
        let records = generate_forecast(&config, &mut forecast_rng(&config));
        assert_eq!(records.len(), 1);
        match &records[0] {
            ForecastRecord::Predicted { offset, ltv, .. } => {
                assert_eq!(*offset, 1);
                assert!((ltv - config.base_ltv()).abs() < 1e-12);
            }
            other => panic!("expected a predicted record, got {other:?}"),
        }
    }

    #[test]
    fn actual_segment_is_strictly_increasing() {
        let config = test_config(60);
        let records = generate_forecast(&config, &mut forecast_rng(&config));
        let actual: Vec<f64> = records
            .iter()
            .filter(|r| r.is_actual())
            .map(|r| r.ltv())
            .collect();
        for pair in actual.windows(2) {
            assert!(
                pair[1] > pair[0],
                "actual LTV must strictly increase: {} then {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn predicted_segment_is_strictly_increasing() {
        let config = test_config(60);
        let records = generate_forecast(&config, &mut forecast_rng(&config));
        let predicted: Vec<f64> = records
            .iter()
            .filter(|r| !r.is_actual())
            .map(|r| r.ltv())
            .collect();
        assert!(!predicted.is_empty());
        for pair in predicted.windows(2) {
            assert!(
                pair[1] > pair[0],
                "predicted LTV must strictly increase: {} then {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn bounds_bracket_the_central_value() {
        // Many seeds, not just one draw: the band contracts come from
        // construction, not from a lucky sample.
        let asof = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        for seed in 0..25 {
            let mut config = ForecastConfig::new(Metric::Payer, 30, asof, seed);
            config.rank = crate::domain::SpendRank::Gold;
            let records = generate_forecast(&config, &mut forecast_rng(&config));
            for record in &records {
                if let ForecastRecord::Predicted {
                    offset,
                    ltv,
                    ci_upper,
                    ci_lower,
                } = record
                {
                    assert!(*ci_lower >= 0.0, "lower bound clamped at zero");
                    assert!(ci_lower <= ltv && ltv <= ci_upper);
                    // The deterministic part of the half-width grows with the
                    // offset; jitter only ever adds on top of it.
                    assert!(ci_upper - ltv >= config.ci_slope * *offset as f64 - 1e-12);
                }
            }
        }
    }

    #[test]
    fn same_config_reproduces_the_same_dataset() {
        let config = test_config(30);
        let a = generate_forecast(&config, &mut forecast_rng(&config));
        let b = generate_forecast(&config, &mut forecast_rng(&config));
        assert_eq!(a, b);

        let mut reseeded = config.clone();
        reseeded.seed = 43;
        let c = generate_forecast(&reseeded, &mut forecast_rng(&reseeded));
        assert_ne!(a, c, "a different seed must reshuffle the dataset");
    }

    #[test]
    fn actual_dates_count_back_from_asof() {
        let config = test_config(7);
        let records = generate_forecast(&config, &mut forecast_rng(&config));
        match &records[0] {
            ForecastRecord::Actual { date, .. } => {
                assert_eq!(*date, NaiveDate::from_ymd_opt(2025, 5, 28).unwrap());
            }
            other => panic!("expected an actual record, got {other:?}"),
        }
        match &records[3] {
            ForecastRecord::Actual { date, .. } => {
                assert_eq!(*date, NaiveDate::from_ymd_opt(2025, 5, 31).unwrap());
            }
            other => panic!("expected an actual record, got {other:?}"),
        }
    }
}
