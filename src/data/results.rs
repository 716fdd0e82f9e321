//! Synthetic per-day dataset backing the results view (cumulative LTV with a
//! confidence band, survival probability, daily revenue, incremental LTV).

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::prelude::*;
use rand::rngs::StdRng;

use super::jitter;
use crate::domain::DayRecord;

/// Day-one cumulative LTV level.
const BASE_LTV: f64 = 2.5;
/// Daily cumulative-LTV drift.
const LTV_DRIFT: f64 = 0.8;
const LTV_JITTER: f64 = 0.3;

/// Confidence half-width on day one and its daily widening.
const BAND_BASE: f64 = 0.5;
const BAND_SLOPE: f64 = 0.1;
const BAND_JITTER: f64 = 0.15;

/// Survival probability decays toward this floor and never below it.
const SURVIVAL_FLOOR: f64 = 0.1;
const SURVIVAL_DECAY: f64 = 0.02;
const SURVIVAL_JITTER: f64 = 0.05;

const REVENUE_BASE: f64 = 0.8;
const REVENUE_JITTER: f64 = 0.4;
const INCREMENTAL_BASE: f64 = 0.8;
const INCREMENTAL_JITTER: f64 = 0.3;

/// Build the seeded RNG for a results run.
pub fn results_rng(days: u32, seed: u64) -> StdRng {
    let mut hasher = DefaultHasher::new();
    days.hash(&mut hasher);
    seed.hash(&mut hasher);
    StdRng::seed_from_u64(hasher.finish())
}

/// Generate one record per day, 1-based, no actual/predicted split.
///
/// Both confidence bounds hang off the same central value with independently
/// jittered outward widths: the band can be asymmetric but never crosses the
/// line it brackets. Survival decreases from the previous day's value, so
/// monotone decay is a guarantee rather than a statistical tendency.
pub fn generate_results(days: u32, rng: &mut impl Rng) -> Vec<DayRecord> {
    let mut records = Vec::with_capacity(days as usize);
    let mut survival = 1.0_f64;

    for i in 0..days {
        let t = i as f64;
        let central = BASE_LTV + t * LTV_DRIFT + jitter(rng, LTV_JITTER);

        let half_width = BAND_BASE + t * BAND_SLOPE;
        let ci_upper = central + half_width + jitter(rng, BAND_JITTER);
        let ci_lower = (central - half_width - jitter(rng, BAND_JITTER)).max(0.0);

        survival = (survival - SURVIVAL_DECAY - jitter(rng, SURVIVAL_JITTER)).max(SURVIVAL_FLOOR);

        records.push(DayRecord {
            day: i + 1,
            cumulative_ltv: central,
            ci_upper,
            ci_lower,
            survival_prob: survival,
            daily_revenue: REVENUE_BASE + jitter(rng, REVENUE_JITTER),
            incremental_ltv: INCREMENTAL_BASE + jitter(rng, INCREMENTAL_JITTER),
        });
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_record_per_day_with_one_based_index() {
        let records = generate_results(14, &mut results_rng(14, 42));
        assert_eq!(records.len(), 14);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.day, i as u32 + 1);
        }
        assert!(generate_results(0, &mut results_rng(0, 42)).is_empty());
    }

    #[test]
    fn band_never_crosses_the_central_line() {
        for seed in 0..50 {
            for record in generate_results(30, &mut results_rng(30, seed)) {
                assert!(
                    record.ci_lower <= record.cumulative_ltv
                        && record.cumulative_ltv <= record.ci_upper,
                    "day {}: band [{:.3}, {:.3}] must bracket {:.3}",
                    record.day,
                    record.ci_lower,
                    record.ci_upper,
                    record.cumulative_ltv
                );
                assert!(record.ci_lower >= 0.0);
            }
        }
    }

    #[test]
    fn survival_decays_monotonically_to_the_floor() {
        for seed in 0..50 {
            let records = generate_results(60, &mut results_rng(60, seed));
            let mut prev = 1.0_f64;
            for record in &records {
                assert!(
                    record.survival_prob <= prev,
                    "day {}: survival {:.4} rose above {:.4}",
                    record.day,
                    record.survival_prob,
                    prev
                );
                assert!(record.survival_prob >= SURVIVAL_FLOOR);
                prev = record.survival_prob;
            }
            // 60 days at >= 0.02/day decay is enough to reach the floor.
            assert_eq!(records.last().unwrap().survival_prob, SURVIVAL_FLOOR);
        }
    }

    #[test]
    fn revenue_and_incremental_stay_in_their_bands() {
        for record in generate_results(30, &mut results_rng(30, 7)) {
            assert!((REVENUE_BASE..REVENUE_BASE + REVENUE_JITTER).contains(&record.daily_revenue));
            assert!(
                (INCREMENTAL_BASE..INCREMENTAL_BASE + INCREMENTAL_JITTER)
                    .contains(&record.incremental_ltv)
            );
        }
    }
}
