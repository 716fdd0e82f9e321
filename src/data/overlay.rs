//! Flat primary series and overlay synthesis for the single-axis chart path.
//!
//! Unlike the combined forecast, the flat chart draws one continuous banded
//! series over the whole window plus any requested overlay series aligned to
//! it point-for-point.

use rand::prelude::*;
use rand_distr::Normal;

use super::jitter;
use crate::domain::{DATE_LABEL_FMT, ForecastConfig, Overlay, Series, SeriesPoint};
use crate::error::AppError;

/// Comparison cohorts track below the primary audience.
const COHORT_LEVEL: f64 = 0.82;
const COHORT_NOISE_SD: f64 = 0.06;

/// Weekly seasonal modulation amplitude.
const SEASONAL_AMPLITUDE: f64 = 0.08;
const SEASONAL_NOISE_SD: f64 = 0.02;

/// Chance of an external event landing on a given day, its lift range, and
/// the per-day decay of that lift.
const EVENT_PROB: f64 = 0.12;
const EVENT_LIFT_MIN: f64 = 0.15;
const EVENT_LIFT_SPAN: f64 = 0.3;
const EVENT_DECAY: f64 = 0.6;

/// Build the primary metric series over the full window: a monotone
/// cumulative curve with a band that widens toward the window end.
pub fn primary_series(config: &ForecastConfig, rng: &mut impl Rng) -> Series {
    let n = config.horizon_days;
    let mut points = Vec::with_capacity(n as usize);
    let mut ci_upper = Vec::with_capacity(n as usize);
    let mut ci_lower = Vec::with_capacity(n as usize);

    let mut ltv = config.base_ltv();
    for i in 0..n {
        let date = config.actual_date(i, n);
        points.push(SeriesPoint {
            t: date.format(DATE_LABEL_FMT).to_string(),
            y: ltv,
        });

        let half_width = config.ci_slope * (i + 1) as f64;
        ci_upper.push(ltv + half_width + jitter(rng, config.ci_jitter));
        ci_lower.push((ltv - half_width - jitter(rng, config.ci_jitter)).max(0.0));

        ltv += config.actual_step_min + jitter(rng, config.actual_step_span);
    }

    Series {
        name: config.metric.display_name().to_string(),
        points,
        ci_upper: Some(ci_upper),
        ci_lower: Some(ci_lower),
    }
}

/// Synthesize one overlay series aligned to the primary.
///
/// Overlays carry no confidence bounds; each reshapes the primary's values
/// in its own way rather than re-running the cumulative walk.
pub fn overlay_series(
    primary: &Series,
    overlay: Overlay,
    rng: &mut impl Rng,
) -> Result<Series, AppError> {
    let points = match overlay {
        Overlay::CohortComparison => {
            let noise = Normal::new(0.0, COHORT_NOISE_SD)
                .map_err(|e| AppError::internal(format!("Overlay noise distribution error: {e}")))?;
            primary
                .points
                .iter()
                .map(|p| SeriesPoint {
                    t: p.t.clone(),
                    y: (p.y * COHORT_LEVEL * (1.0 + noise.sample(rng))).max(0.0),
                })
                .collect()
        }
        Overlay::SeasonalTrends => {
            let noise = Normal::new(0.0, SEASONAL_NOISE_SD)
                .map_err(|e| AppError::internal(format!("Overlay noise distribution error: {e}")))?;
            primary
                .points
                .iter()
                .enumerate()
                .map(|(i, p)| {
                    let phase = std::f64::consts::TAU * i as f64 / 7.0;
                    let factor = 1.0 + SEASONAL_AMPLITUDE * phase.sin() + noise.sample(rng);
                    SeriesPoint {
                        t: p.t.clone(),
                        y: (p.y * factor).max(0.0),
                    }
                })
                .collect()
        }
        Overlay::ExternalEvents => {
            // Sparse lifts that decay day over day, so a spike trails off
            // instead of vanishing.
            let mut lift = 0.0_f64;
            primary
                .points
                .iter()
                .map(|p| {
                    lift *= EVENT_DECAY;
                    if rng.gen_range(0.0..1.0) < EVENT_PROB {
                        lift += EVENT_LIFT_MIN + jitter(rng, EVENT_LIFT_SPAN);
                    }
                    SeriesPoint {
                        t: p.t.clone(),
                        y: p.y * (1.0 + lift),
                    }
                })
                .collect()
        }
    };

    Ok(Series::plain(overlay.display_name(), points))
}

/// Build the primary series plus the requested overlays, in request order.
pub fn simple_series(
    config: &ForecastConfig,
    overlays: &[Overlay],
    rng: &mut impl Rng,
) -> Result<Vec<Series>, AppError> {
    let primary = primary_series(config, rng);

    let mut out = Vec::with_capacity(1 + overlays.len());
    let mut extras = Vec::with_capacity(overlays.len());
    for overlay in overlays {
        extras.push(overlay_series(&primary, *overlay, rng)?);
    }
    out.push(primary);
    out.extend(extras);
    Ok(out)
}
