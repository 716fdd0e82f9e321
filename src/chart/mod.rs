//! Chart data adaptation: merge named series into per-x-value rows.
//!
//! Chart renderers want one record per x value with one field per visible
//! line; generators hand back independent columns. The merge is keyed by
//! index: the primary series defines the x axis and the row count, overlays
//! join positionally and simply stop contributing once they run out.

use crate::domain::{ChartRow, ForecastRecord, Series};

/// Row key for the upper confidence bound.
pub const CI_UPPER_KEY: &str = "ciUpper";
/// Row key for the lower confidence bound.
pub const CI_LOWER_KEY: &str = "ciLower";

/// Row key for the observed segment of the combined chart.
pub const ACTUAL_KEY: &str = "actualLTV";
/// Row key for the forecast segment of the combined chart.
pub const PREDICTED_KEY: &str = "predictedLTV";

/// Merge a primary series and overlay series into chart rows.
///
/// Output length always equals the primary's point count; an empty primary
/// yields an empty row list. Confidence keys appear only when requested and
/// when the primary actually carries an aligned band.
pub fn merge_series(primary: &Series, overlays: &[Series], include_ci: bool) -> Vec<ChartRow> {
    let band = if include_ci && primary.has_band() {
        primary.ci_upper.as_deref().zip(primary.ci_lower.as_deref())
    } else {
        None
    };

    let mut rows = Vec::with_capacity(primary.points.len());
    for (index, point) in primary.points.iter().enumerate() {
        let mut values = vec![(primary.name.clone(), point.y)];

        if let Some((upper, lower)) = band {
            values.push((CI_UPPER_KEY.to_string(), upper[index]));
            values.push((CI_LOWER_KEY.to_string(), lower[index]));
        }

        for overlay in overlays {
            if let Some(p) = overlay.points.get(index) {
                values.push((overlay.name.clone(), p.y));
            }
        }

        rows.push(ChartRow {
            time: point.t.clone(),
            values,
        });
    }

    rows
}

/// Flatten combined forecast records into rows keyed `actualLTV` /
/// `predictedLTV`, preserving the per-segment label formats.
pub fn forecast_rows(records: &[ForecastRecord], include_ci: bool) -> Vec<ChartRow> {
    records
        .iter()
        .map(|record| {
            let mut values = Vec::with_capacity(3);
            match record {
                ForecastRecord::Actual { ltv, .. } => {
                    values.push((ACTUAL_KEY.to_string(), *ltv));
                }
                ForecastRecord::Predicted {
                    ltv,
                    ci_upper,
                    ci_lower,
                    ..
                } => {
                    values.push((PREDICTED_KEY.to_string(), *ltv));
                    if include_ci {
                        values.push((CI_UPPER_KEY.to_string(), *ci_upper));
                        values.push((CI_LOWER_KEY.to_string(), *ci_lower));
                    }
                }
            }
            ChartRow {
                time: record.time_label(),
                values,
            }
        })
        .collect()
}
