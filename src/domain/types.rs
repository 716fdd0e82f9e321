//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during generation
//! - exported to JSON/CSV
//! - reloaded later for plotting or comparisons

use chrono::{Duration, NaiveDate};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Which LTV metric a chart tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Overall,
    Payer,
}

impl Metric {
    pub const ALL: [Metric; 2] = [Metric::Overall, Metric::Payer];

    /// Human-readable label, also used as the primary series name.
    pub fn display_name(self) -> &'static str {
        match self {
            Metric::Overall => "Overall LTV",
            Metric::Payer => "Payer LTV",
        }
    }

    /// Day-zero LTV level the synthetic curves grow from.
    ///
    /// Payer cohorts monetize from a much higher base than the blended
    /// audience, so the two metrics stay visually distinct on one axis.
    pub fn base_ltv(self) -> f64 {
        match self {
            Metric::Overall => 2.5,
            Metric::Payer => 6.8,
        }
    }
}

/// Chart window presets offered by the dashboard.
///
/// The generator accepts any horizon; these are the menu values, and the one
/// the analyst last picked is what gets persisted between sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum RangePreset {
    #[serde(rename = "7d")]
    #[value(name = "7d")]
    D7,
    #[serde(rename = "14d")]
    #[value(name = "14d")]
    D14,
    #[serde(rename = "30d")]
    #[value(name = "30d")]
    D30,
    #[serde(rename = "60d")]
    #[value(name = "60d")]
    D60,
}

impl RangePreset {
    pub const ALL: [RangePreset; 4] = [
        RangePreset::D7,
        RangePreset::D14,
        RangePreset::D30,
        RangePreset::D60,
    ];

    pub fn days(self) -> u32 {
        match self {
            RangePreset::D7 => 7,
            RangePreset::D14 => 14,
            RangePreset::D30 => 30,
            RangePreset::D60 => 60,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            RangePreset::D7 => "7d",
            RangePreset::D14 => "14d",
            RangePreset::D30 => "30d",
            RangePreset::D60 => "60d",
        }
    }
}

/// Platform filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    All,
    Ios,
    Android,
    Web,
}

impl Platform {
    pub const ALL_VALUES: [Platform; 4] =
        [Platform::All, Platform::Ios, Platform::Android, Platform::Web];

    pub fn display_name(self) -> &'static str {
        match self {
            Platform::All => "All",
            Platform::Ios => "iOS",
            Platform::Android => "Android",
            Platform::Web => "Web",
        }
    }

    /// Multiplier applied to the metric base level for this slice.
    pub fn level_bias(self) -> f64 {
        match self {
            Platform::All => 1.0,
            Platform::Ios => 1.08,
            Platform::Android => 0.95,
            Platform::Web => 0.90,
        }
    }
}

/// Region filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    All,
    Na,
    Eu,
    Ap,
}

impl Region {
    pub const ALL_VALUES: [Region; 4] = [Region::All, Region::Na, Region::Eu, Region::Ap];

    pub fn display_name(self) -> &'static str {
        match self {
            Region::All => "All",
            Region::Na => "North America",
            Region::Eu => "Europe",
            Region::Ap => "Asia Pacific",
        }
    }

    pub fn level_bias(self) -> f64 {
        match self {
            Region::All => 1.0,
            Region::Na => 1.10,
            Region::Eu => 1.0,
            Region::Ap => 0.92,
        }
    }
}

/// Player tenure filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Tenure {
    All,
    New,
    Returning,
}

impl Tenure {
    pub const ALL_VALUES: [Tenure; 3] = [Tenure::All, Tenure::New, Tenure::Returning];

    pub fn display_name(self) -> &'static str {
        match self {
            Tenure::All => "All",
            Tenure::New => "New",
            Tenure::Returning => "Returning",
        }
    }

    pub fn level_bias(self) -> f64 {
        match self {
            Tenure::All => 1.0,
            Tenure::New => 0.85,
            Tenure::Returning => 1.12,
        }
    }
}

/// Spend-rank filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SpendRank {
    All,
    Bronze,
    Silver,
    Gold,
}

impl SpendRank {
    pub const ALL_VALUES: [SpendRank; 4] = [
        SpendRank::All,
        SpendRank::Bronze,
        SpendRank::Silver,
        SpendRank::Gold,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            SpendRank::All => "All",
            SpendRank::Bronze => "Bronze",
            SpendRank::Silver => "Silver",
            SpendRank::Gold => "Gold",
        }
    }

    pub fn level_bias(self) -> f64 {
        match self {
            SpendRank::All => 1.0,
            SpendRank::Bronze => 0.80,
            SpendRank::Silver => 1.0,
            SpendRank::Gold => 1.35,
        }
    }
}

/// Optional comparison series drawn on top of the primary metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Overlay {
    CohortComparison,
    SeasonalTrends,
    ExternalEvents,
}

impl Overlay {
    pub const ALL: [Overlay; 3] = [
        Overlay::CohortComparison,
        Overlay::SeasonalTrends,
        Overlay::ExternalEvents,
    ];

    /// Series name shown in legends and used as the chart-row key.
    pub fn display_name(self) -> &'static str {
        match self {
            Overlay::CohortComparison => "Cohort Comparison",
            Overlay::SeasonalTrends => "Seasonal Trends",
            Overlay::ExternalEvents => "External Events",
        }
    }
}

/// One point of a named series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// X-axis label (calendar date or offset index, already formatted).
    pub t: String,
    pub y: f64,
}

/// One named sequence of chart points, optionally with a confidence band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub points: Vec<SeriesPoint>,
    /// Upper confidence bound, parallel to `points` when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ci_upper: Option<Vec<f64>>,
    /// Lower confidence bound, parallel to `points` when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ci_lower: Option<Vec<f64>>,
}

impl Series {
    /// A series without confidence bounds.
    pub fn plain(name: impl Into<String>, points: Vec<SeriesPoint>) -> Self {
        Self {
            name: name.into(),
            points,
            ci_upper: None,
            ci_lower: None,
        }
    }

    /// Bounds are usable only when both sides are present and aligned.
    pub fn has_band(&self) -> bool {
        matches!(
            (&self.ci_upper, &self.ci_lower),
            (Some(u), Some(l)) if u.len() == self.points.len() && l.len() == self.points.len()
        )
    }
}

/// One day of the combined forecast chart.
///
/// Actual and predicted records deliberately carry different x-label formats
/// (calendar date vs bare 1-based offset); downstream chart code keys off
/// that discontinuity to switch from the observed to the forecast styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ForecastRecord {
    Actual {
        date: NaiveDate,
        ltv: f64,
    },
    Predicted {
        /// 1-based offset into the forecast segment.
        offset: u32,
        ltv: f64,
        ci_upper: f64,
        ci_lower: f64,
    },
}

impl ForecastRecord {
    pub fn ltv(&self) -> f64 {
        match self {
            ForecastRecord::Actual { ltv, .. } => *ltv,
            ForecastRecord::Predicted { ltv, .. } => *ltv,
        }
    }

    pub fn is_actual(&self) -> bool {
        matches!(self, ForecastRecord::Actual { .. })
    }

    /// X-axis label in the segment's own format.
    pub fn time_label(&self) -> String {
        match self {
            ForecastRecord::Actual { date, .. } => date.format(DATE_LABEL_FMT).to_string(),
            ForecastRecord::Predicted { offset, .. } => offset.to_string(),
        }
    }
}

/// Short-date format used for observed-history labels (en-GB style).
pub const DATE_LABEL_FMT: &str = "%d/%m/%y";

/// One day of the results view (cumulative LTV, survival, revenue).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    /// 1-based day index.
    pub day: u32,
    pub cumulative_ltv: f64,
    pub ci_upper: f64,
    pub ci_lower: f64,
    pub survival_prob: f64,
    pub daily_revenue: f64,
    pub incremental_ltv: f64,
}

/// A merged per-x-value record for a multi-series chart.
///
/// The set of columns (primary name, band keys, overlay names) is only known
/// at request time, so values are an ordered key -> value list rather than a
/// fixed-schema struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRow {
    pub time: String,
    pub values: Vec<(String, f64)>,
}

impl ChartRow {
    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }
}

/// A full generation request as understood by the pipeline.
///
/// This is derived from CLI flags / TUI state (plus saved preferences).
#[derive(Debug, Clone)]
pub struct ForecastConfig {
    pub metric: Metric,
    pub horizon_days: u32,
    /// Leading share of the horizon rendered as observed history.
    pub actual_fraction: f64,

    pub platform: Platform,
    pub region: Region,
    pub tenure: Tenure,
    pub rank: SpendRank,

    /// Date the observed segment counts back from.
    pub asof_date: NaiveDate,
    /// User-facing seed; the RNG stream also hashes in every other knob.
    pub seed: u64,

    /// Daily observed-segment increment: uniform in `[min, min + span)`.
    pub actual_step_min: f64,
    pub actual_step_span: f64,
    /// Daily forecast-segment increment: uniform in `[min, min + span)`.
    pub predicted_step_min: f64,
    pub predicted_step_span: f64,
    /// Confidence half-width added per forecast day.
    pub ci_slope: f64,
    /// Extra uniform jitter applied independently to each bound.
    pub ci_jitter: f64,
}

impl ForecastConfig {
    /// Canonical settings for a metric/horizon pair.
    pub fn new(metric: Metric, horizon_days: u32, asof_date: NaiveDate, seed: u64) -> Self {
        Self {
            metric,
            horizon_days,
            actual_fraction: 0.7,
            platform: Platform::All,
            region: Region::All,
            tenure: Tenure::All,
            rank: SpendRank::All,
            asof_date,
            seed,
            actual_step_min: 0.1,
            actual_step_span: 0.3,
            predicted_step_min: 0.2,
            predicted_step_span: 0.4,
            ci_slope: 0.15,
            ci_jitter: 0.2,
        }
    }

    /// Metric base level adjusted for the active filter slices.
    pub fn base_ltv(&self) -> f64 {
        self.metric.base_ltv()
            * self.platform.level_bias()
            * self.region.level_bias()
            * self.tenure.level_bias()
            * self.rank.level_bias()
    }

    /// Number of observed-history days (the leading `actual_fraction` share).
    pub fn actual_days(&self) -> u32 {
        let fraction = self.actual_fraction.clamp(0.0, 1.0);
        (self.horizon_days as f64 * fraction).floor() as u32
    }

    pub fn predicted_days(&self) -> u32 {
        self.horizon_days - self.actual_days()
    }

    /// Calendar date for the observed point `index` (0-based) in a segment of
    /// `actual_days` points ending just before the as-of date.
    pub fn actual_date(&self, index: u32, actual_days: u32) -> NaiveDate {
        let back = (actual_days - index) as i64;
        self.asof_date
            .checked_sub_signed(Duration::days(back))
            .unwrap_or(self.asof_date)
    }

    /// Validate analyst-supplied knobs before running the pipeline.
    pub fn validate(&self) -> Result<(), AppError> {
        if !(self.actual_fraction.is_finite() && (0.0..=1.0).contains(&self.actual_fraction)) {
            return Err(AppError::input("Actual fraction must be within [0, 1]."));
        }
        if !(self.actual_step_min.is_finite() && self.actual_step_min > 0.0)
            || !(self.predicted_step_min.is_finite() && self.predicted_step_min > 0.0)
        {
            return Err(AppError::input("Step minimums must be > 0."));
        }
        if !(self.actual_step_span.is_finite() && self.actual_step_span >= 0.0)
            || !(self.predicted_step_span.is_finite() && self.predicted_step_span >= 0.0)
        {
            return Err(AppError::input("Step spans must be >= 0."));
        }
        if !(self.ci_slope.is_finite() && self.ci_slope >= 0.0)
            || !(self.ci_jitter.is_finite() && self.ci_jitter >= 0.0)
        {
            return Err(AppError::input("Confidence settings must be >= 0."));
        }
        Ok(())
    }
}

/// Last-used dashboard selections, persisted between sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub metric: Metric,
    pub range: RangePreset,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            metric: Metric::Overall,
            range: RangePreset::D30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_preset_serde_uses_ui_tokens() {
        let json = serde_json::to_string(&RangePreset::D30).unwrap();
        assert_eq!(json, "\"30d\"");
        let back: RangePreset = serde_json::from_str("\"7d\"").unwrap();
        assert_eq!(back, RangePreset::D7);
    }

    #[test]
    fn actual_split_follows_seventy_percent_floor() {
        let asof = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let config = ForecastConfig::new(Metric::Overall, 7, asof, 42);
        assert_eq!(config.actual_days(), 4);
        assert_eq!(config.predicted_days(), 3);

        let config = ForecastConfig::new(Metric::Overall, 1, asof, 42);
        assert_eq!(config.actual_days(), 0, "horizon below 2 has no history");
        assert_eq!(config.predicted_days(), 1);
    }

    #[test]
    fn chart_row_lookup_by_key() {
        let row = ChartRow {
            time: "1".to_string(),
            values: vec![("Overall LTV".to_string(), 2.5), ("ciUpper".to_string(), 3.0)],
        };
        assert_eq!(row.get("Overall LTV"), Some(2.5));
        assert_eq!(row.get("ciLower"), None);
    }

    #[test]
    fn forecast_record_labels_differ_by_segment() {
        let actual = ForecastRecord::Actual {
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            ltv: 2.5,
        };
        let predicted = ForecastRecord::Predicted {
            offset: 3,
            ltv: 4.0,
            ci_upper: 4.5,
            ci_lower: 3.5,
        };
        assert_eq!(actual.time_label(), "01/06/25");
        assert_eq!(predicted.time_label(), "3");
    }

    #[test]
    fn preferences_round_trip() {
        let prefs = Preferences {
            metric: Metric::Payer,
            range: RangePreset::D14,
        };
        let json = serde_json::to_string(&prefs).unwrap();
        let back: Preferences = serde_json::from_str(&json).unwrap();
        assert_eq!(back, prefs);
    }
}
