//! Formatted terminal reports for forecasts, results, cohorts, and models.

use crate::cohort::{CohortSpec, estimate_size};
use crate::domain::{DayRecord, ForecastConfig, ForecastRecord, Series};
use crate::models::{
    COHORT_ACCURACY, FEATURE_IMPORTANCES, PredictionSummary, SCORECARDS, TrainingConfig,
};
use crate::report::segment_stats;

/// Format the combined forecast summary (request echo + per-segment stats).
pub fn format_forecast_summary(config: &ForecastConfig, records: &[ForecastRecord]) -> String {
    let mut out = String::new();

    out.push_str("=== ltv - LTV Forecast ===\n");
    out.push_str(&format!("Metric: {}\n", config.metric.display_name()));
    out.push_str(&format!(
        "Horizon: {} days ({} actual / {} predicted)\n",
        config.horizon_days,
        config.actual_days(),
        config.predicted_days(),
    ));
    out.push_str(&format!(
        "As-of: {} | Seed: {}\n",
        config.asof_date, config.seed
    ));
    out.push_str(&format!(
        "Filters: platform={} region={} tenure={} rank={}\n",
        config.platform.display_name(),
        config.region.display_name(),
        config.tenure.display_name(),
        config.rank.display_name(),
    ));

    match segment_stats(records, true) {
        Some(stats) => out.push_str(&format!(
            "Actual: n={} | ltv=[{:.2}, {:.2}]\n",
            stats.n, stats.first, stats.last
        )),
        None => out.push_str("Actual: (empty)\n"),
    }

    match segment_stats(records, false) {
        Some(stats) => {
            out.push_str(&format!(
                "Predicted: n={} | ltv=[{:.2}, {:.2}]",
                stats.n, stats.first, stats.last
            ));
            if let Some(ForecastRecord::Predicted {
                ci_upper, ci_lower, ..
            }) = records.last()
            {
                out.push_str(&format!(" | final band=[{ci_lower:.2}, {ci_upper:.2}]"));
            }
            out.push('\n');
        }
        None => out.push_str("Predicted: (empty)\n"),
    }

    out
}

/// Format the flat-mode summary (series inventory + row count).
pub fn format_flat_summary(config: &ForecastConfig, series: &[Series], rows: usize) -> String {
    let mut out = String::new();

    out.push_str("=== ltv - LTV Series ===\n");
    out.push_str(&format!("Metric: {}\n", config.metric.display_name()));
    out.push_str(&format!(
        "Window: {} days ending {}\n",
        config.horizon_days, config.asof_date
    ));

    out.push_str(&format!("Series: {}\n", series.len()));
    for s in series {
        let band = if s.has_band() { " (banded)" } else { "" };
        out.push_str(&format!("- {} | n={}{}\n", s.name, s.points.len(), band));
    }
    out.push_str(&format!("Rows: {rows}\n"));

    out
}

/// Format the results dashboard: prediction header + per-day table.
pub fn format_results_summary(prediction: &PredictionSummary, records: &[DayRecord]) -> String {
    let mut out = String::new();

    out.push_str("=== ltv - Prediction Results ===\n");
    out.push_str(&format!(
        "Prediction: {} [{}]\n",
        prediction.name,
        prediction.status.display_name()
    ));
    out.push_str(&format!(
        "Cohort: {} players | Predicted LTV: ${:.2} | Confidence: {}%\n",
        prediction.cohort_size,
        prediction.predicted_ltv,
        (prediction.confidence * 100.0).round() as u32,
    ));
    out.push_str(&format!(
        "Updated: {} | Window: {} days\n",
        prediction.last_updated,
        records.len()
    ));

    out.push('\n');
    out.push_str(&format!(
        "{:>4} {:>9} {:>16} {:>9} {:>9} {:>9}\n",
        "day", "cum_ltv", "band", "survival", "revenue", "incr_ltv"
    ));
    for record in records {
        out.push_str(&format!(
            "{:>4} {:>9.2} [{:>6.2},{:>6.2}] {:>8.1}% {:>9.2} {:>9.2}\n",
            record.day,
            record.cumulative_ltv,
            record.ci_lower,
            record.ci_upper,
            record.survival_prob * 100.0,
            record.daily_revenue,
            record.incremental_ltv,
        ));
    }

    out
}

/// Format the cohort estimate, listing each rule and whether it counts.
pub fn format_cohort_estimate(spec: &CohortSpec) -> String {
    let mut out = String::new();

    out.push_str("=== ltv - Cohort Estimate ===\n");
    out.push_str(&format!("Cohort: {}\n", spec.name));
    out.push_str(&format!(
        "Exclude test users: {}\n",
        if spec.exclude_test_users { "yes" } else { "no" }
    ));

    if spec.rules.is_empty() {
        out.push_str("Rules: (none)\n");
    } else {
        out.push_str("Rules:\n");
        for rule in &spec.rules {
            let marker = if rule.is_valid() { " " } else { "!" };
            out.push_str(&format!(
                "{marker} {} {} '{}'\n",
                rule.field.display_name(),
                rule.op.display_name().to_lowercase(),
                rule.value,
            ));
        }
    }

    match estimate_size(spec) {
        Some(size) => out.push_str(&format!("\nEstimated audience: {size} players\n")),
        None => out.push_str("\nEstimated audience: - (add rules to estimate)\n"),
    }

    out
}

/// Format model scorecards, feature importances, and training defaults.
pub fn format_models_report(training: &TrainingConfig) -> String {
    let mut out = String::new();

    out.push_str("=== ltv - Model Performance ===\n");
    out.push_str(&format!(
        "{:<24} {:>9} {:>7} {:>9} {:>14}\n",
        "model", "accuracy", "auc", "status", "updated"
    ));
    for card in &SCORECARDS {
        out.push_str(&format!(
            "{:<24} {:>8.1}% {:>7.3} {:>9} {:>14}\n",
            card.name,
            card.accuracy_pct,
            card.auc,
            card.status.display_name(),
            card.last_updated,
        ));
    }

    out.push_str("\nTop predictive features:\n");
    for feature in &FEATURE_IMPORTANCES {
        out.push_str(&format!(
            "- {:<20} {:>3}% | {}\n",
            feature.name, feature.importance_pct, feature.description
        ));
    }

    out.push_str("\nCohort holdout accuracy:\n");
    for cohort in &COHORT_ACCURACY {
        out.push_str(&format!(
            "- {:<16} {:>5.1}% (n={}, {})\n",
            cohort.name, cohort.accuracy_pct, cohort.sample_size, cohort.confidence
        ));
    }

    out.push_str(&format!(
        "\nTraining defaults: feature={}d target={}d horizon={}d confidence={}% auto-retrain={}\n",
        training.feature_window_days,
        training.target_window_days,
        training.prediction_horizon_days,
        training.confidence_level_pct,
        if training.auto_retrain { "on" } else { "off" },
    ));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cohort::{CohortRule, RuleField, RuleOp};
    use crate::data::{forecast_rng, generate_forecast, generate_results, results_rng};
    use crate::domain::Metric;
    use chrono::NaiveDate;

    #[test]
    fn forecast_summary_reports_both_segments() {
        let asof = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let config = ForecastConfig::new(Metric::Overall, 7, asof, 42);
        let records = generate_forecast(&config, &mut forecast_rng(&config));

        let text = format_forecast_summary(&config, &records);
        assert!(text.starts_with("=== ltv - LTV Forecast ===\n"));
        assert!(text.contains("Horizon: 7 days (4 actual / 3 predicted)"));
        assert!(text.contains("Actual: n=4"));
        assert!(text.contains("Predicted: n=3"));
        assert!(text.contains("final band=["));
    }

    #[test]
    fn results_summary_has_one_table_line_per_day() {
        let prediction = crate::models::find_prediction("1").unwrap();
        let records = generate_results(7, &mut results_rng(7, 42));
        let text = format_results_summary(prediction, &records);

        assert!(text.contains("US Facebook High-Value Prospects"));
        // 4 header lines + blank + column header + 7 day rows.
        assert_eq!(text.lines().count(), 4 + 1 + 1 + 7);
    }

    #[test]
    fn cohort_report_flags_incomplete_rules() {
        let spec = CohortSpec {
            name: "Whales".to_string(),
            rules: vec![
                CohortRule {
                    field: RuleField::TotalIapSpend,
                    op: RuleOp::Gt,
                    value: "100".to_string(),
                },
                CohortRule {
                    field: RuleField::Region,
                    op: RuleOp::Eq,
                    value: String::new(),
                },
            ],
            exclude_test_users: true,
        };

        let text = format_cohort_estimate(&spec);
        assert!(text.contains("! Region equals ''"));
        assert!(text.contains("Estimated audience: 4000 players"));
    }

    #[test]
    fn models_report_lists_every_scorecard() {
        let text = format_models_report(&TrainingConfig::default());
        for card in &SCORECARDS {
            assert!(text.contains(card.name), "missing scorecard {}", card.name);
        }
        assert!(text.contains("confidence=95%"));
    }
}
