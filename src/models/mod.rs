//! Prediction-model registry: scorecards, feature importances, the sample
//! prediction runs, and the training configuration menu.
//!
//! The numbers are the notebook-derived figures the dashboard ships with;
//! there is no trainer behind them.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Lifecycle state of a scored model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelStatus {
    Active,
    Training,
    Stale,
}

impl ModelStatus {
    pub fn display_name(self) -> &'static str {
        match self {
            ModelStatus::Active => "active",
            ModelStatus::Training => "training",
            ModelStatus::Stale => "stale",
        }
    }
}

/// Quality metrics for one prediction model.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ModelScorecard {
    pub name: &'static str,
    pub accuracy_pct: f64,
    pub auc: f64,
    pub status: ModelStatus,
    pub last_updated: &'static str,
}

pub const SCORECARDS: [ModelScorecard; 8] = [
    ModelScorecard {
        name: "IAP Purchase Model",
        accuracy_pct: 89.4,
        auc: 0.874,
        status: ModelStatus::Active,
        last_updated: "2 hours ago",
    },
    ModelScorecard {
        name: "Subscription Model",
        accuracy_pct: 76.2,
        auc: 0.823,
        status: ModelStatus::Active,
        last_updated: "2 hours ago",
    },
    ModelScorecard {
        name: "Ad Impression Model",
        accuracy_pct: 82.1,
        auc: 0.791,
        status: ModelStatus::Active,
        last_updated: "2 hours ago",
    },
    ModelScorecard {
        name: "Churn Model",
        accuracy_pct: 84.7,
        auc: 0.856,
        status: ModelStatus::Active,
        last_updated: "2 hours ago",
    },
    ModelScorecard {
        name: "Daily Retention Model",
        accuracy_pct: 78.9,
        auc: 0.812,
        status: ModelStatus::Active,
        last_updated: "2 hours ago",
    },
    ModelScorecard {
        name: "IAP Spend Model",
        accuracy_pct: 91.2,
        auc: 0.893,
        status: ModelStatus::Active,
        last_updated: "2 hours ago",
    },
    ModelScorecard {
        name: "Ad Revenue Model",
        accuracy_pct: 87.6,
        auc: 0.845,
        status: ModelStatus::Active,
        last_updated: "2 hours ago",
    },
    ModelScorecard {
        name: "General Behavior Model",
        accuracy_pct: 81.3,
        auc: 0.798,
        status: ModelStatus::Active,
        last_updated: "2 hours ago",
    },
];

/// One input feature and its share of the models' predictive power.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FeatureImportance {
    pub name: &'static str,
    pub importance_pct: u8,
    pub description: &'static str,
}

pub const FEATURE_IMPORTANCES: [FeatureImportance; 5] = [
    FeatureImportance {
        name: "Sessions (7d)",
        importance_pct: 34,
        description: "Number of sessions in first week",
    },
    FeatureImportance {
        name: "Total IAP Revenue",
        importance_pct: 28,
        description: "In-app purchase spending",
    },
    FeatureImportance {
        name: "Level Progression",
        importance_pct: 19,
        description: "Levels completed vs time",
    },
    FeatureImportance {
        name: "Tutorial Completion",
        importance_pct: 11,
        description: "Onboarding completion status",
    },
    FeatureImportance {
        name: "Platform",
        importance_pct: 8,
        description: "iOS vs Android performance",
    },
];

/// Per-cohort holdout accuracy.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CohortAccuracy {
    pub name: &'static str,
    pub accuracy_pct: f64,
    pub sample_size: u32,
    pub confidence: &'static str,
}

pub const COHORT_ACCURACY: [CohortAccuracy; 4] = [
    CohortAccuracy {
        name: "High Spenders",
        accuracy_pct: 94.2,
        sample_size: 1240,
        confidence: "high",
    },
    CohortAccuracy {
        name: "New Players",
        accuracy_pct: 87.6,
        sample_size: 15600,
        confidence: "high",
    },
    CohortAccuracy {
        name: "Retention Risk",
        accuracy_pct: 82.3,
        sample_size: 3400,
        confidence: "medium",
    },
    CohortAccuracy {
        name: "Social Players",
        accuracy_pct: 78.9,
        sample_size: 890,
        confidence: "medium",
    },
];

/// Completion state of a prediction run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionStatus {
    Completed,
    Running,
    Failed,
}

impl PredictionStatus {
    pub fn display_name(self) -> &'static str {
        match self {
            PredictionStatus::Completed => "completed",
            PredictionStatus::Running => "running",
            PredictionStatus::Failed => "failed",
        }
    }
}

/// Header data for one finished prediction run.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PredictionSummary {
    pub id: &'static str,
    pub name: &'static str,
    pub cohort_size: u32,
    pub predicted_ltv: f64,
    pub confidence: f64,
    pub last_updated: &'static str,
    pub status: PredictionStatus,
}

pub const SAMPLE_PREDICTIONS: [PredictionSummary; 3] = [
    PredictionSummary {
        id: "1",
        name: "US Facebook High-Value Prospects",
        cohort_size: 12_500,
        predicted_ltv: 4.87,
        confidence: 0.82,
        last_updated: "2 hours ago",
        status: PredictionStatus::Completed,
    },
    PredictionSummary {
        id: "2",
        name: "Tutorial Completers Cohort",
        cohort_size: 8_900,
        predicted_ltv: 3.24,
        confidence: 0.78,
        last_updated: "4 hours ago",
        status: PredictionStatus::Completed,
    },
    PredictionSummary {
        id: "3",
        name: "Level 12 Stuck Players",
        cohort_size: 3_400,
        predicted_ltv: 2.15,
        confidence: 0.71,
        last_updated: "6 hours ago",
        status: PredictionStatus::Completed,
    },
];

pub fn find_prediction(id: &str) -> Option<&'static PredictionSummary> {
    SAMPLE_PREDICTIONS.iter().find(|p| p.id == id)
}

/// Menu values for the training configuration screen.
pub const FEATURE_WINDOW_OPTIONS: [u32; 4] = [7, 14, 30, 60];
pub const TARGET_WINDOW_OPTIONS: [u32; 3] = [7, 14, 30];
pub const PREDICTION_HORIZON_OPTIONS: [u32; 3] = [7, 14, 30];
pub const CONFIDENCE_LEVEL_OPTIONS: [u32; 4] = [80, 90, 95, 99];

/// Training configuration for a prediction run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub feature_window_days: u32,
    pub target_window_days: u32,
    pub prediction_horizon_days: u32,
    pub confidence_level_pct: u32,
    pub auto_retrain: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            feature_window_days: 7,
            target_window_days: 7,
            prediction_horizon_days: 7,
            confidence_level_pct: 95,
            auto_retrain: true,
        }
    }
}

impl TrainingConfig {
    /// Reject values outside the configuration menus.
    pub fn validate(&self) -> Result<(), AppError> {
        if !FEATURE_WINDOW_OPTIONS.contains(&self.feature_window_days) {
            return Err(AppError::input(format!(
                "Feature window must be one of {FEATURE_WINDOW_OPTIONS:?} days."
            )));
        }
        if !TARGET_WINDOW_OPTIONS.contains(&self.target_window_days) {
            return Err(AppError::input(format!(
                "Target window must be one of {TARGET_WINDOW_OPTIONS:?} days."
            )));
        }
        if !PREDICTION_HORIZON_OPTIONS.contains(&self.prediction_horizon_days) {
            return Err(AppError::input(format!(
                "Prediction horizon must be one of {PREDICTION_HORIZON_OPTIONS:?} days."
            )));
        }
        if !CONFIDENCE_LEVEL_OPTIONS.contains(&self.confidence_level_pct) {
            return Err(AppError::input(format!(
                "Confidence level must be one of {CONFIDENCE_LEVEL_OPTIONS:?} percent."
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_training_config_is_on_menu() {
        TrainingConfig::default().validate().unwrap();
    }

    #[test]
    fn off_menu_values_are_rejected() {
        let config = TrainingConfig {
            prediction_horizon_days: 60,
            ..TrainingConfig::default()
        };
        assert!(config.validate().is_err());

        let config = TrainingConfig {
            confidence_level_pct: 85,
            ..TrainingConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn prediction_lookup_by_id() {
        assert_eq!(find_prediction("2").unwrap().name, "Tutorial Completers Cohort");
        assert!(find_prediction("99").is_none());
    }

    #[test]
    fn feature_importances_cover_the_full_share() {
        let total: u32 = FEATURE_IMPORTANCES
            .iter()
            .map(|f| f.importance_pct as u32)
            .sum();
        assert_eq!(total, 100);
    }
}
