//! Read/write forecast dataset JSON files.
//!
//! Dataset JSON is the "portable" representation of a generated forecast:
//! - the request parameters that produced it (metric, horizon, seed, as-of)
//! - the full record list
//!
//! so a chart can be re-rendered later without regenerating, and two runs can
//! be diffed by their inputs.

use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{ForecastConfig, ForecastRecord, Metric};
use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetFile {
    pub tool: String,
    pub asof_date: NaiveDate,
    pub metric: Metric,
    pub horizon_days: u32,
    pub seed: u64,
    pub records: Vec<ForecastRecord>,
}

/// Write a dataset JSON file.
pub fn write_dataset_json(
    path: &Path,
    config: &ForecastConfig,
    records: &[ForecastRecord],
) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::input(format!(
            "Failed to create dataset JSON '{}': {e}",
            path.display()
        ))
    })?;

    let dataset = DatasetFile {
        tool: "ltv".to_string(),
        asof_date: config.asof_date,
        metric: config.metric,
        horizon_days: config.horizon_days,
        seed: config.seed,
        records: records.to_vec(),
    };

    serde_json::to_writer_pretty(file, &dataset)
        .map_err(|e| AppError::input(format!("Failed to write dataset JSON: {e}")))?;

    Ok(())
}

/// Read a dataset JSON file.
pub fn read_dataset_json(path: &Path) -> Result<DatasetFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::input(format!(
            "Failed to open dataset JSON '{}': {e}",
            path.display()
        ))
    })?;
    let dataset: DatasetFile = serde_json::from_reader(file)
        .map_err(|e| AppError::input(format!("Invalid dataset JSON: {e}")))?;
    Ok(dataset)
}
