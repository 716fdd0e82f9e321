//! Export merged chart rows to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts. Columns are dynamic: `time` plus the union of row keys in first
//! -appearance order, with empty cells where a row has no value for a key.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::ChartRow;
use crate::error::AppError;

/// Write chart rows to a CSV file.
pub fn write_rows_csv(path: &Path, rows: &[ChartRow]) -> Result<(), AppError> {
    let mut columns: Vec<&str> = Vec::new();
    for row in rows {
        for (key, _) in &row.values {
            if !columns.contains(&key.as_str()) {
                columns.push(key);
            }
        }
    }

    let mut file = File::create(path).map_err(|e| {
        AppError::input(format!(
            "Failed to create export CSV '{}': {e}",
            path.display()
        ))
    })?;

    writeln!(file, "time,{}", columns.join(","))
        .map_err(|e| AppError::input(format!("Failed to write export CSV header: {e}")))?;

    for row in rows {
        let cells: Vec<String> = columns
            .iter()
            .map(|column| {
                row.get(column)
                    .map(|v| format!("{v:.4}"))
                    .unwrap_or_default()
            })
            .collect();
        writeln!(file, "{},{}", row.time, cells.join(","))
            .map_err(|e| AppError::input(format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}
