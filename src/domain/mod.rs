//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - chart parameter enums (`Metric`, `RangePreset`, filters, `Overlay`)
//! - series and record types (`Series`, `ForecastRecord`, `DayRecord`)
//! - merged chart rows (`ChartRow`)
//! - the full generation request (`ForecastConfig`) and saved `Preferences`

pub mod types;

pub use types::*;
