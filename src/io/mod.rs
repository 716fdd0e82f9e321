//! Input/output helpers.
//!
//! - forecast dataset JSON read/write (`dataset`)
//! - chart-row CSV export (`export`)

pub mod dataset;
pub mod export;

pub use dataset::*;
pub use export::*;
