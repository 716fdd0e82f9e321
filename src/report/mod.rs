//! Reporting utilities: segment statistics and formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the generation code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

pub mod format;

pub use format::*;

use crate::domain::ForecastRecord;

/// First/last levels of one chart segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentStats {
    pub n: usize,
    pub first: f64,
    pub last: f64,
}

/// Summarize one segment of the combined forecast.
pub fn segment_stats(records: &[ForecastRecord], actual: bool) -> Option<SegmentStats> {
    let mut values = records
        .iter()
        .filter(|r| r.is_actual() == actual)
        .map(|r| r.ltv());

    let first = values.next()?;
    let mut last = first;
    let mut n = 1;
    for v in values {
        last = v;
        n += 1;
    }

    Some(SegmentStats { n, first, last })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn stats_split_by_segment() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let records = vec![
            ForecastRecord::Actual { date, ltv: 2.0 },
            ForecastRecord::Actual { date, ltv: 3.0 },
            ForecastRecord::Predicted {
                offset: 1,
                ltv: 3.4,
                ci_upper: 3.6,
                ci_lower: 3.2,
            },
        ];

        assert_eq!(
            segment_stats(&records, true),
            Some(SegmentStats {
                n: 2,
                first: 2.0,
                last: 3.0
            })
        );
        assert_eq!(
            segment_stats(&records, false),
            Some(SegmentStats {
                n: 1,
                first: 3.4,
                last: 3.4
            })
        );
        assert_eq!(segment_stats(&[], true), None);
    }
}
