//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observed-history points: `o`
//! - forecast central points: `*`
//! - confidence bounds: `.`
//! - connecting line segments: `-`

use crate::domain::{DayRecord, ForecastRecord, Series};

/// Render the combined forecast: history and forecast share one line, the
/// forecast points switch marker and gain confidence dots.
pub fn render_forecast_plot(records: &[ForecastRecord], width: usize, height: usize) -> String {
    let central: Vec<(usize, f64)> = records.iter().enumerate().map(|(i, r)| (i, r.ltv())).collect();

    let mut bounds = Vec::new();
    let mut markers = Vec::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        match record {
            ForecastRecord::Actual { .. } => markers.push((i, record.ltv(), 'o')),
            ForecastRecord::Predicted {
                ci_upper, ci_lower, ..
            } => {
                markers.push((i, record.ltv(), '*'));
                bounds.push((i, *ci_upper));
                bounds.push((i, *ci_lower));
            }
        }
    }

    render_grid(records.len(), &central, &bounds, &markers, width, height)
}

/// Render the results view's cumulative-LTV chart with its band.
pub fn render_results_plot(records: &[DayRecord], width: usize, height: usize) -> String {
    let central: Vec<(usize, f64)> = records
        .iter()
        .enumerate()
        .map(|(i, r)| (i, r.cumulative_ltv))
        .collect();

    let mut bounds = Vec::with_capacity(records.len() * 2);
    let mut markers = Vec::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        markers.push((i, record.cumulative_ltv, 'o'));
        bounds.push((i, record.ci_upper));
        bounds.push((i, record.ci_lower));
    }

    render_grid(records.len(), &central, &bounds, &markers, width, height)
}

/// Render a flat series (band included when the series carries one).
pub fn render_series_plot(series: &Series, width: usize, height: usize) -> String {
    let central: Vec<(usize, f64)> = series
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| (i, p.y))
        .collect();

    let mut bounds = Vec::new();
    if series.has_band() {
        let upper = series.ci_upper.as_deref().unwrap_or_default();
        let lower = series.ci_lower.as_deref().unwrap_or_default();
        for i in 0..series.points.len() {
            bounds.push((i, upper[i]));
            bounds.push((i, lower[i]));
        }
    }
    let markers: Vec<(usize, f64, char)> = central.iter().map(|&(i, y)| (i, y, 'o')).collect();

    render_grid(series.points.len(), &central, &bounds, &markers, width, height)
}

fn render_grid(
    n: usize,
    central: &[(usize, f64)],
    bounds: &[(usize, f64)],
    markers: &[(usize, f64, char)],
    width: usize,
    height: usize,
) -> String {
    if n == 0 {
        return "Plot: (empty dataset)\n".to_string();
    }

    let width = width.max(10);
    let height = height.max(5);

    let (y_min, y_max) = y_range(central, bounds).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Bounds first, then the central line (which only fills blank cells),
    // then markers (which override whatever is beneath them).
    for &(i, y) in bounds {
        let x = map_x(i, n, width);
        let row = map_y(y, y_min, y_max, height);
        grid[row][x] = '.';
    }

    let mut prev = None;
    for &(i, y) in central {
        let x = map_x(i, n, width);
        let row = map_y(y, y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(&mut grid, x0, y0, x, row, '-');
        } else {
            grid[row][x] = '-';
        }
        prev = Some((x, row));
    }

    for &(i, y, ch) in markers {
        let x = map_x(i, n, width);
        let row = map_y(y, y_min, y_max, height);
        grid[row][x] = ch;
    }

    // Build final string. We include a small header with ranges.
    let mut out = String::new();
    out.push_str(&format!(
        "Plot: day=[1, {n}] | ltv=[{y_min:.2}, {y_max:.2}]$\n"
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn y_range(central: &[(usize, f64)], bounds: &[(usize, f64)]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for &(_, y) in central.iter().chain(bounds.iter()) {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else if min_y.is_finite() {
        // A flat dataset still needs a drawable band around its level.
        Some((min_y - 0.5, min_y + 0.5))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(i: usize, n: usize, width: usize) -> usize {
    let width = width.max(2);
    if n <= 1 {
        return 0;
    }
    let u = (i as f64 / (n as f64 - 1.0)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn plot_golden_snapshot_small() {
        let asof = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let records = vec![
            ForecastRecord::Actual {
                date: asof,
                ltv: 2.0,
            },
            ForecastRecord::Actual {
                date: asof,
                ltv: 3.0,
            },
            ForecastRecord::Predicted {
                offset: 1,
                ltv: 4.0,
                ci_upper: 5.0,
                ci_lower: 3.0,
            },
        ];

        let txt = render_forecast_plot(&records, 11, 5);
        let expected = concat!(
            "Plot: day=[1, 3] | ltv=[1.85, 5.15]$\n",
            "          .\n",
            "         -*\n",
            "       --  \n",
            "   --o-   .\n",
            "o--        \n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn empty_dataset_renders_a_placeholder() {
        assert_eq!(render_forecast_plot(&[], 40, 10), "Plot: (empty dataset)\n");
    }

    #[test]
    fn results_plot_has_one_row_per_height_line() {
        let records = crate::data::generate_results(14, &mut crate::data::results_rng(14, 42));
        let txt = render_results_plot(&records, 60, 15);
        // Header plus `height` grid rows.
        assert_eq!(txt.lines().count(), 16);
        assert!(txt.contains('o'));
        assert!(txt.contains('.'));
    }
}
