//! Ratatui-based terminal dashboard.
//!
//! The TUI provides a settings panel for choosing the metric, chart window,
//! audience filters, and seed, then renders the combined actual + predicted
//! forecast with its confidence band. Metric/range changes are written back
//! to the preference store, mirroring the CLI.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::app::pipeline;
use crate::cli::ForecastArgs;
use crate::data::{forecast_rng, generate_forecast};
use crate::domain::{
    ForecastConfig, ForecastRecord, Metric, Platform, Preferences, RangePreset, Region, SpendRank,
    Tenure,
};
use crate::error::AppError;
use crate::prefs::{JsonFileStore, PrefStore};

mod plotters_chart;

use plotters_chart::LtvPlottersChart;

/// Start the TUI.
pub fn run(args: ForecastArgs) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::internal(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(args)?;
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode()
            .map_err(|e| AppError::internal(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::internal(format!(
                "Failed to enter alternate screen: {e}"
            )));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Settings-panel rows, navigated with Up/Down and cycled with Left/Right.
const FIELD_COUNT: usize = 8;

struct App {
    config: ForecastConfig,
    range: RangePreset,
    show_confidence: bool,
    selected_field: usize,
    status: String,
    store: JsonFileStore,
    records: Vec<ForecastRecord>,
}

impl App {
    fn new(args: ForecastArgs) -> Result<Self, AppError> {
        let store = JsonFileStore::from_env();
        let prefs = pipeline::effective_preferences(&args, &store);
        let config = pipeline::config_from_args(&args, prefs)?;

        let mut app = Self {
            config,
            range: prefs.range,
            show_confidence: !args.no_confidence,
            selected_field: 0,
            status: String::new(),
            store,
            records: Vec::new(),
        };
        app.regenerate();
        Ok(app)
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::internal(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::internal(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::internal(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the app should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => {
                if self.selected_field > 0 {
                    self.selected_field -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected_field < FIELD_COUNT - 1 {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Char('c') => {
                self.show_confidence = !self.show_confidence;
                self.regenerate();
            }
            KeyCode::Char('r') => {
                self.config.seed = self.config.seed.wrapping_add(1);
                self.regenerate();
            }
            _ => {}
        }
        false
    }

    fn adjust_field(&mut self, delta: isize) {
        let mut persist = false;
        match self.selected_field {
            0 => {
                self.config.metric = cycle(&Metric::ALL, self.config.metric, delta);
                persist = true;
            }
            1 => {
                self.range = cycle(&RangePreset::ALL, self.range, delta);
                self.config.horizon_days = self.range.days();
                persist = true;
            }
            2 => self.config.platform = cycle(&Platform::ALL_VALUES, self.config.platform, delta),
            3 => self.config.region = cycle(&Region::ALL_VALUES, self.config.region, delta),
            4 => self.config.tenure = cycle(&Tenure::ALL_VALUES, self.config.tenure, delta),
            5 => self.config.rank = cycle(&SpendRank::ALL_VALUES, self.config.rank, delta),
            6 => self.show_confidence = !self.show_confidence,
            7 => {
                self.config.seed = if delta < 0 {
                    self.config.seed.wrapping_sub(1)
                } else {
                    self.config.seed.wrapping_add(1)
                };
            }
            _ => {}
        }
        self.regenerate();
        // After regenerate so a save failure stays visible in the status bar.
        if persist {
            self.save_prefs();
        }
    }

    fn regenerate(&mut self) {
        self.records = generate_forecast(&self.config, &mut forecast_rng(&self.config));
        self.status = format!(
            "{} | {} days ({} actual / {} predicted) | seed {}",
            self.config.metric.display_name(),
            self.config.horizon_days,
            self.config.actual_days(),
            self.config.predicted_days(),
            self.config.seed,
        );
    }

    fn save_prefs(&mut self) {
        let prefs = Preferences {
            metric: self.config.metric,
            range: self.range,
        };
        if let Err(e) = self.store.save(&prefs) {
            self.status = format!(
                "Preference save failed ({}): {e}",
                self.store.path().display()
            );
        }
    }

    fn draw(&self, f: &mut ratatui::Frame) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(30), Constraint::Min(40)])
            .split(f.area());

        self.draw_settings(f, columns[0]);
        self.draw_chart(f, columns[1]);
    }

    fn draw_settings(&self, f: &mut ratatui::Frame, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(FIELD_COUNT as u16 + 2),
                Constraint::Length(4),
                Constraint::Min(1),
            ])
            .split(area);

        let lines: Vec<Line> = (0..FIELD_COUNT).map(|i| self.field_line(i)).collect();
        let settings = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(" Settings "));
        f.render_widget(settings, rows[0]);

        let help = Paragraph::new(vec![
            Line::from("↑/↓ select  ←/→ change"),
            Line::from("c band  r reseed  q quit"),
        ])
        .block(Block::default().borders(Borders::ALL).title(" Keys "));
        f.render_widget(help, rows[1]);

        let status = Paragraph::new(self.status.as_str())
            .wrap(ratatui::widgets::Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(" Status "));
        f.render_widget(status, rows[2]);
    }

    fn field_line(&self, index: usize) -> Line<'_> {
        let (label, value) = match index {
            0 => ("Metric", self.config.metric.display_name().to_string()),
            1 => ("Range", self.range.display_name().to_string()),
            2 => ("Platform", self.config.platform.display_name().to_string()),
            3 => ("Region", self.config.region.display_name().to_string()),
            4 => ("Tenure", self.config.tenure.display_name().to_string()),
            5 => ("Rank", self.config.rank.display_name().to_string()),
            6 => (
                "Band",
                if self.show_confidence { "on" } else { "off" }.to_string(),
            ),
            7 => ("Seed", self.config.seed.to_string()),
            _ => ("", String::new()),
        };

        let style = if index == self.selected_field {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Line::from(Span::styled(format!("{label:<9} {value}"), style))
    }

    fn draw_chart(&self, f: &mut ratatui::Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" LTV Forecast ");
        let inner = block.inner(area);
        f.render_widget(block, area);

        if self.records.is_empty() {
            f.render_widget(Paragraph::new("No data for this horizon."), inner);
            return;
        }

        let (actual, predicted, ci_upper, ci_lower) = chart_series(&self.records, self.show_confidence);
        let (y_min, y_max) = chart_y_bounds(&self.records, self.show_confidence);

        let chart = LtvPlottersChart {
            actual: &actual,
            predicted: &predicted,
            ci_upper: &ci_upper,
            ci_lower: &ci_lower,
            x_bounds: [0.0, (self.records.len().saturating_sub(1)).max(1) as f64],
            y_bounds: [y_min, y_max],
            x_label: "day",
            y_label: "LTV ($)".to_string(),
        };
        f.render_widget(chart, inner);
    }
}

/// Split forecast records into the four point series the chart widget draws.
///
/// The forecast line starts at the last observed point so the two segments
/// connect instead of leaving a one-day gap.
fn chart_series(
    records: &[ForecastRecord],
    include_ci: bool,
) -> (
    Vec<(f64, f64)>,
    Vec<(f64, f64)>,
    Vec<(f64, f64)>,
    Vec<(f64, f64)>,
) {
    let mut actual = Vec::new();
    let mut predicted = Vec::new();
    let mut ci_upper = Vec::new();
    let mut ci_lower = Vec::new();

    for (i, record) in records.iter().enumerate() {
        let x = i as f64;
        match record {
            ForecastRecord::Actual { ltv, .. } => actual.push((x, *ltv)),
            ForecastRecord::Predicted {
                ltv,
                ci_upper: upper,
                ci_lower: lower,
                ..
            } => {
                if predicted.is_empty() {
                    if let Some(&last) = actual.last() {
                        predicted.push(last);
                    }
                }
                predicted.push((x, *ltv));
                if include_ci {
                    ci_upper.push((x, *upper));
                    ci_lower.push((x, *lower));
                }
            }
        }
    }

    (actual, predicted, ci_upper, ci_lower)
}

fn chart_y_bounds(records: &[ForecastRecord], include_ci: bool) -> (f64, f64) {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for record in records {
        min_y = min_y.min(record.ltv());
        max_y = max_y.max(record.ltv());
        if include_ci {
            if let ForecastRecord::Predicted {
                ci_upper, ci_lower, ..
            } = record
            {
                min_y = min_y.min(*ci_lower);
                max_y = max_y.max(*ci_upper);
            }
        }
    }

    if !(min_y.is_finite() && max_y.is_finite()) {
        return (0.0, 1.0);
    }
    let pad = ((max_y - min_y).abs() * 0.05).max(0.1);
    (min_y - pad, max_y + pad)
}

fn cycle<T: Copy + PartialEq>(values: &[T], current: T, delta: isize) -> T {
    let len = values.len() as isize;
    let index = values.iter().position(|v| *v == current).unwrap_or(0) as isize;
    values[(index + delta).rem_euclid(len) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ForecastConfig;
    use chrono::NaiveDate;

    #[test]
    fn cycle_wraps_both_directions() {
        assert_eq!(cycle(&Metric::ALL, Metric::Overall, 1), Metric::Payer);
        assert_eq!(cycle(&Metric::ALL, Metric::Overall, -1), Metric::Payer);
        assert_eq!(cycle(&RangePreset::ALL, RangePreset::D60, 1), RangePreset::D7);
        assert_eq!(cycle(&RangePreset::ALL, RangePreset::D7, -1), RangePreset::D60);
    }

    #[test]
    fn chart_series_connect_the_segments() {
        let asof = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let config = ForecastConfig::new(Metric::Overall, 10, asof, 42);
        let records = generate_forecast(&config, &mut forecast_rng(&config));

        let (actual, predicted, ci_upper, ci_lower) = chart_series(&records, true);
        assert_eq!(actual.len(), 7);
        // 3 forecast points plus the bridging copy of the last observed one.
        assert_eq!(predicted.len(), 4);
        assert_eq!(predicted[0], actual[6]);
        assert_eq!(ci_upper.len(), 3);
        assert_eq!(ci_lower.len(), 3);

        let (_, _, no_upper, no_lower) = chart_series(&records, false);
        assert!(no_upper.is_empty() && no_lower.is_empty());
    }

    #[test]
    fn y_bounds_cover_the_band() {
        let asof = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let config = ForecastConfig::new(Metric::Overall, 30, asof, 42);
        let records = generate_forecast(&config, &mut forecast_rng(&config));

        let (y_min, y_max) = chart_y_bounds(&records, true);
        for record in &records {
            if let ForecastRecord::Predicted {
                ci_upper, ci_lower, ..
            } = record
            {
                assert!(*ci_upper < y_max);
                assert!(*ci_lower > y_min || *ci_lower == 0.0);
            }
        }
    }
}
