// services/ops-dash/src/pages/analytics.rs
//
// Weekly aggregates, generated on mount (no refresh timer on this page)

use rand::Rng;
use ratatui::prelude::*;
use ratatui::symbols;
use ratatui::widgets::*;

use trafkit::sample;
use trafkit::types::DaySample;
use trafkit::view;

use crate::ui::{self, Palette};

pub struct AnalyticsPage {
    week: Vec<DaySample>,
}

impl AnalyticsPage {
    pub fn new() -> Self {
        Self { week: Vec::new() }
    }

    pub fn mount(&mut self, rng: &mut impl Rng) {
        self.week = sample::weekly(rng);
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect, pal: &Palette) {
        let totals = view::week_totals(&self.week);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Min(8),
                Constraint::Length(11),
            ])
            .split(area);

        let stats = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(34),
                Constraint::Percentage(33),
                Constraint::Percentage(33),
            ])
            .split(rows[0]);
        ui::draw_stat_box(
            frame,
            stats[0],
            "TOTAL AVG VEHICLES",
            &ui::format_number(totals.avg),
            pal.accent,
            pal,
        );
        ui::draw_stat_box(
            frame,
            stats[1],
            "TOTAL PEAK VEHICLES",
            &ui::format_number(totals.peak),
            pal.warn,
            pal,
        );
        ui::draw_stat_box(
            frame,
            stats[2],
            "TOTAL INCIDENTS",
            &totals.incidents.to_string(),
            pal.err,
            pal,
        );

        let charts = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[1]);
        self.draw_avg_chart(frame, charts[0], pal);
        self.draw_peak_chart(frame, charts[1], pal);

        self.draw_table(frame, rows[2], pal);
    }

    fn draw_avg_chart(&self, frame: &mut Frame, area: Rect, pal: &Palette) {
        let data: Vec<(&str, u64)> = self
            .week
            .iter()
            .map(|d| (d.day.as_str(), u64::from(d.avg)))
            .collect();
        let chart = BarChart::default()
            .block(ui::panel_block("DAILY AVERAGE", pal))
            .bar_width(5)
            .bar_gap(1)
            .bar_style(Style::default().fg(pal.accent))
            .value_style(Style::default().fg(pal.text))
            .label_style(Style::default().fg(pal.dim))
            .data(&data[..]);
        frame.render_widget(chart, area);
    }

    fn draw_peak_chart(&self, frame: &mut Frame, area: Rect, pal: &Palette) {
        let peaks: Vec<(f64, f64)> = self
            .week
            .iter()
            .enumerate()
            .map(|(i, d)| (i as f64, f64::from(d.peak)))
            .collect();
        let incidents: Vec<(f64, f64)> = self
            .week
            .iter()
            .enumerate()
            .map(|(i, d)| (i as f64, f64::from(d.incidents) * 100.0))
            .collect();

        let datasets = vec![
            Dataset::default()
                .name("Peak")
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(pal.err))
                .data(&peaks),
            Dataset::default()
                .name("Incidents x100")
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(pal.ok))
                .data(&incidents),
        ];

        let chart = Chart::new(datasets)
            .block(ui::panel_block("DAILY PEAK / INCIDENTS", pal))
            .x_axis(
                Axis::default()
                    .style(Style::default().fg(pal.dim))
                    .bounds([0.0, 6.0])
                    .labels(sample::WEEK_DAYS),
            )
            .y_axis(
                Axis::default()
                    .style(Style::default().fg(pal.dim))
                    .bounds([0.0, 1200.0])
                    .labels(["0", "600", "1200"]),
            );
        frame.render_widget(chart, area);
    }

    fn draw_table(&self, frame: &mut Frame, area: Rect, pal: &Palette) {
        let header = Row::new(
            ["DAY", "AVG", "PEAK", "CONGESTION (%)", "INCIDENTS"]
                .iter()
                .map(|h| Cell::from(Span::styled(*h, Style::default().fg(pal.warn).bold()))),
        )
        .bottom_margin(1);

        let rows: Vec<Row> = self
            .week
            .iter()
            .map(|d| {
                let congestion_color = if d.congestion > 75 {
                    pal.err
                } else if d.congestion > 40 {
                    pal.warn
                } else {
                    pal.ok
                };
                Row::new(vec![
                    Cell::from(Span::styled(
                        d.day.clone(),
                        Style::default().fg(pal.text),
                    )),
                    Cell::from(d.avg.to_string()),
                    Cell::from(d.peak.to_string()),
                    Cell::from(Span::styled(
                        d.congestion.to_string(),
                        Style::default().fg(congestion_color),
                    )),
                    Cell::from(d.incidents.to_string()),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(5),
                Constraint::Length(7),
                Constraint::Length(7),
                Constraint::Length(15),
                Constraint::Length(10),
            ],
        )
        .header(header)
        .style(Style::default().fg(pal.dim))
        .block(ui::panel_block("DETAILED TABLE", pal));

        frame.render_widget(table, area);
    }
}

impl Default for AnalyticsPage {
    fn default() -> Self {
        Self::new()
    }
}
