// services/ops-dash/src/pages/live_traffic.rs
//
// Hourly flow page: 24 buckets regenerated from a fresh seed each cycle

use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::prelude::*;
use ratatui::symbols;
use ratatui::widgets::*;

use trafkit::sample;
use trafkit::schedule::RefreshScheduler;
use trafkit::types::TrafficSample;
use trafkit::view;

use crate::ui::{self, Palette};

pub struct LiveTrafficPage {
    flow: Vec<TrafficSample>,
    last_update: DateTime<Local>,
    pub scheduler: RefreshScheduler,
}

impl LiveTrafficPage {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            flow: Vec::new(),
            last_update: Local::now(),
            scheduler: RefreshScheduler::new(Duration::from_millis(interval_ms)),
        }
    }

    pub fn mount(&mut self, now: Instant) {
        // First render uses a fixed seed; each refresh cycle draws a new one.
        self.flow = sample::hourly_flow(&mut StdRng::seed_from_u64(100));
        self.last_update = Local::now();
        self.scheduler.start(now);
    }

    pub fn unmount(&mut self) {
        self.scheduler.stop();
    }

    pub fn on_tick(&mut self, now: Instant, rng: &mut impl Rng, refresh: bool) {
        if refresh && self.scheduler.poll(now) {
            let seed: u64 = rng.gen();
            self.flow = sample::hourly_flow(&mut StdRng::seed_from_u64(seed));
            self.last_update = Local::now();
        }
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect, pal: &Palette) {
        let totals = view::flow_totals(&self.flow);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(5),
                Constraint::Min(8),
                Constraint::Length(9),
            ])
            .split(area);

        let updated = Paragraph::new(format!(
            "Last update: {}",
            self.last_update.format("%H:%M:%S")
        ))
        .style(Style::default().fg(pal.dim));
        frame.render_widget(updated, rows[0]);

        let stats = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(34),
                Constraint::Percentage(33),
                Constraint::Percentage(33),
            ])
            .split(rows[1]);
        ui::draw_stat_box(frame, stats[0], "CARS", &ui::format_number(totals.cars), pal.accent, pal);
        ui::draw_stat_box(frame, stats[1], "BIKES", &ui::format_number(totals.bikes), pal.warn, pal);
        ui::draw_stat_box(frame, stats[2], "BUSES", &ui::format_number(totals.buses), pal.ok, pal);

        self.draw_flow_chart(frame, rows[2], pal);
        self.draw_table(frame, rows[3], pal);
    }

    fn draw_flow_chart(&self, frame: &mut Frame, area: Rect, pal: &Palette) {
        let cars: Vec<(f64, f64)> = series(&self.flow, |s| s.cars);
        let bikes: Vec<(f64, f64)> = series(&self.flow, |s| s.bikes);
        let buses: Vec<(f64, f64)> = series(&self.flow, |s| s.buses);

        let datasets = vec![
            Dataset::default()
                .name("Cars")
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(pal.accent))
                .data(&cars),
            Dataset::default()
                .name("Bikes")
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(pal.warn))
                .data(&bikes),
            Dataset::default()
                .name("Buses")
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(pal.ok))
                .data(&buses),
        ];

        let chart = Chart::new(datasets)
            .block(ui::panel_block("HOURLY TRAFFIC FLOW", pal))
            .x_axis(
                Axis::default()
                    .style(Style::default().fg(pal.dim))
                    .bounds([0.0, 23.0])
                    .labels(["0:00", "6:00", "12:00", "18:00", "23:00"]),
            )
            .y_axis(
                Axis::default()
                    .style(Style::default().fg(pal.dim))
                    .bounds([0.0, 260.0])
                    .labels(["0", "130", "260"]),
            );
        frame.render_widget(chart, area);
    }

    fn draw_table(&self, frame: &mut Frame, area: Rect, pal: &Palette) {
        let header = Row::new(vec![
            Cell::from(Span::styled("TIME", Style::default().fg(pal.warn).bold())),
            Cell::from(Span::styled("CARS", Style::default().fg(pal.warn).bold())),
            Cell::from(Span::styled("BIKES", Style::default().fg(pal.warn).bold())),
            Cell::from(Span::styled("BUSES", Style::default().fg(pal.warn).bold())),
        ])
        .bottom_margin(1);

        let rows: Vec<Row> = self
            .flow
            .iter()
            .map(|s| {
                Row::new(vec![
                    Cell::from(Span::styled(s.time.clone(), Style::default().fg(pal.text))),
                    Cell::from(s.cars.to_string()),
                    Cell::from(s.bikes.to_string()),
                    Cell::from(s.buses.to_string()),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(8),
                Constraint::Length(8),
                Constraint::Length(8),
                Constraint::Length(8),
            ],
        )
        .header(header)
        .style(Style::default().fg(pal.dim))
        .block(ui::panel_block("DETAILED TRAFFIC", pal));

        frame.render_widget(table, area);
    }
}

fn series(flow: &[TrafficSample], pick: impl Fn(&TrafficSample) -> u32) -> Vec<(f64, f64)> {
    flow.iter()
        .enumerate()
        .map(|(i, s)| (i as f64, f64::from(pick(s))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_seeds_a_full_day() {
        let mut page = LiveTrafficPage::new(5000);
        page.mount(Instant::now());
        assert_eq!(page.flow.len(), 24);
    }

    #[test]
    fn test_tick_regenerates_the_flow() {
        let mut page = LiveTrafficPage::new(5000);
        let t0 = Instant::now();
        let mut rng = StdRng::seed_from_u64(1);
        page.mount(t0);
        let before = page.flow.clone();
        page.on_tick(t0 + Duration::from_millis(5000), &mut rng, true);
        assert_eq!(page.flow.len(), 24);
        assert_ne!(page.flow, before);
    }

    #[test]
    fn test_totals_follow_the_flow() {
        let mut page = LiveTrafficPage::new(5000);
        page.mount(Instant::now());
        let totals = view::flow_totals(&page.flow);
        let cars: u64 = page.flow.iter().map(|s| u64::from(s.cars)).sum();
        assert_eq!(totals.cars, cars);
    }
}
