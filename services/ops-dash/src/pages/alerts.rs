// services/ops-dash/src/pages/alerts.rs
//
// Alert feed: level facet, live appends, summary chart

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use rand::Rng;
use ratatui::prelude::*;
use ratatui::widgets::*;

use trafkit::sample;
use trafkit::schedule::RefreshScheduler;
use trafkit::types::{Alert, AlertLevel};
use trafkit::view;

use crate::ui::{self, Palette};

const INITIAL_FEED: u32 = 15;

pub struct AlertsPage {
    records: Vec<Alert>,
    level: Option<AlertLevel>,
    next_id: u32,
    pub scheduler: RefreshScheduler,
}

impl AlertsPage {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            records: Vec::new(),
            level: None,
            next_id: 1,
            scheduler: RefreshScheduler::new(Duration::from_millis(interval_ms)),
        }
    }

    pub fn mount(&mut self, rng: &mut impl Rng, now: Instant) {
        self.records = sample::alerts(rng, INITIAL_FEED);
        self.level = None;
        self.next_id = INITIAL_FEED + 1;
        self.scheduler.start(now);
    }

    pub fn unmount(&mut self) {
        self.scheduler.stop();
    }

    pub fn on_tick(&mut self, now: Instant, rng: &mut impl Rng, refresh: bool) {
        if refresh && self.scheduler.poll(now) {
            let fresh = sample::alert(rng, self.next_id);
            self.next_id += 1;
            self.records.push(fresh);
        }
    }

    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char('f') => {
                self.level = match self.level {
                    None => Some(AlertLevel::Info),
                    Some(AlertLevel::Info) => Some(AlertLevel::Warning),
                    Some(AlertLevel::Warning) => Some(AlertLevel::Critical),
                    Some(AlertLevel::Critical) => None,
                };
                true
            }
            _ => false,
        }
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect, pal: &Palette) {
        let (visible, summary) = view::alert_view(&self.records, self.level);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(8)])
            .split(columns[0]);

        self.draw_filter(frame, left[0], pal);
        self.draw_feed(frame, left[1], &visible, pal);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(8),
                Constraint::Length(8),
                Constraint::Length(7),
            ])
            .split(columns[1]);

        self.draw_summary_chart(frame, right[0], &summary, pal);
        self.draw_recent_critical(frame, right[1], pal);
        self.draw_statistics(frame, right[2], &summary, pal);
    }

    fn draw_filter(&self, frame: &mut Frame, area: Rect, pal: &Palette) {
        let mut spans = vec![Span::styled("Filter: ", Style::default().fg(pal.dim))];
        let active = |selected: bool, pal: &Palette| {
            if selected {
                Style::default().fg(pal.accent).bold()
            } else {
                Style::default().fg(pal.dim)
            }
        };
        spans.push(Span::styled("All  ", active(self.level.is_none(), pal)));
        for level in AlertLevel::ALL {
            spans.push(Span::styled(
                format!("{}  ", level),
                active(self.level == Some(level), pal),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn draw_feed(&self, frame: &mut Frame, area: Rect, visible: &[Alert], pal: &Palette) {
        let header = Row::new(
            ["ID", "TYPE", "MESSAGE", "LEVEL", "TIME"]
                .iter()
                .map(|h| Cell::from(Span::styled(*h, Style::default().fg(pal.warn).bold()))),
        )
        .bottom_margin(1);

        // Show the tail of the feed when it outgrows the panel.
        let visible_rows = area.height.saturating_sub(4) as usize;
        let skip = visible.len().saturating_sub(visible_rows);

        let rows: Vec<Row> = visible
            .iter()
            .skip(skip)
            .map(|a| {
                Row::new(vec![
                    Cell::from(a.id.to_string()),
                    Cell::from(Span::styled(
                        a.kind.to_string(),
                        Style::default().fg(pal.text),
                    )),
                    Cell::from(a.message.clone()),
                    Cell::from(Span::styled(
                        a.level.to_string(),
                        Style::default().fg(ui::level_color(a.level, pal)).bold(),
                    )),
                    Cell::from(a.timestamp.format("%H:%M:%S").to_string()),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(4),
                Constraint::Length(11),
                Constraint::Min(18),
                Constraint::Length(9),
                Constraint::Length(9),
            ],
        )
        .header(header)
        .style(Style::default().fg(pal.dim))
        .block(ui::panel_block("ALERT FEED", pal));

        frame.render_widget(table, area);
    }

    fn draw_summary_chart(
        &self,
        frame: &mut Frame,
        area: Rect,
        summary: &[(AlertLevel, usize)],
        pal: &Palette,
    ) {
        let labels: Vec<String> = summary.iter().map(|(level, _)| level.to_string()).collect();
        let data: Vec<(&str, u64)> = labels
            .iter()
            .zip(summary)
            .map(|(label, (_, count))| (label.as_str(), *count as u64))
            .collect();

        let chart = BarChart::default()
            .block(ui::panel_block("ALERT SUMMARY", pal))
            .bar_width(9)
            .bar_gap(2)
            .bar_style(Style::default().fg(pal.accent))
            .value_style(Style::default().fg(pal.text).bold())
            .label_style(Style::default().fg(pal.dim))
            .data(&data[..]);
        frame.render_widget(chart, area);
    }

    fn draw_recent_critical(&self, frame: &mut Frame, area: Rect, pal: &Palette) {
        let recent = view::recent_critical(&self.records, 5);
        let lines: Vec<Line> = if recent.is_empty() {
            vec![Line::from(Span::styled(
                "No critical alerts",
                Style::default().fg(pal.dim),
            ))]
        } else {
            recent
                .iter()
                .map(|a| {
                    Line::from(Span::styled(
                        format!(
                            "- {} at {}: {}",
                            a.kind,
                            a.timestamp.format("%H:%M:%S"),
                            a.message
                        ),
                        Style::default().fg(pal.err),
                    ))
                })
                .collect()
        };
        let card = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(ui::panel_block("RECENT CRITICAL", pal));
        frame.render_widget(card, area);
    }

    fn draw_statistics(
        &self,
        frame: &mut Frame,
        area: Rect,
        summary: &[(AlertLevel, usize)],
        pal: &Palette,
    ) {
        let mut lines = vec![Line::from(Span::styled(
            format!("Total Alerts: {}", self.records.len()),
            Style::default().fg(pal.text).bold(),
        ))];
        for (level, count) in summary {
            lines.push(Line::from(Span::styled(
                format!("{}: {}", level, count),
                Style::default().fg(ui::level_color(*level, pal)),
            )));
        }
        let card = Paragraph::new(lines).block(ui::panel_block("STATISTICS", pal));
        frame.render_widget(card, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_tick_appends_with_fresh_ids() {
        let mut page = AlertsPage::new(10_000);
        let mut rng = StdRng::seed_from_u64(5);
        let t0 = Instant::now();
        page.mount(&mut rng, t0);
        assert_eq!(page.records.len(), 15);

        page.on_tick(t0 + Duration::from_millis(10_000), &mut rng, true);
        assert_eq!(page.records.len(), 16);
        let fresh = page.records.last().unwrap();
        assert_eq!(fresh.id, 16);
        assert_eq!(fresh.message, "New alert triggered!");
    }

    #[test]
    fn test_level_facet_cycles() {
        let mut page = AlertsPage::new(10_000);
        for expected in [
            Some(AlertLevel::Info),
            Some(AlertLevel::Warning),
            Some(AlertLevel::Critical),
            None,
        ] {
            page.handle_key(KeyCode::Char('f'));
            assert_eq!(page.level, expected);
        }
    }

    #[test]
    fn test_remount_resets_the_feed() {
        let mut page = AlertsPage::new(10_000);
        let mut rng = StdRng::seed_from_u64(5);
        let t0 = Instant::now();
        page.mount(&mut rng, t0);
        page.on_tick(t0 + Duration::from_millis(10_000), &mut rng, true);
        page.unmount();
        assert!(!page.scheduler.is_running());

        page.mount(&mut rng, t0 + Duration::from_secs(20));
        assert_eq!(page.records.len(), 15);
        assert_eq!(page.next_id, 16);
    }
}
