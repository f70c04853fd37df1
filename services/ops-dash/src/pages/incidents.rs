// services/ops-dash/src/pages/incidents.rs
//
// Incident feed: severity facet, free-text search, rolling 15-record window

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use rand::Rng;
use ratatui::prelude::*;
use ratatui::widgets::*;

use trafkit::sample;
use trafkit::schedule::RefreshScheduler;
use trafkit::types::{Incident, Severity};
use trafkit::view;

use crate::app::ActivityLog;
use crate::ui::{self, Palette};

const FEED_CAPACITY: usize = 15;

pub struct IncidentsPage {
    records: Vec<Incident>,
    severity: Option<Severity>,
    search: String,
    search_mode: bool,
    next_id: u32,
    pub scheduler: RefreshScheduler,
}

impl IncidentsPage {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            records: Vec::new(),
            severity: None,
            search: String::new(),
            search_mode: false,
            next_id: 1,
            scheduler: RefreshScheduler::new(Duration::from_millis(interval_ms)),
        }
    }

    pub fn mount(&mut self, rng: &mut impl Rng, now: Instant) {
        self.records = sample::incidents(rng, FEED_CAPACITY as u32);
        self.severity = None;
        self.search.clear();
        self.search_mode = false;
        self.next_id = FEED_CAPACITY as u32 + 1;
        self.scheduler.start(now);
    }

    pub fn unmount(&mut self) {
        self.scheduler.stop();
    }

    pub fn on_tick(&mut self, now: Instant, rng: &mut impl Rng, refresh: bool) {
        if refresh && self.scheduler.poll(now) {
            let fresh = sample::incident(rng, self.next_id);
            self.next_id += 1;
            self.records.insert(0, fresh);
            self.records.truncate(FEED_CAPACITY);
        }
    }

    /// Returns true when the key was consumed by this page.
    pub fn handle_key(&mut self, key: KeyCode, log: &mut ActivityLog) -> bool {
        if self.search_mode {
            match key {
                KeyCode::Esc | KeyCode::Enter => self.search_mode = false,
                KeyCode::Backspace => {
                    self.search.pop();
                }
                KeyCode::Char(c) => self.search.push(c),
                _ => {}
            }
            return true;
        }
        match key {
            KeyCode::Char('/') => {
                self.search_mode = true;
                true
            }
            KeyCode::Char('f') => {
                self.severity = match self.severity {
                    None => Some(Severity::Low),
                    Some(Severity::Low) => Some(Severity::Medium),
                    Some(Severity::Medium) => Some(Severity::High),
                    Some(Severity::High) => None,
                };
                let label = self
                    .severity
                    .map_or("All".to_string(), |s| s.to_string());
                log.add("INFO", &format!("Incident filter: {}", label));
                true
            }
            _ => false,
        }
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect, pal: &Palette) {
        let (visible, summary) = view::incident_view(&self.records, self.severity, &self.search);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(4),
                Constraint::Min(8),
            ])
            .split(area);

        self.draw_controls(frame, rows[0], pal);
        self.draw_summary(frame, rows[1], &summary, pal);
        self.draw_table(frame, rows[2], &visible, pal);
    }

    fn draw_controls(&self, frame: &mut Frame, area: Rect, pal: &Palette) {
        let severity = self
            .severity
            .map_or("All".to_string(), |s| s.to_string());
        let search = if self.search_mode {
            format!("{}_", self.search)
        } else if self.search.is_empty() {
            "-".to_string()
        } else {
            self.search.clone()
        };
        let line = Line::from(vec![
            Span::styled("Severity: ", Style::default().fg(pal.dim)),
            Span::styled(severity, Style::default().fg(pal.accent).bold()),
            Span::raw("   "),
            Span::styled("Search: ", Style::default().fg(pal.dim)),
            Span::styled(search, Style::default().fg(pal.warn)),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn draw_summary(
        &self,
        frame: &mut Frame,
        area: Rect,
        summary: &[(Severity, usize)],
        pal: &Palette,
    ) {
        let mut spans = vec![Span::styled(
            format!("Total: {}   ", self.records.len()),
            Style::default().fg(pal.text).bold(),
        )];
        for (severity, count) in summary {
            spans.push(Span::styled(
                format!("{}: {}   ", severity, count),
                Style::default().fg(ui::severity_color(*severity, pal)),
            ));
        }
        let card = Paragraph::new(Line::from(spans)).block(ui::panel_block("SUMMARY", pal));
        frame.render_widget(card, area);
    }

    fn draw_table(&self, frame: &mut Frame, area: Rect, visible: &[Incident], pal: &Palette) {
        let header = Row::new(
            ["ID", "TYPE", "LOCATION", "SEVERITY", "STATUS", "TIME"]
                .iter()
                .map(|h| Cell::from(Span::styled(*h, Style::default().fg(pal.warn).bold()))),
        )
        .bottom_margin(1);

        let rows: Vec<Row> = visible
            .iter()
            .map(|inc| {
                Row::new(vec![
                    Cell::from(inc.id.to_string()),
                    Cell::from(Span::styled(
                        inc.kind.to_string(),
                        Style::default().fg(pal.text),
                    )),
                    Cell::from(inc.location.clone()),
                    Cell::from(Span::styled(
                        inc.severity.to_string(),
                        Style::default().fg(ui::severity_color(inc.severity, pal)).bold(),
                    )),
                    Cell::from(Span::styled(
                        inc.status.to_string(),
                        Style::default().fg(ui::incident_status_color(inc.status, pal)),
                    )),
                    Cell::from(inc.timestamp.format("%H:%M:%S").to_string()),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(4),
                Constraint::Length(10),
                Constraint::Min(12),
                Constraint::Length(9),
                Constraint::Length(12),
                Constraint::Length(9),
            ],
        )
        .header(header)
        .style(Style::default().fg(pal.dim))
        .block(ui::panel_block("RECENT REPORTS", pal));

        frame.render_widget(table, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn mounted() -> (IncidentsPage, StdRng, Instant) {
        let mut page = IncidentsPage::new(8000);
        let mut rng = StdRng::seed_from_u64(6);
        let t0 = Instant::now();
        page.mount(&mut rng, t0);
        (page, rng, t0)
    }

    #[test]
    fn test_tick_prepends_and_truncates() {
        let (mut page, mut rng, t0) = mounted();
        assert_eq!(page.records.len(), FEED_CAPACITY);
        page.on_tick(t0 + Duration::from_millis(8000), &mut rng, true);
        assert_eq!(page.records.len(), FEED_CAPACITY);
        assert_eq!(page.records[0].id, 16);
    }

    #[test]
    fn test_search_mode_captures_keys() {
        let (mut page, _, _) = mounted();
        let mut log = ActivityLog::new();
        assert!(page.handle_key(KeyCode::Char('/'), &mut log));
        assert!(page.handle_key(KeyCode::Char('q'), &mut log));
        assert_eq!(page.search, "q");
        assert!(page.handle_key(KeyCode::Esc, &mut log));
        assert!(!page.search_mode);
        // Out of search mode, 'q' falls through to the global handler.
        assert!(!page.handle_key(KeyCode::Char('q'), &mut log));
    }

    #[test]
    fn test_facet_cycles_back_to_all() {
        let (mut page, _, _) = mounted();
        let mut log = ActivityLog::new();
        for expected in [
            Some(Severity::Low),
            Some(Severity::Medium),
            Some(Severity::High),
            None,
        ] {
            page.handle_key(KeyCode::Char('f'), &mut log);
            assert_eq!(page.severity, expected);
        }
    }
}
