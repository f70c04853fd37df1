// services/ops-dash/src/pages/cameras.rs
//
// Camera overview: search, status facet, sort, grid/table toggle, CSV export

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use rand::Rng;
use ratatui::prelude::*;
use ratatui::widgets::*;

use trafkit::export::{self, ExportSink};
use trafkit::sample;
use trafkit::schedule::RefreshScheduler;
use trafkit::types::{Camera, CameraStatus};
use trafkit::view::{self, CameraSort};

use crate::app::ActivityLog;
use crate::ui::{self, Palette};

const CAMERA_COUNT: u32 = 12;

pub struct CamerasPage {
    records: Vec<Camera>,
    search: String,
    search_mode: bool,
    status: Option<CameraStatus>,
    sort: Option<CameraSort>,
    grid_view: bool,
    pub scheduler: RefreshScheduler,
}

impl CamerasPage {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            records: Vec::new(),
            search: String::new(),
            search_mode: false,
            status: None,
            sort: None,
            grid_view: true,
            scheduler: RefreshScheduler::new(Duration::from_millis(interval_ms)),
        }
    }

    pub fn mount(&mut self, rng: &mut impl Rng, now: Instant) {
        self.records = sample::cameras(rng, CAMERA_COUNT);
        self.search.clear();
        self.search_mode = false;
        self.status = None;
        self.sort = None;
        self.grid_view = true;
        self.scheduler.start(now);
    }

    pub fn unmount(&mut self) {
        self.scheduler.stop();
    }

    pub fn on_tick(&mut self, now: Instant, rng: &mut impl Rng, refresh: bool) {
        if refresh && self.scheduler.poll(now) {
            self.records = sample::cameras(rng, CAMERA_COUNT);
        }
    }

    pub fn handle_key(
        &mut self,
        key: KeyCode,
        sink: &mut dyn ExportSink,
        log: &mut ActivityLog,
    ) -> bool {
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
                self.status = match self.status {
                    None => Some(CameraStatus::Online),
                    Some(CameraStatus::Online) => Some(CameraStatus::Offline),
                    Some(CameraStatus::Offline) => None,
                };
                true
            }
            KeyCode::Char('s') => {
                self.sort = match self.sort {
                    None => Some(CameraSort::Alerts),
                    Some(CameraSort::Alerts) => Some(CameraSort::Uptime),
                    Some(CameraSort::Uptime) => None,
                };
                true
            }
            KeyCode::Char('v') => {
                self.grid_view = !self.grid_view;
                true
            }
            KeyCode::Char('e') => {
                // The export always covers the full collection, ignoring the
                // current facet and sort.
                match export::export_collection(&self.records, "cameras", sink) {
                    Ok(true) => log.add("INFO", "Exported cameras.csv"),
                    Ok(false) => log.add("WARN", "Nothing to export"),
                    Err(e) => log.add("ERROR", &format!("Export failed: {}", e)),
                }
                true
            }
            _ => false,
        }
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect, pal: &Palette) {
        let (visible, summary) =
            view::camera_view(&self.records, self.status, &self.search, self.sort);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(8),
                Constraint::Length(3),
            ])
            .split(area);

        self.draw_controls(frame, rows[0], pal);
        if self.grid_view {
            self.draw_grid(frame, rows[1], &visible, pal);
        } else {
            self.draw_table(frame, rows[1], &visible, pal);
        }
        self.draw_summary(frame, rows[2], &summary, pal);
    }

    fn draw_controls(&self, frame: &mut Frame, area: Rect, pal: &Palette) {
        let status = self.status.map_or("All".to_string(), |s| s.to_string());
        let sort = match self.sort {
            None => "-",
            Some(CameraSort::Alerts) => "Alerts",
            Some(CameraSort::Uptime) => "Uptime",
        };
        let search = if self.search_mode {
            format!("{}_", self.search)
        } else if self.search.is_empty() {
            "-".to_string()
        } else {
            self.search.clone()
        };
        let view_label = if self.grid_view { "grid" } else { "table" };
        let line = Line::from(vec![
            Span::styled("Status: ", Style::default().fg(pal.dim)),
            Span::styled(status, Style::default().fg(pal.accent).bold()),
            Span::raw("   "),
            Span::styled("Sort: ", Style::default().fg(pal.dim)),
            Span::styled(sort, Style::default().fg(pal.accent)),
            Span::raw("   "),
            Span::styled("View: ", Style::default().fg(pal.dim)),
            Span::styled(view_label, Style::default().fg(pal.accent)),
            Span::raw("   "),
            Span::styled("Search: ", Style::default().fg(pal.dim)),
            Span::styled(search, Style::default().fg(pal.warn)),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn draw_grid(&self, frame: &mut Frame, area: Rect, visible: &[Camera], pal: &Palette) {
        let block = ui::panel_block("CAMERA OVERVIEW", pal);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let columns = 4usize;
        let rows_needed = visible.len().div_ceil(columns).max(1);
        let row_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Ratio(1, rows_needed as u32); rows_needed])
            .split(inner);

        for (row_idx, row_area) in row_chunks.iter().enumerate() {
            let col_chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![Constraint::Ratio(1, columns as u32); columns])
                .split(*row_area);
            for (col_idx, cell) in col_chunks.iter().enumerate() {
                let Some(cam) = visible.get(row_idx * columns + col_idx) else {
                    continue;
                };
                let border = ui::camera_status_color(cam.status, pal);
                let card = Paragraph::new(vec![
                    Line::from(Span::styled(
                        cam.name.clone(),
                        Style::default().fg(pal.text).bold(),
                    )),
                    Line::from(Span::styled(
                        format!("Location: {}", cam.location),
                        Style::default().fg(pal.dim),
                    )),
                    Line::from(Span::styled(
                        cam.status.to_string(),
                        Style::default().fg(border).bold(),
                    )),
                    Line::from(Span::styled(
                        format!("Uptime: {}  Alerts: {}", cam.uptime, cam.alert_count),
                        Style::default().fg(pal.dim),
                    )),
                ])
                .block(
                    Block::default()
                        .borders(Borders::LEFT)
                        .border_style(Style::default().fg(border)),
                );
                frame.render_widget(card, *cell);
            }
        }
    }

    fn draw_table(&self, frame: &mut Frame, area: Rect, visible: &[Camera], pal: &Palette) {
        let header = Row::new(
            ["NAME", "LOCATION", "STATUS", "UPTIME", "ALERTS"]
                .iter()
                .map(|h| Cell::from(Span::styled(*h, Style::default().fg(pal.warn).bold()))),
        )
        .bottom_margin(1);

        let rows: Vec<Row> = visible
            .iter()
            .map(|cam| {
                Row::new(vec![
                    Cell::from(Span::styled(
                        cam.name.clone(),
                        Style::default().fg(pal.text),
                    )),
                    Cell::from(cam.location.clone()),
                    Cell::from(Span::styled(
                        cam.status.to_string(),
                        Style::default().fg(ui::camera_status_color(cam.status, pal)),
                    )),
                    Cell::from(cam.uptime.clone()),
                    Cell::from(cam.alert_count.to_string()),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(12),
                Constraint::Min(10),
                Constraint::Length(8),
                Constraint::Length(10),
                Constraint::Length(7),
            ],
        )
        .header(header)
        .style(Style::default().fg(pal.dim))
        .block(ui::panel_block("CAMERA OVERVIEW", pal));

        frame.render_widget(table, area);
    }

    fn draw_summary(
        &self,
        frame: &mut Frame,
        area: Rect,
        summary: &view::CameraSummary,
        pal: &Palette,
    ) {
        let mut spans = vec![Span::styled(
            format!("Total Cameras: {}   ", self.records.len()),
            Style::default().fg(pal.text).bold(),
        )];
        for (status, count) in &summary.by_status {
            spans.push(Span::styled(
                format!("{}: {}   ", status, count),
                Style::default().fg(ui::camera_status_color(*status, pal)),
            ));
        }
        spans.push(Span::styled(
            format!("Total Alerts: {}", summary.total_alerts),
            Style::default().fg(pal.warn),
        ));
        let card = Paragraph::new(Line::from(spans)).block(ui::panel_block("CAMERA SUMMARY", pal));
        frame.render_widget(card, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use trafkit::export::MemorySink;

    fn mounted() -> (CamerasPage, StdRng, Instant) {
        let mut page = CamerasPage::new(5000);
        let mut rng = StdRng::seed_from_u64(12);
        let t0 = Instant::now();
        page.mount(&mut rng, t0);
        (page, rng, t0)
    }

    #[test]
    fn test_tick_replaces_the_collection() {
        let (mut page, mut rng, t0) = mounted();
        let before: Vec<String> = page.records.iter().map(|c| c.uptime.clone()).collect();
        page.on_tick(t0 + Duration::from_millis(5000), &mut rng, true);
        let after: Vec<String> = page.records.iter().map(|c| c.uptime.clone()).collect();
        assert_eq!(page.records.len(), CAMERA_COUNT as usize);
        assert_ne!(before, after);
    }

    #[test]
    fn test_export_covers_the_full_collection() {
        let (mut page, _, _) = mounted();
        let mut sink = MemorySink::default();
        let mut log = ActivityLog::new();
        // Facet narrowed to offline cameras; the export must still cover all 12.
        page.status = Some(CameraStatus::Offline);
        assert!(page.handle_key(KeyCode::Char('e'), &mut sink, &mut log));

        let (name, bytes) = &sink.files[0];
        assert_eq!(name, "cameras.csv");
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert_eq!(text.lines().count(), 1 + CAMERA_COUNT as usize);
    }

    #[test]
    fn test_sort_cycle() {
        let (mut page, _, _) = mounted();
        let mut sink = MemorySink::default();
        let mut log = ActivityLog::new();
        page.handle_key(KeyCode::Char('s'), &mut sink, &mut log);
        assert_eq!(page.sort, Some(CameraSort::Alerts));
        page.handle_key(KeyCode::Char('s'), &mut sink, &mut log);
        assert_eq!(page.sort, Some(CameraSort::Uptime));
        page.handle_key(KeyCode::Char('s'), &mut sink, &mut log);
        assert_eq!(page.sort, None);
    }

    #[test]
    fn test_view_toggle() {
        let (mut page, _, _) = mounted();
        let mut sink = MemorySink::default();
        let mut log = ActivityLog::new();
        assert!(page.grid_view);
        page.handle_key(KeyCode::Char('v'), &mut sink, &mut log);
        assert!(!page.grid_view);
    }
}
