// services/ops-dash/src/pages/reports.rs
//
// Report catalog: auto-refresh, generate-with-delay, per-report CSV download.
// The routes page renders a second instance of the same model.

use std::time::{Duration, Instant};

use chrono::Local;
use crossterm::event::KeyCode;
use rand::Rng;
use ratatui::prelude::*;
use ratatui::widgets::*;

use trafkit::export::{self, ExportSink};
use trafkit::sample;
use trafkit::schedule::{OneShot, RefreshScheduler};
use trafkit::types::{Report, ReportKind, ReportStatus};
use trafkit::view;

use crate::app::ActivityLog;
use crate::ui::{self, Palette};

const CATALOG_SIZE: u32 = 12;
const GENERATION_DELAY: Duration = Duration::from_millis(3000);

/// A generate action waiting for its Pending -> Generated transition.
struct PendingGeneration {
    report_id: u32,
    timer: OneShot,
}

pub struct ReportsModel {
    pub records: Vec<Report>,
    pub selected: usize,
    pub kind_choice: ReportKind,
    pending: Vec<PendingGeneration>,
    generated_count: u32,
    pub scheduler: RefreshScheduler,
}

impl ReportsModel {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            records: Vec::new(),
            selected: 0,
            kind_choice: ReportKind::Daily,
            pending: Vec::new(),
            generated_count: 0,
            scheduler: RefreshScheduler::new(Duration::from_millis(interval_ms)),
        }
    }

    pub fn mount(&mut self, rng: &mut impl Rng, now: Instant) {
        self.records = sample::reports(rng, CATALOG_SIZE);
        self.selected = 0;
        self.kind_choice = ReportKind::Daily;
        self.pending.clear();
        self.generated_count = 0;
        self.scheduler.start(now);
    }

    /// Stops the refresh timer and cancels in-flight generations.
    pub fn unmount(&mut self) {
        self.scheduler.stop();
        for pending in &mut self.pending {
            pending.timer.cancel();
        }
        self.pending.clear();
    }

    pub fn on_tick(
        &mut self,
        now: Instant,
        rng: &mut impl Rng,
        log: &mut ActivityLog,
        refresh: bool,
    ) {
        if refresh && self.scheduler.poll(now) {
            self.records = sample::reports(rng, CATALOG_SIZE);
            self.selected = self.selected.min(self.records.len().saturating_sub(1));
        }
        self.poll_pending(now, rng, log);
    }

    /// Applies due Pending -> Generated transitions. A transition whose
    /// report vanished (the catalog was regenerated underneath it) or was
    /// already applied is a silent no-op.
    fn poll_pending(&mut self, now: Instant, rng: &mut impl Rng, log: &mut ActivityLog) {
        let records = &mut self.records;
        self.pending.retain_mut(|pending| {
            if !pending.timer.poll(now) {
                return pending.timer.is_pending();
            }
            if let Some(report) = records
                .iter_mut()
                .find(|r| r.id == pending.report_id && r.status == ReportStatus::Pending)
            {
                report.status = ReportStatus::Generated;
                report.downloads = rng.gen_range(0..100);
                log.add("INFO", &format!("{} generated", report.name));
            }
            false
        });
    }

    /// Prepends a Pending report and arms its one-shot transition.
    pub fn generate(&mut self, now: Instant, log: &mut ActivityLog) {
        self.generated_count += 1;
        let report = Report {
            id: self.records.len() as u32 + 100 + self.generated_count,
            name: format!("Report-{}", CATALOG_SIZE + self.generated_count),
            kind: self.kind_choice,
            generated_on: Local::now().date_naive(),
            downloads: 0,
            status: ReportStatus::Pending,
        };
        log.add("INFO", &format!("Generating {} report...", report.kind));
        self.pending.push(PendingGeneration {
            report_id: report.id,
            timer: OneShot::after(now, GENERATION_DELAY),
        });
        self.records.insert(0, report);
        self.selected = 0;
    }

    pub fn download_selected(&self, sink: &mut dyn ExportSink, log: &mut ActivityLog) {
        let Some(report) = self.records.get(self.selected) else {
            log.add("WARN", "No report selected");
            return;
        };
        match export::export_record(report, &report.name, sink) {
            Ok(()) => log.add("INFO", &format!("Downloaded {}.csv", report.name)),
            Err(e) => log.add("ERROR", &format!("Download failed: {}", e)),
        }
    }

    pub fn handle_key(
        &mut self,
        key: KeyCode,
        now: Instant,
        sink: &mut dyn ExportSink,
        log: &mut ActivityLog,
    ) -> bool {
        match key {
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                true
            }
            KeyCode::Down => {
                if self.selected + 1 < self.records.len() {
                    self.selected += 1;
                }
                true
            }
            KeyCode::Char('k') => {
                self.kind_choice = match self.kind_choice {
                    ReportKind::Daily => ReportKind::Weekly,
                    ReportKind::Weekly => ReportKind::Monthly,
                    ReportKind::Monthly => ReportKind::Daily,
                };
                true
            }
            KeyCode::Char('g') => {
                self.generate(now, log);
                true
            }
            KeyCode::Char('d') => {
                self.download_selected(sink, log);
                true
            }
            _ => false,
        }
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect, title: &str, pal: &Palette) {
        let summary = view::report_summary(&self.records);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(8),
                Constraint::Length(4),
            ])
            .split(area);

        let controls = Line::from(vec![
            Span::styled("New report type: ", Style::default().fg(pal.dim)),
            Span::styled(
                self.kind_choice.to_string(),
                Style::default().fg(pal.accent).bold(),
            ),
            Span::styled(
                "   (k cycles, g generates)",
                Style::default().fg(pal.dim),
            ),
        ]);
        frame.render_widget(Paragraph::new(controls), rows[0]);

        self.draw_table(frame, rows[1], title, pal);
        self.draw_summary(frame, rows[2], &summary, pal);
    }

    fn draw_table(&self, frame: &mut Frame, area: Rect, title: &str, pal: &Palette) {
        let header = Row::new(
            ["ID", "NAME", "TYPE", "GENERATED ON", "DOWNLOADS", "STATUS"]
                .iter()
                .map(|h| Cell::from(Span::styled(*h, Style::default().fg(pal.warn).bold()))),
        )
        .bottom_margin(1);

        let rows: Vec<Row> = self
            .records
            .iter()
            .map(|r| {
                Row::new(vec![
                    Cell::from(r.id.to_string()),
                    Cell::from(Span::styled(
                        r.name.clone(),
                        Style::default().fg(pal.text),
                    )),
                    Cell::from(r.kind.to_string()),
                    Cell::from(r.generated_on.format("%Y-%m-%d").to_string()),
                    Cell::from(r.downloads.to_string()),
                    Cell::from(Span::styled(
                        r.status.to_string(),
                        Style::default()
                            .fg(ui::report_status_color(r.status, pal))
                            .bold(),
                    )),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(5),
                Constraint::Min(10),
                Constraint::Length(8),
                Constraint::Length(13),
                Constraint::Length(10),
                Constraint::Length(10),
            ],
        )
        .header(header)
        .style(Style::default().fg(pal.dim))
        .row_highlight_style(Style::default().bg(pal.bg).fg(pal.accent).bold())
        .block(ui::panel_block(title, pal));

        let mut state = TableState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_summary(
        &self,
        frame: &mut Frame,
        area: Rect,
        summary: &view::ReportSummary,
        pal: &Palette,
    ) {
        let mut kind_spans = vec![Span::styled(
            format!("Total Reports: {}   ", self.records.len()),
            Style::default().fg(pal.text).bold(),
        )];
        for (kind, count) in &summary.by_kind {
            kind_spans.push(Span::styled(
                format!("{}: {}   ", kind, count),
                Style::default().fg(pal.accent),
            ));
        }
        let mut status_spans = Vec::new();
        for (status, count) in &summary.by_status {
            status_spans.push(Span::styled(
                format!("{}: {}   ", status, count),
                Style::default().fg(ui::report_status_color(*status, pal)),
            ));
        }
        status_spans.push(Span::styled(
            format!("Total Downloads: {}", summary.total_downloads),
            Style::default().fg(pal.warn),
        ));

        let card = Paragraph::new(vec![Line::from(kind_spans), Line::from(status_spans)])
            .block(ui::panel_block("REPORTS SUMMARY", pal));
        frame.render_widget(card, area);
    }
}

pub struct ReportsPage {
    pub model: ReportsModel,
}

impl ReportsPage {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            model: ReportsModel::new(interval_ms),
        }
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect, pal: &Palette) {
        self.model.draw(frame, area, "AVAILABLE REPORTS", pal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use trafkit::export::MemorySink;

    fn mounted() -> (ReportsModel, StdRng, Instant) {
        let mut model = ReportsModel::new(10_000);
        let mut rng = StdRng::seed_from_u64(31);
        let t0 = Instant::now();
        model.mount(&mut rng, t0);
        (model, rng, t0)
    }

    #[test]
    fn test_generate_prepends_a_pending_report() {
        let (mut model, _, t0) = mounted();
        let mut log = ActivityLog::new();
        model.generate(t0, &mut log);
        let fresh = &model.records[0];
        assert_eq!(fresh.status, ReportStatus::Pending);
        assert_eq!(fresh.downloads, 0);
        assert_eq!(fresh.name, "Report-13");
        assert_eq!(model.records.len(), CATALOG_SIZE as usize + 1);
    }

    #[test]
    fn test_transition_fires_once_after_the_delay() {
        let (mut model, mut rng, t0) = mounted();
        let mut log = ActivityLog::new();
        model.generate(t0, &mut log);
        let id = model.records[0].id;

        model.poll_pending(t0 + Duration::from_millis(2999), &mut rng, &mut log);
        assert_eq!(model.records[0].status, ReportStatus::Pending);

        model.poll_pending(t0 + GENERATION_DELAY, &mut rng, &mut log);
        let report = model.records.iter().find(|r| r.id == id).unwrap();
        assert_eq!(report.status, ReportStatus::Generated);
        let downloads = report.downloads;

        // A later poll must not re-apply the mutation.
        model.poll_pending(t0 + Duration::from_secs(60), &mut rng, &mut log);
        let report = model.records.iter().find(|r| r.id == id).unwrap();
        assert_eq!(report.downloads, downloads);
        assert!(model.pending.is_empty());
    }

    #[test]
    fn test_transition_after_removal_is_a_no_op() {
        let (mut model, mut rng, t0) = mounted();
        let mut log = ActivityLog::new();
        model.generate(t0, &mut log);
        let id = model.records[0].id;

        // The refresh cycle wipes the catalog before the delay elapses.
        model.records = sample::reports(&mut rng, CATALOG_SIZE);
        model.poll_pending(t0 + GENERATION_DELAY, &mut rng, &mut log);

        assert!(model.records.iter().all(|r| r.id != id));
        assert!(model.pending.is_empty());
    }

    #[test]
    fn test_remount_cancels_inflight_generations() {
        let (mut model, mut rng, t0) = mounted();
        let mut log = ActivityLog::new();
        model.generate(t0, &mut log);
        model.unmount();
        model.mount(&mut rng, t0 + Duration::from_millis(1));

        // Overlapping mounts must not double-apply the transition.
        let before: Vec<(u32, ReportStatus)> =
            model.records.iter().map(|r| (r.id, r.status)).collect();
        model.poll_pending(t0 + Duration::from_secs(10), &mut rng, &mut log);
        let after: Vec<(u32, ReportStatus)> =
            model.records.iter().map(|r| (r.id, r.status)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_download_selected_writes_one_record() {
        let (mut model, _, _) = mounted();
        let mut log = ActivityLog::new();
        let mut sink = MemorySink::default();
        model.selected = 2;
        model.download_selected(&mut sink, &mut log);

        let (name, bytes) = &sink.files[0];
        assert_eq!(name, &format!("{}.csv", model.records[2].name));
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.starts_with("id,name,kind,generated_on,downloads,status"));
    }

    #[test]
    fn test_refresh_replaces_the_catalog() {
        let (mut model, mut rng, t0) = mounted();
        let mut log = ActivityLog::new();
        model.selected = 11;
        model.on_tick(t0 + Duration::from_millis(10_000), &mut rng, &mut log, true);
        assert_eq!(model.records.len(), CATALOG_SIZE as usize);
        assert!(model.selected < model.records.len());
    }
}
