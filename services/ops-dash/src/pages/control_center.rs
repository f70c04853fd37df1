// services/ops-dash/src/pages/control_center.rs
//
// Operator roster and incident feed with manual assignment

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use rand::Rng;
use ratatui::prelude::*;
use ratatui::widgets::*;

use trafkit::sample;
use trafkit::schedule::RefreshScheduler;
use trafkit::types::{Incident, IncidentStatus, Operator};
use trafkit::view;

use crate::app::ActivityLog;
use crate::ui::{self, Palette};

const OPERATOR_COUNT: u32 = 6;
const FEED_SIZE: u32 = 12;

pub struct ControlCenterPage {
    operators: Vec<Operator>,
    incidents: Vec<Incident>,
    selected: usize,
    pub scheduler: RefreshScheduler,
}

impl ControlCenterPage {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            operators: Vec::new(),
            incidents: Vec::new(),
            selected: 0,
            scheduler: RefreshScheduler::new(Duration::from_millis(interval_ms)),
        }
    }

    pub fn mount(&mut self, rng: &mut impl Rng, now: Instant) {
        self.operators = sample::operators(rng, OPERATOR_COUNT);
        self.incidents = sample::incidents(rng, FEED_SIZE);
        self.selected = 0;
        self.scheduler.start(now);
    }

    pub fn unmount(&mut self) {
        self.scheduler.stop();
    }

    pub fn on_tick(&mut self, now: Instant, rng: &mut impl Rng, refresh: bool) {
        if refresh && self.scheduler.poll(now) {
            for op in &mut self.operators {
                op.active_incidents = rng.gen_range(0..5);
            }
            for incident in &mut self.incidents {
                incident.status =
                    IncidentStatus::ALL[rng.gen_range(0..IncidentStatus::ALL.len())];
            }
        }
    }

    /// Hands the selected incident to the next operator in the roster and
    /// forces it into In Progress.
    fn assign_next_operator(&mut self, log: &mut ActivityLog) {
        let Some(incident) = self.incidents.get_mut(self.selected) else {
            return;
        };
        if incident.status == IncidentStatus::Resolved {
            log.add("WARN", "Resolved incidents cannot be reassigned");
            return;
        }
        let current = self
            .operators
            .iter()
            .position(|op| op.name == incident.assigned_to);
        let next = match current {
            Some(i) => (i + 1) % self.operators.len(),
            None => 0,
        };
        incident.assigned_to = self.operators[next].name.clone();
        incident.status = IncidentStatus::InProgress;
        log.add(
            "INFO",
            &format!(
                "Incident {} assigned to {}",
                incident.id, incident.assigned_to
            ),
        );
    }

    pub fn handle_key(&mut self, key: KeyCode, log: &mut ActivityLog) -> bool {
        match key {
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                true
            }
            KeyCode::Down => {
                if self.selected + 1 < self.incidents.len() {
                    self.selected += 1;
                }
                true
            }
            KeyCode::Char('a') => {
                self.assign_next_operator(log);
                true
            }
            _ => false,
        }
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect, pal: &Palette) {
        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(area);

        self.draw_feed(frame, halves[0], pal);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(OPERATOR_COUNT as u16 + 4),
                Constraint::Length(6),
                Constraint::Min(5),
            ])
            .split(halves[1]);

        self.draw_operators(frame, right[0], pal);
        self.draw_detail(frame, right[1], pal);
        self.draw_unresolved(frame, right[2], pal);
    }

    fn draw_feed(&self, frame: &mut Frame, area: Rect, pal: &Palette) {
        let header = Row::new(
            ["ID", "TYPE", "SEVERITY", "ASSIGNED TO", "STATUS"]
                .iter()
                .map(|h| Cell::from(Span::styled(*h, Style::default().fg(pal.warn).bold()))),
        )
        .bottom_margin(1);

        let rows: Vec<Row> = self
            .incidents
            .iter()
            .map(|inc| {
                Row::new(vec![
                    Cell::from(inc.id.to_string()),
                    Cell::from(Span::styled(
                        inc.kind.to_string(),
                        Style::default().fg(pal.text),
                    )),
                    Cell::from(Span::styled(
                        inc.severity.to_string(),
                        Style::default().fg(ui::severity_color(inc.severity, pal)).bold(),
                    )),
                    Cell::from(inc.assigned_to.clone()),
                    Cell::from(Span::styled(
                        inc.status.to_string(),
                        Style::default().fg(ui::incident_status_color(inc.status, pal)),
                    )),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(4),
                Constraint::Length(10),
                Constraint::Length(9),
                Constraint::Min(11),
                Constraint::Length(12),
            ],
        )
        .header(header)
        .style(Style::default().fg(pal.dim))
        .row_highlight_style(Style::default().bg(pal.bg).fg(pal.accent).bold())
        .block(ui::panel_block("INCIDENT FEED", pal));

        let mut state = TableState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_operators(&self, frame: &mut Frame, area: Rect, pal: &Palette) {
        let header = Row::new(
            ["ID", "NAME", "SHIFT", "ACTIVE"]
                .iter()
                .map(|h| Cell::from(Span::styled(*h, Style::default().fg(pal.warn).bold()))),
        )
        .bottom_margin(1);

        let rows: Vec<Row> = self
            .operators
            .iter()
            .map(|op| {
                Row::new(vec![
                    Cell::from(op.id.to_string()),
                    Cell::from(Span::styled(
                        op.name.clone(),
                        Style::default().fg(pal.text),
                    )),
                    Cell::from(op.shift.to_string()),
                    Cell::from(op.active_incidents.to_string()),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(4),
                Constraint::Min(11),
                Constraint::Length(7),
                Constraint::Length(7),
            ],
        )
        .header(header)
        .style(Style::default().fg(pal.dim))
        .block(ui::panel_block("OPERATOR STATUS", pal));

        frame.render_widget(table, area);
    }

    fn draw_detail(&self, frame: &mut Frame, area: Rect, pal: &Palette) {
        let body = match self.incidents.get(self.selected) {
            Some(inc) => vec![
                Line::from(vec![
                    Span::styled("ID: ", Style::default().fg(pal.dim)),
                    Span::styled(inc.id.to_string(), Style::default().fg(pal.text)),
                    Span::styled("   Type: ", Style::default().fg(pal.dim)),
                    Span::styled(inc.kind.to_string(), Style::default().fg(pal.text)),
                ]),
                Line::from(vec![
                    Span::styled("Status: ", Style::default().fg(pal.dim)),
                    Span::styled(
                        inc.status.to_string(),
                        Style::default().fg(ui::incident_status_color(inc.status, pal)),
                    ),
                ]),
                Line::from(vec![
                    Span::styled("Assigned To: ", Style::default().fg(pal.dim)),
                    Span::styled(inc.assigned_to.clone(), Style::default().fg(pal.text)),
                ]),
            ],
            None => vec![Line::from(Span::styled(
                "Select an incident from the feed to view details.",
                Style::default().fg(pal.dim),
            ))],
        };
        let card = Paragraph::new(body).block(ui::panel_block("SELECTED INCIDENT", pal));
        frame.render_widget(card, area);
    }

    fn draw_unresolved(&self, frame: &mut Frame, area: Rect, pal: &Palette) {
        let open = view::unresolved(&self.incidents);
        let mut lines = vec![Line::from(Span::styled(
            format!("Total Unresolved: {}", open.len()),
            Style::default().fg(pal.text).bold(),
        ))];
        for inc in &open {
            lines.push(Line::from(Span::styled(
                format!(
                    "- {} - {} (Assigned: {})",
                    inc.kind, inc.status, inc.assigned_to
                ),
                Style::default().fg(pal.dim),
            )));
        }
        let card = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(ui::panel_block("UNRESOLVED INCIDENTS", pal));
        frame.render_widget(card, area);
    }
}
