// services/ops-dash/src/ui.rs
//
// Shared palette and widgets: tab bar, stat boxes, footer, status line

use ratatui::prelude::*;
use ratatui::widgets::*;

use trafkit::types::{AlertLevel, CameraStatus, IncidentStatus, ReportStatus, Severity};

use crate::app::{ActivityLog, PageId};
use crate::config::Theme;

/// Resolved theme colors. Pages draw against this, never against raw RGB.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg: Color,
    pub panel: Color,
    pub text: Color,
    pub dim: Color,
    pub accent: Color,
    pub ok: Color,
    pub warn: Color,
    pub err: Color,
}

pub fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Dark => Palette {
            bg: Color::Rgb(7, 16, 28),
            panel: Color::Rgb(15, 28, 44),
            text: Color::Rgb(243, 244, 246),
            dim: Color::Rgb(147, 161, 161),
            accent: Color::Rgb(59, 130, 246),
            ok: Color::Rgb(16, 185, 129),
            warn: Color::Rgb(245, 158, 11),
            err: Color::Rgb(239, 68, 68),
        },
        Theme::Light => Palette {
            bg: Color::Rgb(243, 244, 246),
            panel: Color::Rgb(255, 255, 255),
            text: Color::Rgb(31, 41, 55),
            dim: Color::Rgb(107, 114, 128),
            accent: Color::Rgb(37, 99, 235),
            ok: Color::Rgb(5, 150, 105),
            warn: Color::Rgb(202, 138, 4),
            err: Color::Rgb(220, 38, 38),
        },
    }
}

pub fn level_color(level: AlertLevel, pal: &Palette) -> Color {
    match level {
        AlertLevel::Info => pal.accent,
        AlertLevel::Warning => pal.warn,
        AlertLevel::Critical => pal.err,
    }
}

pub fn severity_color(severity: Severity, pal: &Palette) -> Color {
    match severity {
        Severity::Low => pal.ok,
        Severity::Medium => pal.warn,
        Severity::High => pal.err,
    }
}

pub fn incident_status_color(status: IncidentStatus, pal: &Palette) -> Color {
    match status {
        IncidentStatus::Open => pal.err,
        IncidentStatus::InProgress => pal.accent,
        IncidentStatus::Resolved => pal.ok,
    }
}

pub fn camera_status_color(status: CameraStatus, pal: &Palette) -> Color {
    match status {
        CameraStatus::Online => pal.ok,
        CameraStatus::Offline => pal.err,
    }
}

pub fn report_status_color(status: ReportStatus, pal: &Palette) -> Color {
    match status {
        ReportStatus::Generated => pal.ok,
        ReportStatus::Pending => pal.warn,
        ReportStatus::Failed => pal.err,
    }
}

pub fn draw_tabs(frame: &mut Frame, area: Rect, active: PageId, pal: &Palette) {
    let titles: Vec<Line> = PageId::ALL
        .iter()
        .map(|page| {
            Line::from(vec![
                Span::styled(format!("{} ", page.hotkey()), Style::default().fg(pal.dim)),
                Span::styled(
                    page.title(),
                    if *page == active {
                        Style::default().fg(pal.accent).bold()
                    } else {
                        Style::default().fg(pal.text)
                    },
                ),
            ])
        })
        .collect();

    let tabs = Tabs::new(titles)
        .select(active.index())
        .divider(Span::styled("|", Style::default().fg(pal.dim)))
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(pal.accent))
                .title(Span::styled(
                    " TRAFFIC OPS ",
                    Style::default().fg(pal.text).bg(pal.accent).bold(),
                ))
                .style(Style::default().bg(pal.bg)),
        );

    frame.render_widget(tabs, area);
}

/// Latest activity entry, rendered as a one-line strip above the footer.
pub fn draw_status_line(frame: &mut Frame, area: Rect, log: &ActivityLog, pal: &Palette) {
    let line = match log.entries().last() {
        Some(entry) => {
            let (prefix, color) = match entry.level.as_str() {
                "ERROR" => ("[ERR]", pal.err),
                "WARN" => ("[WRN]", pal.warn),
                _ => ("[INF]", pal.ok),
            };
            Line::from(vec![
                Span::styled(
                    format!("{} ", entry.timestamp.format("%H:%M:%S")),
                    Style::default().fg(pal.dim),
                ),
                Span::styled(format!("{} ", prefix), Style::default().fg(color)),
                Span::styled(entry.message.clone(), Style::default().fg(pal.text)),
            ])
        }
        None => Line::from(""),
    };
    frame.render_widget(Paragraph::new(line).style(Style::default().bg(pal.bg)), area);
}

pub fn draw_footer(frame: &mut Frame, area: Rect, hints: &[(&str, &str)], pal: &Palette) {
    let mut spans: Vec<Span> = Vec::new();
    for (key, action) in hints {
        spans.push(Span::styled(
            format!(" {} ", key),
            Style::default().fg(pal.bg).bg(pal.accent),
        ));
        spans.push(Span::styled(
            format!(" {}  ", action),
            Style::default().fg(pal.dim),
        ));
    }

    let footer = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(pal.accent))
                .style(Style::default().bg(pal.bg)),
        );
    frame.render_widget(footer, area);
}

pub fn draw_stat_box(frame: &mut Frame, area: Rect, label: &str, value: &str, value_color: Color, pal: &Palette) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(pal.dim))
        .border_type(BorderType::Rounded)
        .style(Style::default().bg(pal.panel));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let text = vec![
        Line::from(Span::styled(
            label.to_string(),
            Style::default().fg(pal.dim).add_modifier(Modifier::DIM),
        )),
        Line::from(""),
        Line::from(Span::styled(
            value.to_string(),
            Style::default().fg(value_color).bold(),
        )),
    ];

    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), inner);
}

pub fn panel_block(title: &str, pal: &Palette) -> Block<'static> {
    Block::default()
        .title(Span::styled(
            format!(" {} ", title),
            Style::default().fg(pal.warn).bold(),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(pal.dim))
        .border_type(BorderType::Rounded)
        .style(Style::default().bg(pal.panel))
}

pub fn format_number(n: u64) -> String {
    if n >= 1_000_000_000 {
        format!("{:.2}B", n as f64 / 1_000_000_000.0)
    } else if n >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.2}K", n as f64 / 1_000.0)
    } else {
        format!("{}", n)
    }
}
