// services/ops-dash/src/pages/settings.rs
//
// Editable dashboard configuration plus the backup/export status actions

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use ratatui::prelude::*;
use ratatui::widgets::*;

use trafkit::schedule::OneShot;

use crate::app::ActivityLog;
use crate::config::{DashConfig, NotificationSound, Theme};
use crate::ui::{self, Palette};

const ACTION_DELAY: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SettingRow {
    Notifications,
    AutoEscalate,
    Theme,
    DebugMode,
    AutoRefresh,
    Sound,
    CvEndpoint,
    MessageBus,
}

impl SettingRow {
    const ALL: [SettingRow; 8] = [
        SettingRow::Notifications,
        SettingRow::AutoEscalate,
        SettingRow::Theme,
        SettingRow::DebugMode,
        SettingRow::AutoRefresh,
        SettingRow::Sound,
        SettingRow::CvEndpoint,
        SettingRow::MessageBus,
    ];

    fn label(self) -> &'static str {
        match self {
            SettingRow::Notifications => "Enable Notifications",
            SettingRow::AutoEscalate => "Auto-Escalation",
            SettingRow::Theme => "Theme",
            SettingRow::DebugMode => "Enable Debug Mode",
            SettingRow::AutoRefresh => "Auto Refresh Dashboard",
            SettingRow::Sound => "Notification Sound",
            SettingRow::CvEndpoint => "CV Endpoint",
            SettingRow::MessageBus => "Message Bus",
        }
    }

    fn is_text(self) -> bool {
        matches!(self, SettingRow::CvEndpoint | SettingRow::MessageBus)
    }
}

/// A deferred "in progress -> done" status message.
struct StatusAction {
    message: Option<&'static str>,
    done_message: &'static str,
    timer: OneShot,
}

impl StatusAction {
    fn new(done_message: &'static str) -> Self {
        Self {
            message: None,
            done_message,
            timer: OneShot::idle(),
        }
    }

    fn begin(&mut self, now: Instant, message: &'static str) {
        self.message = Some(message);
        self.timer = OneShot::after(now, ACTION_DELAY);
    }

    fn poll(&mut self, now: Instant) -> bool {
        if self.timer.poll(now) {
            self.message = Some(self.done_message);
            return true;
        }
        false
    }
}

pub struct SettingsPage {
    selected: usize,
    editing: bool,
    backup: StatusAction,
    export: StatusAction,
}

impl SettingsPage {
    pub fn new() -> Self {
        Self {
            selected: 0,
            editing: false,
            backup: StatusAction::new("Backup completed!"),
            export: StatusAction::new("Settings exported!"),
        }
    }

    /// Cancels in-flight status actions when the page is torn down.
    pub fn unmount(&mut self) {
        self.backup.timer.cancel();
        self.export.timer.cancel();
        self.editing = false;
    }

    pub fn on_tick(&mut self, now: Instant, log: &mut ActivityLog) {
        if self.backup.poll(now) {
            log.add("INFO", "Backup completed");
        }
        if self.export.poll(now) {
            log.add("INFO", "Settings exported");
        }
    }

    pub fn handle_key(
        &mut self,
        key: KeyCode,
        config: &mut DashConfig,
        log: &mut ActivityLog,
        now: Instant,
    ) -> bool {
        let row = SettingRow::ALL[self.selected];

        if self.editing {
            let field = match row {
                SettingRow::CvEndpoint => &mut config.ui.cv_endpoint,
                SettingRow::MessageBus => &mut config.ui.message_bus,
                _ => {
                    self.editing = false;
                    return true;
                }
            };
            match key {
                KeyCode::Esc | KeyCode::Enter => self.editing = false,
                KeyCode::Backspace => {
                    field.pop();
                }
                KeyCode::Char(c) => field.push(c),
                _ => {}
            }
            return true;
        }

        match key {
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                true
            }
            KeyCode::Down => {
                if self.selected + 1 < SettingRow::ALL.len() {
                    self.selected += 1;
                }
                true
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if row.is_text() {
                    self.editing = true;
                } else {
                    self.toggle(row, config, log);
                }
                true
            }
            KeyCode::Char('b') => {
                self.backup.begin(now, "Backup in progress...");
                log.add("INFO", "Backup started");
                true
            }
            KeyCode::Char('x') => {
                self.export.begin(now, "Export in progress...");
                log.add("INFO", "Settings export started");
                true
            }
            _ => false,
        }
    }

    fn toggle(&mut self, row: SettingRow, config: &mut DashConfig, log: &mut ActivityLog) {
        match row {
            SettingRow::Notifications => {
                config.ui.notifications = !config.ui.notifications;
            }
            SettingRow::AutoEscalate => {
                config.ui.auto_escalate = !config.ui.auto_escalate;
            }
            SettingRow::Theme => {
                config.ui.theme = match config.ui.theme {
                    Theme::Light => Theme::Dark,
                    Theme::Dark => Theme::Light,
                };
                log.add("INFO", &format!("Theme switched to {}", config.ui.theme));
            }
            SettingRow::DebugMode => {
                config.ui.debug_mode = !config.ui.debug_mode;
            }
            SettingRow::AutoRefresh => {
                config.ui.auto_refresh = !config.ui.auto_refresh;
                let state = if config.ui.auto_refresh { "on" } else { "off" };
                log.add("INFO", &format!("Auto refresh {}", state));
            }
            SettingRow::Sound => {
                let i = NotificationSound::ALL
                    .iter()
                    .position(|s| *s == config.ui.sound)
                    .unwrap_or(0);
                config.ui.sound = NotificationSound::ALL[(i + 1) % NotificationSound::ALL.len()];
            }
            SettingRow::CvEndpoint | SettingRow::MessageBus => {}
        }
    }

    fn value_for(&self, row: SettingRow, config: &DashConfig) -> String {
        let text = |s: &str| {
            if s.is_empty() {
                "-".to_string()
            } else {
                s.to_string()
            }
        };
        let check = |b: bool| if b { "[x]" } else { "[ ]" }.to_string();
        match row {
            SettingRow::Notifications => check(config.ui.notifications),
            SettingRow::AutoEscalate => check(config.ui.auto_escalate),
            SettingRow::Theme => config.ui.theme.to_string(),
            SettingRow::DebugMode => check(config.ui.debug_mode),
            SettingRow::AutoRefresh => check(config.ui.auto_refresh),
            SettingRow::Sound => config.ui.sound.to_string(),
            SettingRow::CvEndpoint => text(&config.ui.cv_endpoint),
            SettingRow::MessageBus => text(&config.ui.message_bus),
        }
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect, pal: &Palette, config: &DashConfig) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area);

        self.draw_rows(frame, columns[0], pal, config);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(6), Constraint::Min(5)])
            .split(columns[1]);
        self.draw_actions(frame, right[0], pal);
        self.draw_preview(frame, right[1], pal, config);
    }

    fn draw_rows(&self, frame: &mut Frame, area: Rect, pal: &Palette, config: &DashConfig) {
        let lines: Vec<Line> = SettingRow::ALL
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let selected = i == self.selected;
                let marker = if selected { "> " } else { "  " };
                let mut value = self.value_for(*row, config);
                if selected && self.editing {
                    value.push('_');
                }
                Line::from(vec![
                    Span::styled(
                        format!("{}{:<24}", marker, row.label()),
                        if selected {
                            Style::default().fg(pal.accent).bold()
                        } else {
                            Style::default().fg(pal.text)
                        },
                    ),
                    Span::styled(value, Style::default().fg(pal.warn)),
                ])
            })
            .collect();

        let card = Paragraph::new(lines).block(ui::panel_block("GENERAL", pal));
        frame.render_widget(card, area);
    }

    fn draw_actions(&self, frame: &mut Frame, area: Rect, pal: &Palette) {
        let mut lines = vec![Line::from(Span::styled(
            "b: Backup Database   x: Export Settings",
            Style::default().fg(pal.dim),
        ))];
        if let Some(message) = self.export.message {
            lines.push(Line::from(Span::styled(
                message,
                Style::default().fg(pal.accent),
            )));
        }
        if let Some(message) = self.backup.message {
            lines.push(Line::from(Span::styled(
                message,
                Style::default().fg(pal.ok),
            )));
        }
        let card = Paragraph::new(lines).block(ui::panel_block("BACKUP / EXPORT", pal));
        frame.render_widget(card, area);
    }

    fn draw_preview(&self, frame: &mut Frame, area: Rect, pal: &Palette, config: &DashConfig) {
        let card = Paragraph::new(vec![
            Line::from(Span::styled(
                format!("{} theme", config.ui.theme),
                Style::default().fg(pal.text).bold(),
            )),
            Line::from(Span::styled(
                "This is a live preview of the selected theme.",
                Style::default().fg(pal.dim),
            )),
        ])
        .block(ui::panel_block("THEME PREVIEW", pal));
        frame.render_widget(card, area);
    }
}

impl Default for SettingsPage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_toggle_round_trips() {
        let mut page = SettingsPage::new();
        let mut config = DashConfig::default();
        let mut log = ActivityLog::new();
        let now = Instant::now();

        // Move down to the theme row and toggle it twice.
        page.handle_key(KeyCode::Down, &mut config, &mut log, now);
        page.handle_key(KeyCode::Down, &mut config, &mut log, now);
        assert_eq!(SettingRow::ALL[page.selected], SettingRow::Theme);

        let initial = config.ui.theme;
        page.handle_key(KeyCode::Enter, &mut config, &mut log, now);
        assert_ne!(config.ui.theme, initial);
        page.handle_key(KeyCode::Enter, &mut config, &mut log, now);
        assert_eq!(config.ui.theme, initial);
    }

    #[test]
    fn test_backup_status_transitions_after_delay() {
        let mut page = SettingsPage::new();
        let mut config = DashConfig::default();
        let mut log = ActivityLog::new();
        let t0 = Instant::now();

        page.handle_key(KeyCode::Char('b'), &mut config, &mut log, t0);
        assert_eq!(page.backup.message, Some("Backup in progress..."));

        page.on_tick(t0 + Duration::from_millis(1999), &mut log);
        assert_eq!(page.backup.message, Some("Backup in progress..."));

        page.on_tick(t0 + ACTION_DELAY, &mut log);
        assert_eq!(page.backup.message, Some("Backup completed!"));

        // The one-shot is spent; nothing changes on later ticks.
        page.on_tick(t0 + Duration::from_secs(60), &mut log);
        assert_eq!(page.backup.message, Some("Backup completed!"));
    }

    #[test]
    fn test_text_field_editing() {
        let mut page = SettingsPage::new();
        let mut config = DashConfig::default();
        let mut log = ActivityLog::new();
        let now = Instant::now();

        while SettingRow::ALL[page.selected] != SettingRow::CvEndpoint {
            page.handle_key(KeyCode::Down, &mut config, &mut log, now);
        }
        page.handle_key(KeyCode::Enter, &mut config, &mut log, now);
        for c in "http://cv".chars() {
            page.handle_key(KeyCode::Char(c), &mut config, &mut log, now);
        }
        page.handle_key(KeyCode::Enter, &mut config, &mut log, now);
        assert_eq!(config.ui.cv_endpoint, "http://cv");
    }

    #[test]
    fn test_auto_refresh_toggle_reaches_config() {
        let mut page = SettingsPage::new();
        let mut config = DashConfig::default();
        let mut log = ActivityLog::new();
        let now = Instant::now();

        while SettingRow::ALL[page.selected] != SettingRow::AutoRefresh {
            page.handle_key(KeyCode::Down, &mut config, &mut log, now);
        }
        assert!(config.ui.auto_refresh);
        page.handle_key(KeyCode::Enter, &mut config, &mut log, now);
        assert!(!config.ui.auto_refresh);
    }
}
