// services/ops-dash/src/app.rs
//
// Page registry, mount/unmount lifecycle and key dispatch

use std::time::Instant;

use chrono::{DateTime, Local};
use crossterm::event::KeyCode;
use rand::rngs::StdRng;
use ratatui::prelude::*;
use ratatui::widgets::Block;

use trafkit::export::DownloadDir;

use crate::config::DashConfig;
use crate::pages::alerts::AlertsPage;
use crate::pages::analytics::AnalyticsPage;
use crate::pages::cameras::CamerasPage;
use crate::pages::control_center::ControlCenterPage;
use crate::pages::dashboard::DashboardPage;
use crate::pages::incidents::IncidentsPage;
use crate::pages::live_traffic::LiveTrafficPage;
use crate::pages::reports::ReportsPage;
use crate::pages::routes::RoutesPage;
use crate::pages::settings::SettingsPage;
use crate::ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageId {
    Dashboard,
    LiveTraffic,
    Incidents,
    Analytics,
    Cameras,
    Routes,
    ControlCenter,
    Alerts,
    Settings,
    Reports,
}

impl PageId {
    pub const ALL: [PageId; 10] = [
        PageId::Dashboard,
        PageId::LiveTraffic,
        PageId::Incidents,
        PageId::Analytics,
        PageId::Cameras,
        PageId::Routes,
        PageId::ControlCenter,
        PageId::Alerts,
        PageId::Settings,
        PageId::Reports,
    ];

    pub fn title(self) -> &'static str {
        match self {
            PageId::Dashboard => "Dashboard",
            PageId::LiveTraffic => "Live Traffic",
            PageId::Incidents => "Incidents",
            PageId::Analytics => "Analytics",
            PageId::Cameras => "Cameras",
            PageId::Routes => "Routes",
            PageId::ControlCenter => "Control Center",
            PageId::Alerts => "Alerts",
            PageId::Settings => "Settings",
            PageId::Reports => "Reports",
        }
    }

    pub fn hotkey(self) -> char {
        match self.index() {
            9 => '0',
            i => char::from(b'1' + i as u8),
        }
    }

    pub fn from_hotkey(c: char) -> Option<PageId> {
        PageId::ALL.iter().copied().find(|p| p.hotkey() == c)
    }

    pub fn index(self) -> usize {
        PageId::ALL.iter().position(|p| *p == self).unwrap_or(0)
    }

    pub fn next(self) -> PageId {
        PageId::ALL[(self.index() + 1) % PageId::ALL.len()]
    }

    pub fn prev(self) -> PageId {
        PageId::ALL[(self.index() + PageId::ALL.len() - 1) % PageId::ALL.len()]
    }
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub level: String,
    pub message: String,
}

/// In-app activity feed, capped at the last 100 entries.
#[derive(Debug, Default)]
pub struct ActivityLog {
    entries: Vec<LogEntry>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, level: &str, message: &str) {
        self.entries.push(LogEntry {
            timestamp: Local::now(),
            level: level.to_string(),
            message: message.to_string(),
        });
        if self.entries.len() > 100 {
            self.entries.remove(0);
        }
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }
}

pub struct Pages {
    pub dashboard: DashboardPage,
    pub live_traffic: LiveTrafficPage,
    pub incidents: IncidentsPage,
    pub analytics: AnalyticsPage,
    pub cameras: CamerasPage,
    pub routes: RoutesPage,
    pub control_center: ControlCenterPage,
    pub alerts: AlertsPage,
    pub settings: SettingsPage,
    pub reports: ReportsPage,
}

pub struct App {
    pub config: DashConfig,
    pub active: PageId,
    pub pages: Pages,
    pub log: ActivityLog,
    pub sink: DownloadDir,
    pub rng: StdRng,
}

impl App {
    pub fn new(config: DashConfig, rng: StdRng) -> Self {
        let sink = DownloadDir::new(config.export.dir.clone());
        let refresh = &config.refresh;
        let pages = Pages {
            dashboard: DashboardPage::new(refresh.dashboard_ms),
            live_traffic: LiveTrafficPage::new(refresh.live_traffic_ms),
            incidents: IncidentsPage::new(refresh.incidents_ms),
            analytics: AnalyticsPage::new(),
            cameras: CamerasPage::new(refresh.cameras_ms),
            routes: RoutesPage::new(refresh.routes_ms),
            control_center: ControlCenterPage::new(refresh.control_center_ms),
            alerts: AlertsPage::new(refresh.alerts_ms),
            settings: SettingsPage::new(),
            reports: ReportsPage::new(refresh.reports_ms),
        };
        let mut log = ActivityLog::new();
        log.add("INFO", "Traffic ops dashboard initialized");

        Self {
            config,
            active: PageId::Dashboard,
            pages,
            log,
            sink,
            rng,
        }
    }

    /// Mounts the active page: fresh data, refresh timer armed.
    pub fn mount_active(&mut self, now: Instant) {
        match self.active {
            PageId::Dashboard => self.pages.dashboard.mount(now),
            PageId::LiveTraffic => self.pages.live_traffic.mount(now),
            PageId::Incidents => self.pages.incidents.mount(&mut self.rng, now),
            PageId::Analytics => self.pages.analytics.mount(&mut self.rng),
            PageId::Cameras => self.pages.cameras.mount(&mut self.rng, now),
            PageId::Routes => self.pages.routes.model.mount(&mut self.rng, now),
            PageId::ControlCenter => self.pages.control_center.mount(&mut self.rng, now),
            PageId::Alerts => self.pages.alerts.mount(&mut self.rng, now),
            PageId::Settings => {}
            PageId::Reports => self.pages.reports.model.mount(&mut self.rng, now),
        }
        self.log
            .add("INFO", &format!("Opened {} page", self.active.title()));
    }

    /// Unmounts the active page: timer stopped, pending one-shots canceled.
    fn unmount_active(&mut self) {
        match self.active {
            PageId::Dashboard => self.pages.dashboard.unmount(),
            PageId::LiveTraffic => self.pages.live_traffic.unmount(),
            PageId::Incidents => self.pages.incidents.unmount(),
            PageId::Analytics => {}
            PageId::Cameras => self.pages.cameras.unmount(),
            PageId::Routes => self.pages.routes.model.unmount(),
            PageId::ControlCenter => self.pages.control_center.unmount(),
            PageId::Alerts => self.pages.alerts.unmount(),
            PageId::Settings => self.pages.settings.unmount(),
            PageId::Reports => self.pages.reports.model.unmount(),
        }
    }

    pub fn switch_to(&mut self, page: PageId, now: Instant) {
        if page == self.active {
            return;
        }
        self.unmount_active();
        self.active = page;
        self.mount_active(now);
    }

    /// Routes a key press; returns true when the app should quit. The active
    /// page sees the key first so text-entry modes capture everything.
    pub fn handle_key(&mut self, key: KeyCode, now: Instant) -> bool {
        let consumed = match self.active {
            PageId::Incidents => self.pages.incidents.handle_key(key, &mut self.log),
            PageId::Cameras => {
                self.pages
                    .cameras
                    .handle_key(key, &mut self.sink, &mut self.log)
            }
            PageId::Routes => {
                self.pages
                    .routes
                    .model
                    .handle_key(key, now, &mut self.sink, &mut self.log)
            }
            PageId::ControlCenter => self.pages.control_center.handle_key(key, &mut self.log),
            PageId::Alerts => self.pages.alerts.handle_key(key),
            PageId::Settings => {
                self.pages
                    .settings
                    .handle_key(key, &mut self.config, &mut self.log, now)
            }
            PageId::Reports => {
                self.pages
                    .reports
                    .model
                    .handle_key(key, now, &mut self.sink, &mut self.log)
            }
            _ => false,
        };
        if consumed {
            return false;
        }

        match key {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Tab => {
                let next = self.active.next();
                self.switch_to(next, now);
            }
            KeyCode::BackTab => {
                let prev = self.active.prev();
                self.switch_to(prev, now);
            }
            KeyCode::Char(c) => {
                if let Some(page) = PageId::from_hotkey(c) {
                    self.switch_to(page, now);
                }
            }
            _ => {}
        }
        false
    }

    /// Drives the active page's timers. `auto_refresh` gates the repeating
    /// refresh; one-shot transitions always run.
    pub fn tick(&mut self, now: Instant) {
        let refresh = self.config.ui.auto_refresh;
        match self.active {
            PageId::Dashboard => self.pages.dashboard.on_tick(now, &mut self.rng, refresh),
            PageId::LiveTraffic => self.pages.live_traffic.on_tick(now, &mut self.rng, refresh),
            PageId::Incidents => self.pages.incidents.on_tick(now, &mut self.rng, refresh),
            PageId::Analytics => {}
            PageId::Cameras => self.pages.cameras.on_tick(now, &mut self.rng, refresh),
            PageId::Routes => {
                self.pages
                    .routes
                    .model
                    .on_tick(now, &mut self.rng, &mut self.log, refresh)
            }
            PageId::ControlCenter => {
                self.pages
                    .control_center
                    .on_tick(now, &mut self.rng, refresh)
            }
            PageId::Alerts => self.pages.alerts.on_tick(now, &mut self.rng, refresh),
            PageId::Settings => self.pages.settings.on_tick(now, &mut self.log),
            PageId::Reports => {
                self.pages
                    .reports
                    .model
                    .on_tick(now, &mut self.rng, &mut self.log, refresh)
            }
        }
    }

    pub fn draw(&mut self, frame: &mut Frame) {
        let pal = ui::palette(self.config.ui.theme);
        frame.render_widget(
            Block::default().style(Style::default().bg(pal.bg)),
            frame.area(),
        );

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(10),
                Constraint::Length(1),
                Constraint::Length(2),
            ])
            .split(frame.area());

        ui::draw_tabs(frame, chunks[0], self.active, &pal);
        match self.active {
            PageId::Dashboard => self.pages.dashboard.draw(frame, chunks[1], &pal),
            PageId::LiveTraffic => self.pages.live_traffic.draw(frame, chunks[1], &pal),
            PageId::Incidents => self.pages.incidents.draw(frame, chunks[1], &pal),
            PageId::Analytics => self.pages.analytics.draw(frame, chunks[1], &pal),
            PageId::Cameras => self.pages.cameras.draw(frame, chunks[1], &pal),
            PageId::Routes => self.pages.routes.draw(frame, chunks[1], &pal),
            PageId::ControlCenter => self.pages.control_center.draw(frame, chunks[1], &pal),
            PageId::Alerts => self.pages.alerts.draw(frame, chunks[1], &pal),
            PageId::Settings => self.pages.settings.draw(frame, chunks[1], &pal, &self.config),
            PageId::Reports => self.pages.reports.draw(frame, chunks[1], &pal),
        }
        ui::draw_status_line(frame, chunks[2], &self.log, &pal);
        ui::draw_footer(frame, chunks[3], self.hints(), &pal);
    }

    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        match self.active {
            PageId::Incidents => &[
                ("1-0", "Pages"),
                ("F", "Severity"),
                ("/", "Search"),
                ("Q", "Quit"),
            ],
            PageId::Cameras => &[
                ("F", "Status"),
                ("S", "Sort"),
                ("V", "View"),
                ("/", "Search"),
                ("E", "Export CSV"),
                ("Q", "Quit"),
            ],
            PageId::Routes | PageId::Reports => &[
                ("Up/Down", "Select"),
                ("K", "Report type"),
                ("G", "Generate"),
                ("D", "Download CSV"),
                ("Q", "Quit"),
            ],
            PageId::ControlCenter => &[
                ("Up/Down", "Select"),
                ("A", "Assign operator"),
                ("Q", "Quit"),
            ],
            PageId::Alerts => &[("1-0", "Pages"), ("F", "Level"), ("Q", "Quit")],
            PageId::Settings => &[
                ("Up/Down", "Select"),
                ("Enter", "Toggle/Edit"),
                ("B", "Backup"),
                ("X", "Export settings"),
                ("Q", "Quit"),
            ],
            _ => &[("Tab", "Next page"), ("1-0", "Pages"), ("Q", "Quit")],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn test_app() -> App {
        App::new(DashConfig::default(), StdRng::seed_from_u64(1))
    }

    #[test]
    fn test_switching_pages_stops_the_old_timer() {
        let mut app = test_app();
        let now = Instant::now();
        app.mount_active(now);
        assert!(app.pages.dashboard.scheduler.is_running());

        app.switch_to(PageId::Alerts, now);
        assert!(!app.pages.dashboard.scheduler.is_running());
        assert!(app.pages.alerts.scheduler.is_running());
    }

    #[test]
    fn test_hotkeys_cover_all_pages() {
        for page in PageId::ALL {
            assert_eq!(PageId::from_hotkey(page.hotkey()), Some(page));
        }
    }

    #[test]
    fn test_tab_cycles_through_every_page() {
        let mut page = PageId::Dashboard;
        for _ in 0..PageId::ALL.len() {
            page = page.next();
        }
        assert_eq!(page, PageId::Dashboard);
    }

    #[test]
    fn test_quit_key() {
        let mut app = test_app();
        let now = Instant::now();
        app.mount_active(now);
        assert!(app.handle_key(KeyCode::Char('q'), now));
    }

    #[test]
    fn test_activity_log_is_capped() {
        let mut log = ActivityLog::new();
        for i in 0..150 {
            log.add("INFO", &format!("entry {}", i));
        }
        assert_eq!(log.entries().len(), 100);
        assert_eq!(log.entries()[0].message, "entry 50");
    }
}
