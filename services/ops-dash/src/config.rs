// services/ops-dash/src/config.rs
//
// Dashboard configuration: YAML file + OPS_DASH_* environment over defaults

use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    pub refresh: RefreshConfig,
    pub export: ExportConfig,
    pub ui: UiConfig,
}

/// Per-page refresh intervals in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    pub dashboard_ms: u64,
    pub live_traffic_ms: u64,
    pub incidents_ms: u64,
    pub cameras_ms: u64,
    pub routes_ms: u64,
    pub control_center_ms: u64,
    pub alerts_ms: u64,
    pub reports_ms: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            dashboard_ms: 4_000,
            live_traffic_ms: 5_000,
            incidents_ms: 8_000,
            cameras_ms: 5_000,
            routes_ms: 10_000,
            control_center_ms: 8_000,
            alerts_ms: 10_000,
            reports_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory exported CSV files land in.
    pub dir: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: "exports".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    Light,
    Dark,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "Light"),
            Theme::Dark => write!(f, "Dark"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationSound {
    Default,
    Chime,
    Alert,
}

impl NotificationSound {
    pub const ALL: [NotificationSound; 3] = [
        NotificationSound::Default,
        NotificationSound::Chime,
        NotificationSound::Alert,
    ];
}

impl fmt::Display for NotificationSound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationSound::Default => write!(f, "Default"),
            NotificationSound::Chime => write!(f, "Chime"),
            NotificationSound::Alert => write!(f, "Alert"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub theme: Theme,
    pub notifications: bool,
    pub auto_escalate: bool,
    /// Gates every page's repeating refresh timer; one-shot transitions
    /// still run.
    pub auto_refresh: bool,
    pub debug_mode: bool,
    pub sound: NotificationSound,
    pub cv_endpoint: String,
    pub message_bus: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            notifications: true,
            auto_escalate: true,
            auto_refresh: true,
            debug_mode: false,
            sound: NotificationSound::Default,
            cv_endpoint: String::new(),
            message_bus: String::new(),
        }
    }
}

pub fn load_config(path: &str, export_dir_override: Option<&str>) -> Result<DashConfig> {
    let config = Config::builder()
        .add_source(File::with_name(path).required(false))
        .add_source(Environment::with_prefix("OPS_DASH").separator("__"))
        .build()?;

    let mut cfg: DashConfig = config.try_deserialize()?;
    if let Some(dir) = export_dir_override {
        cfg.export.dir = dir.to_string();
    }
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_the_page_intervals() {
        let cfg = DashConfig::default();
        assert_eq!(cfg.refresh.dashboard_ms, 4_000);
        assert_eq!(cfg.refresh.live_traffic_ms, 5_000);
        assert_eq!(cfg.refresh.incidents_ms, 8_000);
        assert_eq!(cfg.refresh.alerts_ms, 10_000);
        assert_eq!(cfg.export.dir, "exports");
        assert!(cfg.ui.auto_refresh);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let cfg = load_config("does/not/exist", None).unwrap();
        assert_eq!(cfg.refresh.reports_ms, 10_000);
        assert_eq!(cfg.ui.theme, Theme::Dark);
    }

    #[test]
    fn test_yaml_file_overrides_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("ops-dash.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "refresh:\n  dashboard_ms: 2000\nexport:\n  dir: /tmp/out").unwrap();

        let cfg = load_config(path.to_str().unwrap(), None).unwrap();
        assert_eq!(cfg.refresh.dashboard_ms, 2_000);
        assert_eq!(cfg.export.dir, "/tmp/out");
        // Untouched keys keep their defaults.
        assert_eq!(cfg.refresh.cameras_ms, 5_000);
    }

    #[test]
    fn test_cli_export_dir_wins() {
        let cfg = load_config("does/not/exist", Some("downloads")).unwrap();
        assert_eq!(cfg.export.dir, "downloads");
    }
}
