use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertKind {
    Speed,
    Congestion,
    Camera,
    Weather,
    Event,
}

impl AlertKind {
    pub const ALL: [AlertKind; 5] = [
        AlertKind::Speed,
        AlertKind::Congestion,
        AlertKind::Camera,
        AlertKind::Weather,
        AlertKind::Event,
    ];
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AlertKind::Speed => "Speed",
            AlertKind::Congestion => "Congestion",
            AlertKind::Camera => "Camera",
            AlertKind::Weather => "Weather",
            AlertKind::Event => "Event",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertLevel {
    Info,
    Warning,
    Critical,
}

impl AlertLevel {
    pub const ALL: [AlertLevel; 3] = [AlertLevel::Info, AlertLevel::Warning, AlertLevel::Critical];
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AlertLevel::Info => "Info",
            AlertLevel::Warning => "Warning",
            AlertLevel::Critical => "Critical",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: u32,
    pub kind: AlertKind,
    pub message: String,
    pub level: AlertLevel,
    pub timestamp: DateTime<Local>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncidentKind {
    Accident,
    Roadblock,
    Breakdown,
    Weather,
    Event,
}

impl IncidentKind {
    pub const ALL: [IncidentKind; 5] = [
        IncidentKind::Accident,
        IncidentKind::Roadblock,
        IncidentKind::Breakdown,
        IncidentKind::Weather,
        IncidentKind::Event,
    ];
}

impl fmt::Display for IncidentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IncidentKind::Accident => "Accident",
            IncidentKind::Roadblock => "Roadblock",
            IncidentKind::Breakdown => "Breakdown",
            IncidentKind::Weather => "Weather",
            IncidentKind::Event => "Event",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Low, Severity::Medium, Severity::High];
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncidentStatus {
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
}

impl IncidentStatus {
    pub const ALL: [IncidentStatus; 3] = [
        IncidentStatus::Open,
        IncidentStatus::InProgress,
        IncidentStatus::Resolved,
    ];
}

impl fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IncidentStatus::Open => "Open",
            IncidentStatus::InProgress => "In Progress",
            IncidentStatus::Resolved => "Resolved",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Incident {
    pub id: u32,
    pub kind: IncidentKind,
    pub location: String,
    pub severity: Severity,
    pub status: IncidentStatus,
    pub assigned_to: String,
    pub timestamp: DateTime<Local>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CameraStatus {
    Online,
    Offline,
}

impl CameraStatus {
    pub const ALL: [CameraStatus; 2] = [CameraStatus::Online, CameraStatus::Offline];
}

impl fmt::Display for CameraStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CameraStatus::Online => "Online",
            CameraStatus::Offline => "Offline",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    pub id: u32,
    pub name: String,
    pub location: String,
    pub status: CameraStatus,
    /// Duration string in the `"13h 42m"` form.
    pub uptime: String,
    pub alert_count: u32,
}

impl Camera {
    /// Whole hours parsed from the front of the uptime string. Strings that
    /// do not start with a number sort as zero hours.
    pub fn uptime_hours(&self) -> u32 {
        let digits: String = self.uptime.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shift {
    Day,
    Night,
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Shift::Day => "Day",
            Shift::Night => "Night",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operator {
    pub id: u32,
    pub name: String,
    pub shift: Shift,
    pub active_incidents: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportKind {
    Daily,
    Weekly,
    Monthly,
}

impl ReportKind {
    pub const ALL: [ReportKind; 3] = [ReportKind::Daily, ReportKind::Weekly, ReportKind::Monthly];
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReportKind::Daily => "Daily",
            ReportKind::Weekly => "Weekly",
            ReportKind::Monthly => "Monthly",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportStatus {
    Pending,
    Generated,
    Failed,
}

impl ReportStatus {
    pub const ALL: [ReportStatus; 3] = [
        ReportStatus::Pending,
        ReportStatus::Generated,
        ReportStatus::Failed,
    ];
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReportStatus::Pending => "Pending",
            ReportStatus::Generated => "Generated",
            ReportStatus::Failed => "Failed",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: u32,
    pub name: String,
    pub kind: ReportKind,
    pub generated_on: NaiveDate,
    pub downloads: u32,
    pub status: ReportStatus,
}

/// One hourly traffic bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficSample {
    pub time: String,
    pub cars: u32,
    pub bikes: u32,
    pub buses: u32,
}

/// One day of the analytics week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySample {
    pub day: String,
    pub avg: u32,
    pub peak: u32,
    pub congestion: u32,
    pub incidents: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uptime_hours_parses_leading_number() {
        let cam = Camera {
            id: 1,
            name: "Camera 1".to_string(),
            location: "North".to_string(),
            status: CameraStatus::Online,
            uptime: "13h 42m".to_string(),
            alert_count: 3,
        };
        assert_eq!(cam.uptime_hours(), 13);
    }

    #[test]
    fn test_uptime_hours_falls_back_to_zero() {
        let cam = Camera {
            id: 2,
            name: "Camera 2".to_string(),
            location: "East".to_string(),
            status: CameraStatus::Offline,
            uptime: "unknown".to_string(),
            alert_count: 0,
        };
        assert_eq!(cam.uptime_hours(), 0);
    }

    #[test]
    fn test_incident_status_display_spaces_in_progress() {
        assert_eq!(IncidentStatus::InProgress.to_string(), "In Progress");
    }

    #[test]
    fn test_canonical_level_order() {
        assert_eq!(
            AlertLevel::ALL,
            [AlertLevel::Info, AlertLevel::Warning, AlertLevel::Critical]
        );
    }
}
