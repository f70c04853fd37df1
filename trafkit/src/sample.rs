//! Random sample generators feeding the dashboard pages.
//!
//! Every generator takes the caller's `Rng`, so a page seeded with
//! `StdRng::seed_from_u64` replays the same session and tests can assert on
//! exact collections.

use chrono::{Duration, Local};
use rand::Rng;

use crate::types::{
    Alert, AlertKind, AlertLevel, Camera, CameraStatus, DaySample, Incident, IncidentKind,
    IncidentStatus, Operator, Report, ReportKind, ReportStatus, Severity, Shift, TrafficSample,
};

pub const INCIDENT_LOCATIONS: [&str; 6] = [
    "Highway 21",
    "Downtown",
    "Bridge A",
    "Tunnel X",
    "Sector 9",
    "Market Rd",
];

pub const CAMERA_LOCATIONS: [&str; 7] = [
    "North", "East", "West", "South", "Central", "Sector 9", "Downtown",
];

pub const WEEK_DAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Timestamp up to ~2.7 hours in the past, the spread the alert and incident
/// feeds are seeded with.
fn recent_timestamp(rng: &mut impl Rng) -> chrono::DateTime<Local> {
    Local::now() - Duration::milliseconds(rng.gen_range(0..10_000_000))
}

pub fn alerts(rng: &mut impl Rng, n: u32) -> Vec<Alert> {
    (0..n)
        .map(|i| {
            let kind = AlertKind::ALL[i as usize % AlertKind::ALL.len()];
            Alert {
                id: i + 1,
                kind,
                message: format!("{} triggered at Zone {}", kind, i % 6 + 1),
                level: AlertLevel::ALL[i as usize % AlertLevel::ALL.len()],
                timestamp: recent_timestamp(rng),
            }
        })
        .collect()
}

/// A single fresh alert for the live feed.
pub fn alert(rng: &mut impl Rng, id: u32) -> Alert {
    Alert {
        id,
        kind: AlertKind::ALL[rng.gen_range(0..AlertKind::ALL.len())],
        message: "New alert triggered!".to_string(),
        level: AlertLevel::ALL[rng.gen_range(0..AlertLevel::ALL.len())],
        timestamp: Local::now(),
    }
}

pub fn incidents(rng: &mut impl Rng, n: u32) -> Vec<Incident> {
    (0..n)
        .map(|i| Incident {
            id: i + 1,
            kind: IncidentKind::ALL[rng.gen_range(0..IncidentKind::ALL.len())],
            location: INCIDENT_LOCATIONS[rng.gen_range(0..INCIDENT_LOCATIONS.len())].to_string(),
            severity: Severity::ALL[rng.gen_range(0..Severity::ALL.len())],
            status: IncidentStatus::ALL[i as usize % IncidentStatus::ALL.len()],
            assigned_to: format!("Operator {}", i % 6 + 1),
            timestamp: recent_timestamp(rng),
        })
        .collect()
}

/// A single fresh incident for the live feed; always starts open.
pub fn incident(rng: &mut impl Rng, id: u32) -> Incident {
    Incident {
        id,
        kind: IncidentKind::ALL[rng.gen_range(0..IncidentKind::ALL.len())],
        location: INCIDENT_LOCATIONS[rng.gen_range(0..INCIDENT_LOCATIONS.len())].to_string(),
        severity: Severity::ALL[rng.gen_range(0..Severity::ALL.len())],
        status: IncidentStatus::Open,
        assigned_to: format!("Operator {}", rng.gen_range(1..=6)),
        timestamp: Local::now(),
    }
}

pub fn cameras(rng: &mut impl Rng, n: u32) -> Vec<Camera> {
    (0..n)
        .map(|i| Camera {
            id: i + 1,
            name: format!("Camera {}", i + 1),
            location: CAMERA_LOCATIONS[i as usize % CAMERA_LOCATIONS.len()].to_string(),
            status: if rng.gen_bool(0.8) {
                CameraStatus::Online
            } else {
                CameraStatus::Offline
            },
            uptime: format!("{}h {}m", rng.gen_range(0..24), rng.gen_range(0..60)),
            alert_count: rng.gen_range(0..10),
        })
        .collect()
}

pub fn operators(rng: &mut impl Rng, n: u32) -> Vec<Operator> {
    (0..n)
        .map(|i| Operator {
            id: i + 1,
            name: format!("Operator {}", i + 1),
            shift: if i % 2 == 0 { Shift::Day } else { Shift::Night },
            active_incidents: rng.gen_range(0..5),
        })
        .collect()
}

pub fn reports(rng: &mut impl Rng, n: u32) -> Vec<Report> {
    let today = Local::now().date_naive();
    (0..n)
        .map(|i| Report {
            id: 100 + i,
            name: format!("Report-{}", i + 1),
            kind: ReportKind::ALL[i as usize % ReportKind::ALL.len()],
            generated_on: today - Duration::days(i as i64),
            downloads: rng.gen_range(0..100),
            status: ReportStatus::ALL[i as usize % ReportStatus::ALL.len()],
        })
        .collect()
}

/// 24 hourly buckets of per-category vehicle counts.
pub fn hourly_flow(rng: &mut impl Rng) -> Vec<TrafficSample> {
    (0..24)
        .map(|h| TrafficSample {
            time: format!("{}:00", h),
            cars: rng.gen_range(50..=250),
            bikes: rng.gen_range(20..=120),
            buses: rng.gen_range(5..=35),
        })
        .collect()
}

/// One analytics week, Monday through Sunday.
pub fn weekly(rng: &mut impl Rng) -> Vec<DaySample> {
    WEEK_DAYS
        .iter()
        .map(|day| DaySample {
            day: day.to_string(),
            avg: rng.gen_range(100..=600),
            peak: rng.gen_range(300..=1100),
            congestion: rng.gen_range(0..=100),
            incidents: rng.gen_range(0..5),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_alerts_have_unique_ids_and_count() {
        let mut rng = StdRng::seed_from_u64(7);
        let alerts = alerts(&mut rng, 15);
        assert_eq!(alerts.len(), 15);
        let mut ids: Vec<u32> = alerts.iter().map(|a| a.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 15);
    }

    #[test]
    fn test_same_seed_same_records() {
        let a = cameras(&mut StdRng::seed_from_u64(42), 12);
        let b = cameras(&mut StdRng::seed_from_u64(42), 12);
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.name, y.name);
            assert_eq!(x.status, y.status);
            assert_eq!(x.uptime, y.uptime);
            assert_eq!(x.alert_count, y.alert_count);
        }
    }

    #[test]
    fn test_reports_count_back_from_today() {
        let mut rng = StdRng::seed_from_u64(1);
        let reports = reports(&mut rng, 12);
        assert_eq!(reports[0].id, 100);
        assert_eq!(reports[0].name, "Report-1");
        assert_eq!(reports[11].name, "Report-12");
        assert!(reports[0].generated_on > reports[11].generated_on);
    }

    #[test]
    fn test_hourly_flow_covers_the_day() {
        let mut rng = StdRng::seed_from_u64(100);
        let flow = hourly_flow(&mut rng);
        assert_eq!(flow.len(), 24);
        assert_eq!(flow[0].time, "0:00");
        assert_eq!(flow[23].time, "23:00");
        for sample in &flow {
            assert!((50..=250).contains(&sample.cars));
            assert!((20..=120).contains(&sample.bikes));
            assert!((5..=35).contains(&sample.buses));
        }
    }

    #[test]
    fn test_weekly_has_all_days() {
        let mut rng = StdRng::seed_from_u64(9);
        let week = weekly(&mut rng);
        let days: Vec<&str> = week.iter().map(|d| d.day.as_str()).collect();
        assert_eq!(days, WEEK_DAYS);
    }
}
