//! Derived view pipeline: pure functions from `(records, params)` to the
//! filtered/sorted collection and its summary counts. Nothing in here
//! mutates the input or touches a clock or RNG.

use crate::types::{
    Alert, AlertLevel, Camera, CameraStatus, DaySample, Incident, IncidentStatus, Report,
    ReportKind, ReportStatus, Severity, TrafficSample,
};

/// Case-insensitive substring match over one or more text fields.
/// An empty needle matches everything.
pub fn matches_search(needle: &str, fields: &[&str]) -> bool {
    if needle.is_empty() {
        return true;
    }
    let needle = needle.to_lowercase();
    fields.iter().any(|f| f.to_lowercase().contains(&needle))
}

/// Equality facet; `None` means "All".
pub fn facet_allows<T: PartialEq>(selected: Option<T>, value: &T) -> bool {
    match selected {
        None => true,
        Some(s) => s == *value,
    }
}

/// Stable descending sort by a numeric or ordinal key.
pub fn sort_desc_by_key<T, K: Ord>(records: &mut [T], key: impl Fn(&T) -> K) {
    records.sort_by(|a, b| key(b).cmp(&key(a)));
}

/// Group-by counts over a canonical category list. Every canonical category
/// appears in the output, zero or not, in canonical order.
pub fn summarize<C: Copy + PartialEq>(
    values: impl IntoIterator<Item = C>,
    all: &[C],
) -> Vec<(C, usize)> {
    let mut counts: Vec<(C, usize)> = all.iter().map(|c| (*c, 0)).collect();
    for value in values {
        if let Some(slot) = counts.iter_mut().find(|(c, _)| *c == value) {
            slot.1 += 1;
        }
    }
    counts
}

/// Alert feed: level facet plus the always-complete level summary.
pub fn alert_view(
    records: &[Alert],
    level: Option<AlertLevel>,
) -> (Vec<Alert>, Vec<(AlertLevel, usize)>) {
    let visible = records
        .iter()
        .filter(|a| facet_allows(level, &a.level))
        .cloned()
        .collect();
    let summary = summarize(records.iter().map(|a| a.level), &AlertLevel::ALL);
    (visible, summary)
}

/// The last `n` critical alerts, oldest first.
pub fn recent_critical(records: &[Alert], n: usize) -> Vec<&Alert> {
    let critical: Vec<&Alert> = records
        .iter()
        .filter(|a| a.level == AlertLevel::Critical)
        .collect();
    let skip = critical.len().saturating_sub(n);
    critical.into_iter().skip(skip).collect()
}

/// Incident feed: severity facet AND free-text search over kind and location.
pub fn incident_view(
    records: &[Incident],
    severity: Option<Severity>,
    search: &str,
) -> (Vec<Incident>, Vec<(Severity, usize)>) {
    let visible = records
        .iter()
        .filter(|inc| {
            let kind = inc.kind.to_string();
            facet_allows(severity, &inc.severity)
                && matches_search(search, &[kind.as_str(), inc.location.as_str()])
        })
        .cloned()
        .collect();
    let summary = summarize(records.iter().map(|i| i.severity), &Severity::ALL);
    (visible, summary)
}

pub fn unresolved(records: &[Incident]) -> Vec<&Incident> {
    records
        .iter()
        .filter(|i| i.status != IncidentStatus::Resolved)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraSort {
    Alerts,
    Uptime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraSummary {
    pub by_status: Vec<(CameraStatus, usize)>,
    pub total_alerts: u64,
}

/// Camera overview: name search, status facet, optional descending sort.
/// With no sort key selected the insertion order is preserved.
pub fn camera_view(
    records: &[Camera],
    status: Option<CameraStatus>,
    search: &str,
    sort: Option<CameraSort>,
) -> (Vec<Camera>, CameraSummary) {
    let mut visible: Vec<Camera> = records
        .iter()
        .filter(|c| matches_search(search, &[c.name.as_str()]) && facet_allows(status, &c.status))
        .cloned()
        .collect();
    match sort {
        Some(CameraSort::Alerts) => sort_desc_by_key(&mut visible, |c| c.alert_count),
        Some(CameraSort::Uptime) => sort_desc_by_key(&mut visible, |c| c.uptime_hours()),
        None => {}
    }
    let summary = CameraSummary {
        by_status: summarize(records.iter().map(|c| c.status), &CameraStatus::ALL),
        total_alerts: records.iter().map(|c| u64::from(c.alert_count)).sum(),
    };
    (visible, summary)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub by_kind: Vec<(ReportKind, usize)>,
    pub by_status: Vec<(ReportStatus, usize)>,
    pub total_downloads: u64,
}

pub fn report_summary(records: &[Report]) -> ReportSummary {
    ReportSummary {
        by_kind: summarize(records.iter().map(|r| r.kind), &ReportKind::ALL),
        by_status: summarize(records.iter().map(|r| r.status), &ReportStatus::ALL),
        total_downloads: records.iter().map(|r| u64::from(r.downloads)).sum(),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlowTotals {
    pub cars: u64,
    pub bikes: u64,
    pub buses: u64,
}

pub fn flow_totals(samples: &[TrafficSample]) -> FlowTotals {
    samples.iter().fold(FlowTotals::default(), |mut acc, s| {
        acc.cars += u64::from(s.cars);
        acc.bikes += u64::from(s.bikes);
        acc.buses += u64::from(s.buses);
        acc
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeekTotals {
    pub avg: u64,
    pub peak: u64,
    pub incidents: u64,
}

pub fn week_totals(days: &[DaySample]) -> WeekTotals {
    days.iter().fold(WeekTotals::default(), |mut acc, d| {
        acc.avg += u64::from(d.avg);
        acc.peak += u64::from(d.peak);
        acc.incidents += u64::from(d.incidents);
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn alert(id: u32, level: AlertLevel) -> Alert {
        Alert {
            id,
            kind: crate::types::AlertKind::Speed,
            message: format!("alert {}", id),
            level,
            timestamp: chrono::Local::now(),
        }
    }

    #[test]
    fn test_identity_filter_preserves_content_and_order() {
        let mut rng = StdRng::seed_from_u64(3);
        let records = sample::alerts(&mut rng, 15);
        let (visible, _) = alert_view(&records, None);
        assert_eq!(visible.len(), records.len());
        for (a, b) in records.iter().zip(&visible) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.level, b.level);
        }
    }

    #[test]
    fn test_summary_counts_sum_to_collection_size() {
        let mut rng = StdRng::seed_from_u64(11);
        let records = sample::incidents(&mut rng, 15);
        let (_, summary) = incident_view(&records, None, "");
        let total: usize = summary.iter().map(|(_, n)| n).sum();
        assert_eq!(total, records.len());
        assert_eq!(summary.len(), Severity::ALL.len());
    }

    #[test]
    fn test_level_facet_concrete_scenario() {
        let records = vec![
            alert(1, AlertLevel::Info),
            alert(2, AlertLevel::Critical),
            alert(3, AlertLevel::Warning),
        ];
        let (visible, summary) = alert_view(&records, Some(AlertLevel::Critical));
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, 2);
        assert_eq!(
            summary,
            vec![
                (AlertLevel::Info, 1),
                (AlertLevel::Warning, 1),
                (AlertLevel::Critical, 1),
            ]
        );
    }

    #[test]
    fn test_summary_keeps_zero_categories() {
        let records = vec![alert(1, AlertLevel::Info)];
        let (_, summary) = alert_view(&records, None);
        assert_eq!(
            summary,
            vec![
                (AlertLevel::Info, 1),
                (AlertLevel::Warning, 0),
                (AlertLevel::Critical, 0),
            ]
        );
    }

    #[test]
    fn test_search_is_case_insensitive() {
        assert!(matches_search("high", &["Highway 21"]));
        assert!(matches_search("", &["anything"]));
        assert!(!matches_search("bridge", &["Highway 21", "Downtown"]));
    }

    #[test]
    fn test_camera_sort_descending_adjacent_pairs() {
        let mut rng = StdRng::seed_from_u64(21);
        let records = sample::cameras(&mut rng, 12);
        let (visible, _) = camera_view(&records, None, "", Some(CameraSort::Alerts));
        for pair in visible.windows(2) {
            assert!(pair[0].alert_count >= pair[1].alert_count);
        }
        let (by_uptime, _) = camera_view(&records, None, "", Some(CameraSort::Uptime));
        for pair in by_uptime.windows(2) {
            assert!(pair[0].uptime_hours() >= pair[1].uptime_hours());
        }
    }

    #[test]
    fn test_camera_no_sort_keeps_insertion_order() {
        let mut rng = StdRng::seed_from_u64(5);
        let records = sample::cameras(&mut rng, 12);
        let (visible, _) = camera_view(&records, None, "", None);
        let ids: Vec<u32> = visible.iter().map(|c| c.id).collect();
        let expected: Vec<u32> = records.iter().map(|c| c.id).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_incident_search_matches_kind_and_location() {
        let mut rng = StdRng::seed_from_u64(8);
        let records = sample::incidents(&mut rng, 15);
        let (visible, _) = incident_view(&records, None, "downtown");
        assert!(visible.iter().all(|i| i.location == "Downtown"));
        let (all, _) = incident_view(&records, None, "");
        assert_eq!(all.len(), records.len());
    }

    #[test]
    fn test_unresolved_excludes_resolved_only() {
        let mut rng = StdRng::seed_from_u64(2);
        let records = sample::incidents(&mut rng, 12);
        let open = unresolved(&records);
        assert!(open.iter().all(|i| i.status != IncidentStatus::Resolved));
        let resolved = records.len() - open.len();
        assert_eq!(
            resolved,
            records
                .iter()
                .filter(|i| i.status == IncidentStatus::Resolved)
                .count()
        );
    }

    #[test]
    fn test_recent_critical_takes_last_five() {
        let records: Vec<Alert> = (1..=12).map(|i| alert(i, AlertLevel::Critical)).collect();
        let recent = recent_critical(&records, 5);
        let ids: Vec<u32> = recent.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![8, 9, 10, 11, 12]);
    }

    #[test]
    fn test_flow_totals_accumulate() {
        let samples = vec![
            TrafficSample { time: "0:00".into(), cars: 10, bikes: 5, buses: 1 },
            TrafficSample { time: "1:00".into(), cars: 20, bikes: 7, buses: 2 },
        ];
        let totals = flow_totals(&samples);
        assert_eq!(totals.cars, 30);
        assert_eq!(totals.bikes, 12);
        assert_eq!(totals.buses, 3);
    }

    #[test]
    fn test_report_summary_covers_all_kinds_and_statuses() {
        let mut rng = StdRng::seed_from_u64(13);
        let records = sample::reports(&mut rng, 12);
        let summary = report_summary(&records);
        let kinds: usize = summary.by_kind.iter().map(|(_, n)| n).sum();
        let statuses: usize = summary.by_status.iter().map(|(_, n)| n).sum();
        assert_eq!(kinds, 12);
        assert_eq!(statuses, 12);
        let downloads: u64 = records.iter().map(|r| u64::from(r.downloads)).sum();
        assert_eq!(summary.total_downloads, downloads);
    }
}
