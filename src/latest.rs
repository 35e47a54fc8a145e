// Latest-report resolution: one current report per project.
use crate::types::{Project, Report};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Chronological order of two reports of the same project: reporting period,
/// then submission time, then id. A missing period or timestamp sorts before
/// any present one.
pub fn chronological(a: &Report, b: &Report) -> Ordering {
    a.reporting_period
        .cmp(&b.reporting_period)
        .then_with(|| a.submission_date.cmp(&b.submission_date))
        .then_with(|| a.id.cmp(&b.id))
}

#[derive(Debug, Default)]
pub struct LatestReports<'a> {
    pub by_project: BTreeMap<&'a str, &'a Report>,
    /// Registry projects that have no report at all.
    pub without_reports: Vec<String>,
}

impl<'a> LatestReports<'a> {
    pub fn get(&self, project_name: &str) -> Option<&'a Report> {
        self.by_project.get(project_name).copied()
    }

    pub fn len(&self) -> usize {
        self.by_project.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_project.is_empty()
    }
}

/// Pick the most recent report of every project. The winner does not depend
/// on the order of `reports`.
pub fn resolve_latest<'a>(reports: &'a [Report], registry: &[Project]) -> LatestReports<'a> {
    let mut by_project: BTreeMap<&'a str, &'a Report> = BTreeMap::new();
    for r in reports {
        by_project
            .entry(r.project_name.as_str())
            .and_modify(|current| {
                if chronological(r, *current) == Ordering::Greater {
                    *current = r;
                }
            })
            .or_insert(r);
    }

    let mut seen = BTreeSet::new();
    let without_reports: Vec<String> = registry
        .iter()
        .map(|p| p.project_name.as_str())
        .filter(|name| !by_project.contains_key(name) && seen.insert(*name))
        .map(str::to_string)
        .collect();

    debug!(
        reports = reports.len(),
        projects = by_project.len(),
        without_reports = without_reports.len(),
        "resolved latest reports"
    );
    LatestReports { by_project, without_reports }
}

/// Registry projects with no report for `period`.
pub fn missing_for_period(reports: &[Report], registry: &[Project], period: &str) -> Vec<String> {
    let reported: BTreeSet<&str> = reports
        .iter()
        .filter(|r| r.reporting_period.as_deref() == Some(period))
        .map(|r| r.project_name.as_str())
        .collect();
    let mut out: Vec<String> = registry
        .iter()
        .map(|p| p.project_name.as_str())
        .filter(|name| !reported.contains(name))
        .map(str::to_string)
        .collect();
    out.sort();
    out.dedup();
    out
}
