// Cross-period movement of a project's scores.
//
// The two most recent reports of a project are compared metric by metric and
// every change is classified as improved, declined or unchanged. Risk is
// normalized so that a higher value is already the safer one; no metric
// needs its direction inverted.
use crate::latest::chronological;
use crate::rating::{self, Dimension};
use crate::score::{self, CompositeScores, ScoreLabel};
use crate::types::Report;
use crate::util::{round1, round2};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// The metrics tracked across periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Metric {
    OverallScore,
    RiskLevel,
    FinancialHealth,
    CustomerSatisfaction,
    TeamKpis,
    DepartmentalScore,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::OverallScore,
        Metric::RiskLevel,
        Metric::FinancialHealth,
        Metric::CustomerSatisfaction,
        Metric::TeamKpis,
        Metric::DepartmentalScore,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Metric::OverallScore => "Overall Score",
            Metric::RiskLevel => "Risk Level",
            Metric::FinancialHealth => "Financial Health",
            Metric::CustomerSatisfaction => "Customer Satisfaction",
            Metric::TeamKpis => "Team KPIs",
            Metric::DepartmentalScore => "Departmental Score",
        }
    }

    pub fn value(self, report: &Report) -> Option<f64> {
        let dimension = |d: Dimension| rating::rate(d, report.rating(d)).map(round2);
        match self {
            Metric::OverallScore => score::overall_score(report),
            Metric::RiskLevel => dimension(Dimension::RiskLevel),
            Metric::FinancialHealth => dimension(Dimension::FinancialHealth),
            Metric::CustomerSatisfaction => dimension(Dimension::CustomerSatisfaction),
            Metric::TeamKpis => score::team_score(report),
            Metric::DepartmentalScore => score::departmental_score(report),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChangeStatus {
    Improved,
    Declined,
    NoChange,
}

impl ChangeStatus {
    pub fn from_change(change: f64) -> Self {
        if change > 0.0 {
            ChangeStatus::Improved
        } else if change < 0.0 {
            ChangeStatus::Declined
        } else {
            ChangeStatus::NoChange
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ChangeStatus::Improved => "improved",
            ChangeStatus::Declined => "declined",
            ChangeStatus::NoChange => "no change",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricChange {
    pub metric: Metric,
    pub previous: f64,
    pub current: f64,
    pub change: f64,
    pub status: ChangeStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeltaReport {
    pub project_name: String,
    pub previous_period: Option<String>,
    pub current_period: Option<String>,
    pub improved: Vec<MetricChange>,
    pub declined: Vec<MetricChange>,
    pub unchanged: Vec<MetricChange>,
}

impl DeltaReport {
    /// All changes: improved, then declined, then unchanged.
    pub fn changes(&self) -> impl Iterator<Item = &MetricChange> {
        self.improved
            .iter()
            .chain(self.declined.iter())
            .chain(self.unchanged.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DeltaOutcome {
    /// Fewer than two reports; nothing to compare.
    InsufficientData { project_name: String, reports: usize },
    Compared(DeltaReport),
}

fn by_magnitude(a: &MetricChange, b: &MetricChange) -> Ordering {
    b.change
        .abs()
        .partial_cmp(&a.change.abs())
        .unwrap_or(Ordering::Equal)
}

fn sorted_chronologically<'a>(reports: &[&'a Report]) -> Vec<&'a Report> {
    let mut v = reports.to_vec();
    v.sort_by(|a, b| chronological(a, b));
    v
}

/// Compare the two latest reports of one project.
///
/// `reports` are expected to belong to a single project; their order does
/// not matter.
pub fn compare_latest(project_name: &str, reports: &[&Report]) -> DeltaOutcome {
    if reports.len() < 2 {
        return DeltaOutcome::InsufficientData {
            project_name: project_name.to_string(),
            reports: reports.len(),
        };
    }
    let sorted = sorted_chronologically(reports);
    let current = sorted[sorted.len() - 1];
    let previous = sorted[sorted.len() - 2];

    let mut improved = Vec::new();
    let mut declined = Vec::new();
    let mut unchanged = Vec::new();
    for metric in Metric::ALL {
        let (Some(prev), Some(cur)) = (metric.value(previous), metric.value(current)) else {
            continue;
        };
        if prev == 0.0 || cur == 0.0 {
            continue;
        }
        // Adding zero folds a rounded -0.0 into 0.0.
        let change = round1(cur - prev) + 0.0;
        let status = ChangeStatus::from_change(change);
        let entry = MetricChange { metric, previous: prev, current: cur, change, status };
        match status {
            ChangeStatus::Improved => improved.push(entry),
            ChangeStatus::Declined => declined.push(entry),
            ChangeStatus::NoChange => unchanged.push(entry),
        }
    }
    improved.sort_by(by_magnitude);
    declined.sort_by(by_magnitude);

    DeltaOutcome::Compared(DeltaReport {
        project_name: project_name.to_string(),
        previous_period: previous.reporting_period.clone(),
        current_period: current.reporting_period.clone(),
        improved,
        declined,
        unchanged,
    })
}

/// Group `reports` by project.
pub fn group_by_project(reports: &[Report]) -> BTreeMap<&str, Vec<&Report>> {
    let mut groups: BTreeMap<&str, Vec<&Report>> = BTreeMap::new();
    for r in reports {
        groups.entry(r.project_name.as_str()).or_default().push(r);
    }
    groups
}

/// Compare the latest two reports of `project_name` within a mixed collection.
pub fn compare_project(reports: &[Report], project_name: &str) -> DeltaOutcome {
    let own: Vec<&Report> = reports
        .iter()
        .filter(|r| r.project_name == project_name)
        .collect();
    compare_latest(project_name, &own)
}

/// Delta outcome for every project present in `reports`.
pub fn compare_all(reports: &[Report]) -> BTreeMap<String, DeltaOutcome> {
    let out: BTreeMap<String, DeltaOutcome> = group_by_project(reports)
        .into_iter()
        .map(|(name, group)| (name.to_string(), compare_latest(name, &group)))
        .collect();
    debug!(projects = out.len(), "computed cross-period deltas");
    out
}

/// One point of a project's score history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub report_id: String,
    pub period: Option<String>,
    pub scores: CompositeScores,
    pub label: ScoreLabel,
}

/// Composite scores of a project's reports in chronological order.
pub fn score_history(reports: &[Report], project_name: &str) -> Vec<TrendPoint> {
    let own: Vec<&Report> = reports
        .iter()
        .filter(|r| r.project_name == project_name)
        .collect();
    sorted_chronologically(&own)
        .into_iter()
        .map(|r| {
            let scores = CompositeScores::of(r);
            TrendPoint {
                report_id: r.id.clone(),
                period: r.reporting_period.clone(),
                label: scores.label(),
                scores,
            }
        })
        .collect()
}
