// Presentation rows built from the engine's results.
use crate::compliance::PmCompliance;
use crate::delta::{compare_all, DeltaOutcome};
use crate::latest::resolve_latest;
use crate::score::{CompositeScores, ScoreLabel};
use crate::tally::TallyEntry;
use crate::types::{
    ComplianceRow, LatestReportRow, Project, Report, SummaryStats, TrendRow, UnderperformanceRow,
};
use crate::util::{average, format_number, format_period, format_score, mean_present, round2};
use std::cmp::Ordering;

/// Latest report of every project, best overall score first.
pub fn generate_latest_table(reports: &[Report], registry: &[Project]) -> Vec<LatestReportRow> {
    let latest = resolve_latest(reports, registry);
    let mut scored: Vec<(Option<f64>, LatestReportRow)> = latest
        .by_project
        .values()
        .map(|r| {
            let scores = CompositeScores::of(r);
            let row = LatestReportRow {
                project: r.project_name.clone(),
                period: r
                    .reporting_period
                    .as_deref()
                    .map(format_period)
                    .unwrap_or_else(|| "-".to_string()),
                assigned_pm: r.assigned_pm.clone(),
                project_health: format_score(scores.project_health, 1),
                team: format_score(scores.team, 1),
                departmental: format_score(scores.departmental, 1),
                overall: format_score(scores.overall, 1),
                rating: scores.label().to_string(),
            };
            (scores.overall, row)
        })
        .collect();

    // Unscored projects sink to the bottom; names break ties.
    scored.sort_by(|a, b| {
        b.0.unwrap_or(-1.0)
            .partial_cmp(&a.0.unwrap_or(-1.0))
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.1.project.cmp(&b.1.project))
    });
    scored.into_iter().map(|(_, row)| row).collect()
}

/// Period-over-period movement for every project.
pub fn generate_trend_table(reports: &[Report]) -> Vec<TrendRow> {
    let mut rows = Vec::new();
    for (project, outcome) in compare_all(reports) {
        match outcome {
            DeltaOutcome::InsufficientData { .. } => rows.push(TrendRow {
                project,
                metric: "-".to_string(),
                previous: "-".to_string(),
                current: "-".to_string(),
                change: "-".to_string(),
                status: "insufficient data".to_string(),
            }),
            DeltaOutcome::Compared(delta) => {
                for c in delta.changes() {
                    rows.push(TrendRow {
                        project: project.clone(),
                        metric: c.metric.to_string(),
                        previous: format_number(c.previous, 1),
                        current: format_number(c.current, 1),
                        change: format!("{:+.1}", c.change),
                        status: c.status.as_str().to_string(),
                    });
                }
            }
        }
    }
    rows
}

pub fn generate_compliance_table(compliance: &[PmCompliance]) -> Vec<ComplianceRow> {
    compliance
        .iter()
        .map(|c| ComplianceRow {
            pm_name: c.pm_name.clone(),
            periods: c
                .period_statuses
                .iter()
                .map(|s| format!("{}: {}", format_period(&s.period), s.status))
                .collect::<Vec<_>>()
                .join(" | "),
            compliance_score: format!("{}%", format_number(c.compliance_score, 0)),
            standing: c.standing.as_str().to_string(),
        })
        .collect()
}

pub fn generate_underperformance_table(tally: &[TallyEntry]) -> Vec<UnderperformanceRow> {
    tally
        .iter()
        .enumerate()
        .map(|(idx, e)| UnderperformanceRow {
            rank: idx + 1,
            dimension: e.dimension.to_string(),
            count: e.count,
            severity: e.severity.as_str().to_string(),
        })
        .collect()
}

pub fn generate_summary(
    reports: &[Report],
    registry: &[Project],
    compliance: &[PmCompliance],
) -> SummaryStats {
    let latest = resolve_latest(reports, registry);
    let overall: Vec<Option<f64>> = latest
        .by_project
        .values()
        .map(|r| CompositeScores::of(r).overall)
        .collect();
    let count = |label: ScoreLabel| {
        overall
            .iter()
            .filter(|s| ScoreLabel::from_score(**s) == label)
            .count()
    };
    let scores: Vec<f64> = compliance.iter().map(|c| c.compliance_score).collect();

    SummaryStats {
        total_projects: latest.len() + latest.without_reports.len(),
        total_reports: reports.len(),
        projects_with_reports: latest.len(),
        projects_without_reports: latest.without_reports.len(),
        avg_overall_score: mean_present(overall.iter().copied()).map(round2),
        excellent: count(ScoreLabel::Excellent),
        good: count(ScoreLabel::Good),
        fair: count(ScoreLabel::Fair),
        poor: count(ScoreLabel::Poor),
        no_data: count(ScoreLabel::NoData),
        avg_compliance: round2(average(&scores)),
    }
}
