// Submission compliance of project managers over recent reporting periods.
//
// Each (PM, period) cell is classified on its own:
// - N/A: the PM has no project attributed to them at all
// - Missing: the PM has projects but nothing was reported in the period
// - Late: a report in the period was submitted in the closing days of its
//   submission month
// - On Time: reports exist and none of them is late
use crate::config::EngineConfig;
use crate::types::{Project, Report, UNASSIGNED};
use crate::util::{days_in_month, round1};
use chrono::Datelike;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SubmissionStatus {
    OnTime,
    Late,
    Missing,
    NotApplicable,
}

impl SubmissionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SubmissionStatus::OnTime => "On Time",
            SubmissionStatus::Late => "Late",
            SubmissionStatus::Missing => "Missing",
            SubmissionStatus::NotApplicable => "N/A",
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ComplianceStanding {
    Good,
    Warning,
    Critical,
}

impl ComplianceStanding {
    pub fn from_score(score: f64, config: &EngineConfig) -> Self {
        if score >= config.compliance_good {
            ComplianceStanding::Good
        } else if score >= config.compliance_warning {
            ComplianceStanding::Warning
        } else {
            ComplianceStanding::Critical
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ComplianceStanding::Good => "good",
            ComplianceStanding::Warning => "warning",
            ComplianceStanding::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodStatus {
    pub period: String,
    pub status: SubmissionStatus,
    pub reports: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PmCompliance {
    pub pm_name: String,
    pub period_statuses: Vec<PeriodStatus>,
    pub compliance_score: f64,
    pub standing: ComplianceStanding,
}

/// True for names that stand for an actual person.
pub fn is_real_pm(name: &str) -> bool {
    let n = name.trim();
    !n.is_empty() && !n.eq_ignore_ascii_case(UNASSIGNED)
}

/// PM a report is attributed to: the one named on the report, else the
/// registry's PM for the report's project.
fn attributed_pm<'a>(report: &'a Report, registry_pm: &HashMap<&str, &'a str>) -> Option<&'a str> {
    if is_real_pm(&report.assigned_pm) {
        return Some(report.assigned_pm.trim());
    }
    registry_pm.get(report.project_name.as_str()).copied()
}

fn registry_pms(registry: &[Project]) -> HashMap<&str, &str> {
    registry
        .iter()
        .filter_map(|p| {
            let pm = p.assigned_pm.as_deref()?.trim();
            is_real_pm(pm).then_some((p.project_name.as_str(), pm))
        })
        .collect()
}

/// Whether a submission falls within the last `window` days of its month.
pub fn is_late(submitted: chrono::NaiveDateTime, window: u32) -> bool {
    let date = submitted.date();
    date.day() > days_in_month(date).saturating_sub(window)
}

/// `100 * (on_time + 0.5 * late) / applicable`, 0 when nothing applies.
///
/// The value is unrounded; standings are bucketed on it before rounding.
pub fn compliance_score(statuses: &[PeriodStatus]) -> f64 {
    let applicable = statuses
        .iter()
        .filter(|s| s.status != SubmissionStatus::NotApplicable)
        .count();
    if applicable == 0 {
        return 0.0;
    }
    let on_time = statuses.iter().filter(|s| s.status == SubmissionStatus::OnTime).count();
    let late = statuses.iter().filter(|s| s.status == SubmissionStatus::Late).count();
    100.0 * (on_time as f64 + 0.5 * late as f64) / applicable as f64
}

/// Evaluate every PM found in the registry or on the reports.
pub fn evaluate_compliance(
    reports: &[Report],
    registry: &[Project],
    periods: &[String],
    config: &EngineConfig,
) -> Vec<PmCompliance> {
    evaluate_compliance_for(&[], reports, registry, periods, config)
}

/// Evaluate `pm_names` plus every PM found in the registry or on the reports.
/// Names with no attributed project come out as N/A in every period.
pub fn evaluate_compliance_for(
    pm_names: &[String],
    reports: &[Report],
    registry: &[Project],
    periods: &[String],
    config: &EngineConfig,
) -> Vec<PmCompliance> {
    let registry_pm = registry_pms(registry);

    // pm -> period -> reports in that period
    let mut by_pm: HashMap<&str, HashMap<&str, Vec<&Report>>> = HashMap::new();
    for r in reports {
        let Some(pm) = attributed_pm(r, &registry_pm) else { continue };
        let e = by_pm.entry(pm).or_default();
        if let Some(period) = r.reporting_period.as_deref() {
            e.entry(period).or_default().push(r);
        }
    }

    let has_projects: BTreeSet<&str> = registry_pm
        .values()
        .copied()
        .chain(by_pm.keys().copied())
        .collect();

    let all_pms: BTreeSet<&str> = pm_names
        .iter()
        .map(|n| n.trim())
        .filter(|n| is_real_pm(n))
        .chain(has_projects.iter().copied())
        .collect();

    let out: Vec<PmCompliance> = all_pms
        .into_iter()
        .map(|pm| {
            let own = by_pm.get(pm);
            let period_statuses: Vec<PeriodStatus> = periods
                .iter()
                .map(|period| {
                    let in_period = own
                        .and_then(|m| m.get(period.as_str()))
                        .map(Vec::as_slice)
                        .unwrap_or(&[]);
                    let status = if !has_projects.contains(pm) {
                        SubmissionStatus::NotApplicable
                    } else if in_period.is_empty() {
                        SubmissionStatus::Missing
                    } else if in_period.iter().any(|r| {
                        r.submission_date
                            .map(|at| is_late(at, config.late_window_days))
                            .unwrap_or(false)
                    }) {
                        SubmissionStatus::Late
                    } else {
                        SubmissionStatus::OnTime
                    };
                    PeriodStatus { period: period.clone(), status, reports: in_period.len() }
                })
                .collect();
            let score = compliance_score(&period_statuses);
            PmCompliance {
                pm_name: pm.to_string(),
                standing: ComplianceStanding::from_score(score, config),
                compliance_score: round1(score),
                period_statuses,
            }
        })
        .collect();

    debug!(pms = out.len(), periods = periods.len(), "evaluated submission compliance");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn on(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap()
    }

    fn periods() -> Vec<String> {
        vec!["2025-03".into(), "2025-02".into(), "2025-01".into()]
    }

    fn statuses(c: &PmCompliance) -> Vec<SubmissionStatus> {
        c.period_statuses.iter().map(|s| s.status).collect()
    }

    #[test]
    fn late_window_covers_the_last_five_days() {
        assert!(!is_late(on(2025, 1, 26), 5));
        assert!(is_late(on(2025, 1, 27), 5));
        assert!(is_late(on(2025, 2, 24), 5));
        assert!(!is_late(on(2025, 2, 23), 5));
    }

    #[test]
    fn gap_month_is_missing() {
        let reports = vec![
            Report::new("1", "Beta", "2025-01").assigned_to("Pat").submitted(on(2025, 1, 10)),
            Report::new("2", "Beta", "2025-03").assigned_to("Pat").submitted(on(2025, 3, 29)),
        ];
        let out = evaluate_compliance(&reports, &[], &periods(), &EngineConfig::default());
        assert_eq!(out.len(), 1);
        assert_eq!(
            statuses(&out[0]),
            vec![SubmissionStatus::Late, SubmissionStatus::Missing, SubmissionStatus::OnTime]
        );
        assert_eq!(out[0].compliance_score, 50.0);
        assert_eq!(out[0].standing, ComplianceStanding::Warning);
    }

    #[test]
    fn pm_without_projects_is_not_applicable_and_scores_zero() {
        let out = evaluate_compliance_for(
            &["Robin".to_string()],
            &[],
            &[],
            &periods(),
            &EngineConfig::default(),
        );
        assert_eq!(out.len(), 1);
        assert!(statuses(&out[0]).iter().all(|s| *s == SubmissionStatus::NotApplicable));
        assert_eq!(out[0].compliance_score, 0.0);
        assert_eq!(out[0].standing, ComplianceStanding::Critical);
    }

    #[test]
    fn registry_assignment_counts_as_having_projects() {
        let registry = vec![Project {
            project_name: "Gamma".into(),
            assigned_pm: Some("Lee".into()),
        }];
        let reports = vec![Report::new("1", "Gamma", "2025-02").submitted(on(2025, 2, 3))];
        let out = evaluate_compliance(&reports, &registry, &periods(), &EngineConfig::default());
        assert_eq!(out[0].pm_name, "Lee");
        assert_eq!(
            statuses(&out[0]),
            vec![SubmissionStatus::Missing, SubmissionStatus::OnTime, SubmissionStatus::Missing]
        );
        assert_eq!(out[0].compliance_score, 33.3);
    }

    #[test]
    fn unassigned_is_not_a_manager() {
        let reports = vec![Report::new("1", "Delta", "2025-03").assigned_to("Unassigned")];
        let out = evaluate_compliance(&reports, &[], &periods(), &EngineConfig::default());
        assert!(out.is_empty());
    }

    #[test]
    fn not_applicable_cells_leave_the_denominator() {
        let statuses = vec![
            PeriodStatus { period: "a".into(), status: SubmissionStatus::OnTime, reports: 1 },
            PeriodStatus {
                period: "b".into(),
                status: SubmissionStatus::NotApplicable,
                reports: 0,
            },
        ];
        assert_eq!(compliance_score(&statuses), 100.0);
        assert_eq!(compliance_score(&[]), 0.0);
    }

    #[test]
    fn standing_thresholds() {
        let cfg = EngineConfig::default();
        assert_eq!(ComplianceStanding::from_score(80.0, &cfg), ComplianceStanding::Good);
        assert_eq!(ComplianceStanding::from_score(50.0, &cfg), ComplianceStanding::Warning);
        assert_eq!(ComplianceStanding::from_score(49.9, &cfg), ComplianceStanding::Critical);
        assert_eq!(ComplianceStanding::from_score(79.95, &cfg), ComplianceStanding::Warning);
    }

    #[test]
    fn standing_uses_the_unrounded_score() {
        // 2 of 3 on time is 66.666..., displayed as 66.7 but still below 66.7.
        let config = EngineConfig { compliance_good: 66.7, ..EngineConfig::default() };
        let reports = vec![
            Report::new("1", "Beta", "2025-01").assigned_to("Pat").submitted(on(2025, 1, 10)),
            Report::new("2", "Beta", "2025-02").assigned_to("Pat").submitted(on(2025, 2, 10)),
        ];
        let out = evaluate_compliance(&reports, &[], &periods(), &config);
        assert_eq!(out[0].compliance_score, 66.7);
        assert_eq!(out[0].standing, ComplianceStanding::Warning);
    }

    #[test]
    fn late_window_follows_the_config() {
        let reports = vec![
            Report::new("1", "Beta", "2025-01").assigned_to("Pat").submitted(on(2025, 1, 28)),
        ];
        let periods = vec!["2025-01".to_string()];

        let default = evaluate_compliance(&reports, &[], &periods, &EngineConfig::default());
        assert_eq!(statuses(&default[0]), vec![SubmissionStatus::Late]);

        let narrow = EngineConfig { late_window_days: 2, ..EngineConfig::default() };
        let out = evaluate_compliance(&reports, &[], &periods, &narrow);
        assert_eq!(statuses(&out[0]), vec![SubmissionStatus::OnTime]);
        assert_eq!(out[0].compliance_score, 100.0);
        assert_eq!(out[0].standing, ComplianceStanding::Good);
    }

    #[test]
    fn roster_pm_without_projects_sits_beside_scored_pms() {
        let reports = vec![
            Report::new("1", "Beta", "2025-03").assigned_to("Pat").submitted(on(2025, 3, 3)),
        ];
        let roster = vec!["Robin".to_string(), "Pat".to_string(), "Unassigned".to_string()];
        let out = evaluate_compliance_for(
            &roster,
            &reports,
            &[],
            &periods(),
            &EngineConfig::default(),
        );
        let names: Vec<&str> = out.iter().map(|c| c.pm_name.as_str()).collect();
        assert_eq!(names, vec!["Pat", "Robin"]);
        assert_eq!(
            statuses(&out[0]),
            vec![SubmissionStatus::OnTime, SubmissionStatus::Missing, SubmissionStatus::Missing]
        );
        assert_eq!(out[0].compliance_score, 33.3);
        assert!(statuses(&out[1]).iter().all(|s| *s == SubmissionStatus::NotApplicable));
    }
}
