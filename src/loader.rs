// CSV adapter: turns exported report and project rows into canonical records.
//
// Bad rows are counted and skipped; bad values inside a good row are kept as
// they are and left to the engine's sentinel handling.
use crate::compliance::is_real_pm;
use crate::error::ReportResult;
use crate::rating::{self, Dimension, NOT_ASSESSED};
use crate::types::{Project, RawPmRow, RawProjectRow, RawRow, Report, UNASSIGNED};
use crate::util::{is_well_formed_period, parse_datetime_safe};
use csv::ReaderBuilder;
use std::collections::HashSet;
use std::io::Read;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub parse_errors: usize,
    pub skipped_rows: usize,
    pub malformed_periods: usize,
    pub unrecognized_ratings: usize,
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn load_reports(path: &str) -> ReportResult<(Vec<Report>, LoadReport)> {
    let rdr = ReaderBuilder::new().flexible(true).from_path(path)?;
    let (reports, load_report) = read_rows(rdr);
    info!(
        path,
        total = load_report.total_rows,
        loaded = load_report.loaded_rows,
        "loaded reports"
    );
    Ok((reports, load_report))
}

/// Same as [`load_reports`] for an in-memory or streamed source.
pub fn read_reports<R: Read>(source: R) -> (Vec<Report>, LoadReport) {
    read_rows(ReaderBuilder::new().flexible(true).from_reader(source))
}

fn read_rows<R: Read>(mut rdr: csv::Reader<R>) -> (Vec<Report>, LoadReport) {
    let mut stats = LoadReport::default();
    let mut out: Vec<Report> = Vec::new();

    for result in rdr.deserialize::<RawRow>() {
        stats.total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                debug!(row = stats.total_rows, error = %e, "unreadable report row");
                stats.parse_errors += 1;
                continue;
            }
        };

        let Some(project_name) = clean(row.project_name) else {
            warn!(row = stats.total_rows, "report row without project name skipped");
            stats.skipped_rows += 1;
            continue;
        };

        let reporting_period = clean(row.reporting_period);
        if let Some(p) = &reporting_period {
            if !is_well_formed_period(p) {
                warn!(project = %project_name, period = %p, "malformed reporting period");
                stats.malformed_periods += 1;
            }
        }

        let or_na = |v: Option<String>| clean(v).unwrap_or_else(|| NOT_ASSESSED.to_string());
        let report = Report {
            id: clean(row.id).unwrap_or_else(|| format!("row-{}", stats.total_rows)),
            project_name,
            reporting_period,
            submission_date: parse_datetime_safe(row.submission_date.as_deref()),
            assigned_pm: clean(row.assigned_pm).unwrap_or_else(|| UNASSIGNED.to_string()),
            risk_level: or_na(row.risk_level),
            financial_health: or_na(row.financial_health),
            completion_status: or_na(row.completion_status),
            team_morale: or_na(row.team_morale),
            customer_satisfaction: or_na(row.customer_satisfaction),
            pm_self_evaluation: or_na(row.pm_self_evaluation),
            front_end_quality: or_na(row.front_end_quality),
            back_end_quality: or_na(row.back_end_quality),
            testing_quality: or_na(row.testing_quality),
            design_quality: or_na(row.design_quality),
            overall_project_score: clean(row.overall_project_score),
        };

        stats.unrecognized_ratings += Dimension::ALL
            .iter()
            .filter(|d| {
                let raw = report.rating(**d);
                !rating::is_sentinel(raw) && rating::rate(**d, raw).is_none()
            })
            .count();
        out.push(report);
    }

    stats.loaded_rows = out.len();
    (out, stats)
}

/// Load the project registry. Duplicate names keep their first row.
pub fn load_projects(path: &str) -> ReportResult<Vec<Project>> {
    let rdr = ReaderBuilder::new().flexible(true).from_path(path)?;
    let projects = read_project_rows(rdr);
    info!(path, projects = projects.len(), "loaded project registry");
    Ok(projects)
}

pub fn read_projects<R: Read>(source: R) -> Vec<Project> {
    read_project_rows(ReaderBuilder::new().flexible(true).from_reader(source))
}

fn read_project_rows<R: Read>(mut rdr: csv::Reader<R>) -> Vec<Project> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::new();
    for result in rdr.deserialize::<RawProjectRow>() {
        let Ok(row) = result else { continue };
        let Some(project_name) = clean(row.project_name) else { continue };
        if !seen.insert(project_name.clone()) {
            continue;
        }
        out.push(Project { project_name, assigned_pm: clean(row.assigned_pm) });
    }
    out
}

/// Load the PM roster: every manager expected to report, with or without
/// projects. "Unassigned" and blank names are dropped, repeats keep one entry.
pub fn load_pm_roster(path: &str) -> ReportResult<Vec<String>> {
    let rdr = ReaderBuilder::new().flexible(true).from_path(path)?;
    let roster = read_roster_rows(rdr);
    info!(path, managers = roster.len(), "loaded PM roster");
    Ok(roster)
}

pub fn read_pm_roster<R: Read>(source: R) -> Vec<String> {
    read_roster_rows(ReaderBuilder::new().flexible(true).from_reader(source))
}

fn read_roster_rows<R: Read>(mut rdr: csv::Reader<R>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::new();
    for result in rdr.deserialize::<RawPmRow>() {
        let Ok(row) = result else { continue };
        let Some(name) = clean(row.pm_name).filter(|n| is_real_pm(n)) else { continue };
        if seen.insert(name.clone()) {
            out.push(name);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const HEADER: &str = concat!(
        "id,projectName,reportingPeriod,submissionDate,assignedPM,",
        "riskLevel,financialHealth,completionStatus,teamMorale,customerSatisfaction,",
        "pmSelfEvaluation,frontEndQuality,backEndQuality,testingQuality,designQuality,",
        "overallProjectScore",
    );

    #[test]
    fn rows_become_canonical_reports() {
        let csv = format!(
            "{HEADER}\n\
             r1, Acme ,2025-01,2025-01-10 09:00:00,Pat,Low,Healthy,Mostly,\
             High,Satisfied,Good,Good,Fair,Poor,Excellent,\n\
             r2,Beta,Jan-2025,,,,,,,,,,,,,3.2\n"
        );
        let (reports, stats) = read_reports(csv.as_bytes());
        assert_eq!(stats.total_rows, 2);
        assert_eq!(stats.loaded_rows, 2);
        assert_eq!(stats.malformed_periods, 1);
        assert_eq!(reports[0].project_name, "Acme");
        assert_eq!(reports[0].assigned_pm, "Pat");
        assert!(reports[0].submission_date.is_some());
        assert_eq!(reports[0].overall_project_score, None);
        assert_eq!(reports[1].assigned_pm, UNASSIGNED);
        assert_eq!(reports[1].risk_level, NOT_ASSESSED);
        assert_eq!(reports[1].overall_project_score.as_deref(), Some("3.2"));
    }

    #[test]
    fn rows_without_project_are_skipped() {
        let csv = format!("{HEADER}\nr1,,2025-01,,,,,,,,,,,,,\nr2,Acme,2025-01,,,Meh,,,,,,,,,,\n");
        let (reports, stats) = read_reports(csv.as_bytes());
        assert_eq!(reports.len(), 1);
        assert_eq!(stats.skipped_rows, 1);
        assert_eq!(stats.unrecognized_ratings, 1);
    }

    #[test]
    fn missing_ids_are_generated() {
        let csv = format!("{HEADER}\n,Acme,2025-01,,,,,,,,,,,,,\n");
        let (reports, _) = read_reports(csv.as_bytes());
        assert_eq!(reports[0].id, "row-1");
    }

    #[test]
    fn report_file_round_trip_through_disk() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "{HEADER}").unwrap();
        writeln!(f, "r1,Acme,2025-02,2025-02-27,Pat,High,,,,,,,,,,").unwrap();
        let (reports, stats) = load_reports(f.path().to_str().unwrap()).unwrap();
        assert_eq!(stats.loaded_rows, 1);
        assert_eq!(reports[0].risk_level, "High");
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_reports("/nonexistent/reports.csv").is_err());
    }

    #[test]
    fn registry_deduplicates_projects() {
        let csv = "projectName,assignedPM\nAcme,Pat\nBeta,\nAcme,Lee\n,Nobody\n";
        let projects = read_projects(csv.as_bytes());
        assert_eq!(
            projects,
            vec![
                Project { project_name: "Acme".into(), assigned_pm: Some("Pat".into()) },
                Project { project_name: "Beta".into(), assigned_pm: None },
            ]
        );
    }
    #[test]
    fn roster_keeps_real_managers_once() {
        let csv = "pmName\nRobin\n Pat \nUnassigned\n\nRobin\n";
        assert_eq!(read_pm_roster(csv.as_bytes()), vec!["Robin".to_string(), "Pat".to_string()]);
    }

    #[test]
    fn roster_file_loads_from_disk() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "pmName,team").unwrap();
        writeln!(f, "Robin,Platform").unwrap();
        let roster = load_pm_roster(f.path().to_str().unwrap()).unwrap();
        assert_eq!(roster, vec!["Robin".to_string()]);
    }
}
