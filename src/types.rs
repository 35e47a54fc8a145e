use crate::rating::{Dimension, NOT_ASSESSED};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// One report row as exported by the backing store. Every field is optional
/// text; the loader turns it into a [`Report`].
#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "id")]
    pub id: Option<String>,
    #[serde(rename = "projectName")]
    pub project_name: Option<String>,
    #[serde(rename = "reportingPeriod")]
    pub reporting_period: Option<String>,
    #[serde(rename = "submissionDate")]
    pub submission_date: Option<String>,
    #[serde(rename = "assignedPM")]
    pub assigned_pm: Option<String>,
    #[serde(rename = "riskLevel")]
    pub risk_level: Option<String>,
    #[serde(rename = "financialHealth")]
    pub financial_health: Option<String>,
    #[serde(rename = "completionStatus")]
    pub completion_status: Option<String>,
    #[serde(rename = "teamMorale")]
    pub team_morale: Option<String>,
    #[serde(rename = "customerSatisfaction")]
    pub customer_satisfaction: Option<String>,
    #[serde(rename = "pmSelfEvaluation")]
    pub pm_self_evaluation: Option<String>,
    #[serde(rename = "frontEndQuality")]
    pub front_end_quality: Option<String>,
    #[serde(rename = "backEndQuality")]
    pub back_end_quality: Option<String>,
    #[serde(rename = "testingQuality")]
    pub testing_quality: Option<String>,
    #[serde(rename = "designQuality")]
    pub design_quality: Option<String>,
    #[serde(rename = "overallProjectScore")]
    pub overall_project_score: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawProjectRow {
    #[serde(rename = "projectName")]
    pub project_name: Option<String>,
    #[serde(rename = "assignedPM")]
    pub assigned_pm: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawPmRow {
    #[serde(rename = "pmName")]
    pub pm_name: Option<String>,
}

/// A project in the registry, with its currently assigned manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub project_name: String,
    pub assigned_pm: Option<String>,
}

/// A single project-health report in canonical shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    pub project_name: String,
    pub reporting_period: Option<String>,
    pub submission_date: Option<NaiveDateTime>,
    pub assigned_pm: String,
    pub risk_level: String,
    pub financial_health: String,
    pub completion_status: String,
    pub team_morale: String,
    pub customer_satisfaction: String,
    pub pm_self_evaluation: String,
    pub front_end_quality: String,
    pub back_end_quality: String,
    pub testing_quality: String,
    pub design_quality: String,
    pub overall_project_score: Option<String>,
}

impl Report {
    /// A report with every dimension set to `N.A.` and no PM assigned.
    pub fn new(id: &str, project_name: &str, reporting_period: &str) -> Self {
        let na = || NOT_ASSESSED.to_string();
        Report {
            id: id.to_string(),
            project_name: project_name.to_string(),
            reporting_period: Some(reporting_period.to_string()),
            submission_date: None,
            assigned_pm: UNASSIGNED.to_string(),
            risk_level: na(),
            financial_health: na(),
            completion_status: na(),
            team_morale: na(),
            customer_satisfaction: na(),
            pm_self_evaluation: na(),
            front_end_quality: na(),
            back_end_quality: na(),
            testing_quality: na(),
            design_quality: na(),
            overall_project_score: None,
        }
    }

    pub fn with_rating(mut self, dimension: Dimension, value: &str) -> Self {
        *self.rating_mut(dimension) = value.to_string();
        self
    }

    pub fn with_overall(mut self, value: &str) -> Self {
        self.overall_project_score = Some(value.to_string());
        self
    }

    pub fn submitted(mut self, at: NaiveDateTime) -> Self {
        self.submission_date = Some(at);
        self
    }

    pub fn assigned_to(mut self, pm: &str) -> Self {
        self.assigned_pm = pm.to_string();
        self
    }

    /// Raw value recorded for a dimension.
    pub fn rating(&self, dimension: Dimension) -> &str {
        match dimension {
            Dimension::RiskLevel => &self.risk_level,
            Dimension::FinancialHealth => &self.financial_health,
            Dimension::CompletionStatus => &self.completion_status,
            Dimension::TeamMorale => &self.team_morale,
            Dimension::CustomerSatisfaction => &self.customer_satisfaction,
            Dimension::PmSelfEvaluation => &self.pm_self_evaluation,
            Dimension::FrontEndQuality => &self.front_end_quality,
            Dimension::BackEndQuality => &self.back_end_quality,
            Dimension::TestingQuality => &self.testing_quality,
            Dimension::DesignQuality => &self.design_quality,
        }
    }

    fn rating_mut(&mut self, dimension: Dimension) -> &mut String {
        match dimension {
            Dimension::RiskLevel => &mut self.risk_level,
            Dimension::FinancialHealth => &mut self.financial_health,
            Dimension::CompletionStatus => &mut self.completion_status,
            Dimension::TeamMorale => &mut self.team_morale,
            Dimension::CustomerSatisfaction => &mut self.customer_satisfaction,
            Dimension::PmSelfEvaluation => &mut self.pm_self_evaluation,
            Dimension::FrontEndQuality => &mut self.front_end_quality,
            Dimension::BackEndQuality => &mut self.back_end_quality,
            Dimension::TestingQuality => &mut self.testing_quality,
            Dimension::DesignQuality => &mut self.design_quality,
        }
    }
}

/// Placeholder PM name used by the backing store when nobody is assigned.
pub const UNASSIGNED: &str = "Unassigned";

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct LatestReportRow {
    #[serde(rename = "Project")]
    #[tabled(rename = "Project")]
    pub project: String,
    #[serde(rename = "Period")]
    #[tabled(rename = "Period")]
    pub period: String,
    #[serde(rename = "AssignedPM")]
    #[tabled(rename = "AssignedPM")]
    pub assigned_pm: String,
    #[serde(rename = "ProjectHealth")]
    #[tabled(rename = "ProjectHealth")]
    pub project_health: String,
    #[serde(rename = "TeamKPIs")]
    #[tabled(rename = "TeamKPIs")]
    pub team: String,
    #[serde(rename = "Departmental")]
    #[tabled(rename = "Departmental")]
    pub departmental: String,
    #[serde(rename = "OverallScore")]
    #[tabled(rename = "OverallScore")]
    pub overall: String,
    #[serde(rename = "Rating")]
    #[tabled(rename = "Rating")]
    pub rating: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct TrendRow {
    #[serde(rename = "Project")]
    #[tabled(rename = "Project")]
    pub project: String,
    #[serde(rename = "Metric")]
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[serde(rename = "Previous")]
    #[tabled(rename = "Previous")]
    pub previous: String,
    #[serde(rename = "Current")]
    #[tabled(rename = "Current")]
    pub current: String,
    #[serde(rename = "Change")]
    #[tabled(rename = "Change")]
    pub change: String,
    #[serde(rename = "Status")]
    #[tabled(rename = "Status")]
    pub status: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ComplianceRow {
    #[serde(rename = "ProjectManager")]
    #[tabled(rename = "ProjectManager")]
    pub pm_name: String,
    #[serde(rename = "Periods")]
    #[tabled(rename = "Periods")]
    pub periods: String,
    #[serde(rename = "ComplianceScore")]
    #[tabled(rename = "ComplianceScore")]
    pub compliance_score: String,
    #[serde(rename = "Standing")]
    #[tabled(rename = "Standing")]
    pub standing: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct UnderperformanceRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Dimension")]
    #[tabled(rename = "Dimension")]
    pub dimension: String,
    #[serde(rename = "Count")]
    #[tabled(rename = "Count")]
    pub count: usize,
    #[serde(rename = "Severity")]
    #[tabled(rename = "Severity")]
    pub severity: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct SummaryStats {
    pub total_projects: usize,
    pub total_reports: usize,
    pub projects_with_reports: usize,
    pub projects_without_reports: usize,
    pub avg_overall_score: Option<f64>,
    pub excellent: usize,
    pub good: usize,
    pub fair: usize,
    pub poor: usize,
    pub no_data: usize,
    pub avg_compliance: f64,
}
