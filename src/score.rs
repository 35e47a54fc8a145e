// Composite scores for a single report.
//
// Each composite is the mean of the rated dimensions it covers. Unrated
// dimensions are excluded, and a composite with nothing rated is `None`
// rather than zero.
use crate::rating::{self, Dimension};
use crate::types::Report;
use crate::util::{mean_present, parse_f64_safe, round2};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const PROJECT_HEALTH_DIMENSIONS: [Dimension; 3] = [
    Dimension::RiskLevel,
    Dimension::FinancialHealth,
    Dimension::CustomerSatisfaction,
];

pub const TEAM_DIMENSIONS: [Dimension; 2] = [Dimension::TeamMorale, Dimension::PmSelfEvaluation];

pub const DEPARTMENTAL_DIMENSIONS: [Dimension; 4] = [
    Dimension::FrontEndQuality,
    Dimension::BackEndQuality,
    Dimension::TestingQuality,
    Dimension::DesignQuality,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreLabel {
    Excellent,
    Good,
    Fair,
    Poor,
    NoData,
}

impl ScoreLabel {
    pub fn from_score(score: Option<f64>) -> Self {
        match score {
            Some(s) if s >= 3.5 => ScoreLabel::Excellent,
            Some(s) if s >= 2.5 => ScoreLabel::Good,
            Some(s) if s >= 1.5 => ScoreLabel::Fair,
            Some(s) if s > 0.0 => ScoreLabel::Poor,
            _ => ScoreLabel::NoData,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScoreLabel::Excellent => "Excellent",
            ScoreLabel::Good => "Good",
            ScoreLabel::Fair => "Fair",
            ScoreLabel::Poor => "Poor",
            ScoreLabel::NoData => "No Data",
        }
    }
}

impl fmt::Display for ScoreLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All composites of one report, rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CompositeScores {
    pub project_health: Option<f64>,
    pub team: Option<f64>,
    pub departmental: Option<f64>,
    pub overall: Option<f64>,
}

impl CompositeScores {
    pub fn of(report: &Report) -> Self {
        CompositeScores {
            project_health: project_health_score(report),
            team: team_score(report),
            departmental: departmental_score(report),
            overall: overall_score(report),
        }
    }

    pub fn label(&self) -> ScoreLabel {
        ScoreLabel::from_score(self.overall)
    }
}

fn composite(report: &Report, dimensions: &[Dimension]) -> Option<f64> {
    mean_present(
        dimensions
            .iter()
            .map(|d| rating::rate(*d, report.rating(*d))),
    )
    .map(round2)
}

pub fn project_health_score(report: &Report) -> Option<f64> {
    composite(report, &PROJECT_HEALTH_DIMENSIONS)
}

pub fn team_score(report: &Report) -> Option<f64> {
    composite(report, &TEAM_DIMENSIONS)
}

pub fn departmental_score(report: &Report) -> Option<f64> {
    composite(report, &DEPARTMENTAL_DIMENSIONS)
}

/// Score carried on the report itself, if it is usable.
///
/// A quality label takes precedence over a numeric reading; numbers are only
/// accepted in `(0, 4]`.
pub fn supplied_overall_score(report: &Report) -> Option<f64> {
    let raw = report.overall_project_score.as_deref()?;
    if rating::is_sentinel(raw) {
        return None;
    }
    rating::quality_value(raw).or_else(|| {
        parse_f64_safe(Some(raw)).filter(|v| *v > 0.0 && *v <= 4.0)
    })
}

/// Overall score: the supplied score when usable, otherwise the mean of
/// every rated dimension.
pub fn overall_score(report: &Report) -> Option<f64> {
    supplied_overall_score(report)
        .or_else(|| {
            mean_present(
                Dimension::ALL
                    .iter()
                    .map(|d| rating::rate(*d, report.rating(*d))),
            )
        })
        .map(round2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrated_dimensions_are_excluded_not_zeroed() {
        let r = Report::new("a", "Acme", "2025-01")
            .with_rating(Dimension::RiskLevel, "Low")
            .with_rating(Dimension::FinancialHealth, "Healthy");
        assert_eq!(project_health_score(&r), Some(4.0));
    }

    #[test]
    fn composites_without_ratings_are_none() {
        let r = Report::new("a", "Acme", "2025-01");
        let scores = CompositeScores::of(&r);
        assert_eq!(scores.project_health, None);
        assert_eq!(scores.team, None);
        assert_eq!(scores.departmental, None);
        assert_eq!(scores.overall, None);
        assert_eq!(scores.label(), ScoreLabel::NoData);
    }

    #[test]
    fn team_and_departmental_means() {
        let r = Report::new("a", "Acme", "2025-01")
            .with_rating(Dimension::TeamMorale, "Good")
            .with_rating(Dimension::PmSelfEvaluation, "Fair")
            .with_rating(Dimension::FrontEndQuality, "Excellent")
            .with_rating(Dimension::BackEndQuality, "Good")
            .with_rating(Dimension::TestingQuality, "Poor");
        assert_eq!(team_score(&r), Some(2.75));
        assert_eq!(departmental_score(&r), Some(2.67));
    }

    #[test]
    fn supplied_numeric_score_wins_over_dimensions() {
        let r = Report::new("a", "Acme", "2025-01")
            .with_rating(Dimension::RiskLevel, "Critical")
            .with_overall("3.2");
        assert_eq!(overall_score(&r), Some(3.2));
    }

    #[test]
    fn supplied_label_is_read_on_the_quality_scale() {
        let r = Report::new("a", "Acme", "2025-01").with_overall("Good");
        assert_eq!(overall_score(&r), Some(3.0));
    }

    #[test]
    fn unusable_supplied_score_falls_back_to_all_dimensions() {
        for supplied in ["N.A.", "7.5", "0", "So-so"] {
            let r = Report::new("a", "Acme", "2025-01")
                .with_rating(Dimension::RiskLevel, "Low")
                .with_rating(Dimension::CompletionStatus, "Partially")
                .with_overall(supplied);
            assert_eq!(overall_score(&r), Some(3.0), "{supplied}");
        }
    }

    #[test]
    fn label_thresholds() {
        assert_eq!(ScoreLabel::from_score(Some(3.5)), ScoreLabel::Excellent);
        assert_eq!(ScoreLabel::from_score(Some(2.5)), ScoreLabel::Good);
        assert_eq!(ScoreLabel::from_score(Some(1.5)), ScoreLabel::Fair);
        assert_eq!(ScoreLabel::from_score(Some(0.5)), ScoreLabel::Poor);
        assert_eq!(ScoreLabel::from_score(Some(0.0)), ScoreLabel::NoData);
        assert_eq!(ScoreLabel::NoData.to_string(), "No Data");
    }
}
