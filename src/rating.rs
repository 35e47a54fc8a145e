// Rating vocabularies and the categorical-to-numeric normalization table.
//
// Every rated dimension of a report draws from a closed vocabulary. This
// module is the single place those labels are turned into numbers on a 0–4
// scale. Anything outside a vocabulary, and every "not assessed" marker, is
// treated as unrated: it normalizes to 0 and is left out of averages.
use serde::{Deserialize, Serialize};
use std::fmt;

/// The ten rated dimensions carried by every report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Dimension {
    RiskLevel,
    FinancialHealth,
    CompletionStatus,
    TeamMorale,
    CustomerSatisfaction,
    PmSelfEvaluation,
    FrontEndQuality,
    BackEndQuality,
    TestingQuality,
    DesignQuality,
}

impl Dimension {
    pub const ALL: [Dimension; 10] = [
        Dimension::RiskLevel,
        Dimension::FinancialHealth,
        Dimension::CompletionStatus,
        Dimension::TeamMorale,
        Dimension::CustomerSatisfaction,
        Dimension::PmSelfEvaluation,
        Dimension::FrontEndQuality,
        Dimension::BackEndQuality,
        Dimension::TestingQuality,
        Dimension::DesignQuality,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Dimension::RiskLevel => "Risk Level",
            Dimension::FinancialHealth => "Financial Health",
            Dimension::CompletionStatus => "Completion",
            Dimension::TeamMorale => "Team Morale",
            Dimension::CustomerSatisfaction => "Customer Satisfaction",
            Dimension::PmSelfEvaluation => "PM Self-Evaluation",
            Dimension::FrontEndQuality => "Front-End Quality",
            Dimension::BackEndQuality => "Back-End Quality",
            Dimension::TestingQuality => "Testing Quality",
            Dimension::DesignQuality => "Design Quality",
        }
    }

    fn table(self) -> &'static [(&'static str, f64)] {
        match self {
            Dimension::RiskLevel => RISK_LEVEL,
            Dimension::FinancialHealth => FINANCIAL_HEALTH,
            Dimension::CompletionStatus => COMPLETION,
            Dimension::TeamMorale => TEAM_MORALE,
            Dimension::CustomerSatisfaction => CUSTOMER_SATISFACTION,
            Dimension::PmSelfEvaluation
            | Dimension::FrontEndQuality
            | Dimension::BackEndQuality
            | Dimension::TestingQuality
            | Dimension::DesignQuality => QUALITY,
        }
    }

    /// Every label accepted for this dimension, followed by the `N.A.` sentinel.
    pub fn vocabulary(self) -> Vec<&'static str> {
        self.table()
            .iter()
            .map(|(label, _)| *label)
            .chain(std::iter::once(NOT_ASSESSED))
            .collect()
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Canonical spelling of the "not assessed" sentinel.
pub const NOT_ASSESSED: &str = "N.A.";

const SENTINELS: [&str; 4] = ["N.A.", "N/A", "NA", "N.A"];

const RISK_LEVEL: &[(&str, f64)] = &[
    ("Low", 4.0),
    ("Medium", 3.0),
    ("High", 2.0),
    ("Critical", 1.0),
];

const FINANCIAL_HEALTH: &[(&str, f64)] = &[
    ("Healthy", 4.0),
    ("On Watch", 3.0),
    ("At Risk", 2.0),
    ("Critical", 1.0),
];

const COMPLETION: &[(&str, f64)] = &[
    ("All Completed", 4.0),
    ("Completely Completed", 4.0),
    ("Mostly Completed", 3.0),
    ("Partially Completed", 2.0),
    ("Not Completed", 1.0),
    ("All", 4.0),
    ("Completely", 4.0),
    ("Mostly", 3.0),
    ("Partially", 2.0),
    ("Not", 1.0),
];

const TEAM_MORALE: &[(&str, f64)] = &[
    ("High", 4.0),
    ("Good", 3.5),
    ("Moderate", 2.0),
    ("Low", 1.0),
    ("Burnt Out", 0.5),
];

const CUSTOMER_SATISFACTION: &[(&str, f64)] = &[
    ("Very Satisfied", 4.0),
    ("Satisfied", 3.0),
    ("Neutral", 2.0),
    ("Unclear", 2.0),
    ("Dissatisfied", 1.0),
    ("Very Dissatisfied", 0.5),
];

const QUALITY: &[(&str, f64)] = &[
    ("Excellent", 4.0),
    ("Good", 3.0),
    ("Fair", 2.0),
    ("Poor", 1.0),
];

/// True for empty input and every spelling of "not assessed".
pub fn is_sentinel(raw: &str) -> bool {
    let s = raw.trim();
    s.is_empty() || SENTINELS.iter().any(|m| m.eq_ignore_ascii_case(s))
}

fn lookup(table: &[(&str, f64)], raw: &str) -> Option<f64> {
    let s = raw.trim();
    table
        .iter()
        .find(|(label, _)| label.eq_ignore_ascii_case(s))
        .map(|(_, v)| *v)
}

/// Numeric value of a real rating, or `None` when the value is a sentinel or
/// falls outside the dimension's vocabulary.
///
/// Averages must be built from this, never from [`normalize`], so that an
/// unrated dimension is excluded instead of counted as zero.
pub fn rate(dimension: Dimension, raw: &str) -> Option<f64> {
    if is_sentinel(raw) {
        return None;
    }
    lookup(dimension.table(), raw)
}

/// Total mapping onto `[0, 4]`; unrated values map to `0`.
pub fn normalize(dimension: Dimension, raw: &str) -> f64 {
    rate(dimension, raw).unwrap_or(0.0)
}

/// Value of a label on the generic quality scale (Excellent..Poor).
pub fn quality_value(raw: &str) -> Option<f64> {
    if is_sentinel(raw) {
        return None;
    }
    lookup(QUALITY, raw)
}
