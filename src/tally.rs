// Underperformance tally: how many reports fall short on each KPI.
use crate::config::EngineConfig;
use crate::rating::{self, Dimension};
use crate::score;
use crate::types::Report;
use serde::Serialize;
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TallyDimension {
    OverallScore,
    RiskLevel,
    FinancialHealth,
    Completion,
    TeamMorale,
    CustomerSatisfaction,
}

impl TallyDimension {
    pub const ALL: [TallyDimension; 6] = [
        TallyDimension::OverallScore,
        TallyDimension::RiskLevel,
        TallyDimension::FinancialHealth,
        TallyDimension::Completion,
        TallyDimension::TeamMorale,
        TallyDimension::CustomerSatisfaction,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TallyDimension::OverallScore => "Overall Score",
            TallyDimension::RiskLevel => "Risk Level",
            TallyDimension::FinancialHealth => "Financial Health",
            TallyDimension::Completion => "Completion",
            TallyDimension::TeamMorale => "Team Morale",
            TallyDimension::CustomerSatisfaction => "Customer Satisfaction",
        }
    }

    /// Risk is judged on the raw label; every other dimension on its score.
    pub fn is_underperforming(self, report: &Report, ceiling: f64) -> bool {
        let below = |v: Option<f64>| matches!(v, Some(v) if v > 0.0 && v <= ceiling);
        let rated = |d: Dimension| rating::rate(d, report.rating(d));
        match self {
            TallyDimension::RiskLevel => {
                let raw = report.risk_level.trim();
                raw.eq_ignore_ascii_case("High") || raw.eq_ignore_ascii_case("Critical")
            }
            TallyDimension::OverallScore => below(score::overall_score(report)),
            TallyDimension::FinancialHealth => below(rated(Dimension::FinancialHealth)),
            TallyDimension::Completion => below(rated(Dimension::CompletionStatus)),
            TallyDimension::TeamMorale => below(rated(Dimension::TeamMorale)),
            TallyDimension::CustomerSatisfaction => below(rated(Dimension::CustomerSatisfaction)),
        }
    }
}

impl fmt::Display for TallyDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Critical,
    Warning,
    Caution,
}

impl Severity {
    pub fn from_count(count: usize, config: &EngineConfig) -> Self {
        if count >= config.severity_critical {
            Severity::Critical
        } else if count >= config.severity_warning {
            Severity::Warning
        } else {
            Severity::Caution
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Warning => "warning",
            Severity::Caution => "caution",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TallyEntry {
    pub dimension: TallyDimension,
    pub count: usize,
    pub severity: Severity,
}

/// Count underperforming reports per dimension, drop empty dimensions and
/// rank the rest by count (ties keep the fixed dimension order).
pub fn tally_underperformance<'a, I>(reports: I, config: &EngineConfig) -> Vec<TallyEntry>
where
    I: IntoIterator<Item = &'a Report>,
{
    let mut counts = [0usize; 6];
    let mut seen = 0usize;
    for r in reports {
        seen += 1;
        for (i, dim) in TallyDimension::ALL.iter().enumerate() {
            if dim.is_underperforming(r, config.underperformance_ceiling) {
                counts[i] += 1;
            }
        }
    }
    let mut entries: Vec<TallyEntry> = TallyDimension::ALL
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(dimension, count)| TallyEntry {
            dimension: *dimension,
            count,
            severity: Severity::from_count(count, config),
        })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    debug!(reports = seen, dimensions = entries.len(), "tallied underperformance");
    entries
}

/// Reports of one reporting period, the usual input to the tally.
pub fn reports_in_period<'a>(reports: &'a [Report], period: &str) -> Vec<&'a Report> {
    reports
        .iter()
        .filter(|r| r.reporting_period.as_deref() == Some(period))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_uses_the_raw_label() {
        let high = Report::new("1", "A", "2025-01").with_rating(Dimension::RiskLevel, "high");
        let medium = Report::new("2", "A", "2025-01").with_rating(Dimension::RiskLevel, "Medium");
        assert!(TallyDimension::RiskLevel.is_underperforming(&high, 2.0));
        assert!(!TallyDimension::RiskLevel.is_underperforming(&medium, 2.0));
    }

    #[test]
    fn unrated_values_never_count() {
        let r = Report::new("1", "A", "2025-01");
        for dim in TallyDimension::ALL {
            assert!(!dim.is_underperforming(&r, 2.0), "{dim}");
        }
    }

    #[test]
    fn fair_counts_and_good_does_not() {
        let fair =
            Report::new("1", "A", "2025-01").with_rating(Dimension::CompletionStatus, "Partially");
        let good =
            Report::new("2", "A", "2025-01").with_rating(Dimension::CompletionStatus, "Mostly");
        assert!(TallyDimension::Completion.is_underperforming(&fair, 2.0));
        assert!(!TallyDimension::Completion.is_underperforming(&good, 2.0));
    }

    #[test]
    fn ranked_by_count_with_empty_dimensions_dropped() {
        let reports: Vec<Report> = (0..6)
            .map(|i| {
                let r = Report::new(&i.to_string(), "A", "2025-01")
                    .with_rating(Dimension::FinancialHealth, "At Risk")
                    .with_rating(Dimension::TeamMorale, "Low");
                if i < 2 {
                    r.with_rating(Dimension::CustomerSatisfaction, "Dissatisfied")
                } else {
                    r
                }
            })
            .collect();
        let out = tally_underperformance(&reports, &EngineConfig::default());
        let dims: Vec<TallyDimension> = out.iter().map(|e| e.dimension).collect();
        assert_eq!(
            dims,
            vec![
                TallyDimension::OverallScore,
                TallyDimension::FinancialHealth,
                TallyDimension::TeamMorale,
                TallyDimension::CustomerSatisfaction
            ]
        );
        assert_eq!(out[0].count, 6);
        assert_eq!(out[0].severity, Severity::Critical);
        assert_eq!(out[3].count, 2);
        assert_eq!(out[3].severity, Severity::Caution);
    }

    #[test]
    fn tally_over_a_single_period() {
        let reports = vec![
            Report::new("1", "A", "2025-01").with_rating(Dimension::RiskLevel, "Critical"),
            Report::new("2", "B", "2025-02").with_rating(Dimension::RiskLevel, "Critical"),
        ];
        let february = reports_in_period(&reports, "2025-02");
        let out = tally_underperformance(february, &EngineConfig::default());
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].dimension, TallyDimension::OverallScore);
        assert_eq!(out[1].dimension, TallyDimension::RiskLevel);
        assert_eq!(out[1].count, 1);
    }

    #[test]
    fn severity_tiers() {
        let cfg = EngineConfig::default();
        assert_eq!(Severity::from_count(5, &cfg), Severity::Critical);
        assert_eq!(Severity::from_count(4, &cfg), Severity::Warning);
        assert_eq!(Severity::from_count(3, &cfg), Severity::Warning);
        assert_eq!(Severity::from_count(1, &cfg), Severity::Caution);
    }

    #[test]
    fn empty_input_yields_empty_tally() {
        let none: Vec<Report> = Vec::new();
        assert!(tally_underperformance(&none, &EngineConfig::default()).is_empty());
    }
}
