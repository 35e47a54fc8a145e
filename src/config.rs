// Policy constants of the engine, optionally overridden from a JSON file.
use crate::error::{ReportError, ReportResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// A submission in the last this-many days of its month is late.
    pub late_window_days: u32,
    /// Number of reporting periods the compliance view looks back over.
    pub recent_period_count: usize,
    /// Scores at or below this (and above zero) count as underperforming.
    pub underperformance_ceiling: f64,
    pub compliance_good: f64,
    pub compliance_warning: f64,
    pub severity_critical: usize,
    pub severity_warning: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            late_window_days: 5,
            recent_period_count: 3,
            underperformance_ceiling: 2.0,
            compliance_good: 80.0,
            compliance_warning: 50.0,
            severity_critical: 5,
            severity_warning: 3,
        }
    }
}

impl EngineConfig {
    /// Read the config from `path`. A missing file gives the defaults.
    pub fn load(path: &str) -> ReportResult<Self> {
        if !Path::new(path).exists() {
            info!(path, "no config file, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|e| ReportError::io(path, e))?;
        let config: EngineConfig = serde_json::from_str(&text)?;
        config.validate()?;
        info!(path, ?config, "loaded engine config");
        Ok(config)
    }

    pub fn validate(&self) -> ReportResult<()> {
        let invalid = |field: &str, message: &str| {
            warn!(field, reason = message, "rejected engine config");
            Err(ReportError::InvalidConfig {
                field: field.to_string(),
                message: message.to_string(),
            })
        };
        if self.compliance_warning > self.compliance_good {
            return invalid("compliance_warning", "must not exceed compliance_good");
        }
        if self.severity_warning == 0 || self.severity_warning > self.severity_critical {
            return invalid("severity_warning", "must be between 1 and severity_critical");
        }
        if !(self.underperformance_ceiling > 0.0 && self.underperformance_ceiling <= 4.0) {
            return invalid("underperformance_ceiling", "must be in (0, 4]");
        }
        if self.recent_period_count == 0 {
            return invalid("recent_period_count", "must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_gives_defaults() {
        let cfg = EngineConfig::load("/nonexistent/engine_config.json").unwrap();
        assert_eq!(cfg, EngineConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"{{"late_window_days": 3}}"#).unwrap();
        let cfg = EngineConfig::load(f.path().to_str().unwrap()).unwrap();
        assert_eq!(cfg.late_window_days, 3);
        assert_eq!(cfg.recent_period_count, 3);
        assert_eq!(cfg.compliance_good, 80.0);
    }

    #[test]
    fn inconsistent_thresholds_are_rejected() {
        let cfg = EngineConfig { compliance_warning: 90.0, ..EngineConfig::default() };
        assert!(matches!(
            cfg.validate(),
            Err(ReportError::InvalidConfig { ref field, .. }) if field == "compliance_warning"
        ));
    }

    #[test]
    fn malformed_json_is_an_error() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "not json").unwrap();
        assert!(matches!(
            EngineConfig::load(f.path().to_str().unwrap()),
            Err(ReportError::Json(_))
        ));
    }
}
