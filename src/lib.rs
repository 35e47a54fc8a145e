// Project health report engine.
//
// Turns categorical project-health ratings into comparable scores and derives
// the views built on them: latest report per project, period-over-period
// movement, PM submission compliance and underperformance counts. Every
// engine function is pure over a caller-owned slice of reports; file handling
// lives in `loader` and `output`.
pub mod compliance;
pub mod config;
pub mod delta;
pub mod error;
pub mod latest;
pub mod loader;
pub mod logging;
pub mod output;
pub mod rating;
pub mod reports;
pub mod score;
pub mod tally;
pub mod types;
pub mod util;

pub use compliance::{evaluate_compliance, evaluate_compliance_for, PmCompliance, SubmissionStatus};
pub use config::EngineConfig;
pub use delta::{compare_latest, compare_project, DeltaOutcome, DeltaReport, Metric};
pub use error::{ReportError, ReportResult};
pub use latest::{resolve_latest, LatestReports};
pub use rating::{normalize, rate, Dimension};
pub use score::{CompositeScores, ScoreLabel};
pub use tally::{tally_underperformance, Severity, TallyEntry};
pub use types::{Project, Report};
