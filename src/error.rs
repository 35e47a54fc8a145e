// Errors of the adapter layer (loading, configuration, writing outputs).
//
// The scoring engine itself never fails; only file handling does.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration ({field}): {message}")]
    InvalidConfig { field: String, message: String },
}

impl ReportError {
    pub fn io(path: &str, source: std::io::Error) -> Self {
        ReportError::Io { path: path.to_string(), source }
    }
}

pub type ReportResult<T> = Result<T, ReportError>;
