//! Error types for report output.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to create report {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write CSV report: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to write JSON report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to flush report: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;
