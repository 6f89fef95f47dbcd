//! Error types surfaced by the analysis pipeline and formatters.

use std::path::PathBuf;

use thiserror::Error;

/// Failures of a single analysis run.
///
/// Each is reported once to the immediate caller; nothing is retried.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// No source or no formatter was supplied. Raised before any I/O.
    #[error("{0}")]
    MissingInput(&'static str),

    #[error("Error reading file {}: {source}", path.display())]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The parser rejected the source. The parser's own diagnostic is
    /// logged, not carried.
    #[error("Invalid JavaScript")]
    InvalidSource,

    #[error(transparent)]
    Report(#[from] ReportError),
}

/// Failures while emitting a report.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to write report {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}
