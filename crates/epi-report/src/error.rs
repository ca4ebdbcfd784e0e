//! Error types for epi-report.

use thiserror::Error;

/// Errors raised while building a reporter or writing it out.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("time_step {time_step} must equal 1 / report_every (report_every = {report_every})")]
    StepMismatch {
        time_step:    f64,
        report_every: u32,
    },

    #[error("unrecognised report type {tag:?} on process compartment {compartment:?}")]
    UnknownReportKind {
        compartment: String,
        tag:         char,
    },

    #[error("reporter channels {got:?} do not match the columns already written {expected:?}")]
    LayoutMismatch {
        expected: Vec<String>,
        got:      Vec<String>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
}

/// Alias for `Result<T, ReportError>`.
pub type ReportResult<T> = Result<T, ReportError>;
