//! Error taxonomy for a task run.
//!
//! Failures are split in two tiers:
//!
//! - [`StepError`]: business faults raised while fetching search pages. Each
//!   carries a stable code and a message that end up in the output work item.
//! - [`TaskError::Unexpected`]: anything else. Reported with the
//!   `UNEXPECTED_ERROR` code and an application-level failure.

use thiserror::Error;

/// Code reported for faults outside the business taxonomy.
pub const UNEXPECTED_ERROR: &str = "UNEXPECTED_ERROR";

/// A business fault of the fetch stage.
#[derive(Debug, Error)]
pub enum StepError {
    /// The pagination block of a response has no `total_size`.
    #[error("Empty page")]
    EmptyPage,

    /// The response payload reported a status outside `200..=226`.
    #[error("StatusCode:{0}")]
    ResponseError(i64),

    /// Transport, decoding, or shape fault while fetching a page.
    #[error("{0}")]
    UnexpectedError(String),
}

impl StepError {
    /// Stable code reported to the caller.
    pub fn code(&self) -> &'static str {
        match self {
            StepError::EmptyPage => "REQUEST_EMPTY_PAGE",
            StepError::ResponseError(_) => "REQUEST_RESPONSE_ERROR",
            StepError::UnexpectedError(_) => "REQUEST_UNEXPECTED_ERROR",
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl From<reqwest::Error> for StepError {
    fn from(err: reqwest::Error) -> Self {
        StepError::UnexpectedError(err.to_string())
    }
}

impl From<serde_json::Error> for StepError {
    fn from(err: serde_json::Error) -> Self {
        StepError::UnexpectedError(err.to_string())
    }
}

/// Result of a whole run.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    Step(#[from] StepError),

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl TaskError {
    /// One-line message for the outcome report.
    ///
    /// Unexpected faults render their whole context chain, e.g.
    /// `writing spreadsheet: Permission denied (os error 13)`.
    pub fn message(&self) -> String {
        match self {
            TaskError::Step(e) => e.message(),
            TaskError::Unexpected(e) => format!("{e:#}"),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            TaskError::Step(e) => e.code(),
            TaskError::Unexpected(_) => UNEXPECTED_ERROR,
        }
    }
}

/// Faults of the local work item adapter.
#[derive(Debug, Error)]
pub enum WorkItemError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed work items file {path}: {reason}")]
    Malformed { path: String, reason: String },

    #[error("Work item was already released as {0}")]
    AlreadyReleased(&'static str),
}
