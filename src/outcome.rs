//! Outcome reporting.
//!
//! Every run ends with exactly one report: the input payload is echoed into
//! an output work item together with the outcome, and the input work item is
//! released.
//!
//! | Result | `status` | Extra payload fields | Input item |
//! |--------|----------|----------------------|------------|
//! | success | `completed` | `articles` | done |
//! | [`StepError`](crate::error::StepError) | `error` | `error_code`, `message` | failed, `BUSINESS` |
//! | anything else | `error` | `error_code = UNEXPECTED_ERROR`, `message` | failed, `APPLICATION` |

use crate::error::{TaskError, WorkItemError};
use crate::models::Payload;
use crate::outputs::workitems::{FailureKind, WorkItems};
use serde_json::json;
use tracing::{error, info, instrument};

/// How a run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Completed {
        articles: usize,
    },
    Error {
        kind: FailureKind,
        code: String,
        message: String,
    },
}

impl Outcome {
    pub fn status(&self) -> &'static str {
        match self {
            Outcome::Completed { .. } => "completed",
            Outcome::Error { .. } => "error",
        }
    }

    /// Record the outcome in a work item payload.
    pub fn apply(&self, payload: &mut Payload) {
        payload.insert("status".to_string(), json!(self.status()));
        match self {
            Outcome::Completed { articles } => {
                payload.insert("articles".to_string(), json!(articles));
            }
            Outcome::Error { code, message, .. } => {
                payload.insert("error_code".to_string(), json!(code));
                payload.insert("message".to_string(), json!(message));
            }
        }
    }
}

impl From<Result<usize, TaskError>> for Outcome {
    fn from(result: Result<usize, TaskError>) -> Self {
        match result {
            Ok(articles) => Outcome::Completed { articles },
            Err(e) => {
                let kind = match &e {
                    TaskError::Step(_) => FailureKind::Business,
                    TaskError::Unexpected(_) => FailureKind::Application,
                };
                Outcome::Error {
                    kind,
                    code: e.code().to_string(),
                    message: e.message(),
                }
            }
        }
    }
}

/// Report the result of a run through `items`.
///
/// Creates one output work item, then releases the input item as done or
/// failed.
#[instrument(level = "info", skip_all)]
pub fn report<W>(items: &mut W, result: Result<usize, TaskError>) -> Result<Outcome, WorkItemError>
where
    W: WorkItems + ?Sized,
{
    let outcome = Outcome::from(result);
    let mut payload = items.payload().clone();
    outcome.apply(&mut payload);
    items.create_output(payload)?;

    match &outcome {
        Outcome::Completed { articles } => {
            info!(articles, "Run completed");
            items.done()?;
        }
        Outcome::Error {
            kind,
            code,
            message,
        } => {
            error!(%kind, code = %code, message = %message, "Run failed");
            items.fail(*kind, code, message)?;
        }
    }

    Ok(outcome)
}
