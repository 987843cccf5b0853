//! Work item input and output.
//!
//! A run consumes one input work item and produces one output work item. The
//! [`WorkItems`] trait is what the outcome reporter talks to; [`FileWorkItems`]
//! implements it over the automation platform's local file layout:
//!
//! ```text
//! work-items-in/work-items.json     [{"payload": {"keyword": "...", "months": 1}}]
//! output/work-items.json            [{"payload": {..., "status": "completed"}, "files": {}}]
//! output/input-state.json           {"state": "COMPLETED"}
//! ```
//!
//! The input item is released exactly once, as done or as failed.

use crate::error::WorkItemError;
use crate::models::Payload;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// File name of the input item's release state, next to the outputs file.
pub const STATE_FILE_NAME: &str = "input-state.json";

/// Classification of a failed work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureKind {
    /// An anticipated fault of the business process.
    Business,
    /// A fault of the automation itself.
    Application,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Business => write!(f, "BUSINESS"),
            FailureKind::Application => write!(f, "APPLICATION"),
        }
    }
}

/// Release state of the input work item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemState {
    Completed,
    Failed { exception: ItemException },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemException {
    #[serde(rename = "type")]
    pub kind: FailureKind,
    pub code: String,
    pub message: String,
}

/// Access to the current input work item and the run's outputs.
pub trait WorkItems {
    /// Payload of the current input item.
    fn payload(&self) -> &Payload;

    /// Create an output work item carrying `payload`.
    fn create_output(&mut self, payload: Payload) -> Result<(), WorkItemError>;

    /// Release the input item as successfully processed.
    fn done(&mut self) -> Result<(), WorkItemError>;

    /// Release the input item as failed.
    fn fail(&mut self, kind: FailureKind, code: &str, message: &str) -> Result<(), WorkItemError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct ItemRecord {
    #[serde(default)]
    payload: Payload,
    #[serde(default)]
    files: serde_json::Map<String, Value>,
}

/// Work items stored as local JSON files.
#[derive(Debug)]
pub struct FileWorkItems {
    input: Payload,
    output_path: PathBuf,
    state_path: PathBuf,
    outputs: Vec<ItemRecord>,
    state: Option<ItemState>,
}

impl FileWorkItems {
    /// Load the current input item from `input_path`.
    ///
    /// The file holds either a JSON array of items, the first one being the
    /// current item, or a single item object.
    #[instrument(level = "info", skip_all, fields(input = %input_path.display()))]
    pub fn open(input_path: &Path, output_path: &Path) -> Result<Self, WorkItemError> {
        let raw = fs::read_to_string(input_path).map_err(|source| WorkItemError::Io {
            path: input_path.display().to_string(),
            source,
        })?;
        let input = parse_input(&raw).map_err(|reason| WorkItemError::Malformed {
            path: input_path.display().to_string(),
            reason,
        })?;
        info!(keys = input.len(), "Loaded input work item");

        let state_path = output_path.with_file_name(STATE_FILE_NAME);
        Ok(Self {
            input,
            output_path: output_path.to_path_buf(),
            state_path,
            outputs: Vec::new(),
            state: None,
        })
    }

    fn release(&mut self, state: ItemState) -> Result<(), WorkItemError> {
        if let Some(previous) = &self.state {
            let name = match previous {
                ItemState::Completed => "COMPLETED",
                ItemState::Failed { .. } => "FAILED",
            };
            return Err(WorkItemError::AlreadyReleased(name));
        }
        write_json(&self.state_path, &state)?;
        self.state = Some(state);
        Ok(())
    }
}

impl WorkItems for FileWorkItems {
    fn payload(&self) -> &Payload {
        &self.input
    }

    fn create_output(&mut self, payload: Payload) -> Result<(), WorkItemError> {
        self.outputs.push(ItemRecord {
            payload,
            files: serde_json::Map::new(),
        });
        write_json(&self.output_path, &self.outputs)?;
        info!(path = %self.output_path.display(), outputs = self.outputs.len(), "Created output work item");
        Ok(())
    }

    fn done(&mut self) -> Result<(), WorkItemError> {
        self.release(ItemState::Completed)?;
        info!("Input work item done");
        Ok(())
    }

    fn fail(&mut self, kind: FailureKind, code: &str, message: &str) -> Result<(), WorkItemError> {
        self.release(ItemState::Failed {
            exception: ItemException {
                kind,
                code: code.to_string(),
                message: message.to_string(),
            },
        })?;
        warn!(%kind, code, message, "Input work item failed");
        Ok(())
    }
}

fn parse_input(raw: &str) -> Result<Payload, String> {
    let value: Value = serde_json::from_str(raw).map_err(|e| e.to_string())?;
    let item = match value {
        Value::Array(items) => items
            .into_iter()
            .next()
            .ok_or_else(|| "no input work items".to_string())?,
        other => other,
    };
    let record: ItemRecord = serde_json::from_value(item).map_err(|e| e.to_string())?;
    Ok(record.payload)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), WorkItemError> {
    let io_err = |source: std::io::Error| WorkItemError::Io {
        path: path.display().to_string(),
        source,
    };
    let json = serde_json::to_string_pretty(value).map_err(|e| io_err(e.into()))?;
    fs::write(path, json).map_err(io_err)
}
