//! Job status payloads exchanged between backend, gateway and client.
//!
//! The backend answers `GET /jobs/{id}` with
//! `{"status": "queued"|"running"|"done"|"error", "result"?: {...}, "error"?: "..."}`.
//! Fields are loosely typed on the wire, so [`JobUpdate::decode`] checks
//! every field at the boundary and rejects payloads whose `status` is not
//! one of the four known values.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::phase::JobPhase;

/// Wire value for a job waiting in the backend queue.
pub const STATUS_QUEUED: &str = "queued";

/// Wire value for a job the backend is processing.
pub const STATUS_RUNNING: &str = "running";

/// Wire value for a finished job carrying a result.
pub const STATUS_DONE: &str = "done";

/// Wire value for a job the backend gave up on.
pub const STATUS_ERROR: &str = "error";

/// Message used when the backend reports an error without text.
pub const DEFAULT_JOB_ERROR: &str = "Ukjent job-feil";

/// Transcription output of a finished job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResult {
    /// Raw transcription. May be empty.
    pub raw: String,
    /// Rewritten text, only present when a rewrite was requested and produced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clean: Option<String>,
}

/// Body returned by job creation (`POST /jobs`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateJobResponse {
    pub job_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Serialized form of a status update, as sent over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusPayload {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<JobResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A decoded status update for one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobUpdate {
    Queued,
    Running,
    Done(JobResult),
    Failed { message: String },
}

impl JobUpdate {
    /// The client phase this update moves a job into.
    pub fn phase(&self) -> JobPhase {
        match self {
            JobUpdate::Queued => JobPhase::Queued,
            JobUpdate::Running => JobPhase::Running,
            JobUpdate::Done(_) => JobPhase::Done,
            JobUpdate::Failed { .. } => JobPhase::Error,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.phase().is_terminal()
    }

    /// Decode a status payload from raw JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CoreError> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| CoreError::MalformedPayload(format!("invalid JSON: {e}")))?;
        Self::decode(&value)
    }

    /// Decode a status payload.
    ///
    /// - `done`: `result.raw` defaults to `""`; `result.clean` is kept only
    ///   when it is a string.
    /// - `error`: the top-level `error` text, then `result.error`, then
    ///   [`DEFAULT_JOB_ERROR`].
    /// - Any other `status` (or none at all) is rejected.
    pub fn decode(value: &Value) -> Result<Self, CoreError> {
        let status = value
            .get("status")
            .ok_or_else(|| CoreError::MalformedPayload("missing status field".into()))?;
        let status = status
            .as_str()
            .ok_or_else(|| CoreError::MalformedPayload(format!("status is not a string: {status}")))?;

        let result = value.get("result");

        match status {
            STATUS_QUEUED => Ok(JobUpdate::Queued),
            STATUS_RUNNING => Ok(JobUpdate::Running),
            STATUS_DONE => {
                let raw = result
                    .and_then(|r| r.get("raw"))
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                let clean = result
                    .and_then(|r| r.get("clean"))
                    .and_then(Value::as_str)
                    .map(str::to_string);
                Ok(JobUpdate::Done(JobResult { raw, clean }))
            }
            STATUS_ERROR => {
                let message = non_empty_str(value.get("error"))
                    .or_else(|| non_empty_str(result.and_then(|r| r.get("error"))))
                    .unwrap_or(DEFAULT_JOB_ERROR)
                    .to_string();
                Ok(JobUpdate::Failed { message })
            }
            other => Err(CoreError::MalformedPayload(format!(
                "unexpected job status '{other}'"
            ))),
        }
    }

    /// Wire representation of this update.
    pub fn to_payload(&self) -> StatusPayload {
        match self {
            JobUpdate::Queued => StatusPayload {
                status: STATUS_QUEUED.into(),
                result: None,
                error: None,
            },
            JobUpdate::Running => StatusPayload {
                status: STATUS_RUNNING.into(),
                result: None,
                error: None,
            },
            JobUpdate::Done(result) => StatusPayload {
                status: STATUS_DONE.into(),
                result: Some(result.clone()),
                error: None,
            },
            JobUpdate::Failed { message } => StatusPayload {
                status: STATUS_ERROR.into(),
                result: None,
                error: Some(message.clone()),
            },
        }
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}
