//! The job entity and the upload that creates it.

use serde::Serialize;

use crate::error::CoreError;
use crate::mode::RewriteMode;
use crate::phase::JobPhase;
use crate::status::{JobResult, JobUpdate};

/// An audio file picked by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFile {
    pub file_name: String,
    /// Declared media type, e.g. `audio/mpeg`.
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl AudioFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }
}

/// A validated request to start a job. Only exists once a file is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub file: AudioFile,
    pub mode: RewriteMode,
    pub rewrite: bool,
}

/// The upload form as the user fills it in.
///
/// Rewriting is on by default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadForm {
    pub file: Option<AudioFile>,
    pub mode: RewriteMode,
    pub rewrite: bool,
}

impl Default for UploadForm {
    fn default() -> Self {
        Self {
            file: None,
            mode: RewriteMode::default(),
            rewrite: true,
        }
    }
}

impl UploadForm {
    /// Build the request for submission, or `None` when no file is selected.
    pub fn to_request(&self) -> Option<UploadRequest> {
        let file = self.file.clone()?;
        Some(UploadRequest {
            file,
            mode: self.mode,
            rewrite: self.rewrite,
        })
    }
}

/// A submitted job as tracked by the client.
///
/// Created in `queued` once the backend has accepted the upload. Only the
/// phase and its outcome change afterwards, always moving toward `done` or
/// `error`; `result` and `error` are never both set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Job {
    id: String,
    mode: RewriteMode,
    rewrite_requested: bool,
    phase: JobPhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<JobResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Job {
    pub fn new(id: impl Into<String>, mode: RewriteMode, rewrite_requested: bool) -> Self {
        Self {
            id: id.into(),
            mode,
            rewrite_requested,
            phase: JobPhase::Queued,
            result: None,
            error: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn mode(&self) -> RewriteMode {
        self.mode
    }

    pub fn rewrite_requested(&self) -> bool {
        self.rewrite_requested
    }

    pub fn phase(&self) -> JobPhase {
        self.phase
    }

    pub fn result(&self) -> Option<&JobResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Apply a status update from the backend.
    ///
    /// Updates that would leave a terminal phase are rejected. A `clean`
    /// text is discarded when the job was submitted without rewriting.
    pub fn apply(&mut self, update: JobUpdate) -> Result<(), CoreError> {
        let next = JobPhase::transition(self.phase, update.phase())?;

        match update {
            JobUpdate::Done(mut result) => {
                if !self.rewrite_requested {
                    result.clean = None;
                }
                self.result = Some(result);
            }
            JobUpdate::Failed { message } => self.error = Some(message),
            JobUpdate::Queued | JobUpdate::Running => {}
        }

        self.phase = next;
        Ok(())
    }

    /// Mark the job failed for a reason outside the backend payload
    /// (transport failure, malformed payload, poll bound reached).
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), CoreError> {
        self.apply(JobUpdate::Failed {
            message: message.into(),
        })
    }
}
