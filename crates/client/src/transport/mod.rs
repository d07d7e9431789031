//! How the client reaches a backend.
//!
//! [`HttpTransport`] talks to the gateway; [`SimulatedTransport`] plays
//! back a canned job locally for mock mode. The controller only ever sees
//! the [`JobTransport`] trait.

mod http;
mod simulated;

pub use http::HttpTransport;
pub use simulated::{SimulatedTransport, SIMULATED_POLL_INTERVAL};

use async_trait::async_trait;
use nbt_core::job::UploadRequest;
use nbt_core::status::JobUpdate;

use crate::error::ClientError;

/// Creates jobs and reports their status.
#[async_trait]
pub trait JobTransport: Send + Sync {
    /// Start a job for `request` and return its id.
    async fn create_job(&self, request: &UploadRequest) -> Result<String, ClientError>;

    /// Fetch the current status of `job_id`.
    async fn job_status(&self, job_id: &str) -> Result<JobUpdate, ClientError>;
}
