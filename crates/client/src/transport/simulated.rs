//! Local job simulation for mock mode.
//!
//! Nothing leaves the process: a job is queued, then running, then done
//! with the canned text for its mode, timed from the moment it was
//! created (see [`nbt_core::mock::simulated_update`]). A job is
//! forgotten once its final status has been reported.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use nbt_core::job::UploadRequest;
use nbt_core::mock;
use nbt_core::mode::RewriteMode;
use nbt_core::status::JobUpdate;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::JobTransport;
use crate::error::ClientError;

/// Poll cadence that makes the simulated phases visible.
pub const SIMULATED_POLL_INTERVAL: Duration = Duration::from_millis(400);

struct SimulatedJob {
    created_at: Instant,
    mode: RewriteMode,
    rewrite: bool,
}

/// In-memory stand-in for the gateway.
#[derive(Default)]
pub struct SimulatedTransport {
    jobs: Mutex<HashMap<String, SimulatedJob>>,
}

impl SimulatedTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobTransport for SimulatedTransport {
    async fn create_job(&self, request: &UploadRequest) -> Result<String, ClientError> {
        let job_id = mock::generate_job_id();
        tracing::debug!(job_id = %job_id, mode = %request.mode, "Simulating job");

        self.jobs.lock().await.insert(
            job_id.clone(),
            SimulatedJob {
                created_at: Instant::now(),
                mode: request.mode,
                rewrite: request.rewrite,
            },
        );
        Ok(job_id)
    }

    async fn job_status(&self, job_id: &str) -> Result<JobUpdate, ClientError> {
        let mut jobs = self.jobs.lock().await;
        let job = jobs
            .get(job_id)
            .ok_or_else(|| ClientError::UnknownJob(job_id.to_string()))?;

        let update = mock::simulated_update(job.created_at.elapsed(), job.mode, job.rewrite);

        // Nothing polls a finished job again.
        if update.is_terminal() {
            jobs.remove(job_id);
        }
        Ok(update)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use nbt_core::status::JobResult;

    use super::*;

    fn request(mode: RewriteMode, rewrite: bool) -> UploadRequest {
        UploadRequest {
            file: mock::sample_upload(),
            mode,
            rewrite,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn job_moves_through_queued_running_done() {
        let transport = SimulatedTransport::new();
        let id = transport
            .create_job(&request(RewriteMode::Email, true))
            .await
            .unwrap();
        assert!(id.starts_with(mock::MOCK_JOB_PREFIX));

        assert_eq!(transport.job_status(&id).await.unwrap(), JobUpdate::Queued);

        tokio::time::advance(Duration::from_millis(800)).await;
        assert_eq!(transport.job_status(&id).await.unwrap(), JobUpdate::Running);

        tokio::time::advance(Duration::from_millis(1200)).await;
        let copy = mock::sample_copy(RewriteMode::Email);
        assert_eq!(
            transport.job_status(&id).await.unwrap(),
            JobUpdate::Done(JobResult {
                raw: copy.raw.to_string(),
                clean: Some(copy.clean.to_string()),
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn no_clean_text_without_rewrite() {
        let transport = SimulatedTransport::new();
        let id = transport
            .create_job(&request(RewriteMode::Workflow, false))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(3)).await;
        assert_matches!(
            transport.job_status(&id).await.unwrap(),
            JobUpdate::Done(JobResult { clean: None, .. })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn finished_job_is_forgotten() {
        let transport = SimulatedTransport::new();
        let id = transport
            .create_job(&request(RewriteMode::Summary, true))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(3)).await;
        assert_matches!(transport.job_status(&id).await, Ok(JobUpdate::Done(_)));

        assert!(transport.jobs.lock().await.is_empty());
        assert_matches!(
            transport.job_status(&id).await,
            Err(ClientError::UnknownJob(_))
        );
    }

    #[tokio::test]
    async fn unknown_job_is_an_error() {
        let transport = SimulatedTransport::new();
        assert_matches!(
            transport.job_status("mock-missing").await,
            Err(ClientError::UnknownJob(id)) if id == "mock-missing"
        );
    }
}
