//! The job lifecycle state machine.
//!
//! A [`JobController`] owns one [`JobSnapshot`] and publishes every change
//! on a `watch` channel. Each submission gets a generation number and a
//! [`CancellationToken`]; starting a new submission (or shutting down)
//! cancels the previous token, and a change is only published while the
//! token is live and the generation still matches. A stale poll loop
//! therefore cannot touch the snapshot, even if its fetch resolves late.

use std::sync::Arc;
use std::time::Duration;

use nbt_core::job::{Job, UploadForm};
use nbt_core::phase::JobPhase;
use nbt_core::status::{JobResult, JobUpdate};
use serde::Serialize;
use tokio::sync::{watch, Mutex};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::transport::JobTransport;

/// Delay between the end of one status fetch and the next fetch.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Sub-status shown while the job waits in the backend queue.
pub const QUEUED_TEXT: &str = "Jobb lagt i kø – starter om et øyeblikk.";

/// Sub-status shown while the backend works on the job.
pub const RUNNING_TEXT: &str = "Jobben kjører – transkriberer og renskriver.";

/// How a job is polled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Pause after each fetch has settled. Fetches never overlap.
    pub interval: Duration,
    /// Fail the job after this many fetches. `None` polls until the job
    /// reaches `done` or `error`.
    pub max_attempts: Option<u32>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: None,
        }
    }
}

/// Everything a presentation layer needs to render the current job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JobSnapshot {
    /// Bumped on every submission.
    pub generation: u64,
    pub phase: JobPhase,
    /// The accepted job, once creation succeeded.
    pub job: Option<Job>,
    /// Set when `phase` is `error`, whether creation or the job failed.
    pub error: Option<String>,
}

impl JobSnapshot {
    pub fn job_id(&self) -> Option<&str> {
        self.job.as_ref().map(Job::id)
    }

    pub fn result(&self) -> Option<&JobResult> {
        self.job.as_ref()?.result()
    }

    /// Progress text for a pending job.
    pub fn sub_status(&self) -> Option<&'static str> {
        match self.phase {
            JobPhase::Queued => Some(QUEUED_TEXT),
            JobPhase::Running => Some(RUNNING_TEXT),
            _ => None,
        }
    }

    /// Whether a submission is in flight.
    pub fn is_busy(&self) -> bool {
        self.phase == JobPhase::Submitting || self.phase.is_pending()
    }
}

/// Submits jobs and follows them to completion.
pub struct JobController {
    transport: Arc<dyn JobTransport>,
    policy: PollPolicy,
    state: Arc<watch::Sender<JobSnapshot>>,
    /// Token of the current submission.
    active: Mutex<CancellationToken>,
    /// Parent of every submission token.
    shutdown: CancellationToken,
    tasks: TaskTracker,
}

impl JobController {
    pub fn new(transport: Arc<dyn JobTransport>, policy: PollPolicy) -> Self {
        let (state, _) = watch::channel(JobSnapshot::default());
        let shutdown = CancellationToken::new();

        Self {
            transport,
            policy,
            state: Arc::new(state),
            active: Mutex::new(shutdown.child_token()),
            shutdown,
            tasks: TaskTracker::new(),
        }
    }

    /// Build a controller with the transport and poll policy `config` selects.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.transport(), config.poll_policy())
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Observe snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<JobSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> JobSnapshot {
        self.state.borrow().clone()
    }

    /// Submit the form's file as a new job.
    ///
    /// Does nothing when no file is selected. Otherwise the previous job's
    /// polling is cancelled, the snapshot moves to `submitting`, and this
    /// call returns once the transport has accepted or refused the job.
    /// Polling continues in the background.
    pub async fn submit(&self, form: &UploadForm) {
        let Some(request) = form.to_request() else {
            tracing::debug!("Submit ignored, no file selected");
            return;
        };

        if self.shutdown.is_cancelled() {
            tracing::debug!("Submit ignored, controller is shut down");
            return;
        }

        let token = self.shutdown.child_token();
        let generation = {
            let mut active = self.active.lock().await;
            active.cancel();
            *active = token.clone();

            let mut generation = 0;
            self.state.send_modify(|snapshot| {
                generation = snapshot.generation + 1;
                *snapshot = JobSnapshot {
                    generation,
                    phase: JobPhase::Submitting,
                    job: None,
                    error: None,
                };
            });
            generation
        };

        tracing::info!(
            generation,
            file = %request.file.file_name,
            mode = %request.mode,
            rewrite = request.rewrite,
            "Submitting job",
        );

        let created = tokio::select! {
            () = token.cancelled() => {
                tracing::debug!(generation, "Submission superseded before creation finished");
                return;
            }
            created = self.transport.create_job(&request) => created,
        };

        match created {
            Ok(job_id) => {
                let job = Job::new(job_id.clone(), request.mode, request.rewrite);
                let accepted = publish(&self.state, &token, generation, |snapshot| {
                    if !advance(snapshot, JobPhase::Queued) {
                        return false;
                    }
                    snapshot.job = Some(job);
                    true
                });
                if !accepted {
                    return;
                }

                tracing::info!(job_id = %job_id, generation, "Job accepted");

                let poller = Poller {
                    transport: Arc::clone(&self.transport),
                    state: Arc::clone(&self.state),
                    policy: self.policy,
                    token,
                    generation,
                    job_id,
                };
                self.tasks.spawn(poller.run());
            }
            Err(e) => {
                tracing::warn!(generation, error = %e, "Job creation failed");
                let message = e.user_message();
                publish(&self.state, &token, generation, |snapshot| {
                    if !advance(snapshot, JobPhase::Error) {
                        return false;
                    }
                    snapshot.error = Some(message);
                    true
                });
            }
        }
    }

    /// Cancel all polling and wait for background tasks to finish.
    /// Later submissions are ignored.
    pub async fn shutdown(&self) {
        self.shutdown.cancel();
        self.tasks.close();
        self.tasks.wait().await;
        tracing::debug!("Job controller shut down");
    }
}

impl Drop for JobController {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Apply `change` unless the submission it belongs to has been superseded.
/// Returns whether anything was published.
fn publish(
    state: &watch::Sender<JobSnapshot>,
    token: &CancellationToken,
    generation: u64,
    change: impl FnOnce(&mut JobSnapshot) -> bool,
) -> bool {
    state.send_if_modified(|snapshot| {
        if token.is_cancelled() || snapshot.generation != generation {
            return false;
        }
        change(snapshot)
    })
}

fn advance(snapshot: &mut JobSnapshot, to: JobPhase) -> bool {
    match JobPhase::transition(snapshot.phase, to) {
        Ok(phase) => {
            snapshot.phase = phase;
            true
        }
        Err(e) => {
            tracing::error!(error = %e, "Rejected phase change");
            false
        }
    }
}

/// Poll loop for one accepted job.
struct Poller {
    transport: Arc<dyn JobTransport>,
    state: Arc<watch::Sender<JobSnapshot>>,
    policy: PollPolicy,
    token: CancellationToken,
    generation: u64,
    job_id: String,
}

impl Poller {
    async fn run(self) {
        let mut attempts = 0u32;

        loop {
            if let Some(max) = self.policy.max_attempts {
                if attempts >= max {
                    tracing::warn!(job_id = %self.job_id, attempts, "Giving up on job");
                    self.apply(JobUpdate::Failed {
                        message: ClientError::PollLimitReached { attempts }.user_message(),
                    });
                    return;
                }
            }
            attempts += 1;

            let fetched = tokio::select! {
                () = self.token.cancelled() => {
                    tracing::debug!(job_id = %self.job_id, "Polling cancelled");
                    return;
                }
                fetched = self.transport.job_status(&self.job_id) => fetched,
            };

            let update = match fetched {
                Ok(update) => update,
                Err(e) => {
                    tracing::warn!(job_id = %self.job_id, error = %e, "Status fetch failed");
                    self.apply(JobUpdate::Failed {
                        message: e.user_message(),
                    });
                    return;
                }
            };

            let terminal = update.is_terminal();
            if !self.apply(update) {
                return;
            }
            if terminal {
                tracing::info!(job_id = %self.job_id, attempts, "Job settled");
                return;
            }

            tokio::select! {
                () = self.token.cancelled() => {
                    tracing::debug!(job_id = %self.job_id, "Polling cancelled");
                    return;
                }
                () = tokio::time::sleep(self.policy.interval) => {}
            }
        }
    }

    fn apply(&self, update: JobUpdate) -> bool {
        publish(&self.state, &self.token, self.generation, |snapshot| {
            let Some(job) = snapshot.job.as_mut() else {
                return false;
            };
            if let Err(e) = job.apply(update) {
                tracing::error!(job_id = %job.id(), error = %e, "Rejected job update");
                return false;
            }

            snapshot.phase = job.phase();
            snapshot.error = job.error().map(str::to_string);
            tracing::debug!(job_id = %job.id(), phase = %snapshot.phase, "Job updated");
            true
        })
    }
}
