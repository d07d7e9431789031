#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use nbt_client::controller::JobSnapshot;
use nbt_client::error::ClientError;
use nbt_client::transport::JobTransport;
use nbt_core::job::{AudioFile, UploadForm, UploadRequest};
use nbt_core::mode::RewriteMode;
use nbt_core::status::JobUpdate;
use tokio::sync::watch;
use tokio::time::Instant;

/// A form with a small WAV file selected.
pub fn upload_form(mode: RewriteMode, rewrite: bool) -> UploadForm {
    UploadForm {
        file: Some(AudioFile::new("meeting.wav", "audio/wav", b"RIFF-fake-audio".to_vec())),
        mode,
        rewrite,
    }
}

/// Wait until the snapshot reaches `done` or `error`.
pub async fn settled(rx: &mut watch::Receiver<JobSnapshot>) -> JobSnapshot {
    rx.wait_for(|s| s.phase.is_terminal())
        .await
        .expect("controller dropped")
        .clone()
}

/// One scripted status reply.
pub struct Step {
    delay: Duration,
    reply: Result<JobUpdate, ClientError>,
}

impl Step {
    pub fn ok(update: JobUpdate) -> Self {
        Self {
            delay: Duration::ZERO,
            reply: Ok(update),
        }
    }

    pub fn err(error: ClientError) -> Self {
        Self {
            delay: Duration::ZERO,
            reply: Err(error),
        }
    }

    /// Resolve only after `delay`.
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// A transport that replays canned answers and records every call.
///
/// Creations pop from `creates` in order. Status calls pop from the
/// job's script; once it is exhausted the job stays `queued`.
#[derive(Default)]
pub struct ScriptedTransport {
    creates: Mutex<VecDeque<Result<String, ClientError>>>,
    scripts: Mutex<HashMap<String, VecDeque<Step>>>,
    create_calls: Mutex<Vec<UploadRequest>>,
    fetches: Mutex<Vec<(String, Instant)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_create(self, reply: Result<&str, ClientError>) -> Self {
        self.creates
            .lock()
            .unwrap()
            .push_back(reply.map(str::to_string));
        self
    }

    pub fn on_status(self, job_id: &str, steps: Vec<Step>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(job_id.to_string(), steps.into());
        self
    }

    pub fn create_calls(&self) -> Vec<UploadRequest> {
        self.create_calls.lock().unwrap().clone()
    }

    /// Ids of every status fetch, in order.
    pub fn fetched_ids(&self) -> Vec<String> {
        self.fetches
            .lock()
            .unwrap()
            .iter()
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// When each status fetch started.
    pub fn fetch_times(&self) -> Vec<Instant> {
        self.fetches.lock().unwrap().iter().map(|(_, at)| *at).collect()
    }
}

#[async_trait]
impl JobTransport for ScriptedTransport {
    async fn create_job(&self, request: &UploadRequest) -> Result<String, ClientError> {
        self.create_calls.lock().unwrap().push(request.clone());
        self.creates
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::UnknownJob("no scripted creation".into())))
    }

    async fn job_status(&self, job_id: &str) -> Result<JobUpdate, ClientError> {
        self.fetches
            .lock()
            .unwrap()
            .push((job_id.to_string(), Instant::now()));

        let step = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(job_id)
            .and_then(VecDeque::pop_front);

        match step {
            Some(step) => {
                tokio::time::sleep(step.delay).await;
                step.reply
            }
            None => Ok(JobUpdate::Queued),
        }
    }
}

/// Serve `router` as a fake gateway on an ephemeral local port and return
/// its base URL.
pub async fn spawn_gateway(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake gateway");
    let addr = listener.local_addr().expect("fake gateway address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("fake gateway");
    });
    format!("http://{addr}")
}
