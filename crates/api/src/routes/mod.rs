pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{jobs, process};
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /jobs          POST  create_job       -> {backend}/jobs
/// /jobs/{id}     GET   get_job_status   -> {backend}/jobs/{id}
/// /process       POST  process          -> {backend}/process/
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/jobs", post(jobs::create_job))
        .route("/jobs/{id}", get(jobs::get_job_status))
        .route("/process", post(process::process))
}
