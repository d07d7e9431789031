//! Handlers for the `/api/jobs` resource.
//!
//! In normal operation both endpoints forward to the backend's `/jobs`
//! routes. With mock mode on they answer locally from
//! [`nbt_core::mock`] without any network call.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use nbt_core::mock;
use nbt_core::status::CreateJobResponse;

use crate::error::AppResult;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// POST /api/jobs
///
/// Forwards the multipart upload (`file`, `mode`, `rewrite`) to
/// `POST {backend}/jobs` and relays the backend's `{job_id}` answer,
/// usually with status 202.
pub async fn create_job(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Body,
) -> AppResult<Response> {
    if state.config.mock_mode {
        let job_id = mock::generate_job_id();
        tracing::info!(job_id = %job_id, "Mock job created");
        return Ok((
            StatusCode::OK,
            Json(CreateJobResponse {
                job_id,
                status: None,
            }),
        )
            .into_response());
    }

    state
        .forwarder
        .forward(Method::POST, &["jobs"], &headers, Some(body))
        .await
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// GET /api/jobs/{id}
///
/// Relays `GET {backend}/jobs/{id}`: `{status, result?, error?}`.
pub async fn get_job_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    headers: HeaderMap,
) -> AppResult<Response> {
    if state.config.mock_mode {
        let update = mock::status(&job_id);
        tracing::debug!(job_id = %job_id, status = %update.phase(), "Mock job status");
        return Ok(Json(update.to_payload()).into_response());
    }

    state
        .forwarder
        .forward(Method::GET, &["jobs", job_id.as_str()], &headers, None)
        .await
}
