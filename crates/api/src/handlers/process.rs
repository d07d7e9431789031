//! Handler for the synchronous `/api/process` route.
//!
//! Transcribes in a single request instead of through a job. Kept for
//! local setups where holding the connection open for the whole run is
//! acceptable.

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Method};
use axum::response::{IntoResponse, Response};
use axum::Json;
use nbt_core::mock;

use crate::error::AppResult;
use crate::state::AppState;

/// POST /api/process
///
/// Forwards the multipart upload to `POST {backend}/process/` and relays
/// `{raw, clean}`. Mock mode answers with the demo result.
pub async fn process(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Body,
) -> AppResult<Response> {
    if state.config.mock_mode {
        return Ok(Json(mock::demo_result()).into_response());
    }

    state
        .forwarder
        .forward(Method::POST, &["process", ""], &headers, Some(body))
        .await
}
