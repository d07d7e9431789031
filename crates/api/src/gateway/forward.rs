//! Streaming forwarder from the gateway to the backend origin.
//!
//! Request bodies are handed to reqwest as a stream, and successful
//! response bodies are relayed the same way, so nothing proportional to
//! the upload or transcript size is buffered in the gateway. Only error
//! bodies are read in full, to guarantee they are valid JSON.

use axum::body::Body;
use axum::http::header::{self, HeaderMap, HeaderValue};
use axum::http::{Method, StatusCode};
use axum::response::Response;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::gateway::headers::{sanitize_inbound, sanitize_outbound, JSON_CONTENT_TYPE};

/// HTTP forwarder for a single backend origin.
pub struct BackendForwarder {
    client: reqwest::Client,
    base_url: String,
}

impl BackendForwarder {
    /// Create a forwarder for `base_url`, e.g. `http://127.0.0.1:8000`.
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Create a forwarder reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the backend URL for the given path segments. Each segment is
    /// percent-encoded, so a job id can never change the path shape.
    pub fn endpoint(&self, segments: &[&str]) -> AppResult<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url).map_err(|e| {
            AppError::InternalError(format!("invalid backend URL '{}': {e}", self.base_url))
        })?;
        url.path_segments_mut()
            .map_err(|()| {
                AppError::InternalError(format!("backend URL '{}' cannot be a base", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Forward a request to the backend and relay its response.
    ///
    /// The body, when given, is streamed through unchanged. A failure to
    /// reach the backend surfaces as [`AppError::Upstream`] (a 502).
    pub async fn forward(
        &self,
        method: Method,
        segments: &[&str],
        headers: &HeaderMap,
        body: Option<Body>,
    ) -> AppResult<Response> {
        let url = self.endpoint(segments)?;
        tracing::debug!(%method, %url, "Forwarding request to backend");

        let mut request = self
            .client
            .request(method.clone(), url.clone())
            .headers(sanitize_outbound(headers));
        if let Some(body) = body {
            request = request.body(reqwest::Body::wrap_stream(body.into_data_stream()));
        }

        let upstream = request.send().await?;
        tracing::debug!(%method, %url, status = upstream.status().as_u16(), "Backend responded");

        relay(upstream).await
    }
}

/// Turn a backend response into a gateway response.
///
/// The status code is kept. Hop-by-hop headers are dropped and a
/// `content-type` is always present. Error bodies are normalized with
/// [`normalize_error_body`].
pub async fn relay(upstream: reqwest::Response) -> AppResult<Response> {
    let status = upstream.status();
    let mut headers = sanitize_inbound(upstream.headers());

    let body = if status.is_success() {
        Body::from_stream(upstream.bytes_stream())
    } else {
        let text = upstream.text().await?;
        tracing::warn!(status = status.as_u16(), body = %text, "Backend returned an error");
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(JSON_CONTENT_TYPE),
        );
        Body::from(normalize_error_body(status, &text))
    };

    let mut response = Response::new(body);
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}

/// `"<code> <reason>"`, e.g. `"500 Internal Server Error"`.
///
/// The reason is the registered phrase for the code. A custom phrase sent by
/// the backend is not carried, and unregistered codes get the bare number.
pub fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {reason}", status.as_u16()),
        None => status.as_u16().to_string(),
    }
}

/// Guarantee an error body is valid JSON.
///
/// - Empty body: `{"error": "<code> <reason>"}`.
/// - Body that is already JSON: passed through.
/// - Any other text: wrapped as `{"error": "<text>"}`.
pub fn normalize_error_body(status: StatusCode, text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return json!({ "error": status_line(status) }).to_string();
    }
    if serde_json::from_str::<Value>(trimmed).is_ok() {
        return text.to_string();
    }
    json!({ "error": trimmed }).to_string()
}
