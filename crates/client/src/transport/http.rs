//! Gateway client over HTTP.

use async_trait::async_trait;
use nbt_core::job::UploadRequest;
use nbt_core::status::{CreateJobResponse, JobUpdate};
use reqwest::multipart::{Form, Part};
use reqwest::{StatusCode, Url};

use super::JobTransport;
use crate::error::ClientError;

/// Talks to the gateway's `/api/jobs` routes.
pub struct HttpTransport {
    client: reqwest::Client,
    gateway_url: String,
}

impl HttpTransport {
    /// * `gateway_url` - Gateway origin, e.g. `http://127.0.0.1:3000`.
    pub fn new(gateway_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), gateway_url)
    }

    /// Reuse an existing [`reqwest::Client`] (and its connection pool).
    pub fn with_client(client: reqwest::Client, gateway_url: impl Into<String>) -> Self {
        Self {
            client,
            gateway_url: gateway_url.into(),
        }
    }

    pub fn gateway_url(&self) -> &str {
        &self.gateway_url
    }

    /// `{gateway}/api/{segments...}`, each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = Url::parse(&self.gateway_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {e}", self.gateway_url)))?;
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(self.gateway_url.clone()))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    fn upload_form(request: &UploadRequest) -> Result<Form, ClientError> {
        let file = Part::bytes(request.file.bytes.clone())
            .file_name(request.file.file_name.clone())
            .mime_str(&request.file.content_type)?;

        Ok(Form::new()
            .part("file", file)
            .text("mode", request.mode.as_str())
            .text("rewrite", request.rewrite.to_string()))
    }
}

#[async_trait]
impl JobTransport for HttpTransport {
    async fn create_job(&self, request: &UploadRequest) -> Result<String, ClientError> {
        let url = self.endpoint(&["jobs"])?;
        let form = Self::upload_form(request)?;

        tracing::debug!(%url, file = %request.file.file_name, mode = %request.mode, "Creating job");

        let response = self.client.post(url).multipart(form).send().await?;

        let status = response.status();
        if !matches!(status, StatusCode::OK | StatusCode::ACCEPTED) {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!(status = status.as_u16(), error = %e, "Could not read error body");
                    String::new()
                }
            };
            return Err(ClientError::rejected(status, &body));
        }

        let created: CreateJobResponse = response.json().await?;
        Ok(created.job_id)
    }

    async fn job_status(&self, job_id: &str) -> Result<JobUpdate, ClientError> {
        let url = self.endpoint(&["jobs", job_id])?;
        let response = self.client.get(url).send().await?;

        let status = response.status();
        let body = response.bytes().await?;

        // The body decides; a payload with a known status is honoured even
        // when it arrives with an error status code.
        match JobUpdate::from_slice(&body) {
            Ok(update) => Ok(update),
            Err(e) if status.is_success() => Err(ClientError::Payload(e)),
            Err(_) => Err(ClientError::rejected(status, &String::from_utf8_lossy(&body))),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn endpoint_appends_api_prefix() {
        let transport = HttpTransport::new("http://127.0.0.1:3000");
        let url = transport.endpoint(&["jobs", "job-123"]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:3000/api/jobs/job-123");
    }

    #[test]
    fn endpoint_tolerates_trailing_slash_and_encodes_ids() {
        let transport = HttpTransport::new("http://gateway.local/");
        let url = transport.endpoint(&["jobs", "a/b c"]).unwrap();
        assert_eq!(url.as_str(), "http://gateway.local/api/jobs/a%2Fb%20c");
    }

    #[test]
    fn endpoint_rejects_unusable_urls() {
        let transport = HttpTransport::new("not a url");
        assert_matches!(
            transport.endpoint(&["jobs"]),
            Err(ClientError::InvalidUrl(_))
        );
    }
}
