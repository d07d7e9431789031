use nbt_core::error::CoreError;
use reqwest::StatusCode;

/// Shown when a failure carries no text of its own.
pub const UNKNOWN_ERROR: &str = "Ukjent feil";

/// Errors from talking to the gateway (or its simulated stand-in).
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, refused, ...).
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    /// The gateway answered with a status the client cannot use.
    #[error("{message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// `"<status> <reason>"`, followed by the body detail when there is one.
        message: String,
    },

    /// The gateway answered, but the payload was not a valid job update.
    #[error(transparent)]
    Payload(#[from] CoreError),

    /// The configured gateway URL cannot be used to build request URLs.
    #[error("invalid gateway URL: {0}")]
    InvalidUrl(String),

    /// A status request referred to a job the transport never created.
    #[error("unknown job '{0}'")]
    UnknownJob(String),

    /// The job was still pending after the configured number of polls.
    #[error("Jobben ble ikke ferdig etter {attempts} statusforespørsler")]
    PollLimitReached { attempts: u32 },
}

impl ClientError {
    /// Build a [`ClientError::Rejected`] from a response status and body.
    ///
    /// A JSON body with a string `error` field contributes only that field.
    /// Details that merely repeat the status line are dropped.
    pub fn rejected(status: StatusCode, body: &str) -> Self {
        let line = status_line(status);
        let detail = body_detail(body);

        let message = match detail {
            Some(detail) if detail != line => format!("{line} – {detail}"),
            _ => line,
        };

        ClientError::Rejected {
            status: status.as_u16(),
            message,
        }
    }

    /// Text to show the user, never empty.
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            message
        }
    }
}

/// `"500 Internal Server Error"`, or just the code for unregistered statuses.
///
/// Reasons come from the status code registry, so a gateway's custom phrase
/// never reaches the user.
pub fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {reason}", status.as_u16()),
        None => status.as_u16().to_string(),
    }
}

fn body_detail(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(error) = value.get("error").and_then(serde_json::Value::as_str) {
            return (!error.is_empty()).then(|| error.to_string());
        }
    }

    Some(body.to_string())
}
