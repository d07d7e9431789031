use crate::phase::JobPhase;

/// Domain-level errors shared by the gateway and the client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// An input failed validation (unknown mode, missing field, ...).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A status payload did not match any known job state.
    #[error("Malformed status payload: {0}")]
    MalformedPayload(String),

    /// A job tried to move to a state it cannot reach from its current one.
    #[error("Invalid job transition: {from} -> {to}")]
    InvalidTransition { from: JobPhase, to: JobPhase },
}
