//! Forwarding layer between browser-facing routes and the backend origin.

pub mod forward;
pub mod headers;

pub use forward::BackendForwarder;
