//! NB-transcribe job lifecycle client.
//!
//! Submits an upload to the gateway, polls the resulting job until it
//! settles, and exposes the outcome to a presentation layer. Every call
//! to the outside world goes through a [`transport::JobTransport`], so the
//! same [`controller::JobController`] drives the HTTP gateway and the
//! local mock simulation.

pub mod config;
pub mod controller;
pub mod error;
pub mod presentation;
pub mod transport;
