//! Domain types for the NB-transcribe job protocol.
//!
//! Shared by the gateway (`nbt-api`) and the job lifecycle client
//! (`nbt-client`). Contains no I/O: rewrite modes, job phases and their
//! transition table, the status payload codec, the job entity, and the
//! deterministic mock backend.

pub mod error;
pub mod job;
pub mod mock;
pub mod mode;
pub mod phase;
pub mod settings;
pub mod status;
