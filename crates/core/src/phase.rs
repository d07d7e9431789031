//! Client-side job phases and the transition table between them.
//!
//! ```text
//! idle -> submitting -> queued <-> running -> done
//!              |           |          |
//!              +-----------+----------+-----> error
//! ```
//!
//! `done` and `error` are terminal for a job. A new submission starts
//! over at `submitting` from any phase.

use std::fmt;

use serde::Serialize;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobPhase {
    #[default]
    Idle,
    Submitting,
    Queued,
    Running,
    Done,
    Error,
}

impl JobPhase {
    pub const ALL: [JobPhase; 6] = [
        JobPhase::Idle,
        JobPhase::Submitting,
        JobPhase::Queued,
        JobPhase::Running,
        JobPhase::Done,
        JobPhase::Error,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            JobPhase::Idle => "idle",
            JobPhase::Submitting => "submitting",
            JobPhase::Queued => "queued",
            JobPhase::Running => "running",
            JobPhase::Done => "done",
            JobPhase::Error => "error",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, JobPhase::Done | JobPhase::Error)
    }

    /// Whether the job is waiting on the backend (and therefore polled).
    pub fn is_pending(self) -> bool {
        matches!(self, JobPhase::Queued | JobPhase::Running)
    }

    pub fn can_transition(from: JobPhase, to: JobPhase) -> bool {
        matches!(
            (from, to),
            (_, JobPhase::Submitting)
                | (JobPhase::Submitting, JobPhase::Queued)
                | (JobPhase::Submitting, JobPhase::Error)
                | (JobPhase::Queued, JobPhase::Queued)
                | (JobPhase::Queued, JobPhase::Running)
                | (JobPhase::Queued, JobPhase::Done)
                | (JobPhase::Queued, JobPhase::Error)
                | (JobPhase::Running, JobPhase::Running)
                | (JobPhase::Running, JobPhase::Queued)
                | (JobPhase::Running, JobPhase::Done)
                | (JobPhase::Running, JobPhase::Error)
        )
    }

    pub fn transition(from: JobPhase, to: JobPhase) -> Result<JobPhase, CoreError> {
        if Self::can_transition(from, to) {
            return Ok(to);
        }

        Err(CoreError::InvalidTransition { from, to })
    }
}

impl fmt::Display for JobPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_is_reachable_from_every_phase() {
        for from in JobPhase::ALL {
            assert_eq!(
                JobPhase::transition(from, JobPhase::Submitting),
                Ok(JobPhase::Submitting)
            );
        }
    }

    #[test]
    fn terminal_phases_only_leave_through_a_new_submission() {
        for from in [JobPhase::Done, JobPhase::Error] {
            for to in JobPhase::ALL {
                let allowed = JobPhase::can_transition(from, to);
                assert_eq!(allowed, to == JobPhase::Submitting, "{from} -> {to}");
            }
        }
    }

    #[test]
    fn queued_and_running_alternate() {
        assert!(JobPhase::can_transition(JobPhase::Queued, JobPhase::Running));
        assert!(JobPhase::can_transition(JobPhase::Running, JobPhase::Queued));
    }

    #[test]
    fn idle_cannot_skip_submission() {
        assert_eq!(
            JobPhase::transition(JobPhase::Idle, JobPhase::Queued),
            Err(CoreError::InvalidTransition {
                from: JobPhase::Idle,
                to: JobPhase::Queued,
            })
        );
        assert!(!JobPhase::can_transition(JobPhase::Submitting, JobPhase::Done));
    }

    #[test]
    fn error_is_reachable_from_every_non_idle_working_phase() {
        for from in [JobPhase::Submitting, JobPhase::Queued, JobPhase::Running] {
            assert!(JobPhase::can_transition(from, JobPhase::Error));
        }
    }
}
