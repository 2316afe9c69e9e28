//! Leave-request status transitions.
//!
//! Only `pending -> approved` and `pending -> rejected` may be written. Both
//! ask for confirmation first and then send a status-only update.

use serde::Serialize;
use thiserror::Error;

use crate::model::LeaveStatus;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum LeaveDecision {
    Approve,
    Reject,
}

impl LeaveDecision {
    pub fn target(self) -> LeaveStatus {
        match self {
            LeaveDecision::Approve => LeaveStatus::Approved,
            LeaveDecision::Reject => LeaveStatus::Rejected,
        }
    }

    /// Question put to the user before the update is sent.
    pub fn prompt(self) -> &'static str {
        match self {
            LeaveDecision::Approve => "Approve this leave request?",
            LeaveDecision::Reject => "Reject this leave request?",
        }
    }

    pub fn verb(self) -> &'static str {
        match self {
            LeaveDecision::Approve => "approve",
            LeaveDecision::Reject => "reject",
        }
    }

    pub fn failure_notice(self) -> String {
        format!("Failed to {} leave request", self.verb())
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
#[error("cannot {verb} a leave request that is {current}", verb = .decision.verb())]
pub struct TransitionError {
    pub current: LeaveStatus,
    pub decision: LeaveDecision,
}

/// Resolve the status a decision moves a request to.
pub fn transition(
    current: LeaveStatus,
    decision: LeaveDecision,
) -> Result<LeaveStatus, TransitionError> {
    match current {
        LeaveStatus::Pending => Ok(decision.target()),
        _ => Err(TransitionError { current, decision }),
    }
}

/// The single-field body sent for a leave decision.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub struct LeaveStatusUpdate {
    pub status: LeaveStatus,
}

/// Source of explicit user confirmation.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// A pre-answered confirmation, e.g. from a `--yes` flag or a request argument.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Answer(pub bool);

impl Confirm for Answer {
    fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionOutcome {
    Applied,
    Declined,
}
