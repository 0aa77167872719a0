use std::fmt;

use crate::error::{OrchestratorError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Selecting,
    Aborted,
    Started,
    Running,
    Finished,
    Closed,
}

impl RunState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Selecting => "selecting",
            Self::Aborted => "aborted",
            Self::Started => "started",
            Self::Running => "running",
            Self::Finished => "finished",
            Self::Closed => "closed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Aborted | Self::Closed)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct RunStateMachine;

impl RunStateMachine {
    pub fn validate_transition(from: &RunState, to: &RunState) -> Result<()> {
        let allowed = Self::allowed_transitions(from);

        if allowed.contains(to) {
            Ok(())
        } else {
            Err(OrchestratorError::InvalidTransition {
                from: from.as_str().to_string(),
                to: to.as_str().to_string(),
            })
        }
    }

    /// `Closed` is reachable from every state after `Started`.
    fn allowed_transitions(from: &RunState) -> Vec<RunState> {
        match from {
            RunState::Idle => vec![RunState::Selecting],
            RunState::Selecting => vec![RunState::Started, RunState::Aborted],
            RunState::Started => vec![RunState::Running, RunState::Closed],
            RunState::Running => vec![RunState::Finished, RunState::Closed],
            RunState::Finished => vec![RunState::Closed],
            RunState::Aborted | RunState::Closed => vec![],
        }
    }

    pub fn can_transition(from: &RunState, to: &RunState) -> bool {
        Self::validate_transition(from, to).is_ok()
    }

    /// Move `state` to `to` if the transition is allowed.
    pub fn advance(state: &mut RunState, to: RunState) -> Result<()> {
        Self::validate_transition(state, &to)?;
        *state = to;
        Ok(())
    }
}
