//! Session state machine
//!
//! Three states, one direction:
//! - Idle      → Recording (on: Start)
//! - Recording → Ended     (on: End)
//! - Ended     → Ended     (on: End, terminal self-loop)
//!
//! Everything else is rejected.

use crate::errors::{LoggerError, Result};
use serde::{Deserialize, Serialize};

/// Session lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SessionState {
    /// No session yet; recording and export are no-ops
    #[default]
    Idle,

    /// Session accepted, rows are being recorded
    Recording,

    /// Final export done (terminal)
    Ended,
}

/// Events that trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Start,
    End,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Ended)
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, SessionState::Recording)
    }

    /// Attempt a state transition
    pub fn transition(&self, event: SessionEvent) -> Result<SessionState> {
        use SessionEvent::*;
        use SessionState::*;

        let next_state = match (self, event) {
            (Idle, Start) => Recording,
            (Recording, End) => Ended,
            (Ended, End) => Ended,

            (Idle, End) => return Err(LoggerError::UninitializedSession),

            (from, event) => {
                return Err(LoggerError::InvalidTransition {
                    from: format!("{:?}", from),
                    to: format!("(via {:?})", event),
                    reason: format!("No valid transition from {:?} on {:?}", from, event),
                });
            }
        };

        Ok(next_state)
    }
}
