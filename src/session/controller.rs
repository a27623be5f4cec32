//! Session controller: start/end gating, participant and output path

use chrono::{DateTime, Local};
use std::time::Duration;
use tracing::{debug, info};

use crate::errors::{LoggerError, Result};
use crate::prompt::UserPrompt;
use crate::session::state::{SessionEvent, SessionState};

/// Parameters of an accepted session
#[derive(Debug, Clone)]
pub struct Session {
    /// Participant ID, used in every output file name
    pub participant_id: i64,
    /// Output prefix; file names are appended to it verbatim
    pub output_path: String,
    pub start_time: DateTime<Local>,
    pub duration_minutes: f64,
    /// `duration_minutes` as a timer length
    pub length: Duration,
    /// Study phase, updated from the host on every invocation
    pub current_section: i64,
}

/// Owns the session lifecycle
#[derive(Debug, Default)]
pub struct SessionController {
    state: SessionState,
    session: Option<Session>,
}

impl SessionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state.is_recording()
    }

    pub fn is_ended(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Active session, or `UninitializedSession` while idle
    pub fn active(&self) -> Result<&Session> {
        self.session.as_ref().ok_or(LoggerError::UninitializedSession)
    }

    /// Ask the user to confirm and begin recording
    pub fn start(
        &mut self,
        participant_id: i64,
        duration_minutes: f64,
        output_path: impl Into<String>,
        now: DateTime<Local>,
        prompt: &dyn UserPrompt,
    ) -> Result<&Session> {
        let next = self.state.transition(SessionEvent::Start)?;

        // Also rejects NaN and lengths no timer can represent
        let length = match Duration::try_from_secs_f64(duration_minutes * 60.0) {
            Ok(length) if duration_minutes > 0.0 => length,
            _ => {
                debug!(duration_minutes, "Ignoring start with unusable session length");
                return Err(LoggerError::InvalidDuration {
                    minutes: duration_minutes,
                });
            }
        };

        let message = format!(
            "Your {}-minute session will begin when you press OK.",
            duration_minutes
        );
        if !prompt.confirm(&message) {
            debug!(participant_id, "Session start declined");
            return Err(LoggerError::StartDeclined);
        }

        let session = Session {
            participant_id,
            output_path: output_path.into(),
            start_time: now,
            duration_minutes,
            length,
            current_section: 1,
        };
        info!(
            participant_id,
            duration_minutes,
            output_path = %session.output_path,
            "Session started"
        );

        self.state = next;
        Ok(self.session.insert(session))
    }

    /// Update the current section; ignored unless recording
    pub fn set_section(&mut self, section: i64) {
        if !self.state.is_recording() {
            return;
        }
        if let Some(session) = self.session.as_mut() {
            session.current_section = section;
        }
    }

    /// Move to Ended. Returns `true` only for the call that actually ended
    /// the session, so the caller runs the final export exactly once.
    pub fn end(&mut self) -> Result<bool> {
        let was_recording = self.state.is_recording();
        self.state = self.state.transition(SessionEvent::End)?;
        if was_recording {
            info!("Session ended");
        }
        Ok(was_recording)
    }
}
