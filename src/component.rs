//! Host-facing design logger component
//!
//! The host calls [`DesignLogger::solve`] serially with its current input
//! values. All session state sits behind one mutex shared with the
//! autosave and session-length timers; exports work on a snapshot.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tokio::runtime::Handle;
use tracing::{debug, error, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::{LoggerConfig, TimingMode};
use crate::errors::{LoggerError, Result};
use crate::prompt::UserPrompt;
use crate::session::events::{self, TimeChangeLog, TimeOfDay};
use crate::session::persistence::{backup_path, events_path, export, final_path};
use crate::session::{EvaluationRow, RecordOutcome, RecordingLog, SessionController, SessionState};
use crate::timers::{AutosaveTimer, SessionTimer, SessionTimers};

/// Input values supplied by the host on each invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentInputs {
    pub start: bool,
    pub participant: i64,
    /// Falls back to the configured default length when absent
    pub session_length_minutes: Option<f64>,
    pub log_path: String,
    pub phase: i64,
    pub design_vector: Vec<f64>,
    pub objective_vector: Vec<f64>,
    pub favorite: bool,
    pub end: bool,
    /// Manual time-of-day, logged whenever it changes
    pub time_of_day: Option<TimeOfDay>,
}

impl Default for ComponentInputs {
    fn default() -> Self {
        Self {
            start: false,
            participant: 0,
            session_length_minutes: None,
            log_path: String::new(),
            phase: 1,
            design_vector: Vec::new(),
            objective_vector: Vec::new(),
            favorite: false,
            end: false,
            time_of_day: None,
        }
    }
}

/// One favorite, addressed by insertion index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteBranch {
    pub path: usize,
    pub values: Vec<f64>,
}

/// Favorites output, one branch per favorite
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FavoritesTree {
    pub branches: Vec<FavoriteBranch>,
}

impl FavoritesTree {
    pub fn from_lists(lists: &[Vec<f64>]) -> Self {
        Self {
            branches: lists
                .iter()
                .enumerate()
                .map(|(path, values)| FavoriteBranch {
                    path,
                    values: values.clone(),
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    pub fn branch(&self, path: usize) -> Option<&[f64]> {
        self.branches
            .iter()
            .find(|b| b.path == path)
            .map(|b| b.values.as_slice())
    }
}

/// Everything a session mutates
#[derive(Debug, Default)]
pub struct LoggerState {
    pub controller: SessionController,
    pub log: RecordingLog,
    pub time_changes: TimeChangeLog,
}

impl LoggerState {
    fn favorites_tree(&self) -> FavoritesTree {
        FavoritesTree::from_lists(self.log.favorites())
    }
}

struct Inner {
    state: Mutex<LoggerState>,
    timers: Mutex<SessionTimers>,
    prompt: Arc<dyn UserPrompt>,
    clock: Arc<dyn Clock>,
    config: LoggerConfig,
    runtime: Handle,
}

/// Design logger component instance
pub struct DesignLogger {
    inner: Arc<Inner>,
}

impl DesignLogger {
    /// Create a logger that arms its timers on `runtime`
    pub fn new(
        config: LoggerConfig,
        prompt: Arc<dyn UserPrompt>,
        clock: Arc<dyn Clock>,
        runtime: Handle,
    ) -> Self {
        let state = LoggerState {
            log: RecordingLog::new(config.session.favorite_capture),
            ..LoggerState::default()
        };

        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(state),
                timers: Mutex::new(SessionTimers::default()),
                prompt,
                clock,
                config,
                runtime,
            }),
        }
    }

    /// Create a logger on the wall clock
    pub fn with_system_clock(
        config: LoggerConfig,
        prompt: Arc<dyn UserPrompt>,
        runtime: Handle,
    ) -> Self {
        Self::new(config, prompt, Arc::new(SystemClock), runtime)
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.inner.config
    }

    /// Handle one host invocation and return the favorites output.
    ///
    /// Start failures (bad length, declined prompt) leave the component
    /// idle and return the unchanged output. Export failures propagate.
    pub fn solve(&self, inputs: &ComponentInputs) -> Result<FavoritesTree> {
        let now = self.inner.clock.now();
        let mut state = self.inner.lock_state();

        match state.controller.state() {
            SessionState::Ended => return Ok(state.favorites_tree()),
            SessionState::Idle => {
                if !inputs.start {
                    return Ok(state.favorites_tree());
                }
                let started = self.inner.start_locked(
                    &mut state,
                    inputs.participant,
                    inputs
                        .session_length_minutes
                        .unwrap_or(self.inner.config.session.default_length_minutes),
                    &inputs.log_path,
                    now,
                );
                match started {
                    Ok(()) => {}
                    Err(e) if e.is_silent() => {
                        debug!("Start ignored: {}", e);
                        return Ok(state.favorites_tree());
                    }
                    Err(e) => return Err(e),
                }
                self.inner.arm_timers(&state);
            }
            SessionState::Recording => {}
        }

        state.controller.set_section(inputs.phase);

        if let Some(time_of_day) = inputs.time_of_day {
            self.inner.log_time_change(&mut state, time_of_day, now);
        }

        let section = state.controller.active()?.current_section;
        self.inner.record_locked(
            &mut state,
            &inputs.design_vector,
            &inputs.objective_vector,
            section,
            inputs.favorite,
            now,
        )?;

        if inputs.end {
            self.inner.finish_locked(&mut state)?;
        }

        Ok(state.favorites_tree())
    }

    /// Begin a session without going through `solve`
    pub fn start(&self, participant_id: i64, duration_minutes: f64, output_path: &str) -> Result<()> {
        let now = self.inner.clock.now();
        let mut state = self.inner.lock_state();
        self.inner
            .start_locked(&mut state, participant_id, duration_minutes, output_path, now)?;
        self.inner.arm_timers(&state);
        Ok(())
    }

    /// Record one evaluation in the current section
    pub fn record(
        &self,
        design_vector: &[f64],
        objective_vector: &[f64],
        favorite: bool,
    ) -> Result<RecordOutcome> {
        let now = self.inner.clock.now();
        let mut state = self.inner.lock_state();
        let section = state.controller.active()?.current_section;
        self.inner
            .record_locked(&mut state, design_vector, objective_vector, section, favorite, now)
    }

    /// Set the section used by later `record` calls
    pub fn set_section(&self, section: i64) {
        self.inner.lock_state().controller.set_section(section);
    }

    /// End the session. Returns the final CSV path on the call that ended
    /// it and `None` afterwards.
    pub fn end(&self) -> Result<Option<PathBuf>> {
        let mut state = self.inner.lock_state();
        self.inner.finish_locked(&mut state)
    }

    /// Write the backup file now, as the autosave timer would
    pub fn autosave_now(&self) -> Result<PathBuf> {
        let (rows, target) = self.inner.autosave_job()?;
        export(&rows, &target, self.inner.config.export.layout)
    }

    pub fn state(&self) -> SessionState {
        self.inner.lock_state().controller.state()
    }

    pub fn favorites(&self) -> FavoritesTree {
        self.inner.lock_state().favorites_tree()
    }

    /// Copy of the recorded rows
    pub fn rows(&self) -> Vec<EvaluationRow> {
        self.inner.lock_state().log.snapshot()
    }

    pub fn timers_armed(&self) -> bool {
        self.inner.lock_timers().is_armed()
    }
}

impl Inner {
    fn lock_state(&self) -> MutexGuard<'_, LoggerState> {
        // A panic mid-invocation leaves rows that are still valid to export
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_timers(&self) -> MutexGuard<'_, SessionTimers> {
        self.timers.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn start_locked(
        &self,
        state: &mut LoggerState,
        participant_id: i64,
        duration_minutes: f64,
        output_path: &str,
        now: DateTime<Local>,
    ) -> Result<()> {
        state.controller.start(
            participant_id,
            duration_minutes,
            output_path,
            now,
            self.prompt.as_ref(),
        )?;
        Ok(())
    }

    fn record_locked(
        &self,
        state: &mut LoggerState,
        design_vector: &[f64],
        objective_vector: &[f64],
        section: i64,
        favorite: bool,
        now: DateTime<Local>,
    ) -> Result<RecordOutcome> {
        if !state.controller.is_recording() {
            return Err(LoggerError::UninitializedSession);
        }
        let session_start = state.controller.active()?.start_time;
        Ok(state.log.record(
            design_vector,
            objective_vector,
            section,
            favorite,
            now,
            session_start,
        ))
    }

    fn log_time_change(&self, state: &mut LoggerState, time_of_day: TimeOfDay, now: DateTime<Local>) {
        let Some(message) = state.time_changes.observe(time_of_day) else {
            return;
        };
        let Some(session) = state.controller.session() else {
            return;
        };
        let path = events_path(&session.output_path, session.participant_id);
        if let Err(e) = events::append_entry(&path, now, &message) {
            warn!("Failed to log time change: {}", e);
        }
    }

    /// Idempotent end: final export, stop timers, notify
    fn finish_locked(&self, state: &mut LoggerState) -> Result<Option<PathBuf>> {
        if !state.controller.end()? {
            return Ok(None);
        }
        self.lock_timers().stop_all();

        let session = state.controller.active()?;
        let target = final_path(&session.output_path, session.participant_id, self.clock.now());
        let written = export(state.log.rows(), &target, self.config.export.layout)?;
        info!(path = %written.display(), "Final export written");

        self.prompt.notify("Please complete the survey");
        if let Some(url) = self.config.survey_url() {
            if let Err(e) = self.prompt.open_url(url) {
                warn!("Could not open survey: {}", e);
            }
        }

        Ok(Some(written))
    }

    fn autosave_job(&self) -> Result<(Vec<EvaluationRow>, PathBuf)> {
        let state = self.lock_state();
        if !state.controller.is_recording() {
            return Err(LoggerError::UninitializedSession);
        }
        let session = state.controller.active()?;
        let target = backup_path(&session.output_path, session.participant_id);
        Ok((state.log.snapshot(), target))
    }

    fn arm_timers(self: &Arc<Self>, state: &LoggerState) {
        let mut timers = self.lock_timers();
        timers.stop_all();

        let weak = Arc::downgrade(self);
        timers.autosave = Some(AutosaveTimer::spawn(
            &self.runtime,
            self.config.autosave_interval(),
            move || autosave_tick(&weak),
        ));

        if self.config.session.timing == TimingMode::Automatic {
            if let Some(session) = state.controller.session() {
                let weak = Arc::downgrade(self);
                timers.session = Some(SessionTimer::spawn(&self.runtime, session.length, move || {
                    session_expired(&weak)
                }));
            }
        }
    }
}

/// Returns `false` once the logger is gone or the session is over
fn autosave_tick(inner: &Weak<Inner>) -> bool {
    let Some(inner) = inner.upgrade() else {
        return false;
    };
    let (rows, target) = match inner.autosave_job() {
        Ok(job) => job,
        Err(_) => return false,
    };
    // Lock released; the write never blocks the host
    if let Err(e) = export(&rows, &target, inner.config.export.layout) {
        error!("Autosave failed: {}", e);
    }
    true
}

fn session_expired(inner: &Weak<Inner>) {
    let Some(inner) = inner.upgrade() else {
        return;
    };
    info!("Session time is up, ending session");
    let mut state = inner.lock_state();
    if let Err(e) = inner.finish_locked(&mut state) {
        error!("Forced end failed: {}", e);
    }
}
