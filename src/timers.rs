//! Autosave and session-length timers
//!
//! Both run as tokio tasks and are aborted when stopped or dropped. Tasks
//! only hold weak references to the logger so a dropped component is
//! never kept alive by its own timers.

use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

/// Periodic callback, first fire one full period after spawn
pub struct AutosaveTimer {
    handle: JoinHandle<()>,
}

impl AutosaveTimer {
    pub fn spawn<F>(runtime: &Handle, period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let handle = runtime.spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // interval() fires immediately; skip it
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if !on_tick() {
                    debug!("Autosave target gone, stopping timer");
                    break;
                }
            }
        });

        Self { handle }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for AutosaveTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// One-shot callback after the session length elapses
pub struct SessionTimer {
    handle: JoinHandle<()>,
}

impl SessionTimer {
    pub fn spawn<F>(runtime: &Handle, duration: Duration, on_expire: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = runtime.spawn(async move {
            tokio::time::sleep(duration).await;
            debug!("Session length elapsed");
            on_expire();
        });
        Self { handle }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for SessionTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Timers armed for the current session
#[derive(Default)]
pub struct SessionTimers {
    pub autosave: Option<AutosaveTimer>,
    pub session: Option<SessionTimer>,
}

impl SessionTimers {
    pub fn is_armed(&self) -> bool {
        self.autosave.is_some() || self.session.is_some()
    }

    /// Abort and forget every timer
    pub fn stop_all(&mut self) {
        if let Some(timer) = self.autosave.take() {
            timer.stop();
        }
        if let Some(timer) = self.session.take() {
            timer.stop();
        }
    }
}
