//! Collaborator interfaces the focus engine calls into.
//!
//! Both are best-effort from the engine's point of view: errors are logged
//! at the call site and never change the in-memory session.

use super::preset::FocusPreset;
use super::session::FocusSession;
use crate::error::Result;

/// Single-slot persistence for the in-progress session.
pub trait SessionStore {
    /// Load the persisted session, if any.
    fn load(&self) -> Result<Option<FocusSession>>;

    /// Persist `session`, or clear the slot when `None`.
    fn save(&self, session: Option<&FocusSession>) -> Result<()>;
}

/// Receives one call per completed work period, plus the partial marker
/// (`duration_minutes == 0`) when a session with progress is ended.
pub trait SessionRecorder {
    fn record_pomodoro(
        &self,
        mode: FocusPreset,
        duration_minutes: u64,
        linked_task_id: Option<&str>,
    ) -> Result<()>;
}

impl<T: SessionStore + ?Sized> SessionStore for &T {
    fn load(&self) -> Result<Option<FocusSession>> {
        (**self).load()
    }

    fn save(&self, session: Option<&FocusSession>) -> Result<()> {
        (**self).save(session)
    }
}

impl<T: SessionRecorder + ?Sized> SessionRecorder for &T {
    fn record_pomodoro(
        &self,
        mode: FocusPreset,
        duration_minutes: u64,
        linked_task_id: Option<&str>,
    ) -> Result<()> {
        (**self).record_pomodoro(mode, duration_minutes, linked_task_id)
    }
}
