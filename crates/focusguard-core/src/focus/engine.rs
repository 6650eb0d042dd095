//! Focus session engine.
//!
//! The engine is a wall-clock-based state machine. It does not use
//! internal threads - the caller is responsible for calling `tick()`
//! periodically (nominally once per second) while a session is alive.
//!
//! ## State Transitions
//!
//! ```text
//! none -> Working -> (ShortBreak | LongBreak) -> Working -> ... -> none
//! ```
//!
//! Remaining time is always recomputed from `now - start_time`, so a host
//! that was suspended across a deadline gets exactly one transition on its
//! next tick. Phases missed while suspended are not replayed.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = FocusSessionEngine::new(&db, &db);
//! engine.start_session(FocusPreset::Classic, None);
//! // In a loop:
//! let report = engine.tick(); // report.event is Some on a phase change
//! ```

use tracing::{debug, info, warn};

use super::ports::{SessionRecorder, SessionStore};
use super::preset::FocusPreset;
use super::session::{remaining_ms, FocusSession, FocusState};
use crate::events::{at_ms, Event};

/// Result of a single `tick()`.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Countdown for the current phase; 0 on the tick that transitions.
    pub remaining_ms: u64,
    /// Transition performed by this tick, if any.
    pub event: Option<Event>,
}

/// Owns the single optional focus session and drives its phases.
pub struct FocusSessionEngine<S, R> {
    store: S,
    recorder: R,
    session: Option<FocusSession>,
}

impl<S: SessionStore, R: SessionRecorder> FocusSessionEngine<S, R> {
    /// Create an engine, restoring any session persisted in `store`.
    ///
    /// A store that fails to load is treated as empty.
    pub fn new(store: S, recorder: R) -> Self {
        let session = match store.load() {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "failed to load focus session; starting empty");
                None
            }
        };
        if let Some(ref s) = session {
            debug!(session_id = %s.id, state = ?s.state, "restored focus session");
        }
        Self {
            store,
            recorder,
            session,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn session(&self) -> Option<&FocusSession> {
        self.session.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn recorder(&self) -> &R {
        &self.recorder
    }

    pub fn remaining_ms_at(&self, now_ms: u64) -> u64 {
        self.session
            .as_ref()
            .map(|s| remaining_ms(now_ms, s))
            .unwrap_or(0)
    }

    /// `(position, cycle_length)` within the current long-break cycle.
    pub fn cycle_progress(&self) -> Option<(u32, u32)> {
        self.session.as_ref().map(|s| {
            (
                s.current_session_in_cycle,
                s.mode.durations().long_break_after,
            )
        })
    }

    pub fn snapshot(&self) -> Event {
        self.snapshot_at(now_ms())
    }

    /// Build a full state snapshot event.
    pub fn snapshot_at(&self, now_ms: u64) -> Event {
        Event::StateSnapshot {
            session: self.session.clone(),
            remaining_ms: self.remaining_ms_at(now_ms),
            preset_label: self.session.as_ref().map(|s| s.mode.label().to_string()),
            at: at_ms(now_ms),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Replace the in-memory session with whatever the store now holds.
    ///
    /// Long-running hosts call this before `tick()` so a session ended or
    /// restarted by another process is not written back. A failed load
    /// keeps the current session.
    pub fn reload(&mut self) -> Option<&FocusSession> {
        match self.store.load() {
            Ok(session) => self.session = session,
            Err(e) => warn!(error = %e, "failed to reload focus session; keeping current"),
        }
        self.session.as_ref()
    }

    pub fn start_session(&mut self, preset: FocusPreset, linked_task_id: Option<String>) -> Event {
        self.start_session_at(preset, linked_task_id, now_ms())
    }

    /// Start a new session, discarding any existing one.
    pub fn start_session_at(
        &mut self,
        preset: FocusPreset,
        linked_task_id: Option<String>,
        now_ms: u64,
    ) -> Event {
        if let Some(ref old) = self.session {
            debug!(session_id = %old.id, "replacing existing focus session");
        }
        let session = FocusSession::new(preset, linked_task_id, now_ms);
        info!(session_id = %session.id, preset = %preset, "focus session started");
        let event = Event::SessionStarted {
            session_id: session.id.clone(),
            preset,
            linked_task_id: session.linked_task_id.clone(),
            duration_ms: session.duration_ms,
            at: at_ms(now_ms),
        };
        self.session = Some(session);
        self.persist();
        event
    }

    pub fn tick(&mut self) -> TickReport {
        self.tick_at(now_ms())
    }

    /// Advance the engine to `now_ms`. Transitions at most once.
    pub fn tick_at(&mut self, now_ms: u64) -> TickReport {
        let (remaining, state) = match self.session {
            Some(ref s) => (s.remaining_at(now_ms), s.state),
            None => {
                return TickReport {
                    remaining_ms: 0,
                    event: None,
                }
            }
        };

        if remaining > 0 {
            return TickReport {
                remaining_ms: remaining as u64,
                event: None,
            };
        }

        let event = match state {
            FocusState::Working => self.work_period_complete(now_ms),
            FocusState::ShortBreak | FocusState::LongBreak => self.break_complete(now_ms, false),
        };
        TickReport {
            remaining_ms: 0,
            event,
        }
    }

    pub fn complete_work_period(&mut self) -> Option<Event> {
        self.complete_work_period_at(now_ms())
    }

    /// Finish the current work period early. No-op outside a work period.
    pub fn complete_work_period_at(&mut self, now_ms: u64) -> Option<Event> {
        match self.session {
            Some(ref s) if s.state == FocusState::Working => self.work_period_complete(now_ms),
            _ => None,
        }
    }

    pub fn skip_break(&mut self) -> Option<Event> {
        self.skip_break_at(now_ms())
    }

    /// End the current break immediately. No-op while working.
    pub fn skip_break_at(&mut self, now_ms: u64) -> Option<Event> {
        match self.session {
            Some(ref s) if s.state.is_break() => self.break_complete(now_ms, true),
            _ => None,
        }
    }

    pub fn end_session(&mut self) -> Option<Event> {
        self.end_session_at(now_ms())
    }

    /// Discard the session. Sessions with progress leave a zero-minute
    /// marker with the recorder; empty ones leave nothing.
    pub fn end_session_at(&mut self, now_ms: u64) -> Option<Event> {
        let session = self.session.take()?;
        if session.pomodoros_completed > 0 {
            self.record(session.mode, 0, session.linked_task_id.as_deref());
        }
        self.persist();
        info!(
            session_id = %session.id,
            pomodoros = session.pomodoros_completed,
            "focus session ended"
        );
        Some(Event::SessionEnded {
            session_id: session.id,
            pomodoros_completed: session.pomodoros_completed,
            at: at_ms(now_ms),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn work_period_complete(&mut self, now_ms: u64) -> Option<Event> {
        let session = self.session.as_mut()?;
        let preset = session.mode.durations();

        session.pomodoros_completed += 1;
        let (next_state, duration) = if preset.is_long_break(session.pomodoros_completed) {
            (FocusState::LongBreak, preset.long_break_duration_ms)
        } else {
            (FocusState::ShortBreak, preset.short_break_duration_ms)
        };
        session.state = next_state;
        session.duration_ms = duration;
        session.start_time_ms = now_ms;
        session.break_start_time_ms = Some(now_ms);

        debug!(
            session_id = %session.id,
            pomodoros = session.pomodoros_completed,
            next = ?next_state,
            "work period complete"
        );
        let event = Event::WorkPeriodCompleted {
            session_id: session.id.clone(),
            pomodoros_completed: session.pomodoros_completed,
            next_state,
            break_duration_ms: duration,
            at: at_ms(now_ms),
        };
        let mode = session.mode;
        let task = session.linked_task_id.clone();

        self.persist();
        self.record(mode, mode.work_minutes(), task.as_deref());
        Some(event)
    }

    fn break_complete(&mut self, now_ms: u64, skipped: bool) -> Option<Event> {
        let session = self.session.as_mut()?;
        let preset = session.mode.durations();
        let from_state = session.state;

        session.current_session_in_cycle = if from_state == FocusState::LongBreak {
            1
        } else {
            (session.current_session_in_cycle % preset.long_break_after.max(1)) + 1
        };
        session.state = FocusState::Working;
        session.duration_ms = preset.work_duration_ms;
        session.start_time_ms = now_ms;
        session.break_start_time_ms = None;

        debug!(
            session_id = %session.id,
            from = ?from_state,
            in_cycle = session.current_session_in_cycle,
            skipped,
            "break complete"
        );
        let event = Event::BreakCompleted {
            session_id: session.id.clone(),
            from_state,
            session_in_cycle: session.current_session_in_cycle,
            skipped,
            at: at_ms(now_ms),
        };

        self.persist();
        Some(event)
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(self.session.as_ref()) {
            warn!(error = %e, "failed to persist focus session");
        }
    }

    fn record(&self, mode: FocusPreset, minutes: u64, task: Option<&str>) {
        if let Err(e) = self.recorder.record_pomodoro(mode, minutes, task) {
            warn!(error = %e, preset = %mode, "failed to record pomodoro");
        }
    }
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
