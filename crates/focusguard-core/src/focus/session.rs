use serde::{Deserialize, Serialize};

use super::preset::FocusPreset;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FocusState {
    Working,
    ShortBreak,
    LongBreak,
}

impl FocusState {
    pub fn is_break(self) -> bool {
        !matches!(self, FocusState::Working)
    }

    pub fn label(self) -> &'static str {
        match self {
            FocusState::Working => "Focus",
            FocusState::ShortBreak => "Short break",
            FocusState::LongBreak => "Long break",
        }
    }
}

/// The single in-progress focus session.
///
/// `start_time_ms` marks the start of the current phase, not of the
/// session; it is reset on every transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusSession {
    pub id: String,
    /// Epoch milliseconds.
    pub start_time_ms: u64,
    pub duration_ms: u64,
    pub mode: FocusPreset,
    #[serde(default)]
    pub linked_task_id: Option<String>,
    pub state: FocusState,
    pub pomodoros_completed: u32,
    #[serde(default)]
    pub break_start_time_ms: Option<u64>,
    pub current_session_in_cycle: u32,
}

impl FocusSession {
    pub(crate) fn new(mode: FocusPreset, linked_task_id: Option<String>, now_ms: u64) -> Self {
        Self {
            id: format!("focus_{}", uuid::Uuid::new_v4()),
            start_time_ms: now_ms,
            duration_ms: mode.durations().work_duration_ms,
            mode,
            linked_task_id,
            state: FocusState::Working,
            pomodoros_completed: 0,
            break_start_time_ms: None,
            current_session_in_cycle: 1,
        }
    }

    /// Signed milliseconds left in the current phase at `now_ms`.
    ///
    /// Derived from wall-clock subtraction so a suspended host resumes
    /// with the right value. A clock that moved backwards counts as zero
    /// elapsed time.
    pub fn remaining_at(&self, now_ms: u64) -> i64 {
        let elapsed = now_ms.saturating_sub(self.start_time_ms);
        self.duration_ms as i64 - elapsed as i64
    }

    /// Epoch milliseconds at which the current phase ends.
    pub fn deadline_ms(&self) -> u64 {
        self.start_time_ms.saturating_add(self.duration_ms)
    }
}

/// Remaining time clamped at zero, for display and tick reports.
pub fn remaining_ms(now_ms: u64, session: &FocusSession) -> u64 {
    session.remaining_at(now_ms).max(0) as u64
}

/// Formats a countdown as `MM:SS`, flooring to whole seconds.
pub fn format_remaining(ms: u64) -> String {
    let total_secs = ms / 1000;
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}
