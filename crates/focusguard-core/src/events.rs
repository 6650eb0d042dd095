use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::focus::{FocusPreset, FocusSession, FocusState};

/// Every state change of the focus engine produces an Event.
/// Hosts print or forward them; the engine never acts on them itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        session_id: String,
        preset: FocusPreset,
        linked_task_id: Option<String>,
        duration_ms: u64,
        at: DateTime<Utc>,
    },
    /// A work period finished and a break began.
    WorkPeriodCompleted {
        session_id: String,
        pomodoros_completed: u32,
        next_state: FocusState,
        break_duration_ms: u64,
        at: DateTime<Utc>,
    },
    /// A break finished (or was skipped) and work resumed.
    BreakCompleted {
        session_id: String,
        from_state: FocusState,
        session_in_cycle: u32,
        skipped: bool,
        at: DateTime<Utc>,
    },
    SessionEnded {
        session_id: String,
        pomodoros_completed: u32,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        session: Option<FocusSession>,
        remaining_ms: u64,
        preset_label: Option<String>,
        at: DateTime<Utc>,
    },
}

/// Converts epoch milliseconds into a timestamp for event payloads.
pub(crate) fn at_ms(now_ms: u64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(now_ms as i64).unwrap_or_else(Utc::now)
}
