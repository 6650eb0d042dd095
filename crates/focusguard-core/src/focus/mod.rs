mod engine;
mod ports;
mod preset;
mod session;

pub use engine::{now_ms, FocusSessionEngine, TickReport};
pub use ports::{SessionRecorder, SessionStore};
pub use preset::{FocusPreset, PresetDurations};
pub use session::{format_remaining, remaining_ms, FocusSession, FocusState};
