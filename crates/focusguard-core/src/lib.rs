//! # FocusGuard Core Library
//!
//! Core business logic for the FocusGuard focus timer. Every operation is
//! available through the standalone CLI; other hosts (mobile, web) drive the
//! same engine.
//!
//! ## Architecture
//!
//! - **Focus Engine**: A wall-clock-based state machine that requires the caller
//!   to periodically invoke `tick()` for progress and phase transitions
//! - **Storage**: SQLite session slot and pomodoro history, TOML configuration
//! - **Analytics**: Totals and day streaks derived from recorded pomodoros
//!
//! ## Key Components
//!
//! - [`FocusSessionEngine`]: Core focus timer state machine
//! - [`SessionStore`] / [`SessionRecorder`]: Collaborators the engine calls into
//! - [`Database`]: SQLite implementation of both collaborators
//! - [`Config`]: Application configuration management

pub mod analytics;
pub mod error;
pub mod events;
pub mod focus;
pub mod storage;

pub use analytics::{AnalyticsSummary, PomodoroRecord, Streaks};
pub use error::{ConfigError, CoreError, DatabaseError};
pub use events::Event;
pub use focus::{
    format_remaining, FocusPreset, FocusSession, FocusSessionEngine, FocusState, SessionRecorder,
    SessionStore, TickReport,
};
pub use storage::{Config, Database, MemorySessionStore};
