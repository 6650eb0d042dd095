//! SQLite-based session storage and pomodoro history.
//!
//! Provides persistent storage for:
//! - The in-progress focus session (single `kv` slot)
//! - Recorded pomodoros, from which analytics are derived

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use super::data_dir;
use crate::analytics::{AnalyticsSummary, PomodoroRecord};
use crate::error::{DatabaseError, Result};
use crate::focus::{FocusPreset, FocusSession, SessionRecorder, SessionStore};

const FOCUS_SESSION_KEY: &str = "focus_session";

/// SQLite database backing both focus-engine collaborators.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data_dir>/focusguard.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_at(&data_dir()?.join("focusguard.db"))
    }

    /// Open (or create) the database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS pomodoros (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                preset          TEXT NOT NULL,
                duration_min    INTEGER NOT NULL,
                linked_task_id  TEXT,
                completed_at    TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_pomodoros_completed_at ON pomodoros(completed_at);",
        )?;
        Ok(())
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn kv_delete(&self, key: &str) -> Result<()> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// Record a pomodoro with an explicit completion time.
    pub fn record_pomodoro_at(
        &self,
        preset: FocusPreset,
        duration_min: u64,
        linked_task_id: Option<&str>,
        completed_at: DateTime<Utc>,
    ) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO pomodoros (preset, duration_min, linked_task_id, completed_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                preset.as_str(),
                duration_min,
                linked_task_id,
                completed_at.to_rfc3339(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Recorded pomodoros, most recent first.
    pub fn history(&self, limit: usize) -> Result<Vec<PomodoroRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, preset, duration_min, linked_task_id, completed_at
             FROM pomodoros
             ORDER BY completed_at DESC, id DESC
             LIMIT ?1",
        )?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt.query_map(params![limit], row_tuple)?;
        rows.map(|row| decode_record(row?)).collect()
    }

    pub fn analytics(&self) -> Result<AnalyticsSummary> {
        let mut stmt = self.conn.prepare(
            "SELECT id, preset, duration_min, linked_task_id, completed_at
             FROM pomodoros
             ORDER BY completed_at ASC, id ASC",
        )?;
        let rows = stmt.query_map([], row_tuple)?;
        let records = rows
            .map(|row| decode_record(row?))
            .collect::<Result<Vec<_>>>()?;
        Ok(AnalyticsSummary::from_records(&records))
    }

    /// Delete all recorded pomodoros. The in-progress session is untouched.
    pub fn reset_analytics(&self) -> Result<usize> {
        Ok(self.conn.execute("DELETE FROM pomodoros", [])?)
    }
}

type RawRecord = (i64, String, u64, Option<String>, String);

fn row_tuple(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRecord> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
    ))
}

fn decode_record(raw: RawRecord) -> Result<PomodoroRecord> {
    let (id, preset, duration_min, linked_task_id, completed_at) = raw;
    let corrupt = |message: String| DatabaseError::CorruptRow {
        table: "pomodoros".into(),
        message,
    };
    let preset = preset.parse::<FocusPreset>().map_err(corrupt)?;
    let completed_at = DateTime::parse_from_rfc3339(&completed_at)
        .map_err(|e| corrupt(format!("row {id}: {e}")))?
        .with_timezone(&Utc);
    Ok(PomodoroRecord {
        id,
        preset,
        duration_min,
        linked_task_id,
        completed_at,
    })
}

impl SessionStore for Database {
    fn load(&self) -> Result<Option<FocusSession>> {
        match self.kv_get(FOCUS_SESSION_KEY)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn save(&self, session: Option<&FocusSession>) -> Result<()> {
        match session {
            Some(session) => self.kv_set(FOCUS_SESSION_KEY, &serde_json::to_string(session)?),
            None => self.kv_delete(FOCUS_SESSION_KEY),
        }
    }
}

impl SessionRecorder for Database {
    fn record_pomodoro(
        &self,
        mode: FocusPreset,
        duration_minutes: u64,
        linked_task_id: Option<&str>,
    ) -> Result<()> {
        self.record_pomodoro_at(mode, duration_minutes, linked_task_id, Utc::now())?;
        Ok(())
    }
}
