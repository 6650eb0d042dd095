//! Pomodoro analytics derived from recorder history.
//!
//! Streaks count consecutive UTC days with at least one recorded pomodoro.
//! Partial markers (zero-minute records left when a session is ended) count
//! toward totals and streaks like any other record.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::focus::FocusPreset;

/// One recorder call as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PomodoroRecord {
    pub id: i64,
    pub preset: FocusPreset,
    pub duration_min: u64,
    pub linked_task_id: Option<String>,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streaks {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_active_date: Option<NaiveDate>,
}

impl Streaks {
    /// Fold one active day into the streak. Any day that does not extend
    /// the streak, including one earlier than the last active day, starts
    /// a new streak of 1.
    pub fn record_day(&mut self, day: NaiveDate) {
        match self.last_active_date {
            None => {
                self.current_streak = 1;
                self.longest_streak = self.longest_streak.max(1);
            }
            Some(last) if last == day => {}
            Some(last) if (day - last).num_days() == 1 => {
                self.current_streak += 1;
                self.longest_streak = self.longest_streak.max(self.current_streak);
            }
            Some(_) => self.current_streak = 1,
        }
        self.last_active_date = Some(day);
    }

    pub fn from_days<I: IntoIterator<Item = NaiveDate>>(days: I) -> Self {
        let mut streaks = Self::default();
        for day in days {
            streaks.record_day(day);
        }
        streaks
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub total_completed: u64,
    pub total_focus_min: u64,
    pub by_preset: BTreeMap<String, u64>,
    pub last_session_at: Option<DateTime<Utc>>,
    pub streaks: Streaks,
}

impl AnalyticsSummary {
    /// Build a summary from records in ascending `completed_at` order.
    pub fn from_records(records: &[PomodoroRecord]) -> Self {
        let mut summary = Self::default();
        for preset in FocusPreset::ALL {
            summary.by_preset.insert(preset.as_str().to_string(), 0);
        }
        for record in records {
            summary.total_completed += 1;
            summary.total_focus_min += record.duration_min;
            *summary
                .by_preset
                .entry(record.preset.as_str().to_string())
                .or_insert(0) += 1;
            summary.last_session_at = Some(record.completed_at);
            summary.streaks.record_day(record.completed_at.date_naive());
        }
        summary
    }
}
