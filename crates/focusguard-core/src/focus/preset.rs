use serde::{Deserialize, Serialize};

const MINUTE_MS: u64 = 60 * 1000;

/// One of the three fixed focus presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusPreset {
    Classic,
    DeepWork,
    Sprint,
}

/// Durations governing a preset. All values in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PresetDurations {
    pub label: &'static str,
    pub work_duration_ms: u64,
    pub short_break_duration_ms: u64,
    pub long_break_duration_ms: u64,
    /// Completed work periods before a long break is inserted.
    pub long_break_after: u32,
}

const CLASSIC: PresetDurations = PresetDurations {
    label: "Classic Pomodoro",
    work_duration_ms: 25 * MINUTE_MS,
    short_break_duration_ms: 5 * MINUTE_MS,
    long_break_duration_ms: 15 * MINUTE_MS,
    long_break_after: 4,
};

const DEEP_WORK: PresetDurations = PresetDurations {
    label: "Deep Work",
    work_duration_ms: 50 * MINUTE_MS,
    short_break_duration_ms: 10 * MINUTE_MS,
    long_break_duration_ms: 20 * MINUTE_MS,
    long_break_after: 3,
};

const SPRINT: PresetDurations = PresetDurations {
    label: "Sprint",
    work_duration_ms: 15 * MINUTE_MS,
    short_break_duration_ms: 5 * MINUTE_MS,
    long_break_duration_ms: 15 * MINUTE_MS,
    long_break_after: 4,
};

impl FocusPreset {
    pub const ALL: [FocusPreset; 3] = [
        FocusPreset::Classic,
        FocusPreset::DeepWork,
        FocusPreset::Sprint,
    ];

    pub fn durations(self) -> &'static PresetDurations {
        match self {
            FocusPreset::Classic => &CLASSIC,
            FocusPreset::DeepWork => &DEEP_WORK,
            FocusPreset::Sprint => &SPRINT,
        }
    }

    pub fn label(self) -> &'static str {
        self.durations().label
    }

    /// Stable identifier used in storage and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            FocusPreset::Classic => "classic",
            FocusPreset::DeepWork => "deepwork",
            FocusPreset::Sprint => "sprint",
        }
    }

    /// Work duration in whole minutes, as reported to the recorder.
    pub fn work_minutes(self) -> u64 {
        self.durations().work_duration_ms / MINUTE_MS
    }
}

impl PresetDurations {
    /// Whether finishing the `completed`-th work period earns a long break.
    pub fn is_long_break(&self, completed: u32) -> bool {
        self.long_break_after != 0 && completed % self.long_break_after == 0
    }
}

impl std::fmt::Display for FocusPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FocusPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classic" => Ok(FocusPreset::Classic),
            "deepwork" | "deep_work" | "deep-work" => Ok(FocusPreset::DeepWork),
            "sprint" => Ok(FocusPreset::Sprint),
            other => Err(format!("unknown focus preset: {other}")),
        }
    }
}
