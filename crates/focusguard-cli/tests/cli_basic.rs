//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary data directory.

use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use focusguard_core::focus::now_ms;
use focusguard_core::{Database, FocusPreset, FocusSessionEngine, SessionStore};

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(data_dir: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_focusguard"))
        .args(args)
        .env("FOCUSGUARD_DATA_DIR", data_dir)
        .env_remove("FOCUSGUARD_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn parse_json(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout).expect("Failed to parse JSON output")
}

#[test]
fn test_focus_start_and_status() {
    let dir = tempfile::tempdir().unwrap();

    let (code, stdout, _) = run_cli(
        dir.path(),
        &["focus", "start", "--preset", "sprint", "--task", "t-1"],
    );
    assert_eq!(code, 0, "focus start failed");
    let started = parse_json(&stdout);
    assert_eq!(started["type"], "SessionStarted");
    assert_eq!(started["preset"], "sprint");
    assert_eq!(started["linked_task_id"], "t-1");
    assert_eq!(started["duration_ms"], 15 * 60 * 1000);

    let (code, stdout, _) = run_cli(dir.path(), &["focus", "status"]);
    assert_eq!(code, 0, "focus status failed");
    let snapshot = parse_json(&stdout);
    assert_eq!(snapshot["type"], "StateSnapshot");
    assert_eq!(snapshot["session"]["state"], "working");
    assert_eq!(snapshot["session"]["pomodoros_completed"], 0);
    assert_eq!(snapshot["preset_label"], "Sprint");
}

#[test]
fn test_focus_default_preset_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(
        dir.path(),
        &["config", "set", "focus.default_preset", "deepwork"],
    );
    assert_eq!(code, 0);

    let (code, stdout, _) = run_cli(dir.path(), &["focus", "start"]);
    assert_eq!(code, 0);
    assert_eq!(parse_json(&stdout)["preset"], "deepwork");
}

#[test]
fn test_focus_complete_then_skip_break() {
    let dir = tempfile::tempdir().unwrap();
    run_cli(dir.path(), &["focus", "start", "--preset", "deepwork"]);

    let (code, stdout, _) = run_cli(dir.path(), &["focus", "complete"]);
    assert_eq!(code, 0);
    let completed = parse_json(&stdout);
    assert_eq!(completed["type"], "WorkPeriodCompleted");
    assert_eq!(completed["next_state"], "shortBreak");

    let (code, stdout, _) = run_cli(dir.path(), &["focus", "skip-break"]);
    assert_eq!(code, 0);
    let skipped = parse_json(&stdout);
    assert_eq!(skipped["type"], "BreakCompleted");
    assert_eq!(skipped["skipped"], true);
    assert_eq!(skipped["session_in_cycle"], 2);

    let (_, stdout, _) = run_cli(dir.path(), &["stats", "summary"]);
    let summary = parse_json(&stdout);
    assert_eq!(summary["total_completed"], 1);
    assert_eq!(summary["total_focus_min"], 50);
}

#[test]
fn test_skip_break_while_working_is_noop() {
    let dir = tempfile::tempdir().unwrap();
    run_cli(dir.path(), &["focus", "start"]);

    let (code, stdout, stderr) = run_cli(dir.path(), &["focus", "skip-break"]);
    assert_eq!(code, 0);
    assert!(stderr.contains("not on a break"));
    assert_eq!(parse_json(&stdout)["session"]["state"], "working");
}

#[test]
fn test_focus_end_without_progress_records_nothing() {
    let dir = tempfile::tempdir().unwrap();
    run_cli(dir.path(), &["focus", "start", "--preset", "sprint"]);

    let (code, stdout, _) = run_cli(dir.path(), &["focus", "end"]);
    assert_eq!(code, 0);
    assert_eq!(parse_json(&stdout)["type"], "SessionEnded");

    let (_, stdout, _) = run_cli(dir.path(), &["focus", "status"]);
    assert!(parse_json(&stdout)["session"].is_null());

    let (_, stdout, _) = run_cli(dir.path(), &["stats", "summary"]);
    assert_eq!(parse_json(&stdout)["total_completed"], 0);
}

#[test]
fn test_invalid_preset_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["focus", "start", "--preset", "marathon"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown focus preset"));
}

#[test]
fn test_config_get_set() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["config", "get", "focus.tick_interval_ms"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "1000");

    let (code, _, _) = run_cli(
        dir.path(),
        &["config", "set", "focus.tick_interval_ms", "500"],
    );
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(dir.path(), &["config", "get", "focus.tick_interval_ms"]);
    assert_eq!(stdout.trim(), "500");

    let (code, _, stderr) = run_cli(dir.path(), &["config", "set", "focus.nope", "1"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_watch_without_session_exits() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["focus", "watch"]);
    assert_eq!(code, 0);
    assert!(stderr.contains("no focus session"));
}

#[test]
fn test_config_rejects_zero_tick_interval() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(
        dir.path(),
        &["config", "set", "focus.tick_interval_ms", "0"],
    );
    assert_ne!(code, 0);
    assert!(stderr.contains("must be greater than 0"));

    let (_, stdout, _) = run_cli(dir.path(), &["config", "get", "focus.tick_interval_ms"]);
    assert_eq!(stdout.trim(), "1000");
}

#[test]
fn test_config_presets_marks_default() {
    let dir = tempfile::tempdir().unwrap();
    run_cli(
        dir.path(),
        &["config", "set", "focus.default_preset", "sprint"],
    );

    let (code, stdout, _) = run_cli(dir.path(), &["config", "presets"]);
    assert_eq!(code, 0);
    let presets = parse_json(&stdout);
    let presets = presets.as_array().unwrap();
    assert_eq!(presets.len(), 3);
    let sprint = presets.iter().find(|p| p["preset"] == "sprint").unwrap();
    assert_eq!(sprint["default"], true);
    assert_eq!(sprint["durations"]["work_duration_ms"], 15 * 60 * 1000);
    let deep = presets.iter().find(|p| p["preset"] == "deepwork").unwrap();
    assert_eq!(deep["default"], false);
    assert_eq!(deep["durations"]["long_break_after"], 3);
}

#[test]
fn test_watch_stops_when_session_ended_elsewhere() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(
        dir.path(),
        &["config", "set", "focus.tick_interval_ms", "100"],
    );
    assert_eq!(code, 0);

    // Sprint work period whose deadline is two seconds away.
    let db_path = dir.path().join("focusguard.db");
    let deadline = {
        let db = Database::open_at(&db_path).unwrap();
        let mut engine = FocusSessionEngine::new(&db, &db);
        engine.start_session_at(FocusPreset::Sprint, None, now_ms() - 15 * 60 * 1000 + 2_000);
        Instant::now() + Duration::from_secs(2)
    };

    let mut watch = Command::new(env!("CARGO_BIN_EXE_focusguard"))
        .args(["focus", "watch"])
        .env("FOCUSGUARD_DATA_DIR", dir.path())
        .env_remove("FOCUSGUARD_LOG")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("Failed to spawn focus watch");
    std::thread::sleep(Duration::from_millis(500));

    let (code, stdout, _) = run_cli(dir.path(), &["focus", "end"]);
    assert_eq!(code, 0);
    assert_eq!(parse_json(&stdout)["type"], "SessionEnded");

    // Give watch until well past the old work deadline to notice.
    let give_up = deadline + Duration::from_millis(1_500);
    let status = loop {
        if let Some(status) = watch.try_wait().unwrap() {
            break Some(status);
        }
        if Instant::now() >= give_up {
            let _ = watch.kill();
            let _ = watch.wait();
            break None;
        }
        std::thread::sleep(Duration::from_millis(50));
    };
    assert!(
        status.is_some_and(|s| s.success()),
        "watch did not stop when the session ended"
    );

    let now = Instant::now();
    if now < give_up {
        std::thread::sleep(give_up - now);
    }
    let db = Database::open_at(&db_path).unwrap();
    assert!(SessionStore::load(&db).unwrap().is_none());
    assert_eq!(db.analytics().unwrap().total_completed, 0);
}
