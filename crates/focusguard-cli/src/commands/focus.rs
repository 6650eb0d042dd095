use std::io::Write;
use std::time::Duration;

use clap::Subcommand;
use focusguard_core::{
    format_remaining, Config, Database, Event, FocusPreset, FocusSessionEngine, SessionRecorder,
    SessionStore,
};
use tokio::time::MissedTickBehavior;
use tracing::debug;

#[derive(Subcommand)]
pub enum FocusAction {
    /// Start a new focus session (replaces any running one)
    Start {
        /// Preset: classic, deepwork or sprint
        #[arg(long)]
        preset: Option<FocusPreset>,
        /// Task ID to link the session to
        #[arg(long)]
        task: Option<String>,
    },
    /// Tick once and print the current session as JSON
    Status,
    /// Keep ticking and show a live countdown until Ctrl-C
    Watch,
    /// End the current break and start the next work period
    SkipBreak,
    /// Finish the current work period early
    Complete,
    /// End the session
    End,
}

fn print_json(event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(event)?);
    Ok(())
}

fn print_outcome<S: SessionStore, R: SessionRecorder>(
    engine: &FocusSessionEngine<S, R>,
    event: Option<Event>,
    noop: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    match event {
        Some(event) => print_json(&event),
        None => {
            eprintln!("{noop}");
            print_json(&engine.snapshot())
        }
    }
}

pub fn run(action: FocusAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut engine = FocusSessionEngine::new(&db, &db);

    match action {
        FocusAction::Start { preset, task } => {
            let preset = preset.unwrap_or(config.focus.default_preset);
            let event = engine.start_session(preset, task);
            print_json(&event)?;
        }
        FocusAction::Status => {
            let report = engine.tick();
            print_json(&engine.snapshot())?;
            if let Some(event) = report.event {
                print_json(&event)?;
            }
        }
        FocusAction::Watch => watch(&mut engine, config.focus.tick_interval_ms)?,
        FocusAction::SkipBreak => {
            let event = engine.skip_break();
            print_outcome(&engine, event, "not on a break; nothing to skip")?;
        }
        FocusAction::Complete => {
            let event = engine.complete_work_period();
            print_outcome(&engine, event, "no work period in progress")?;
        }
        FocusAction::End => {
            let event = engine.end_session();
            print_outcome(&engine, event, "no focus session to end")?;
        }
    }
    Ok(())
}

/// Drive the engine from a tokio interval until the session is ended
/// (here or by another process) or the user interrupts.
fn watch<S: SessionStore, R: SessionRecorder>(
    engine: &mut FocusSessionEngine<S, R>,
    tick_interval_ms: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(watched_id) = engine.session().map(|s| s.id.clone()) else {
        eprintln!("no focus session; start one with `focusguard focus start`");
        return Ok(());
    };
    if tick_interval_ms == 0 {
        return Err("focus.tick_interval_ms must be greater than 0".into());
    }

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    rt.block_on(async {
        let mut interval = tokio::time::interval(Duration::from_millis(tick_interval_ms));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);
        let mut stdout = std::io::stdout();

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    // `focus end` or `focus start` from another shell wins.
                    let current = engine.reload().map(|s| s.id.as_str());
                    if current != Some(watched_id.as_str()) {
                        debug!(
                            session_id = %watched_id,
                            "focus session ended or replaced; stopping watch"
                        );
                        println!();
                        break;
                    }

                    let report = engine.tick();
                    if let Some(event) = report.event {
                        println!();
                        println!("{}", serde_json::to_string(&event)?);
                    }
                    let Some(session) = engine.session() else {
                        break;
                    };
                    let (pos, len) = engine.cycle_progress().unwrap_or((1, 1));
                    write!(
                        stdout,
                        "\r{:<12} {}  [{}/{}]  pomodoros: {}   ",
                        session.state.label(),
                        format_remaining(report.remaining_ms),
                        pos,
                        len,
                        session.pomodoros_completed,
                    )?;
                    stdout.flush()?;
                }
                _ = &mut ctrl_c => {
                    debug!("watch interrupted");
                    println!();
                    break;
                }
            }
        }
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}
