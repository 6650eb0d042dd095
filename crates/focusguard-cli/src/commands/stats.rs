use clap::Subcommand;
use focusguard_core::{Config, Database};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Totals, per-preset counts and day streaks
    Summary,
    /// Recent pomodoros, most recent first
    History {
        /// Number of entries (defaults to analytics.history_limit)
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Delete all recorded pomodoros
    Reset,
}

pub fn run(action: StatsAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        StatsAction::Summary => {
            let summary = db.analytics()?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        StatsAction::History { limit } => {
            let limit = limit.unwrap_or(config.analytics.history_limit) as usize;
            let history = db.history(limit)?;
            println!("{}", serde_json::to_string_pretty(&history)?);
        }
        StatsAction::Reset => {
            let removed = db.reset_analytics()?;
            println!("removed {removed} pomodoro records");
        }
    }
    Ok(())
}
