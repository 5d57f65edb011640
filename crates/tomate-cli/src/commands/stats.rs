use clap::Subcommand;
use tomate_core::error::Result;
use tomate_core::MetricsStats;

use super::Context;
use crate::render;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Show totals and averages
    Show {
        /// Print as JSON instead of a box
        #[arg(long)]
        json: bool,
    },
    /// Delete the recorded session history
    Reset,
}

pub fn run(ctx: &Context, action: StatsAction) -> Result<()> {
    let store = ctx.metrics_store();

    match action {
        StatsAction::Show { json: true } => {
            println!("{}", serde_json::to_string_pretty(&store.stats())?);
        }
        StatsAction::Show { json: false } => {
            // An unreadable history is logged and shown as empty.
            let metrics = store.load_all();
            let stats = MetricsStats::from_sessions(&metrics.sessions);
            for line in render::stats(&stats, metrics.sessions.last()) {
                println!("{line}");
            }
        }
        StatsAction::Reset => {
            store.reset()?;
            println!("session history cleared");
        }
    }
    Ok(())
}
