use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tomate_core::storage::{data_dir, resolve_config_path, resolve_metrics_path};

mod commands;
mod logging;
mod menu;
mod notifier;
mod render;
mod terminal;

use commands::Context;

#[derive(Parser)]
#[command(name = "tomate", version, about = "Terminal Pomodoro timer")]
struct Cli {
    /// Config file (default: $TOMATE_CONFIG_PATH or ~/.config/tomate-cli/config.json)
    #[arg(long, global = true)]
    config_path: Option<PathBuf>,

    /// Session history file (default: $TOMATE_METRICS_PATH or ~/.config/tomate-cli/metrics.json)
    #[arg(long, global = true)]
    metrics_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive timer (the default)
    Start(commands::timer::StartArgs),
    /// Print the state a new timer would start in, as JSON
    Status,
    /// Session statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(data_dir().join(logging::LOG_FILE_NAME));

    let ctx = Context {
        config_path: resolve_config_path(cli.config_path.as_deref()),
        metrics_path: resolve_metrics_path(cli.metrics_path.as_deref()),
    };
    tracing::debug!(
        config = %ctx.config_path.display(),
        metrics = %ctx.metrics_path.display(),
        "resolved data files"
    );

    let result = match cli.command.unwrap_or(Commands::Start(Default::default())) {
        Commands::Start(args) => commands::timer::start(&ctx, args),
        Commands::Status => commands::timer::status(&ctx),
        Commands::Stats { action } => commands::stats::run(&ctx, action),
        Commands::Config { action } => commands::config::run(&ctx, action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
