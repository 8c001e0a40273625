mod cli;
mod commands;

use anyhow::{Context, Result};
use clap::Parser;

use linkmill_core::config::{load_dotenv, Config};
use linkmill_schedule::ScheduleConfig;

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Cli::parse();
    let config = Config::from_env();
    config.log_summary();

    // An invalid schedule stops the driver before any evaluation runs.
    let schedule = ScheduleConfig::from_file(&config.schedule_path)
        .with_context(|| format!("invalid schedule config at {}", config.schedule_path.display()))?;

    match args.command {
        Command::Tick => commands::tick(&config, &schedule).await,
        Command::Plan { now } => commands::plan(&config, &schedule, now.as_deref()),
        Command::Merge => commands::merge(&config),
        Command::Export => commands::export(&config).await,
    }
}
