mod args;
mod commands;
mod config;
mod error;
mod render;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use services::{AppServices, Clock};

use crate::args::{Cli, Command};
use crate::config::{Config, normalize_sqlite_url, prepare_sqlite_file};
use crate::error::AppError;

async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(db) = cli.db.as_deref() {
        config.db_url = normalize_sqlite_url(db)?;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    // Logs go to stderr so that stdout stays machine-readable with --json.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    debug!(db_url = %config.db_url, seeded = config.seed.is_some(), "starting");

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&config.db_url)?;
    let services = AppServices::new_sqlite(&config.db_url, Clock::system(), config.seed).await?;

    let command = cli.command.unwrap_or(Command::Status);
    let output = commands::execute(&services.journey(), command, cli.json).await?;
    println!("{output}");
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
