mod config;
mod db;
mod export;
mod models;
mod run;
mod session;
mod ui;
mod view;

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let config = config::Config::load_default()?;
    init_logger(&config)?;
    debug!(config = %config.config_path().display(), "starting");

    let db = db::Database::open(&config.db_path())?;

    match args.len() {
        1 => run::as_tui(config, &db),
        2.. => run::as_cli(&args, config, &db),
        _ => {
            eprintln!("Usage: spendwise [command]");
            Ok(())
        }
    }
}

/// Log to `<data dir>/spendwise.log`. The terminal belongs to the TUI, so nothing goes to
/// stdout or stderr and ANSI colors are off.
fn init_logger(config: &config::Config) -> Result<()> {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => EnvFilter::from_default_env(),
        None => EnvFilter::try_new(format!(
            "{}={}",
            env!("CARGO_CRATE_NAME"),
            config.settings.log_level
        ))
        .with_context(|| format!("Invalid log_level '{}'", config.settings.log_level))?,
    };

    let path = config.log_path();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;
    Ok(())
}
