use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use rundesk_core::{ApiClient, FileStore};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    let store = FileStore::open(cli.config.unwrap_or_else(default_config_path));
    debug!(path = %store.path().display(), "loaded settings");
    let client = ApiClient::with_store(Arc::new(store));

    let output = commands::run(&client, cli.command)?;
    println!("{output}");
    Ok(())
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("rundesk"))
        .unwrap_or_default()
        .join("settings.json")
}
