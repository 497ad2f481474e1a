//! Console binary for the Kinship social network.
//!
//! Loads `kinship.yaml` (or defaults), opens the data directory and either
//! runs the interactive menu or prints network statistics as JSON.
//!
//! # Startup Sequence
//!
//! 1. Parse command-line arguments
//! 2. Load configuration, applying `KINSHIP_DATA_DIR` and `--data-dir`
//! 3. Initialize structured logging on stderr
//! 4. Open the network (profiles and friendship snapshot)
//! 5. Run the requested command

mod console;
mod error;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kinship_core::{LogFormat, Network, NetworkConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::console::Shell;

#[derive(Debug, Parser)]
#[command(
    name = "kinship",
    version,
    about = "A console social network with friendships and life events"
)]
struct Cli {
    /// Configuration file; defaults apply when it does not exist.
    #[arg(long, value_name = "PATH", default_value = "kinship.yaml")]
    config: PathBuf,

    /// Data directory, overriding the config file and `KINSHIP_DATA_DIR`.
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Copy, Subcommand)]
enum Command {
    /// Interactive menu (default).
    Shell,
    /// Print identity, friendship and degree counts as JSON.
    Stats,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, config_found) = load_config(&cli)?;

    init_tracing(&config.logging.level, config.logging.format);
    if !config_found {
        info!(path = %cli.config.display(), "config file not found, using defaults");
    }
    info!(
        data_dir = %config.storage.data_dir.display(),
        duplicate_policy = ?config.graph.duplicate_policy,
        persistence = ?config.persistence.mode,
        "configuration loaded"
    );

    let mut network = Network::open(&config).with_context(|| {
        format!("opening data directory {}", config.storage.data_dir.display())
    })?;

    match cli.command.unwrap_or(Command::Shell) {
        Command::Shell => {
            let stdin = io::stdin();
            Shell::new(&mut network, stdin.lock(), io::stdout().lock())
                .run()
                .context("interactive session failed")?;
        }
        Command::Stats => {
            let stats = network.stats();
            let mut out = io::stdout().lock();
            serde_json::to_writer_pretty(&mut out, &stats).context("rendering stats")?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Load the config named on the command line and apply `--data-dir`.
///
/// Also reports whether the file existed, so the fallback can be logged once
/// tracing is up.
fn load_config(cli: &Cli) -> Result<(NetworkConfig, bool)> {
    let found = cli.config.exists();
    let mut config = NetworkConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(dir) = &cli.data_dir {
        config.storage.data_dir.clone_from(dir);
    }
    Ok((config, found))
}

/// Install the stderr subscriber.
///
/// `RUST_LOG` wins over the configured level.
fn init_tracing(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_falls_back_and_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yaml");
        let cli = Cli::try_parse_from([
            "kinship",
            "--config",
            path.to_str().unwrap(),
            "--data-dir",
            "/srv/kinship",
        ])
        .unwrap();

        let (config, found) = load_config(&cli).unwrap();
        assert!(!found);
        assert_eq!(config.storage.data_dir, PathBuf::from("/srv/kinship"));
    }

    #[test]
    fn existing_config_is_reported_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kinship.yaml");
        std::fs::write(&path, "persistence:\n  mode: on_shutdown\n").unwrap();
        let cli = Cli::try_parse_from(["kinship", "--config", path.to_str().unwrap(), "stats"]).unwrap();

        let (config, found) = load_config(&cli).unwrap();
        assert!(found);
        assert_eq!(config.persistence.mode, kinship_core::PersistenceMode::OnShutdown);
        assert!(matches!(cli.command, Some(Command::Stats)));
    }
}
