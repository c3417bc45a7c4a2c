//! Keepsake CLI - ks command

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cmd;
mod config_store;
mod daemon;
mod locks;
mod printer;

/// Keepsake - mirror a folder and keep every overwritten version
#[derive(Parser)]
#[command(name = "ks")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the config file (default: ~/.config/keepsake/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start mirroring (initial sync, then watch for changes)
    Start {
        /// Run in the foreground instead of detaching
        #[arg(long)]
        foreground: bool,
    },
    /// Stop a running mirror
    Stop,
    /// Run the gap-fill sync once and exit, without watching
    Sync,
    /// View and edit the origin/backup configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show all configuration values
    List,
    /// Print a single value
    Get {
        /// Config key (origin or backup)
        key: String,
    },
    /// Set a value
    Set {
        /// Config key (origin or backup)
        key: String,
        /// New value
        value: String,
    },
    /// Show the config file location
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Start { foreground } => cmd::start::run(cli.config, foreground).await,
        Commands::Stop => cmd::stop::run(cli.config).await,
        Commands::Sync => cmd::sync::run(cli.config).await,
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::List => cmd::config::run_list(cli.config),
            ConfigCommands::Get { key } => cmd::config::run_get(cli.config, &key),
            ConfigCommands::Set { key, value } => cmd::config::run_set(cli.config, &key, &value),
            ConfigCommands::Path => cmd::config::run_path(cli.config),
        },
    }
}
