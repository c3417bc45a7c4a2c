//! Configuration management command
//!
//! View and edit the two tree roots the mirror runs between.

use crate::config_store;
use anyhow::Result;
use owo_colors::OwoColorize;
use std::path::PathBuf;

/// List all configuration values
pub fn run_list(config_override: Option<PathBuf>) -> Result<()> {
    let config_path = config_store::resolve(config_override)?;
    let config = config_store::load(&config_path)?;

    println!("{}", "Keepsake Configuration".bold());
    println!("{}: {}\n", "Location".dimmed(), config_path.display().dimmed());

    println!(
        "  {} = {}",
        "origin".cyan(),
        display_value(&config.origin)
    );
    println!(
        "  {} = {}",
        "backup".cyan(),
        display_value(&config.backup)
    );

    if config.validate().is_err() {
        println!(
            "\n{}",
            "Both keys must be set before 'ks start' will run.".yellow()
        );
    }

    Ok(())
}

/// Print a single configuration value
pub fn run_get(config_override: Option<PathBuf>, key: &str) -> Result<()> {
    let config_path = config_store::resolve(config_override)?;
    let config = config_store::load(&config_path)?;

    let value = match key {
        "origin" => config.origin,
        "backup" => config.backup,
        _ => anyhow::bail!(
            "Unknown config key: {}. Valid keys: origin, backup",
            key
        ),
    };

    println!("{}", value);
    Ok(())
}

/// Set a configuration value
pub fn run_set(config_override: Option<PathBuf>, key: &str, value: &str) -> Result<()> {
    let config_path = config_store::resolve(config_override)?;
    let mut config = config_store::load(&config_path)?;

    match key {
        "origin" => config.origin = value.to_string(),
        "backup" => config.backup = value.to_string(),
        _ => anyhow::bail!(
            "Unknown config key: {}. Valid keys: origin, backup",
            key
        ),
    }

    config_store::save(&config, &config_path)?;

    println!("{} {} = {}", "✓".green(), key.cyan(), value);
    if config.validate().is_ok() {
        println!("Configuration complete. Run 'ks start' to begin mirroring.");
    }
    Ok(())
}

/// Show the config file location
pub fn run_path(config_override: Option<PathBuf>) -> Result<()> {
    let config_path = config_store::resolve(config_override)?;
    println!("{}", config_path.display());
    if !config_path.exists() {
        println!("{}", "File does not exist yet; 'ks config set' creates it.".yellow());
    }
    Ok(())
}

fn display_value(value: &str) -> String {
    if value.is_empty() {
        "(unset)".to_string()
    } else {
        value.to_string()
    }
}
