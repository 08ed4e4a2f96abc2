//! Config command
//!
//! Manage cgx configuration.

use anyhow::{Context, Result};
use clap::Subcommand;
use std::fs;
use std::path::Path;

use super::Settings;
use cgx_core::config::Config;

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show {
        /// Show as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the default configuration file
    Init {
        /// Overwrite without confirmation
        #[arg(long)]
        force: bool,
    },
}

/// Execute the config command
pub fn execute(cmd: ConfigCommand, settings: &Settings) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => show_config(settings, json),
        ConfigCommand::Init { force } => init_config(&settings.path, force),
    }
}

fn show_config(settings: &Settings, as_json: bool) -> Result<()> {
    use colored::Colorize;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&settings.config)?);
        return Ok(());
    }

    println!("{}", "Configuration:".bold().underline());
    match &settings.source {
        Some(path) => println!("{}", path.display().to_string().dimmed()),
        None => println!("{}", "(defaults, no configuration file)".dimmed()),
    }
    println!();
    println!("{}", toml::to_string_pretty(&settings.config)?);
    Ok(())
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    use colored::Colorize;

    if path.exists() {
        if !force {
            use dialoguer::Confirm;

            let confirmed = Confirm::new()
                .with_prompt(format!("Overwrite {}?", path.display()))
                .default(false)
                .interact()?;

            if !confirmed {
                println!("Init cancelled.");
                return Ok(());
            }
        }

        // Backup existing
        let backup_path = format!(
            "{}.backup-{}",
            path.display(),
            chrono::Local::now().format("%Y%m%d-%H%M%S")
        );
        fs::copy(path, &backup_path)?;
        println!("{} Backed up to {}", "✓".green(), backup_path);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, default_config_file()?)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("{} Wrote {}", "✓".green(), path.display());
    Ok(())
}

fn default_config_file() -> Result<String> {
    let body = toml::to_string_pretty(&Config::default())?;
    Ok(format!(
        "# cgx configuration\n#\n# [storage] data_dir defaults to the platform data directory.\n\n{}",
        body
    ))
}
