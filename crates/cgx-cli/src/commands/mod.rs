//! CLI commands module
//!
//! This module contains all CLI command implementations.

pub mod config;
pub mod course;
pub mod doctor;
pub mod export;
pub mod push;
pub mod user;

use anyhow::{Context, Result};
use cgx_core::config::Config;
use cgx_storage::FileSystemStore;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default configuration file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = ".cgx/config.toml";

/// cgx - export authored courses into git repositories
#[derive(Debug, Parser)]
#[command(name = "cgx")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the export working copies
    #[arg(long, global = true, env = "CGX_EXPORT_DIR")]
    pub export_dir: Option<PathBuf>,

    /// Directory holding stored courses and users
    #[arg(long, global = true, env = "CGX_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Export a course into a git repository and push it
    Export(export::ExportArgs),

    /// Show or trigger the push-to-LMS page for a course
    Push(push::PushArgs),

    /// Manage stored courses
    #[command(subcommand)]
    Course(course::CourseCommand),

    /// Manage user accounts
    #[command(subcommand)]
    User(user::UserCommand),

    /// Manage configuration
    #[command(subcommand)]
    Config(config::ConfigCommand),

    /// Diagnose git, export root and storage
    Doctor(doctor::DoctorArgs),
}

/// Configuration in effect for this run
#[derive(Debug, Clone)]
pub struct Settings {
    pub config: Config,
    /// File the configuration was read from, if any
    pub source: Option<PathBuf>,
    /// File `config init` writes to
    pub path: PathBuf,
}

impl Settings {
    /// Open the course store configured for this run
    pub fn open_store(&self) -> Result<FileSystemStore> {
        let store = match &self.config.storage.data_dir {
            Some(dir) => FileSystemStore::new(dir),
            None => FileSystemStore::default_location(),
        };
        store.context("Failed to open course store")
    }

    pub fn data_dir(&self) -> PathBuf {
        self.config
            .storage
            .data_dir
            .clone()
            .unwrap_or_else(FileSystemStore::default_dir)
    }
}

/// Run the CLI application
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    setup_logging(cli.verbose);

    // Handle color output
    if cli.no_color {
        colored::control::set_override(false);
    }

    let settings = load_settings(&cli)?;

    // Dispatch to command handler
    match cli.command {
        Commands::Export(args) => export::execute(args, &settings),
        Commands::Push(args) => push::execute(args, &settings),
        Commands::Course(cmd) => course::execute(cmd, &settings),
        Commands::User(cmd) => user::execute(cmd, &settings),
        Commands::Config(cmd) => config::execute(cmd, &settings),
        Commands::Doctor(args) => doctor::execute(args, &settings),
    }
}

/// Read the config file, then apply flag and environment overrides
fn load_settings(cli: &Cli) -> Result<Settings> {
    let path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let (mut config, source) = if path.exists() {
        (read_config(&path)?, Some(path.clone()))
    } else if cli.config.is_some() {
        anyhow::bail!("Configuration file {} not found", path.display());
    } else {
        (Config::default(), None)
    };

    if let Some(dir) = &cli.export_dir {
        config.export.repo_export_dir = dir.clone();
    }
    if let Some(dir) = &cli.data_dir {
        config.storage.data_dir = Some(dir.clone());
    }

    debug!("Export root: {}", config.export.repo_export_dir.display());
    Ok(Settings {
        config,
        source,
        path,
    })
}

fn read_config(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Invalid configuration in {}", path.display()))
}

fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
