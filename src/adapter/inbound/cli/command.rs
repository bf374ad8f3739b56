//! Command-line interface definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Dance studio management service.
#[derive(Parser, Debug)]
#[command(name = "studiodesk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP API (foreground)
    Serve(ConfigPathArg),

    /// Apply pending database migrations
    Migrate(ConfigPathArg),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),

    /// Manage studios
    #[command(subcommand)]
    Business(BusinessCommand),

    /// Expire overdue packages once
    Sweep(ConfigPathArg),

    /// Work with recurring schedules
    #[command(subcommand)]
    Schedule(ScheduleCommand),
}

/// Subcommands for `studiodesk check`
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate configuration file
    Config(ConfigPathArg),
}

/// Subcommands for `studiodesk business`
#[derive(Subcommand, Debug)]
pub enum BusinessCommand {
    /// Register a new studio
    Create(BusinessCreateArgs),
    /// List studios
    List(ConfigPathArg),
}

/// Subcommands for `studiodesk schedule`
#[derive(Subcommand, Debug)]
pub enum ScheduleCommand {
    /// Create the classes of a schedule between two dates
    Generate(ScheduleGenerateArgs),
}

/// Shared argument for commands that only need a config path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to configuration file. Without it `config.toml` is used when
    /// present, otherwise built-in defaults.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct BusinessCreateArgs {
    /// Studio name
    pub name: String,

    #[command(flatten)]
    pub config: ConfigPathArg,
}

#[derive(Parser, Debug)]
pub struct ScheduleGenerateArgs {
    /// Owning studio
    #[arg(long)]
    pub business: String,

    /// Recurring schedule id
    #[arg(long)]
    pub schedule: String,

    /// First date (YYYY-MM-DD), inclusive
    #[arg(long)]
    pub from: NaiveDate,

    /// Last date (YYYY-MM-DD), inclusive
    #[arg(long)]
    pub to: NaiveDate,

    #[command(flatten)]
    pub config: ConfigPathArg,
}
