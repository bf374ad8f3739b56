//! CLI module graph and dispatch.

pub mod business;
pub mod check;
pub mod command;
pub mod database;
pub mod output;
pub mod run;
pub mod schedule;

use std::path::Path;

use command::{BusinessCommand, CheckCommand, Cli, Commands, ConfigPathArg, ScheduleCommand};

use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Load the configuration named by `arg`, falling back to
/// [`DEFAULT_CONFIG_FILE`] and then to built-in defaults.
pub fn load_config(arg: &ConfigPathArg) -> Result<Config> {
    match &arg.config {
        Some(path) => Config::load(path),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => Config::load(DEFAULT_CONFIG_FILE),
        None => Config::parse_toml(""),
    }
}

/// Run the selected subcommand.
pub async fn execute(cli: Cli) -> Result<()> {
    output::set_json(cli.json);
    match cli.command {
        Commands::Serve(args) => run::execute(&args).await,
        Commands::Migrate(args) => database::execute_migrate(&args),
        Commands::Check(CheckCommand::Config(args)) => check::execute_config(&args),
        Commands::Business(BusinessCommand::Create(args)) => business::execute_create(&args).await,
        Commands::Business(BusinessCommand::List(args)) => business::execute_list(&args).await,
        Commands::Sweep(args) => database::execute_sweep(&args).await,
        Commands::Schedule(ScheduleCommand::Generate(args)) => {
            schedule::execute_generate(&args).await
        }
    }
}
