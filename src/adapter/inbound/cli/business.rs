//! Handlers for the `business` command group.

use crate::adapter::inbound::cli::command::{BusinessCreateArgs, ConfigPathArg};
use crate::adapter::inbound::cli::{load_config, output};
use crate::application::Services;
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::settings::Config;

fn open(config: &Config) -> Result<Services> {
    let store = bootstrap::open_store(config)?;
    bootstrap::services(config, store)
}

pub async fn execute_create(args: &BusinessCreateArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    let business = open(&config)?.catalog.create_business(&args.name).await?;

    output::json(&business)?;
    output::section("Business Created");
    output::field("Name", &business.name);
    output::field("ID", &business.id);
    Ok(())
}

pub async fn execute_list(args: &ConfigPathArg) -> Result<()> {
    let config = load_config(args)?;
    let businesses = open(&config)?.catalog.list_businesses().await?;

    output::json(&businesses)?;
    output::section("Businesses");
    if businesses.is_empty() {
        output::note("(none)");
    }
    for business in &businesses {
        output::field(&business.name, &business.id);
    }
    Ok(())
}
