//! Handler for the `serve` command.

use tracing::info;

use crate::adapter::inbound::cli::command::ConfigPathArg;
use crate::adapter::inbound::cli::load_config;
use crate::error::Result;
use crate::infrastructure::bootstrap;

/// Execute the serve command.
pub async fn execute(args: &ConfigPathArg) -> Result<()> {
    let config = load_config(args)?;
    config.init_logging();
    info!(version = env!("CARGO_PKG_VERSION"), "studiodesk starting");
    bootstrap::serve(config).await
}
