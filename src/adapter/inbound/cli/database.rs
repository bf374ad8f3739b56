//! Handlers for `migrate` and `sweep`.

use serde_json::json;

use crate::adapter::inbound::cli::command::ConfigPathArg;
use crate::adapter::inbound::cli::{load_config, output};
use crate::adapter::outbound::sqlite::{create_pool, run_migrations};
use crate::error::Result;
use crate::infrastructure::bootstrap;

/// Apply pending migrations.
pub fn execute_migrate(args: &ConfigPathArg) -> Result<()> {
    let config = load_config(args)?;
    let pool = create_pool(&config.database)?;
    let applied = run_migrations(&pool)?;

    output::json(&json!({ "database": config.database, "applied": applied }))?;
    output::section("Migrations");
    output::field("Database", &config.database);
    if applied == 0 {
        output::success("Schema is up to date");
    } else {
        output::success(&format!("Applied {applied} migration(s)"));
    }
    Ok(())
}

/// Mark every overdue active package as expired.
pub async fn execute_sweep(args: &ConfigPathArg) -> Result<()> {
    let config = load_config(args)?;
    let store = bootstrap::open_store(&config)?;
    let services = bootstrap::services(&config, store)?;
    let expired = services.packages.expire_overdue().await?;

    output::json(&json!({ "expired": expired }))?;
    output::section("Expiration Sweep");
    output::field("Expired", expired);
    Ok(())
}
