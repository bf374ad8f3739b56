//! Handler for `check config`.

use serde_json::json;

use crate::adapter::inbound::cli::command::ConfigPathArg;
use crate::adapter::inbound::cli::{load_config, output, DEFAULT_CONFIG_FILE};
use crate::adapter::outbound::identity::SERVICE_ROLE_KEY_ENV;
use crate::error::Result;
use crate::infrastructure::config::service::IdentityProviderKind;

/// Validate configuration without starting the server.
pub fn execute_config(args: &ConfigPathArg) -> Result<()> {
    let config = load_config(args)?;
    let source = args
        .config
        .as_ref()
        .map_or_else(|| DEFAULT_CONFIG_FILE.to_string(), |p| p.display().to_string());
    let hosted = config.identity.provider == IdentityProviderKind::Hosted;
    let service_key_present = std::env::var(SERVICE_ROLE_KEY_ENV).is_ok_and(|k| !k.is_empty());

    output::json(&json!({
        "valid": true,
        "database": config.database,
        "bind": config.server.bind,
        "identity_provider": if hosted { "hosted" } else { "local" },
        "service_key_present": service_key_present,
        "admin_token_present": config.admin_token.is_some(),
        "sweep_interval_secs": config.sweep.interval_secs,
    }))?;

    output::section("Configuration Check");
    output::field("Config", source);
    output::success("Configuration is valid");

    output::section("Summary");
    output::field("Database", &config.database);
    output::field("Bind", &config.server.bind);
    output::field("Log level", &config.logging.level);
    output::field(
        "Check-in lead",
        format!("{} min", config.attendance.check_in_lead_minutes),
    );
    match config.sweep.interval() {
        Some(every) => output::field("Sweep", format!("every {}s", every.as_secs())),
        None => output::field("Sweep", "disabled"),
    }

    if hosted {
        output::field("Identity", config.identity.url.as_deref().unwrap_or_default());
        if service_key_present {
            output::success("Service role key detected");
        } else {
            output::warning(&format!("{SERVICE_ROLE_KEY_ENV} is not set"));
        }
    } else {
        output::field("Identity", "local (development only)");
    }

    if config.admin_token.is_some() {
        output::success("Admin token configured");
    } else {
        output::warning("STUDIODESK_ADMIN_TOKEN is not set; admin endpoints are open");
    }
    Ok(())
}
