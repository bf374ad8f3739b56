//! Handler for `schedule generate`.

use crate::adapter::inbound::cli::command::ScheduleGenerateArgs;
use crate::adapter::inbound::cli::{load_config, output};
use crate::domain::{BusinessId, ScheduleId};
use crate::error::Result;
use crate::infrastructure::bootstrap;

pub async fn execute_generate(args: &ScheduleGenerateArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    let store = bootstrap::open_store(&config)?;
    let services = bootstrap::services(&config, store)?;
    let created = services
        .scheduling
        .generate(
            &BusinessId::from(args.business.as_str()),
            &ScheduleId::from(args.schedule.as_str()),
            args.from,
            args.to,
        )
        .await?;

    output::json(&created)?;
    output::section("Classes Generated");
    output::field("Window", format!("{} to {}", args.from, args.to));
    output::field("Created", created.len());
    for class in &created {
        output::note(&format!("{}  {}", class.scheduled_at.to_rfc3339(), class.id));
    }
    Ok(())
}
