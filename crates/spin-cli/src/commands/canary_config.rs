use std::path::Path;

use serde_json::Value;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::CanaryConfigCommands;
use crate::commands::shared::gate_errors::GateResultExt;
use crate::commands::shared::input::require_document;
use crate::commands::shared::require::{require_fields, string_field};
use crate::context::AppContext;
use crate::output::{info, output};

/// Handle `spin canary-config`.
pub async fn handle(
    action: &CanaryConfigCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        CanaryConfigCommands::List { application } => {
            let configs = ctx
                .gate
                .list_canary_configs(application.as_deref())
                .await
                .gate_context("listing canary configs")?;
            output(&configs, flags)
        }
        CanaryConfigCommands::Get { id } => {
            let config = ctx
                .gate
                .get_canary_config(id)
                .await
                .or_not_found("getting canary config", || not_found(id))?;
            output(&config, flags)
        }
        CanaryConfigCommands::Save { input } => save(input.file.as_deref(), ctx, flags).await,
        CanaryConfigCommands::Delete { id } => {
            ctx.gate
                .delete_canary_config(id)
                .await
                .or_not_found("deleting canary config", || not_found(id))?;
            info(&format!("Canary config '{id}' deleted"), flags);
            Ok(())
        }
    }
}

fn not_found(id: &str) -> String {
    format!("Canary config '{id}' not found")
}

/// Update in place when the config carries an id Gate knows, else create.
async fn save(file: Option<&Path>, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let config = require_document(file)?;
    require_fields(&config, "canary config", &["name"])?;

    let existing_id = match string_field(&config, "id") {
        Some(id) => match ctx.gate.get_canary_config(id).await {
            Ok(_) => Some(id),
            Err(error) if error.is_not_found() => None,
            Err(error) => return Err(error).gate_context("getting canary config"),
        },
        None => None,
    };

    let saved: Value = match existing_id {
        Some(id) => ctx
            .gate
            .update_canary_config(id, &config)
            .await
            .gate_context("updating canary config")?,
        None => ctx
            .gate
            .create_canary_config(&config)
            .await
            .gate_context("creating canary config")?,
    };

    output(&saved, flags)?;
    info("Canary config save succeeded", flags);
    Ok(())
}
