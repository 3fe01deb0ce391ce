mod delete;
mod get;
mod save;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ApplicationCommands;
use crate::commands::shared::gate_errors::GateResultExt;
use crate::context::AppContext;
use crate::output::output;

/// Handle `spin application`.
pub async fn handle(
    action: &ApplicationCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ApplicationCommands::Get { name, expand } => get::run(name, *expand, ctx, flags).await,
        ApplicationCommands::List { expand } => {
            let apps = ctx
                .gate
                .list_applications(*expand)
                .await
                .gate_context("listing applications")?;
            output(&apps, flags)
        }
        ApplicationCommands::Save(args) => save::run(args, ctx, flags).await,
        ApplicationCommands::Delete { name } => delete::run(name, ctx, flags).await,
    }
}

fn not_found(name: &str) -> String {
    format!("Application '{name}' not found")
}
