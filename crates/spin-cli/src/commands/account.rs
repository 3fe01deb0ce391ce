use crate::cli::GlobalFlags;
use crate::cli::subcommands::AccountCommands;
use crate::commands::shared::gate_errors::GateResultExt;
use crate::context::AppContext;
use crate::output::output;

/// Handle `spin account`.
pub async fn handle(
    action: &AccountCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let account = match action {
        AccountCommands::Get { name } => ctx
            .gate
            .get_account(name)
            .await
            .or_not_found("getting account", || format!("Account '{name}' not found"))?,
        AccountCommands::List { expand } => ctx
            .gate
            .list_accounts(*expand)
            .await
            .gate_context("listing accounts")?,
    };
    output(&account, flags)
}
