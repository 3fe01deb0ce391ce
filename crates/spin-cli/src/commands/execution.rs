use spin_gate::ExecutionQuery;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{ExecutionCommands, ExecutionListArgs};
use crate::commands::shared::gate_errors::GateResultExt;
use crate::context::AppContext;
use crate::output::{info, output};

/// Handle `spin execution`.
pub async fn handle(
    action: &ExecutionCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ExecutionCommands::List(args) => {
            let executions = ctx
                .gate
                .list_executions(&query(args))
                .await
                .gate_context("listing executions")?;
            output(&executions, flags)
        }
        ExecutionCommands::Get { id } => {
            let execution = ctx
                .gate
                .get_execution(id)
                .await
                .or_not_found("getting execution", || not_found(id))?;
            output(&execution, flags)
        }
        ExecutionCommands::Cancel { id, reason } => {
            ctx.gate
                .cancel_execution(id, reason.as_deref())
                .await
                .or_not_found("canceling execution", || not_found(id))?;
            info(&format!("Execution {id} canceled"), flags);
            Ok(())
        }
        ExecutionCommands::Pause { id } => {
            ctx.gate
                .pause_execution(id)
                .await
                .or_not_found("pausing execution", || not_found(id))?;
            info(&format!("Execution {id} paused"), flags);
            Ok(())
        }
        ExecutionCommands::Resume { id } => {
            ctx.gate
                .resume_execution(id)
                .await
                .or_not_found("resuming execution", || not_found(id))?;
            info(&format!("Execution {id} resumed"), flags);
            Ok(())
        }
    }
}

fn not_found(id: &str) -> String {
    format!("Execution '{id}' not found")
}

/// Status flags map to orca statuses; none selected means all.
fn query(args: &ExecutionListArgs) -> ExecutionQuery {
    let statuses = [
        (args.running, "RUNNING"),
        (args.succeeded, "SUCCEEDED"),
        (args.failed, "TERMINAL"),
        (args.canceled, "CANCELED"),
    ]
    .into_iter()
    .filter(|(selected, _)| *selected)
    .map(|(_, status)| status.to_string())
    .collect();

    ExecutionQuery {
        pipeline_config_ids: args.pipeline_ids.clone(),
        limit: args.limit,
        statuses,
    }
}
