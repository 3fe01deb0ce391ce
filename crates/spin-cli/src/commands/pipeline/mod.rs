mod execute;
mod save;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::PipelineCommands;
use crate::commands::shared::gate_errors::GateResultExt;
use crate::context::AppContext;
use crate::output::{info, output};

/// Handle `spin pipeline`.
pub async fn handle(
    action: &PipelineCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        PipelineCommands::List { application } => {
            let pipelines = ctx
                .gate
                .list_pipeline_configs(application)
                .await
                .or_not_found("listing pipelines", || {
                    format!("Application '{application}' not found")
                })?;
            output(&pipelines, flags)
        }
        PipelineCommands::Get { application, name } => {
            let pipeline = ctx
                .gate
                .get_pipeline_config(application, name)
                .await
                .or_not_found("getting pipeline", || not_found(application, name))?;
            output(&pipeline, flags)
        }
        PipelineCommands::Save { input } => save::run(input.file.as_deref(), ctx, flags).await,
        PipelineCommands::Delete { application, name } => {
            ctx.gate
                .delete_pipeline(application, name)
                .await
                .or_not_found("deleting pipeline", || not_found(application, name))?;
            info(&format!("Pipeline '{name}' deleted"), flags);
            Ok(())
        }
        PipelineCommands::Execute(args) => execute::run(args, ctx, flags).await,
    }
}

fn not_found(application: &str, name: &str) -> String {
    format!("Pipeline '{name}' not found in application '{application}'")
}
