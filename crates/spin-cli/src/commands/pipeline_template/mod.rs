mod save;
pub mod use_template;

use spin_gate::TaskRef;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::PipelineTemplateCommands;
use crate::commands::shared::gate_errors::GateResultExt;
use crate::commands::shared::input::require_document;
use crate::commands::shared::task::wait_for_task;
use crate::context::AppContext;
use crate::output::{info, output};

/// Handle `spin pipeline-template`.
pub async fn handle(
    action: &PipelineTemplateCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        PipelineTemplateCommands::List { scopes } => {
            let templates = ctx
                .gate
                .list_pipeline_templates(scopes)
                .await
                .gate_context("listing pipeline templates")?;
            output(&templates, flags)
        }
        PipelineTemplateCommands::Get { id, tag, digest } => {
            let template = ctx
                .gate
                .get_pipeline_template(id, tag.as_deref(), digest.as_deref())
                .await
                .or_not_found("getting pipeline template", || not_found(id))?;
            output(&template, flags)
        }
        PipelineTemplateCommands::Save(args) => save::run(args, ctx, flags).await,
        PipelineTemplateCommands::Delete { id, tag, digest } => {
            let response = ctx
                .gate
                .delete_pipeline_template(id, tag.as_deref(), digest.as_deref())
                .await
                .or_not_found("deleting pipeline template", || not_found(id))?;
            if let Ok(task) = TaskRef::from_response(&response) {
                wait_for_task(ctx, &task, "Pipeline template delete").await?;
            }
            info(&format!("Pipeline template '{id}' deleted"), flags);
            Ok(())
        }
        PipelineTemplateCommands::Plan { input } => {
            let config = require_document(input.file.as_deref())?;
            let planned = ctx
                .gate
                .plan_pipeline_template(&config)
                .await
                .gate_context("planning pipeline template")?;
            output(&planned, flags)
        }
        PipelineTemplateCommands::Use(args) => use_template::run(args, flags),
    }
}

fn not_found(id: &str) -> String {
    format!("Pipeline template '{id}' not found")
}
