use anyhow::Context;
use serde_json::{Value, json};
use spin_gate::task_request;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{ProjectCommands, ProjectSaveArgs};
use crate::commands::shared::gate_errors::GateResultExt;
use crate::commands::shared::input::read_document;
use crate::commands::shared::require::{require_fields, string_field};
use crate::commands::shared::task::wait_for_task;
use crate::context::AppContext;
use crate::output::{info, output};

/// Project tasks run on behalf of this application.
const TASK_APPLICATION: &str = "spinnaker";

/// Handle `spin project`.
pub async fn handle(
    action: &ProjectCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ProjectCommands::List => {
            let projects = ctx
                .gate
                .list_projects()
                .await
                .gate_context("listing projects")?;
            output(&projects, flags)
        }
        ProjectCommands::Get { name } => {
            let project = ctx
                .gate
                .get_project(name)
                .await
                .or_not_found("getting project", || not_found(name))?;
            output(&project, flags)
        }
        ProjectCommands::GetPipelines { name, limit } => {
            let pipelines = ctx
                .gate
                .get_project_pipelines(name, *limit)
                .await
                .or_not_found("getting project pipelines", || not_found(name))?;
            output(&pipelines, flags)
        }
        ProjectCommands::Save(args) => save(args, ctx, flags).await,
        ProjectCommands::Delete { name } => delete(name, ctx, flags).await,
    }
}

fn not_found(name: &str) -> String {
    format!("Project '{name}' not found")
}

async fn save(args: &ProjectSaveArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let document = read_document(args.input.file.as_deref())?.unwrap_or_else(|| json!({}));
    let project = build_project(document, args)?;
    let name = string_field(&project, "name").unwrap_or_default().to_string();

    let task = task_request(
        TASK_APPLICATION,
        &format!("Save Project: {name}"),
        json!({"type": "upsertProject", "project": project}),
    );
    let task_ref = ctx
        .gate
        .submit_task(&task)
        .await
        .gate_context("saving project")?;
    wait_for_task(ctx, &task_ref, "Project save").await?;

    info("Project save succeeded", flags);
    Ok(())
}

fn build_project(mut document: Value, args: &ProjectSaveArgs) -> anyhow::Result<Value> {
    if let Some(map) = document.as_object_mut() {
        if let Some(name) = &args.name {
            map.insert("name".into(), Value::String(name.clone()));
        }
        if let Some(email) = &args.email {
            map.insert("email".into(), Value::String(email.clone()));
        }
    }
    require_fields(&document, "project", &["name", "email"])?;
    Ok(document)
}

async fn delete(name: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let project = ctx
        .gate
        .get_project(name)
        .await
        .or_not_found("getting project", || not_found(name))?;
    let id = project
        .get("id")
        .cloned()
        .filter(|id| !id.is_null())
        .with_context(|| format!("Project '{name}' has no id"))?;

    let task = task_request(
        TASK_APPLICATION,
        &format!("Delete Project: {name}"),
        json!({"type": "deleteProject", "project": {"id": id}}),
    );
    let task_ref = ctx
        .gate
        .submit_task(&task)
        .await
        .gate_context("deleting project")?;
    wait_for_task(ctx, &task_ref, "Project delete").await?;

    info(&format!("Project '{name}' deleted"), flags);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::subcommands::InputArgs;

    #[test]
    fn flags_fill_project_fields() {
        let args = ProjectSaveArgs {
            input: InputArgs::default(),
            name: Some("storefront".into()),
            email: Some("team@example.com".into()),
        };
        let project = build_project(json!({"config": {"applications": ["checkout"]}}), &args)
            .expect("should build");
        assert_eq!(project["name"], "storefront");
        assert_eq!(project["config"]["applications"][0], "checkout");
    }

    #[test]
    fn missing_email_is_rejected() {
        let args = ProjectSaveArgs {
            input: InputArgs::default(),
            name: Some("storefront".into()),
            email: None,
        };
        let err = build_project(json!({}), &args).unwrap_err();
        assert_eq!(err.to_string(), "Required project parameter 'email' missing");
    }
}
