use serde_json::json;
use spin_gate::task_request;

use crate::cli::GlobalFlags;
use crate::commands::shared::gate_errors::GateResultExt;
use crate::commands::shared::task::wait_for_task;
use crate::context::AppContext;
use crate::output::info;

pub async fn run(name: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.gate
        .get_application(name, false)
        .await
        .or_not_found("getting application", || {
            format!("Attempted to delete non-existent application '{name}'")
        })?;

    let task = task_request(
        name,
        &format!("Delete Application: {name}"),
        json!({"type": "deleteApplication", "application": {"name": name}}),
    );
    let task_ref = ctx
        .gate
        .submit_task(&task)
        .await
        .gate_context("deleting application")?;
    wait_for_task(ctx, &task_ref, "Application delete").await?;

    info(&format!("Application '{name}' deleted"), flags);
    Ok(())
}
