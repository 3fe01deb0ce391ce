use anyhow::bail;
use serde_json::Value;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::TemplateSaveArgs;
use crate::commands::shared::gate_errors::GateResultExt;
use crate::commands::shared::input::require_document;
use crate::commands::shared::require::{require_fields, string_field};
use crate::commands::shared::task::wait_for_task;
use crate::context::AppContext;
use crate::output::info;

pub async fn run(
    args: &TemplateSaveArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let template = require_document(args.input.file.as_deref())?;
    validate(&template)?;
    let id = string_field(&template, "id").unwrap_or_default();
    let tag = args.tag.as_deref();

    let exists = match ctx.gate.get_pipeline_template(id, tag, None).await {
        Ok(_) => true,
        Err(error) if error.is_not_found() => false,
        Err(error) => return Err(error).gate_context("getting pipeline template"),
    };

    let task = if exists {
        ctx.gate
            .update_pipeline_template(id, &template, tag, args.skip_plan_dependents)
            .await
            .gate_context("updating pipeline template")?
    } else {
        ctx.gate
            .create_pipeline_template(&template, tag)
            .await
            .gate_context("creating pipeline template")?
    };
    wait_for_task(ctx, &task, "Pipeline template save").await?;

    info("Pipeline template save succeeded", flags);
    Ok(())
}

fn validate(template: &Value) -> anyhow::Result<()> {
    require_fields(template, "pipeline template", &["id"])?;
    match string_field(template, "schema") {
        Some("v2") => Ok(()),
        Some(other) => bail!("Pipeline template schema must be 'v2', found '{other}'"),
        None => bail!("Required pipeline template parameter 'schema' missing"),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn v2_templates_pass() {
        assert!(validate(&json!({"id": "base", "schema": "v2"})).is_ok());
    }

    #[test]
    fn v1_schema_is_rejected() {
        let err = validate(&json!({"id": "base", "schema": "1"})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Pipeline template schema must be 'v2', found '1'"
        );
    }

    #[test]
    fn id_is_required() {
        let err = validate(&json!({"schema": "v2"})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Required pipeline template parameter 'id' missing"
        );
    }
}
