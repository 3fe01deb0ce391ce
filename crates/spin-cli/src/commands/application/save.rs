use serde_json::{Value, json};
use spin_gate::task_request;

use super::not_found;
use crate::cli::GlobalFlags;
use crate::cli::subcommands::ApplicationSaveArgs;
use crate::commands::shared::gate_errors::GateResultExt;
use crate::commands::shared::input::read_document;
use crate::commands::shared::require::{require_fields, string_field};
use crate::commands::shared::task::wait_for_task;
use crate::context::AppContext;
use crate::output::info;

pub async fn run(
    args: &ApplicationSaveArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let document = read_document(args.input.file.as_deref())?.unwrap_or_else(|| json!({}));
    let application = build_application(document, args)?;
    let name = string_field(&application, "name").unwrap_or_default().to_string();

    let task = task_request(
        &name,
        &format!("Create Application: {name}"),
        json!({"type": "createApplication", "application": application}),
    );
    let task_ref = ctx
        .gate
        .submit_task(&task)
        .await
        .gate_context("saving application")?;
    wait_for_task(ctx, &task_ref, "Application save").await?;

    ctx.gate
        .get_application(&name, false)
        .await
        .or_not_found("confirming application save", || not_found(&name))?;
    info("Application save succeeded", flags);
    Ok(())
}

/// Apply flag overrides and check the required fields.
fn build_application(mut document: Value, args: &ApplicationSaveArgs) -> anyhow::Result<Value> {
    if let Some(map) = document.as_object_mut() {
        if let Some(name) = &args.application_name {
            map.insert("name".into(), Value::String(name.clone()));
        }
        if let Some(email) = &args.owner_email {
            map.insert("email".into(), Value::String(email.clone()));
        }
        if !args.cloud_providers.is_empty() {
            map.insert(
                "cloudProviders".into(),
                Value::String(args.cloud_providers.join(",")),
            );
        }
    }
    require_fields(&document, "application", &["name", "email"])?;
    Ok(document)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::cli::subcommands::InputArgs;

    fn args() -> ApplicationSaveArgs {
        ApplicationSaveArgs {
            input: InputArgs::default(),
            application_name: None,
            owner_email: None,
            cloud_providers: Vec::new(),
        }
    }

    #[test]
    fn flags_override_document() {
        let args = ApplicationSaveArgs {
            application_name: Some("checkout".into()),
            owner_email: Some("team@example.com".into()),
            cloud_providers: vec!["kubernetes".into(), "aws".into()],
            ..args()
        };
        let app = build_application(json!({"name": "old", "description": "d"}), &args).unwrap();
        assert_eq!(
            app,
            json!({
                "name": "checkout",
                "email": "team@example.com",
                "cloudProviders": "kubernetes,aws",
                "description": "d"
            })
        );
    }

    #[test]
    fn missing_email_is_rejected() {
        let err = build_application(json!({"name": "checkout"}), &args()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Required application parameter 'email' missing"
        );
    }

    #[test]
    fn missing_name_is_reported_first() {
        let err = build_application(json!({}), &args()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Required application parameter 'name' missing"
        );
    }
}
