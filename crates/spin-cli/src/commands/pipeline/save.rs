use std::path::Path;

use serde_json::Value;

use crate::cli::GlobalFlags;
use crate::commands::shared::gate_errors::GateResultExt;
use crate::commands::shared::input::require_document;
use crate::commands::shared::require::{require_fields, string_field};
use crate::context::AppContext;
use crate::output::info;

pub async fn run(file: Option<&Path>, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut pipeline = require_document(file)?;
    require_fields(&pipeline, "pipeline", &["name", "application"])?;

    if string_field(&pipeline, "id").is_none() {
        let application = string_field(&pipeline, "application").unwrap_or_default();
        let name = string_field(&pipeline, "name").unwrap_or_default();
        let existing = match ctx.gate.get_pipeline_config(application, name).await {
            Ok(existing) => Some(existing),
            Err(error) if error.is_not_found() => None,
            Err(error) => return Err(error).gate_context("getting pipeline"),
        };
        adopt_existing_id(&mut pipeline, existing.as_ref());
    }

    ctx.gate
        .save_pipeline(&pipeline)
        .await
        .gate_context("saving pipeline")?;
    info("Pipeline save succeeded", flags);
    Ok(())
}

/// Reuse the id of an existing pipeline with the same name, so the save
/// updates it instead of creating a duplicate.
fn adopt_existing_id(pipeline: &mut Value, existing: Option<&Value>) {
    let Some(id) = existing.and_then(|existing| string_field(existing, "id")) else {
        return;
    };
    tracing::debug!(id, "updating existing pipeline");
    if let Some(map) = pipeline.as_object_mut() {
        map.insert("id".into(), Value::String(id.to_string()));
    }
}
