use anyhow::bail;
use serde_json::{Map, Value, json};
use spin_gate::TaskRef;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::PipelineExecuteArgs;
use crate::commands::shared::gate_errors::GateResultExt;
use crate::commands::shared::input::read_file_value;
use crate::context::AppContext;
use crate::output::{info, output};

pub async fn run(
    args: &PipelineExecuteArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let file_parameters = match &args.parameter_file {
        Some(path) => match read_file_value(path)? {
            Value::Object(map) => map,
            _ => bail!("{} must contain a map of parameters", path.display()),
        },
        None => Map::new(),
    };
    let artifacts = match &args.artifacts_file {
        Some(path) => artifacts_from(read_file_value(path)?)?,
        None => Vec::new(),
    };
    let trigger = build_trigger(file_parameters, &args.parameters, artifacts);

    let response = ctx
        .gate
        .invoke_pipeline(&args.application, &args.name, &trigger)
        .await
        .or_not_found("executing pipeline", || {
            format!(
                "Pipeline '{}' not found in application '{}'",
                args.name, args.application
            )
        })?;

    output(&response, flags)?;
    if let Some(reference) = response.get("ref").and_then(Value::as_str) {
        let id = TaskRef::new(reference);
        info(&format!("Pipeline execution started: {}", id.id()), flags);
    }
    Ok(())
}

fn build_trigger(
    mut parameters: Map<String, Value>,
    overrides: &[(String, String)],
    artifacts: Vec<Value>,
) -> Value {
    for (key, value) in overrides {
        parameters.insert(key.clone(), Value::String(value.clone()));
    }
    json!({
        "type": "manual",
        "parameters": parameters,
        "artifacts": artifacts,
    })
}

/// An artifacts file holds either `{"artifacts": [...]}` or the list itself.
fn artifacts_from(document: Value) -> anyhow::Result<Vec<Value>> {
    match document {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => match map.remove("artifacts") {
            Some(Value::Array(items)) => Ok(items),
            _ => bail!("artifacts file must contain an 'artifacts' list"),
        },
        _ => bail!("artifacts file must contain an 'artifacts' list"),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn flag_parameters_override_file_parameters() {
        let trigger = build_trigger(
            json!({"version": "1.0", "region": "eu"})
                .as_object()
                .cloned()
                .unwrap(),
            &[("version".into(), "2.0".into())],
            Vec::new(),
        );
        assert_eq!(
            trigger,
            json!({
                "type": "manual",
                "parameters": {"version": "2.0", "region": "eu"},
                "artifacts": []
            })
        );
    }

    #[test]
    fn artifacts_file_shapes() {
        let artifact = json!({"type": "docker/image", "reference": "app:1"});
        assert_eq!(
            artifacts_from(json!({"artifacts": [artifact.clone()]})).unwrap(),
            vec![artifact.clone()]
        );
        assert_eq!(
            artifacts_from(json!([artifact.clone()])).unwrap(),
            vec![artifact]
        );
        assert!(artifacts_from(json!({"other": 1})).is_err());
    }
}
