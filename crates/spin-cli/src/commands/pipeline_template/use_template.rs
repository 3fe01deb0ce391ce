use anyhow::bail;
use serde_json::{Map, Value, json};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::TemplateUseArgs;
use crate::commands::shared::input::read_file_value;
use crate::output::output;

const ARTIFACT_ACCOUNT: &str = "front50ArtifactCredentials";
const TEMPLATE_TYPE: &str = "front50/pipelineTemplate";

/// Print a v2 templated pipeline config. No request is made.
pub fn run(args: &TemplateUseArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut variables = match &args.values_file {
        Some(path) => match read_file_value(path)? {
            Value::Object(map) => map,
            _ => bail!("{} must contain a map of variables", path.display()),
        },
        None => Map::new(),
    };
    for (key, value) in &args.set {
        variables.insert(key.clone(), Value::String(value.clone()));
    }
    output(&templated_config(args, variables), flags)
}

fn templated_config(args: &TemplateUseArgs, variables: Map<String, Value>) -> Value {
    let reference = match &args.tag {
        Some(tag) => format!("spinnaker://{}:{tag}", args.id),
        None => format!("spinnaker://{}", args.id),
    };
    json!({
        "schema": "v2",
        "application": args.application,
        "name": args.name,
        "description": args.description.clone().unwrap_or_default(),
        "template": {
            "artifactAccount": ARTIFACT_ACCOUNT,
            "reference": reference,
            "type": TEMPLATE_TYPE,
        },
        "variables": variables,
        "exclude": [],
        "triggers": [],
        "parameters": [],
        "notifications": [],
        "stages": [],
    })
}
