use std::path::PathBuf;

use clap::{Args, Subcommand};

use super::InputArgs;
use crate::commands::shared::kv::parse_key_value;

/// Managed pipeline template commands.
#[derive(Clone, Debug, Subcommand)]
pub enum PipelineTemplateCommands {
    /// List pipeline templates.
    List {
        /// Scopes to filter by, comma separated
        #[arg(long, value_delimiter = ',')]
        scopes: Vec<String>,
    },
    /// Get a pipeline template.
    Get {
        id: String,
        #[arg(long)]
        tag: Option<String>,
        #[arg(long)]
        digest: Option<String>,
    },
    /// Create or update a pipeline template.
    Save(TemplateSaveArgs),
    /// Delete a pipeline template.
    Delete {
        id: String,
        #[arg(long)]
        tag: Option<String>,
        #[arg(long)]
        digest: Option<String>,
    },
    /// Render a templated pipeline config without saving it.
    Plan {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Print a pipeline config that uses a template.
    Use(TemplateUseArgs),
}

#[derive(Clone, Debug, Args)]
pub struct TemplateSaveArgs {
    #[command(flatten)]
    pub input: InputArgs,
    #[arg(long)]
    pub tag: Option<String>,
    /// Do not re-plan pipelines that depend on this template
    #[arg(long)]
    pub skip_plan_dependents: bool,
}

#[derive(Clone, Debug, Args)]
pub struct TemplateUseArgs {
    /// Template id
    #[arg(long)]
    pub id: String,
    #[arg(short, long)]
    pub application: String,
    /// Pipeline name
    #[arg(short, long)]
    pub name: String,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub tag: Option<String>,
    /// Template variable as key=value; repeatable, wins over --values-file
    #[arg(long = "set", value_parser = parse_key_value)]
    pub set: Vec<(String, String)>,
    /// JSON or YAML file of template variables
    #[arg(long)]
    pub values_file: Option<PathBuf>,
}
