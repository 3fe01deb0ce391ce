use std::path::PathBuf;

use clap::{Args, Subcommand};

use super::InputArgs;
use crate::commands::shared::kv::parse_key_value;

/// Pipeline commands.
#[derive(Clone, Debug, Subcommand)]
pub enum PipelineCommands {
    /// List the pipelines of an application.
    List {
        #[arg(short, long)]
        application: String,
    },
    /// Get a pipeline config.
    Get {
        #[arg(short, long)]
        application: String,
        #[arg(short, long)]
        name: String,
    },
    /// Create or update a pipeline config.
    Save {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Delete a pipeline config.
    Delete {
        #[arg(short, long)]
        application: String,
        #[arg(short, long)]
        name: String,
    },
    /// Trigger a pipeline manually.
    Execute(PipelineExecuteArgs),
}

#[derive(Clone, Debug, Args)]
pub struct PipelineExecuteArgs {
    #[arg(short, long)]
    pub application: String,
    #[arg(short, long)]
    pub name: String,
    /// JSON or YAML file of trigger parameters
    #[arg(long)]
    pub parameter_file: Option<PathBuf>,
    /// Trigger parameter as key=value; repeatable, wins over --parameter-file
    #[arg(short, long = "parameter", value_parser = parse_key_value)]
    pub parameters: Vec<(String, String)>,
    /// JSON or YAML file with the trigger's artifacts
    #[arg(long)]
    pub artifacts_file: Option<PathBuf>,
}
