use clap::{Args, Subcommand};

use super::InputArgs;

/// Project commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ProjectCommands {
    /// List projects.
    List,
    /// Get a project.
    Get { name: String },
    /// Recent executions of the project's pipelines.
    GetPipelines {
        name: String,
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Create or update a project.
    Save(ProjectSaveArgs),
    /// Delete a project.
    Delete { name: String },
}

#[derive(Clone, Debug, Args)]
pub struct ProjectSaveArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Project name (overrides the document)
    #[arg(long)]
    pub name: Option<String>,
    /// Owner email (overrides the document)
    #[arg(long)]
    pub email: Option<String>,
}
