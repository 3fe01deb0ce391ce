use std::path::PathBuf;

use clap::Args;

mod account;
mod application;
mod canary_config;
mod execution;
mod pipeline;
mod pipeline_template;
mod project;

pub use account::AccountCommands;
pub use application::{ApplicationCommands, ApplicationSaveArgs};
pub use canary_config::CanaryConfigCommands;
pub use execution::{ExecutionCommands, ExecutionListArgs};
pub use pipeline::{PipelineCommands, PipelineExecuteArgs};
pub use pipeline_template::{PipelineTemplateCommands, TemplateSaveArgs, TemplateUseArgs};
pub use project::{ProjectCommands, ProjectSaveArgs};

/// Where a command reads its JSON or YAML document from.
#[derive(Clone, Debug, Default, Args)]
pub struct InputArgs {
    /// Path to the document; reads stdin when omitted and stdin is piped
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}
