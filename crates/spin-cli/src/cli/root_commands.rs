use clap::Subcommand;

use crate::cli::subcommands::{
    AccountCommands, ApplicationCommands, CanaryConfigCommands, ExecutionCommands,
    PipelineCommands, PipelineTemplateCommands, ProjectCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Cloud provider accounts.
    Account {
        #[command(subcommand)]
        action: AccountCommands,
    },
    /// Spinnaker applications.
    Application {
        #[command(subcommand)]
        action: ApplicationCommands,
    },
    /// Pipeline configurations.
    Pipeline {
        #[command(subcommand)]
        action: PipelineCommands,
    },
    /// Pipeline executions.
    Execution {
        #[command(subcommand)]
        action: ExecutionCommands,
    },
    /// Managed (v2) pipeline templates.
    PipelineTemplate {
        #[command(subcommand)]
        action: PipelineTemplateCommands,
    },
    /// Kayenta canary configs.
    CanaryConfig {
        #[command(subcommand)]
        action: CanaryConfigCommands,
    },
    /// Projects.
    Project {
        #[command(subcommand)]
        action: ProjectCommands,
    },
    /// Show client and Gate versions.
    Version,
}
