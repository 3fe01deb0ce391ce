use clap::{Args, Subcommand};

/// Execution commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ExecutionCommands {
    /// List executions of one or more pipelines.
    List(ExecutionListArgs),
    /// Get an execution by id.
    Get { id: String },
    /// Cancel a running execution.
    Cancel {
        id: String,
        #[arg(long)]
        reason: Option<String>,
    },
    /// Pause a running execution.
    Pause { id: String },
    /// Resume a paused execution.
    Resume { id: String },
}

#[derive(Clone, Debug, Args)]
pub struct ExecutionListArgs {
    /// Pipeline config id; repeatable
    #[arg(short, long = "pipeline-id", required = true)]
    pub pipeline_ids: Vec<String>,
    #[arg(short, long)]
    pub limit: Option<u32>,
    #[arg(long)]
    pub running: bool,
    #[arg(long)]
    pub succeeded: bool,
    #[arg(long)]
    pub failed: bool,
    #[arg(long)]
    pub canceled: bool,
}
