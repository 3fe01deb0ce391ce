use clap::Subcommand;

use super::InputArgs;

#[derive(Clone, Debug, Subcommand)]
pub enum CanaryConfigCommands {
    /// List canary configs.
    List {
        #[arg(short, long)]
        application: Option<String>,
    },
    /// Get a canary config.
    Get {
        #[arg(long)]
        id: String,
    },
    /// Create or update a canary config.
    Save {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Delete a canary config.
    Delete {
        #[arg(long)]
        id: String,
    },
}
