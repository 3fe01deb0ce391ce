use clap::{Args, Subcommand};

use super::InputArgs;

/// Application commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ApplicationCommands {
    /// Get an application. Prints its attributes unless --expand is set.
    Get {
        name: String,
        /// Include clusters and other expanded data
        #[arg(long)]
        expand: bool,
    },
    /// List applications.
    List {
        #[arg(long)]
        expand: bool,
    },
    /// Create or update an application.
    Save(ApplicationSaveArgs),
    /// Delete an application.
    Delete { name: String },
}

#[derive(Clone, Debug, Args)]
pub struct ApplicationSaveArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Application name (overrides the document)
    #[arg(long)]
    pub application_name: Option<String>,
    /// Owner email (overrides the document)
    #[arg(long)]
    pub owner_email: Option<String>,
    /// Cloud providers, comma separated
    #[arg(long, value_delimiter = ',')]
    pub cloud_providers: Vec<String>,
}
