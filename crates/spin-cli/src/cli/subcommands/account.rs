use clap::Subcommand;

#[derive(Clone, Debug, Subcommand)]
pub enum AccountCommands {
    /// Get an account by name.
    Get { name: String },
    /// List accounts.
    List {
        /// Include account details
        #[arg(long)]
        expand: bool,
    },
}
