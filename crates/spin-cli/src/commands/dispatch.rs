use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Account { action } => commands::account::handle(&action, ctx, flags).await,
        Commands::Application { action } => {
            commands::application::handle(&action, ctx, flags).await
        }
        Commands::Pipeline { action } => commands::pipeline::handle(&action, ctx, flags).await,
        Commands::Execution { action } => commands::execution::handle(&action, ctx, flags).await,
        Commands::PipelineTemplate { action } => {
            commands::pipeline_template::handle(&action, ctx, flags).await
        }
        Commands::CanaryConfig { action } => {
            commands::canary_config::handle(&action, ctx, flags).await
        }
        Commands::Project { action } => commands::project::handle(&action, ctx, flags).await,
        Commands::Version => commands::version::run(ctx, flags).await,
    }
}
