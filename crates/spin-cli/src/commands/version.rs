use serde_json::json;

use crate::cli::GlobalFlags;
use crate::commands::shared::gate_errors::GateResultExt;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let gate = ctx.gate.version().await.gate_context("getting gate version")?;
    output(
        &json!({
            "client": env!("CARGO_PKG_VERSION"),
            "gate": gate,
        }),
        flags,
    )
}
