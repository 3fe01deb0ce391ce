use anyhow::Context;
use serde_json::Value;
use spin_gate::TaskRef;

use crate::context::AppContext;
use crate::progress::Progress;

/// Wait on an orca task behind a spinner.
pub async fn wait_for_task(
    ctx: &AppContext,
    task: &TaskRef,
    what: &str,
) -> anyhow::Result<Value> {
    let progress = Progress::spinner(&format!("Waiting for {what} to complete"));
    let result = ctx.watcher.wait_for_successful_task(&ctx.gate, task).await;
    match &result {
        Ok(_) => progress.finish_clear(),
        Err(_) => progress.finish_err(&format!("{what} failed")),
    }
    result.with_context(|| format!("{what} did not succeed"))
}
