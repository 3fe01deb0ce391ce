use serde_json::Value;

use super::not_found;
use crate::cli::GlobalFlags;
use crate::commands::shared::gate_errors::GateResultExt;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    name: &str,
    expand: bool,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let app = ctx
        .gate
        .get_application(name, expand)
        .await
        .or_not_found("getting application", || not_found(name))?;
    output(&select(app, expand), flags)
}

/// Unexpanded reads show only the application's attributes.
fn select(mut app: Value, expand: bool) -> Value {
    if expand {
        return app;
    }
    match app.get_mut("attributes").map(Value::take) {
        Some(attributes) => attributes,
        None => app,
    }
}
