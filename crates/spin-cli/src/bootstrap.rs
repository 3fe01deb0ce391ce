use std::io::IsTerminal;
use std::path::Path;

use anyhow::Context;
use spin_auth::{NegotiateOptions, TokenUpdate};
use spin_config::SpinConfig;
use spin_gate::GateClient;

use crate::cli::GlobalFlags;
use crate::commands::shared::kv::parse_pairs;
use crate::context::AppContext;

/// Load config, negotiate credentials and build the Gate client.
pub async fn init(flags: &GlobalFlags) -> anyhow::Result<AppContext> {
    let explicit = flags.config.as_deref();
    let config = SpinConfig::load(explicit).context("failed to load spin config")?;
    let endpoint = config.gate.resolve_endpoint(flags.gate_endpoint.as_deref())?;
    tracing::debug!(endpoint, "resolved gate endpoint");

    let headers = match flags.default_headers.as_deref() {
        Some(raw) => parse_pairs(raw).context("invalid --default-headers")?,
        None => Vec::new(),
    };

    let options = NegotiateOptions {
        interactive: std::io::stdin().is_terminal() && std::io::stderr().is_terminal(),
        ..NegotiateOptions::default()
    };
    let negotiated = spin_auth::negotiate(config.active_auth(), &options)
        .await
        .context("authentication failed")?;
    tracing::debug!(method = negotiated.credentials.method_name(), "negotiated credentials");

    if let Some(update) = &negotiated.token_update
        && let Some(path) = SpinConfig::resolve_path(explicit)
    {
        persist_token(&path, update);
    }

    let gate = GateClient::builder(endpoint)
        .insecure(flags.insecure)
        .default_headers(headers)
        .credentials(negotiated.credentials)
        .build()
        .await
        .context("failed to initialize gate client")?;

    Ok(AppContext::new(gate))
}

/// Write a refreshed token back to the config file. Failures are logged.
fn persist_token(path: &Path, update: &TokenUpdate) {
    if !has_token_section(path, update) {
        tracing::debug!(
            path = %path.display(),
            "config file has no matching auth section, not saving token"
        );
        return;
    }
    match SpinConfig::update_file(path, |config| update.apply(config)) {
        Ok(()) => tracing::debug!(path = %path.display(), "saved refreshed token"),
        Err(error) => {
            tracing::warn!(%error, path = %path.display(), "failed to save refreshed token");
        }
    }
}

/// Auth configured only through the environment has nowhere on disk to keep
/// the token.
fn has_token_section(path: &Path, update: &TokenUpdate) -> bool {
    if !path.exists() {
        return false;
    }
    SpinConfig::load_file(path).is_ok_and(|on_disk| update.applies_to(&on_disk))
}
