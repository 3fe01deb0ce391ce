//! Gate endpoint configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Endpoint used when neither the config file, the environment nor
/// `--gate-endpoint` names one.
pub const DEFAULT_GATE_ENDPOINT: &str = "http://localhost:8084";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GateConfig {
    /// Base URL of the Gate API (e.g. `https://gate.example.com`).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub endpoint: String,
}

impl GateConfig {
    /// Resolve the effective endpoint.
    ///
    /// Priority: explicit override → configured endpoint → [`DEFAULT_GATE_ENDPOINT`].
    /// Trailing slashes are stripped so paths can be appended verbatim.
    pub fn resolve_endpoint(&self, override_endpoint: Option<&str>) -> Result<String, ConfigError> {
        let raw = override_endpoint
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .or_else(|| Some(self.endpoint.trim()).filter(|value| !value.is_empty()))
            .unwrap_or(DEFAULT_GATE_ENDPOINT);

        if !(raw.starts_with("http://") || raw.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "gate.endpoint".into(),
                reason: format!("'{raw}' must start with http:// or https://"),
            });
        }

        Ok(raw.trim_end_matches('/').to_string())
    }
}
