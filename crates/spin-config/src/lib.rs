//! # spin-config
//!
//! Layered configuration loading for the `spin` CLI using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`SPIN_*` prefix, `__` as separator)
//! 2. The YAML config file (`--config <path>` or `~/.spin/config`)
//! 3. Built-in defaults
//!
//! Command-line flags such as `--gate-endpoint` are applied on top by the CLI.
//!
//! # Environment Variable Mapping
//!
//! `__` separates path segments and a single `_` inside a segment starts a
//! new camelCase word:
//!
//! - `SPIN_GATE__ENDPOINT` -> `gate.endpoint`
//! - `SPIN_AUTH__OAUTH2__CLIENT_ID` -> `auth.oauth2.clientId`
//! - `SPIN_AUTH__GOOGLE_SERVICE_ACCOUNT__FILE` -> `auth.googleServiceAccount.file`
//!
//! # Token write-back
//!
//! Auth flows that mint or refresh a token persist it with [`SpinConfig::update_file`],
//! which re-reads the file layer alone so environment overrides never leak to disk.

mod auth;
mod error;
mod gate;

pub use auth::{
    AuthConfig, BasicConfig, CachedToken, GoogleServiceAccountConfig, IapConfig, LdapConfig,
    OAuth2Config, X509Config,
};
pub use error::ConfigError;
pub use gate::{DEFAULT_GATE_ENDPOINT, GateConfig};

use std::fs;
use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Yaml},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SpinConfig {
    #[serde(default)]
    pub gate: GateConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthConfig>,
}

impl SpinConfig {
    /// Load configuration from the YAML file and `SPIN_*` environment variables.
    ///
    /// An explicit path must exist; the default `~/.spin/config` is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        Self::figment(explicit)?
            .merge(Self::env())
            .extract()
            .map_err(ConfigError::from)
    }

    /// The `SPIN_*` environment provider with keys mapped onto the camelCase
    /// field names.
    pub fn env() -> Env {
        Env::prefixed("SPIN_")
            .split("__")
            .lowercase(false)
            .map(|key| camel_case_key(key.as_str()).into())
    }

    /// Load only the file layer (defaults + YAML), ignoring the environment.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if path.exists() {
            figment = figment.merge(Yaml::file(path));
        }
        figment.extract().map_err(ConfigError::from)
    }

    /// Build the defaults + file provider chain.
    ///
    /// Public so tests can inspect the figment or layer extra providers on top.
    pub fn figment(explicit: Option<&Path>) -> Result<Figment, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                figment = figment.merge(Yaml::file(path));
            }
            None => {
                if let Some(path) = Self::default_path().filter(|path| path.exists()) {
                    tracing::debug!(path = %path.display(), "loading default config file");
                    figment = figment.merge(Yaml::file(path));
                }
            }
        }

        Ok(figment)
    }

    /// `~/.spin/config`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".spin").join("config"))
    }

    /// The file a command should read from and write tokens back to.
    pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
        explicit.map(Path::to_path_buf).or_else(Self::default_path)
    }

    /// Auth settings, but only when `auth.enabled` is set.
    pub fn active_auth(&self) -> Option<&AuthConfig> {
        self.auth.as_ref().filter(|auth| auth.enabled)
    }

    /// Serialize to YAML and write with owner-only permissions.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let yaml = serde_yaml::to_string(self)?;
        let io_error = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
                #[cfg(unix)]
                {
                    use std::os::unix::fs::PermissionsExt;
                    if let Err(e) = fs::set_permissions(parent, fs::Permissions::from_mode(0o700)) {
                        tracing::warn!("failed to chmod 0700 {}: {e}", parent.display());
                    }
                }
            }
        }

        fs::write(path, yaml).map_err(io_error)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(io_error)?;
        }

        Ok(())
    }

    /// Re-read the file layer at `path`, apply `update`, and save it back.
    pub fn update_file<F>(path: &Path, update: F) -> Result<(), ConfigError>
    where
        F: FnOnce(&mut Self),
    {
        let mut on_disk = Self::load_file(path)?;
        update(&mut on_disk);
        on_disk.save(path)?;
        tracing::debug!(path = %path.display(), "config written back");
        Ok(())
    }
}

fn camel_case_key(key: &str) -> String {
    key.split('.')
        .map(|segment| {
            let mut words = segment.split('_').filter(|word| !word.is_empty());
            let mut out = words.next().unwrap_or_default().to_ascii_lowercase();
            for word in words {
                let mut chars = word.chars();
                if let Some(first) = chars.next() {
                    out.push(first.to_ascii_uppercase());
                    out.push_str(&chars.as_str().to_ascii_lowercase());
                }
            }
            out
        })
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_no_auth() {
        let config = SpinConfig::default();
        assert!(config.gate.endpoint.is_empty());
        assert!(config.active_auth().is_none());
    }

    #[test]
    fn disabled_auth_is_not_active() {
        let config = SpinConfig {
            auth: Some(AuthConfig {
                enabled: false,
                basic: Some(BasicConfig {
                    username: "u".into(),
                    password: "p".into(),
                }),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(config.active_auth().is_none());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = SpinConfig::figment(Some(Path::new("/definitely/not/here.yml")))
            .expect_err("should fail");
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn resolve_path_prefers_explicit() {
        let path = SpinConfig::resolve_path(Some(Path::new("/etc/spin.yml")));
        assert_eq!(path, Some(PathBuf::from("/etc/spin.yml")));
    }

    #[test]
    fn env_segments_become_camel_case() {
        assert_eq!(camel_case_key("GATE.ENDPOINT"), "gate.endpoint");
        assert_eq!(camel_case_key("AUTH.OAUTH2.CLIENT_ID"), "auth.oauth2.clientId");
        assert_eq!(
            camel_case_key("AUTH.GOOGLE_SERVICE_ACCOUNT.FILE"),
            "auth.googleServiceAccount.file"
        );
        assert_eq!(camel_case_key("AUTH.IAP.IAP_CLIENT_ID"), "auth.iap.iapClientId");
    }

    #[test]
    fn default_path_is_under_home() {
        let path = SpinConfig::default_path().expect("home should resolve");
        assert!(path.ends_with(".spin/config"));
    }
}
