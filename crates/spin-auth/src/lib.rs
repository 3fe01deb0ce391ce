//! # spin-auth
//!
//! Gate authentication for the `spin` CLI.
//!
//! Turns the `auth` section of the config file into [`Credentials`] the Gate
//! client can apply: client certificates (`x509`), HTTP Basic, LDAP form login,
//! OAuth2 with PKCE (`tiny_http` callback + `open`), Google IAP id tokens and
//! Google service-account access tokens (`jsonwebtoken` RS256 assertions).
//!
//! Flows that mint or refresh a token report it as a [`TokenUpdate`] so the
//! caller can write it back to the config file.

pub mod browser_flow;
pub mod error;
pub mod google;
pub mod iap;
pub mod oauth2;
pub mod pkce;
pub mod token;
pub mod x509;

use std::fmt;
use std::time::Duration;

use spin_config::{AuthConfig, CachedToken, SpinConfig};

pub use error::AuthError;

/// Port of the local OAuth2 redirect listener.
pub const DEFAULT_CALLBACK_PORT: u16 = 8085;
pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Credentials to attach to Gate requests.
#[derive(Clone, Default)]
pub enum Credentials {
    #[default]
    None,
    /// PEM bundle (certificate followed by private key).
    ClientCertificate(Vec<u8>),
    Basic { username: String, password: String },
    /// Form login at `POST /login`; the session lives in the cookie jar.
    Ldap { username: String, password: String },
    Bearer(String),
}

impl Credentials {
    #[must_use]
    pub const fn method_name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::ClientCertificate(_) => "x509",
            Self::Basic { .. } => "basic",
            Self::Ldap { .. } => "ldap",
            Self::Bearer(_) => "bearer",
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic { username, .. } | Self::Ldap { username, .. } => f
                .debug_struct(self.method_name())
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            other => write!(f, "{}(<redacted>)", other.method_name()),
        }
    }
}

/// A token to persist back into the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenUpdate {
    OAuth2(CachedToken),
    GoogleServiceAccount(CachedToken),
    IapRefresh(String),
}

impl TokenUpdate {
    /// Whether `config` has the auth section this token belongs to.
    #[must_use]
    pub fn applies_to(&self, config: &SpinConfig) -> bool {
        let Some(auth) = config.auth.as_ref() else {
            return false;
        };
        match self {
            Self::OAuth2(_) => auth.oauth2.is_some(),
            Self::GoogleServiceAccount(_) => auth.google_service_account.is_some(),
            Self::IapRefresh(_) => auth.iap.is_some(),
        }
    }

    /// Write this token into the matching auth section of `config`.
    pub fn apply(&self, config: &mut SpinConfig) {
        let Some(auth) = config.auth.as_mut() else {
            return;
        };
        match self {
            Self::OAuth2(token) => {
                if let Some(oauth2) = auth.oauth2.as_mut() {
                    oauth2.cached_token = Some(token.clone());
                }
            }
            Self::GoogleServiceAccount(token) => {
                if let Some(gsa) = auth.google_service_account.as_mut() {
                    gsa.cached_token = Some(token.clone());
                }
            }
            Self::IapRefresh(refresh) => {
                if let Some(iap) = auth.iap.as_mut() {
                    iap.iap_client_refresh.clone_from(refresh);
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct NegotiateOptions {
    /// Allow browser-based flows. When false they fail instead of blocking.
    pub interactive: bool,
    pub callback_port: u16,
    pub callback_timeout: Duration,
    pub google_auth_url: String,
    pub google_token_url: String,
}

impl Default for NegotiateOptions {
    fn default() -> Self {
        Self {
            interactive: true,
            callback_port: DEFAULT_CALLBACK_PORT,
            callback_timeout: Duration::from_secs(120),
            google_auth_url: GOOGLE_AUTH_URL.into(),
            google_token_url: GOOGLE_TOKEN_URL.into(),
        }
    }
}

/// Result of negotiation.
#[derive(Debug, Clone, Default)]
pub struct Negotiated {
    pub credentials: Credentials,
    pub token_update: Option<TokenUpdate>,
}

/// Choose and run one auth method.
///
/// Precedence when several sections are present:
/// x509 → oauth2 → iap → googleServiceAccount → ldap → basic.
///
/// # Errors
///
/// Returns [`AuthError`] when the chosen method is misconfigured or its token
/// exchange fails. Nothing falls through to the next method on failure.
pub async fn negotiate(
    auth: Option<&AuthConfig>,
    options: &NegotiateOptions,
) -> Result<Negotiated, AuthError> {
    let Some(auth) = auth.filter(|auth| auth.enabled) else {
        return Ok(Negotiated::default());
    };

    if let Some(x509) = &auth.x509 {
        tracing::debug!("authenticating with x509 client certificate");
        return Ok(Negotiated {
            credentials: Credentials::ClientCertificate(x509::load_identity_pem(x509)?),
            token_update: None,
        });
    }

    let http = token_http_client()?;

    if let Some(oauth2) = &auth.oauth2 {
        tracing::debug!("authenticating with oauth2");
        let outcome = oauth2::authenticate(oauth2, &http, options).await?;
        return Ok(Negotiated {
            credentials: Credentials::Bearer(outcome.access_token),
            token_update: outcome.refreshed.map(TokenUpdate::OAuth2),
        });
    }

    if let Some(iap) = &auth.iap {
        tracing::debug!("authenticating with google iap");
        let outcome = iap::authenticate(iap, &http, options).await?;
        return Ok(Negotiated {
            credentials: Credentials::Bearer(outcome.id_token),
            token_update: outcome.new_refresh_token.map(TokenUpdate::IapRefresh),
        });
    }

    if let Some(gsa) = &auth.google_service_account {
        tracing::debug!("authenticating with google service account");
        let outcome = google::service_account_token(gsa, &http).await?;
        return Ok(Negotiated {
            credentials: Credentials::Bearer(outcome.access_token),
            token_update: outcome.refreshed.map(TokenUpdate::GoogleServiceAccount),
        });
    }

    if let Some(ldap) = &auth.ldap {
        if !ldap.is_configured() {
            return Err(AuthError::InvalidConfig(
                "ldap requires username and password".into(),
            ));
        }
        return Ok(Negotiated {
            credentials: Credentials::Ldap {
                username: ldap.username.clone(),
                password: ldap.password.clone(),
            },
            token_update: None,
        });
    }

    if let Some(basic) = &auth.basic {
        if !basic.is_configured() {
            return Err(AuthError::InvalidConfig(
                "basic auth requires username and password".into(),
            ));
        }
        return Ok(Negotiated {
            credentials: Credentials::Basic {
                username: basic.username.clone(),
                password: basic.password.clone(),
            },
            token_update: None,
        });
    }

    tracing::warn!("auth is enabled but no auth method is configured");
    Ok(Negotiated::default())
}

fn token_http_client() -> Result<reqwest::Client, AuthError> {
    Ok(reqwest::Client::builder()
        .user_agent(concat!("spin/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(30))
        .build()?)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use spin_config::{BasicConfig, LdapConfig, OAuth2Config, X509Config};

    use super::*;

    fn enabled(auth: AuthConfig) -> AuthConfig {
        AuthConfig {
            enabled: true,
            ..auth
        }
    }

    #[tokio::test]
    async fn disabled_auth_yields_no_credentials() {
        let auth = AuthConfig {
            enabled: false,
            basic: Some(BasicConfig {
                username: "u".into(),
                password: "p".into(),
            }),
            ..Default::default()
        };
        let negotiated = negotiate(Some(&auth), &NegotiateOptions::default())
            .await
            .expect("should negotiate");
        assert!(matches!(negotiated.credentials, Credentials::None));
    }

    #[tokio::test]
    async fn basic_credentials_are_passed_through() {
        let auth = enabled(AuthConfig {
            basic: Some(BasicConfig {
                username: "admin".into(),
                password: "hunter2".into(),
            }),
            ..Default::default()
        });
        let negotiated = negotiate(Some(&auth), &NegotiateOptions::default())
            .await
            .expect("should negotiate");
        match negotiated.credentials {
            Credentials::Basic { username, password } => {
                assert_eq!(username, "admin");
                assert_eq!(password, "hunter2");
            }
            other => panic!("unexpected credentials: {other:?}"),
        }
    }

    #[tokio::test]
    async fn ldap_wins_over_basic() {
        let auth = enabled(AuthConfig {
            basic: Some(BasicConfig {
                username: "b".into(),
                password: "b".into(),
            }),
            ldap: Some(LdapConfig {
                username: "l".into(),
                password: "l".into(),
            }),
            ..Default::default()
        });
        let negotiated = negotiate(Some(&auth), &NegotiateOptions::default())
            .await
            .expect("should negotiate");
        assert_eq!(negotiated.credentials.method_name(), "ldap");
    }

    #[tokio::test]
    async fn x509_takes_precedence_and_validates() {
        let auth = enabled(AuthConfig {
            x509: Some(X509Config {
                cert: "-----BEGIN CERTIFICATE-----".into(),
                ..Default::default()
            }),
            basic: Some(BasicConfig {
                username: "u".into(),
                password: "p".into(),
            }),
            ..Default::default()
        });
        let err = negotiate(Some(&auth), &NegotiateOptions::default())
            .await
            .expect_err("half-configured x509 should fail");
        assert!(matches!(err, AuthError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn incomplete_basic_is_rejected() {
        let auth = enabled(AuthConfig {
            basic: Some(BasicConfig {
                username: "u".into(),
                ..Default::default()
            }),
            ..Default::default()
        });
        assert!(
            negotiate(Some(&auth), &NegotiateOptions::default())
                .await
                .is_err()
        );
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let creds = Credentials::Basic {
            username: "admin".into(),
            password: "hunter2".into(),
        };
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("hunter2"));
        assert!(!format!("{:?}", Credentials::Bearer("tok".into())).contains("tok"));
    }

    #[test]
    fn token_update_lands_in_matching_section() {
        let mut config = SpinConfig {
            auth: Some(AuthConfig {
                enabled: true,
                oauth2: Some(OAuth2Config::default()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let token = CachedToken {
            access_token: "new".into(),
            ..Default::default()
        };

        TokenUpdate::OAuth2(token.clone()).apply(&mut config);

        let stored = config
            .auth
            .and_then(|auth| auth.oauth2)
            .and_then(|oauth2| oauth2.cached_token);
        assert_eq!(stored, Some(token));
    }

    #[test]
    fn token_update_only_applies_to_configured_sections() {
        let refresh = TokenUpdate::IapRefresh("r".into());
        assert!(!refresh.applies_to(&SpinConfig::default()));

        let config = SpinConfig {
            auth: Some(AuthConfig {
                iap: Some(spin_config::IapConfig::default()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(refresh.applies_to(&config));
        assert!(!TokenUpdate::OAuth2(CachedToken::default()).applies_to(&config));
    }
}
