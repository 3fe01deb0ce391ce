//! Google Identity-Aware Proxy: obtain an OIDC id token whose audience is the
//! IAP client id.

use std::path::Path;

use spin_config::IapConfig;

use crate::NegotiateOptions;
use crate::browser_flow::{self, AuthorizationRequest};
use crate::error::AuthError;
use crate::google::{ServiceAccountKey, exchange_assertion, sign_assertion};
use crate::oauth2::exchange_code;
use crate::token::request_token;

/// Outcome of IAP negotiation.
#[derive(Debug)]
pub struct IapOutcome {
    pub id_token: String,
    /// A refresh token obtained through the interactive flow, to persist as
    /// `iapClientRefresh`.
    pub new_refresh_token: Option<String>,
}

/// Resolve an IAP id token.
///
/// Priority: `iapIdToken` → service-account key → stored refresh token →
/// interactive Google login.
pub async fn authenticate(
    config: &IapConfig,
    http: &reqwest::Client,
    options: &NegotiateOptions,
) -> Result<IapOutcome, AuthError> {
    if !config.iap_id_token.is_empty() {
        return Ok(IapOutcome {
            id_token: config.iap_id_token.clone(),
            new_refresh_token: None,
        });
    }

    if config.iap_client_id.is_empty() {
        return Err(AuthError::InvalidConfig("iap requires iapClientId".into()));
    }

    if !config.service_account_key_path.is_empty() {
        let key = ServiceAccountKey::from_file(Path::new(&config.service_account_key_path))?;
        let assertion = sign_assertion(&key, None, Some(&config.iap_client_id))?;
        let id_token = exchange_assertion(http, &key, &assertion)
            .await?
            .id_token
            .ok_or(AuthError::MissingToken("id_token"))?;
        return Ok(IapOutcome {
            id_token,
            new_refresh_token: None,
        });
    }

    if config.oauth_client_id.is_empty() {
        return Err(AuthError::InvalidConfig(
            "iap requires serviceAccountKeyPath, iapIdToken or oauthClientId".into(),
        ));
    }

    let (refresh_token, new_refresh_token) = if config.iap_client_refresh.is_empty() {
        let refresh = interactive_refresh_token(config, http, options).await?;
        (refresh.clone(), Some(refresh))
    } else {
        (config.iap_client_refresh.clone(), None)
    };

    let id_token = request_token(
        http,
        &options.google_token_url,
        &[
            ("grant_type", "refresh_token"),
            ("client_id", config.oauth_client_id.as_str()),
            ("client_secret", config.oauth_client_secret.as_str()),
            ("refresh_token", refresh_token.as_str()),
            ("audience", config.iap_client_id.as_str()),
        ],
    )
    .await?
    .id_token
    .ok_or(AuthError::MissingToken("id_token"))?;

    Ok(IapOutcome {
        id_token,
        new_refresh_token,
    })
}

async fn interactive_refresh_token(
    config: &IapConfig,
    http: &reqwest::Client,
    options: &NegotiateOptions,
) -> Result<String, AuthError> {
    if !options.interactive {
        return Err(AuthError::InteractiveDisabled(
            "iap has no stored refresh token".into(),
        ));
    }

    let scopes = vec!["openid".to_string(), "email".to_string()];
    let code = browser_flow::authorize(
        &AuthorizationRequest {
            auth_url: &options.google_auth_url,
            client_id: &config.oauth_client_id,
            scopes: &scopes,
            extra_params: &[("access_type", "offline"), ("prompt", "consent")],
        },
        options.callback_port,
        options.callback_timeout,
    )
    .await?;

    exchange_code(
        http,
        &options.google_token_url,
        &config.oauth_client_id,
        &config.oauth_client_secret,
        &code,
    )
    .await?
    .refresh_token
    .filter(|token| !token.is_empty())
    .ok_or(AuthError::MissingToken("refresh_token"))
}
