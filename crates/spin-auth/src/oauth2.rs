//! Generic OAuth2 authorization-code + PKCE login with cached-token reuse.

use spin_config::{CachedToken, OAuth2Config};

use crate::browser_flow::{self, AuthorizationRequest};
use crate::error::AuthError;
use crate::token::{EXPIRY_BUFFER_SECS, request_token};
use crate::NegotiateOptions;

/// Outcome of an OAuth2 negotiation: the bearer token to use, and a new
/// token to persist when one was minted or refreshed.
#[derive(Debug)]
pub struct OAuth2Outcome {
    pub access_token: String,
    pub refreshed: Option<CachedToken>,
}

/// Resolve an access token for `config`.
///
/// Priority: fresh cached token → refresh grant → interactive browser login.
///
/// # Errors
///
/// Returns `AuthError::InteractiveDisabled` when a browser login would be
/// needed but `options.interactive` is false.
pub async fn authenticate(
    config: &OAuth2Config,
    http: &reqwest::Client,
    options: &NegotiateOptions,
) -> Result<OAuth2Outcome, AuthError> {
    if !config.is_configured() {
        return Err(AuthError::InvalidConfig(
            "oauth2 requires authUrl, tokenUrl and clientId".into(),
        ));
    }

    if let Some(cached) = &config.cached_token {
        if cached.is_fresh(EXPIRY_BUFFER_SECS) {
            tracing::debug!("using cached oauth2 token");
            return Ok(OAuth2Outcome {
                access_token: cached.access_token.clone(),
                refreshed: None,
            });
        }

        if !cached.refresh_token.is_empty() {
            match refresh(config, http, &cached.refresh_token).await {
                Ok(token) => {
                    return Ok(OAuth2Outcome {
                        access_token: token.access_token.clone(),
                        refreshed: Some(token),
                    });
                }
                Err(error) => {
                    tracing::warn!(%error, "oauth2 refresh failed; falling back to browser login");
                }
            }
        }
    }

    if !options.interactive {
        return Err(AuthError::InteractiveDisabled(
            "no valid oauth2 token is cached".into(),
        ));
    }

    let code = browser_flow::authorize(
        &AuthorizationRequest {
            auth_url: &config.auth_url,
            client_id: &config.client_id,
            scopes: &config.scopes,
            extra_params: &[("access_type", "offline")],
        },
        options.callback_port,
        options.callback_timeout,
    )
    .await?;

    let token = exchange_code(
        http,
        &config.token_url,
        &config.client_id,
        &config.client_secret,
        &code,
    )
    .await?
    .into_cached(None)?;

    Ok(OAuth2Outcome {
        access_token: token.access_token.clone(),
        refreshed: Some(token),
    })
}

/// Exchange an authorization code (with its PKCE verifier) for tokens.
pub async fn exchange_code(
    http: &reqwest::Client,
    token_url: &str,
    client_id: &str,
    client_secret: &str,
    code: &browser_flow::AuthorizationCode,
) -> Result<crate::token::TokenResponse, AuthError> {
    let mut form = vec![
        ("grant_type", "authorization_code"),
        ("code", code.code.as_str()),
        ("redirect_uri", code.redirect_uri.as_str()),
        ("client_id", client_id),
        ("code_verifier", code.verifier.as_str()),
    ];
    if !client_secret.is_empty() {
        form.push(("client_secret", client_secret));
    }
    request_token(http, token_url, &form).await
}

async fn refresh(
    config: &OAuth2Config,
    http: &reqwest::Client,
    refresh_token: &str,
) -> Result<CachedToken, AuthError> {
    let mut form = vec![
        ("grant_type", "refresh_token"),
        ("refresh_token", refresh_token),
        ("client_id", config.client_id.as_str()),
    ];
    if !config.client_secret.is_empty() {
        form.push(("client_secret", config.client_secret.as_str()));
    }
    request_token(http, &config.token_url, &form)
        .await?
        .into_cached(Some(refresh_token))
}
