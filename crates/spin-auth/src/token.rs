//! OAuth2 token endpoint calls shared by the OAuth2, IAP and service-account flows.

use chrono::Utc;
use serde::Deserialize;
use spin_config::CachedToken;

use crate::error::AuthError;

/// Refuse cached tokens that expire within this window.
pub const EXPIRY_BUFFER_SECS: i64 = 60;

/// Token endpoint response (RFC 6749 §5.1, plus Google's `id_token`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

impl TokenResponse {
    /// Convert to the persisted shape, carrying over `previous_refresh` when
    /// the endpoint did not rotate the refresh token.
    pub fn into_cached(self, previous_refresh: Option<&str>) -> Result<CachedToken, AuthError> {
        let access_token = self
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::MissingToken("access_token"))?;
        let refresh_token = self
            .refresh_token
            .filter(|token| !token.is_empty())
            .or_else(|| previous_refresh.map(str::to_string))
            .unwrap_or_default();

        Ok(CachedToken {
            access_token,
            token_type: self.token_type.unwrap_or_else(|| "Bearer".into()),
            refresh_token,
            expiry: self
                .expires_in
                .map(|secs| Utc::now() + chrono::TimeDelta::seconds(secs)),
        })
    }
}

/// POST a form to a token endpoint and parse the JSON response.
///
/// # Errors
///
/// Returns `AuthError::TokenExchange` for non-success statuses, with the body
/// included so provider error descriptions reach the user.
pub async fn request_token(
    http: &reqwest::Client,
    token_url: &str,
    form: &[(&str, &str)],
) -> Result<TokenResponse, AuthError> {
    let grant_type = form
        .iter()
        .find(|(key, _)| *key == "grant_type")
        .map_or("unknown", |(_, value)| *value);
    tracing::debug!(token_url, grant_type, "requesting token");

    let resp = http.post(token_url).form(form).send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(AuthError::TokenExchange {
            status: status.as_u16(),
            body: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp.json().await?)
}
