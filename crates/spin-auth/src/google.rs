//! Google service-account keys and signed JWT assertions (RFC 7523).

use std::path::Path;

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use spin_config::{CachedToken, GoogleServiceAccountConfig};

use crate::error::AuthError;
use crate::token::{EXPIRY_BUFFER_SECS, TokenResponse, request_token};

pub const USERINFO_EMAIL_SCOPE: &str = "https://www.googleapis.com/auth/userinfo.email";
pub const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

fn default_token_uri() -> String {
    String::from("https://oauth2.googleapis.com/token")
}

/// The fields of a Google JSON key file that matter for signing.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl ServiceAccountKey {
    pub fn from_file(path: &Path) -> Result<Self, AuthError> {
        let raw = std::fs::read_to_string(path).map_err(|source| AuthError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            AuthError::InvalidConfig(format!(
                "{} is not a service account key: {e}",
                path.display()
            ))
        })
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    scope: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    target_audience: Option<&'a str>,
}

/// Sign an RS256 assertion for the key's token endpoint.
///
/// `scope` requests an access token; `target_audience` requests an OIDC id
/// token for that audience (used by IAP).
pub fn sign_assertion(
    key: &ServiceAccountKey,
    scope: Option<&str>,
    target_audience: Option<&str>,
) -> Result<String, AuthError> {
    let now = Utc::now().timestamp();
    let claims = AssertionClaims {
        iss: &key.client_email,
        aud: &key.token_uri,
        iat: now,
        exp: now + ASSERTION_LIFETIME_SECS,
        scope,
        target_audience,
    };

    let mut header = Header::new(Algorithm::RS256);
    header.kid.clone_from(&key.private_key_id);
    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;
    Ok(encode(&header, &claims, &encoding_key)?)
}

/// Exchange a signed assertion at the key's token endpoint.
pub async fn exchange_assertion(
    http: &reqwest::Client,
    key: &ServiceAccountKey,
    assertion: &str,
) -> Result<TokenResponse, AuthError> {
    request_token(
        http,
        &key.token_uri,
        &[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion)],
    )
    .await
}

/// Outcome of the service-account flow.
#[derive(Debug)]
pub struct ServiceAccountOutcome {
    pub access_token: String,
    pub refreshed: Option<CachedToken>,
}

/// Resolve an access token from a Google service account.
///
/// A fresh cached token is reused; otherwise a new one is minted from the key
/// file (`file`, falling back to `GOOGLE_APPLICATION_CREDENTIALS`).
pub async fn service_account_token(
    config: &GoogleServiceAccountConfig,
    http: &reqwest::Client,
) -> Result<ServiceAccountOutcome, AuthError> {
    if let Some(cached) = config
        .cached_token
        .as_ref()
        .filter(|token| token.is_fresh(EXPIRY_BUFFER_SECS))
    {
        tracing::debug!("using cached service account token");
        return Ok(ServiceAccountOutcome {
            access_token: cached.access_token.clone(),
            refreshed: None,
        });
    }

    let key_path = if config.file.is_empty() {
        std::env::var("GOOGLE_APPLICATION_CREDENTIALS").map_err(|_| {
            AuthError::InvalidConfig(
                "googleServiceAccount.file is empty and GOOGLE_APPLICATION_CREDENTIALS is unset"
                    .into(),
            )
        })?
    } else {
        config.file.clone()
    };

    let key = ServiceAccountKey::from_file(Path::new(&key_path))?;
    let assertion = sign_assertion(&key, Some(USERINFO_EMAIL_SCOPE), None)?;
    let token = exchange_assertion(http, &key, &assertion)
        .await?
        .into_cached(None)?;

    Ok(ServiceAccountOutcome {
        access_token: token.access_token.clone(),
        refreshed: Some(token),
    })
}
