//! Client-certificate material for mutual TLS.

use std::fs;
use std::path::Path;

use spin_config::X509Config;

use crate::error::AuthError;

/// Load the certificate and key as a single PEM bundle.
///
/// Each half comes from its path when set, otherwise from the inline field.
/// The bundle is what `reqwest::Identity::from_pem` expects.
pub fn load_identity_pem(config: &X509Config) -> Result<Vec<u8>, AuthError> {
    if !config.has_cert() || !config.has_key() {
        return Err(AuthError::InvalidConfig(
            "x509 requires both a certificate (certPath or cert) and a key (keyPath or key)".into(),
        ));
    }

    let cert = read_half(&config.cert_path, &config.cert)?;
    let key = read_half(&config.key_path, &config.key)?;

    for (label, pem) in [("certificate", &cert), ("key", &key)] {
        if !pem.trim_start().starts_with("-----BEGIN") {
            return Err(AuthError::InvalidConfig(format!(
                "x509 {label} is not PEM encoded"
            )));
        }
    }

    let mut bundle = cert.trim_end().to_string();
    bundle.push('\n');
    bundle.push_str(key.trim_end());
    bundle.push('\n');
    Ok(bundle.into_bytes())
}

fn read_half(path: &str, inline: &str) -> Result<String, AuthError> {
    if path.is_empty() {
        return Ok(inline.to_string());
    }
    fs::read_to_string(Path::new(path)).map_err(|source| AuthError::Io {
        path: path.into(),
        source,
    })
}
