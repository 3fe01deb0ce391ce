use chrono::Utc;
use figment::Jail;
use pretty_assertions::assert_eq;
use spin_config::{AuthConfig, CachedToken, GoogleServiceAccountConfig, SpinConfig};

#[test]
fn save_then_load_round_trips_token() {
    let tmp = tempfile::TempDir::new().expect("tmp dir");
    let path = tmp.path().join("nested").join("config");

    let token = CachedToken {
        access_token: "ya29.token".into(),
        token_type: "Bearer".into(),
        expiry: Some(Utc::now() + chrono::TimeDelta::seconds(3600)),
        ..Default::default()
    };
    let config = SpinConfig {
        auth: Some(AuthConfig {
            enabled: true,
            google_service_account: Some(GoogleServiceAccountConfig {
                file: "/etc/sa.json".into(),
                cached_token: Some(token.clone()),
            }),
            ..Default::default()
        }),
        ..Default::default()
    };

    config.save(&path).expect("save should succeed");
    let loaded = SpinConfig::load_file(&path).expect("load should succeed");
    let loaded_token = loaded
        .auth
        .and_then(|auth| auth.google_service_account)
        .and_then(|gsa| gsa.cached_token)
        .expect("token should persist");

    assert_eq!(loaded_token.access_token, token.access_token);
    assert_eq!(
        loaded_token.expiry.map(|e| e.timestamp()),
        token.expiry.map(|e| e.timestamp())
    );
}

#[cfg(unix)]
#[test]
fn saved_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = tempfile::TempDir::new().expect("tmp dir");
    let path = tmp.path().join("config");
    SpinConfig::default().save(&path).expect("save should succeed");

    let mode = std::fs::metadata(&path)
        .expect("metadata")
        .permissions()
        .mode()
        & 0o777;
    assert_eq!(mode, 0o600, "config file should be 0600");
}

#[test]
fn update_file_does_not_persist_env_overrides() {
    Jail::expect_with(|jail| {
        jail.set_env("SPIN_GATE__ENDPOINT", "https://gate.from-env.io");
        jail.create_file(
            "config.yml",
            "gate:\n  endpoint: https://gate.from-file.io\nauth:\n  enabled: true\n",
        )?;
        let path = jail.directory().join("config.yml");

        SpinConfig::update_file(&path, |config| {
            if let Some(auth) = config.auth.as_mut() {
                auth.google_service_account = Some(GoogleServiceAccountConfig {
                    cached_token: Some(CachedToken {
                        access_token: "fresh".into(),
                        ..Default::default()
                    }),
                    ..Default::default()
                });
            }
        })
        .expect("update should succeed");

        let on_disk = SpinConfig::load_file(&path).expect("load should succeed");
        assert_eq!(on_disk.gate.endpoint, "https://gate.from-file.io");
        let token = on_disk
            .auth
            .and_then(|auth| auth.google_service_account)
            .and_then(|gsa| gsa.cached_token)
            .expect("token should persist");
        assert_eq!(token.access_token, "fresh");
        Ok(())
    });
}
