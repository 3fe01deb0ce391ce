//! The Gate HTTP client and its builder.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use spin_auth::Credentials;

use crate::error::GateError;
use crate::http::{check_response, read_json};

pub const USER_AGENT: &str = concat!("spin/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Per-request authentication. Certificates and LDAP sessions live in the
/// underlying `reqwest::Client` instead.
#[derive(Clone)]
enum RequestAuth {
    None,
    Basic { username: String, password: String },
    Bearer(String),
}

/// HTTP client for Spinnaker's Gate API.
///
/// Endpoint methods live in per-resource modules (`applications`,
/// `pipelines`, ...) as additional `impl GateClient` blocks.
#[derive(Clone)]
pub struct GateClient {
    pub(crate) http: reqwest::Client,
    base_url: String,
    auth: RequestAuth,
}

pub struct GateClientBuilder {
    endpoint: String,
    insecure: bool,
    default_headers: Vec<(String, String)>,
    credentials: Credentials,
    timeout: Duration,
}

impl GateClientBuilder {
    /// Skip TLS certificate verification.
    #[must_use]
    pub const fn insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    /// Headers sent with every request.
    #[must_use]
    pub fn default_headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.default_headers = headers;
        self
    }

    #[must_use]
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client. LDAP credentials are exchanged for a session cookie
    /// here, so this performs one request when LDAP is configured.
    ///
    /// # Errors
    ///
    /// Returns [`GateError`] for a malformed endpoint, header or certificate,
    /// or when the LDAP login is rejected.
    pub async fn build(self) -> Result<GateClient, GateError> {
        let base_url = self.endpoint.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(GateError::InvalidEndpoint(self.endpoint));
        }

        let mut headers = HeaderMap::new();
        for (name, value) in &self.default_headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| GateError::InvalidHeader(format!("{name}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| GateError::InvalidHeader(format!("{name}: {e}")))?;
            headers.insert(name, value);
        }

        let mut builder = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .cookie_store(true)
            .timeout(self.timeout);
        if self.insecure {
            tracing::warn!("TLS certificate verification is disabled");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let mut auth = RequestAuth::None;
        let mut ldap_login = None;
        match self.credentials {
            Credentials::None => {}
            Credentials::ClientCertificate(pem) => {
                let identity = reqwest::Identity::from_pem(&pem)
                    .map_err(|e| GateError::Certificate(e.to_string()))?;
                builder = builder.identity(identity);
            }
            Credentials::Basic { username, password } => {
                auth = RequestAuth::Basic { username, password };
            }
            Credentials::Bearer(token) => auth = RequestAuth::Bearer(token),
            Credentials::Ldap { username, password } => ldap_login = Some((username, password)),
        }

        let client = GateClient {
            http: builder.build()?,
            base_url,
            auth,
        };
        if let Some((username, password)) = ldap_login {
            client.login(&username, &password).await?;
        }
        Ok(client)
    }
}

impl GateClient {
    #[must_use]
    pub fn builder(endpoint: impl Into<String>) -> GateClientBuilder {
        GateClientBuilder {
            endpoint: endpoint.into(),
            insecure: false,
            default_headers: Vec::new(),
            credentials: Credentials::None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn login(&self, username: &str, password: &str) -> Result<(), GateError> {
        tracing::debug!(username, "logging in to gate");
        let resp = self
            .http
            .post(self.url("/login"))
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;
        let status = resp.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(GateError::Login {
                status: status.as_u16(),
            });
        }
        Ok(())
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            RequestAuth::None => req,
            RequestAuth::Basic { username, password } => req.basic_auth(username, Some(password)),
            RequestAuth::Bearer(token) => req.bearer_auth(token),
        }
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<Value, GateError> {
        let resp = check_response(self.authorize(req).send().await?).await?;
        read_json(resp).await
    }

    pub(crate) async fn get_json(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Value, GateError> {
        tracing::debug!(path, "GET");
        self.send(self.http.get(self.url(path)).query(query)).await
    }

    pub(crate) async fn post_json(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &Value,
    ) -> Result<Value, GateError> {
        tracing::debug!(path, "POST");
        self.send(self.http.post(self.url(path)).query(query).json(body))
            .await
    }

    pub(crate) async fn put_json(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Value, GateError> {
        tracing::debug!(path, "PUT");
        let mut req = self.http.put(self.url(path)).query(query);
        if let Some(body) = body {
            req = req.json(body);
        }
        self.send(req).await
    }

    pub(crate) async fn delete(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Value, GateError> {
        tracing::debug!(path, "DELETE");
        self.send(self.http.delete(self.url(path)).query(query)).await
    }
}

/// Percent-encode one path segment.
pub(crate) fn segment(value: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(value)
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;

    const IDENTITY: &[u8] = include_bytes!("../tests/fixtures/client-identity.pem");

    #[tokio::test]
    async fn rejects_endpoint_without_scheme() {
        let err = GateClient::builder("gate.example.com")
            .build()
            .await
            .err()
            .expect("should fail");
        assert!(matches!(err, GateError::InvalidEndpoint(_)));
    }

    #[tokio::test]
    async fn rejects_invalid_header_name() {
        let err = GateClient::builder("http://localhost:8084")
            .default_headers(vec![("bad header".into(), "v".into())])
            .build()
            .await
            .err()
            .expect("should fail");
        assert!(matches!(err, GateError::InvalidHeader(_)));
    }

    #[tokio::test]
    async fn trailing_slash_is_trimmed() {
        let client = GateClient::builder("http://localhost:8084/")
            .build()
            .await
            .expect("should build");
        assert_eq!(client.base_url(), "http://localhost:8084");
        assert_eq!(client.url("/version"), "http://localhost:8084/version");
    }

    #[tokio::test]
    async fn client_certificate_is_accepted() {
        GateClient::builder("https://localhost:8084")
            .credentials(Credentials::ClientCertificate(IDENTITY.to_vec()))
            .build()
            .await
            .expect("pem identity should load");
    }

    #[tokio::test]
    async fn garbage_certificate_is_rejected() {
        let err = GateClient::builder("https://localhost:8084")
            .credentials(Credentials::ClientCertificate(b"nope".to_vec()))
            .build()
            .await
            .err()
            .expect("should fail");
        assert!(matches!(err, GateError::Certificate(_)));
    }

    #[tokio::test]
    async fn sends_user_agent_default_headers_and_bearer() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/version")
                    .header("user-agent", USER_AGENT)
                    .header("x-team", "delivery")
                    .header("authorization", "Bearer tok-123");
                then.status(200).json_body(json!({"version": "1.30.0"}));
            })
            .await;

        let client = GateClient::builder(server.base_url())
            .default_headers(vec![("X-Team".into(), "delivery".into())])
            .credentials(Credentials::Bearer("tok-123".into()))
            .build()
            .await
            .expect("should build");
        let value = client.get_json("/version", &[]).await.expect("should get");

        mock.assert_async().await;
        assert_eq!(value["version"], "1.30.0");
    }

    #[tokio::test]
    async fn basic_auth_is_sent_per_request() {
        let server = MockServer::start_async().await;
        // base64("admin:secret")
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/applications")
                    .header("authorization", "Basic YWRtaW46c2VjcmV0");
                then.status(200).json_body(json!([]));
            })
            .await;

        let client = GateClient::builder(server.base_url())
            .credentials(Credentials::Basic {
                username: "admin".into(),
                password: "secret".into(),
            })
            .build()
            .await
            .expect("should build");
        client
            .get_json("/applications", &[])
            .await
            .expect("should get");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn ldap_login_posts_form_once() {
        let server = MockServer::start_async().await;
        let login = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/login")
                    .body_matches("username=alice")
                    .body_matches("password=pw");
                then.status(200);
            })
            .await;

        GateClient::builder(server.base_url())
            .credentials(Credentials::Ldap {
                username: "alice".into(),
                password: "pw".into(),
            })
            .build()
            .await
            .expect("login should succeed");
        login.assert_async().await;
    }

    #[tokio::test]
    async fn ldap_login_rejection_fails_build() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/login");
                then.status(401);
            })
            .await;

        let err = GateClient::builder(server.base_url())
            .credentials(Credentials::Ldap {
                username: "alice".into(),
                password: "wrong".into(),
            })
            .build()
            .await
            .err()
            .expect("should fail");
        assert!(matches!(err, GateError::Login { status: 401 }));
    }

    #[tokio::test]
    async fn api_errors_carry_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/applications/missing");
                then.status(404).body(r#"{"message":"not found"}"#);
            })
            .await;

        let client = GateClient::builder(server.base_url())
            .build()
            .await
            .expect("should build");
        let err = client
            .get_json("/applications/missing", &[])
            .await
            .expect_err("should fail");
        assert!(err.is_not_found());
    }
}
