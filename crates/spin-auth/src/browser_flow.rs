use crate::error::AuthError;
use crate::pkce::{Pkce, random_state};

/// Path the provider redirects back to on the local listener.
pub const CALLBACK_PATH: &str = "/callback";

/// Parameters for an OAuth2 authorization-code request.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest<'a> {
    pub auth_url: &'a str,
    pub client_id: &'a str,
    pub scopes: &'a [String],
    /// Provider-specific extras such as `access_type=offline`.
    pub extra_params: &'a [(&'a str, &'a str)],
}

/// The result of a completed browser round-trip.
#[derive(Debug, Clone)]
pub struct AuthorizationCode {
    pub code: String,
    pub redirect_uri: String,
    pub verifier: String,
}

/// Execute the browser-based authorization-code flow with PKCE.
///
/// 1. Start `tiny_http` on `127.0.0.1:<port>`
/// 2. Open the browser at the provider's consent page, redirecting to
///    `http://127.0.0.1:<port>/callback`
/// 3. Wait for the callback carrying `code` (in `spawn_blocking`, `recv` blocks)
/// 4. Verify the `state` nonce
///
/// The listener is dropped when this returns.
///
/// # Errors
///
/// Returns `AuthError::BrowserFlowFailed` if the server cannot bind, the
/// provider reports an error, the state does not match, or the callback times out.
pub async fn authorize(
    request: &AuthorizationRequest<'_>,
    port: u16,
    timeout: std::time::Duration,
) -> Result<AuthorizationCode, AuthError> {
    let server = tiny_http::Server::http(("127.0.0.1", port))
        .map_err(|e| AuthError::BrowserFlowFailed(format!("failed to bind port {port}: {e}")))?;
    let bound_port = server
        .server_addr()
        .to_ip()
        .map(|a| a.port())
        .ok_or_else(|| AuthError::BrowserFlowFailed("no port".into()))?;

    let pkce = Pkce::generate()?;
    let state = random_state()?;
    let redirect_uri = redirect_uri(bound_port);
    let consent_url = authorize_url(request, &redirect_uri, &state, &pkce.challenge);

    eprintln!("Opening browser to: {consent_url}");
    if let Err(error) = open::that(&consent_url) {
        eprintln!("Failed to open browser: {error}");
        eprintln!("Open the URL above manually, then return here.");
    }

    let code = tokio::task::spawn_blocking(move || wait_for_callback(&server, timeout, &state))
        .await
        .map_err(|e| AuthError::BrowserFlowFailed(format!("spawn_blocking join: {e}")))??;

    Ok(AuthorizationCode {
        code,
        redirect_uri,
        verifier: pkce.verifier,
    })
}

/// The redirect target served by the listener. The loopback address matches
/// the bind address, so `localhost` resolving to `::1` cannot miss it.
#[must_use]
pub fn redirect_uri(port: u16) -> String {
    format!("http://127.0.0.1:{port}{CALLBACK_PATH}")
}

/// Build the consent URL the user is sent to.
#[must_use]
pub fn authorize_url(
    request: &AuthorizationRequest<'_>,
    redirect_uri: &str,
    state: &str,
    challenge: &str,
) -> String {
    let scope = request.scopes.join(" ");
    let mut params: Vec<(&str, &str)> = vec![
        ("response_type", "code"),
        ("client_id", request.client_id),
        ("redirect_uri", redirect_uri),
        ("state", state),
        ("code_challenge", challenge),
        ("code_challenge_method", "S256"),
    ];
    if !scope.is_empty() {
        params.push(("scope", &scope));
    }
    params.extend_from_slice(request.extra_params);

    let query = params
        .iter()
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");
    let separator = if request.auth_url.contains('?') { '&' } else { '?' };
    format!("{}{separator}{query}", request.auth_url)
}

/// What a single request to the callback listener amounts to.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum CallbackOutcome {
    /// Not the redirect (favicon, preflight); keep waiting.
    Ignore,
    Code(String),
    Failed(String),
}

/// Classify a request URL (path + query) received by the listener.
pub(crate) fn classify_callback(url: &str, expected_state: &str) -> CallbackOutcome {
    let Some((path, query)) = url.split_once('?') else {
        return CallbackOutcome::Ignore;
    };
    if path != CALLBACK_PATH {
        return CallbackOutcome::Ignore;
    }

    let mut code = None;
    let mut state = None;
    let mut error = None;
    for pair in query.split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        let Ok(value) = urlencoding::decode(value) else {
            return CallbackOutcome::Failed(format!("could not URL-decode '{key}'"));
        };
        match key {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(error) = error {
        return CallbackOutcome::Failed(format!("provider returned error: {error}"));
    }
    let Some(code) = code else {
        return CallbackOutcome::Ignore;
    };
    if state.as_deref() != Some(expected_state) {
        return CallbackOutcome::Failed("state mismatch, possible CSRF".into());
    }
    CallbackOutcome::Code(code)
}

/// Block until the listener receives the authorization redirect.
pub(crate) fn wait_for_callback(
    server: &tiny_http::Server,
    timeout: std::time::Duration,
    expected_state: &str,
) -> Result<String, AuthError> {
    let deadline = std::time::Instant::now() + timeout;
    let timed_out = || {
        AuthError::BrowserFlowFailed(format!(
            "browser callback timed out after {}s",
            timeout.as_secs()
        ))
    };

    loop {
        let remaining = deadline.saturating_duration_since(std::time::Instant::now());
        if remaining.is_zero() {
            return Err(timed_out());
        }

        let request = match server.recv_timeout(remaining) {
            Ok(Some(req)) => req,
            Ok(None) => return Err(timed_out()),
            Err(e) => return Err(AuthError::BrowserFlowFailed(format!("recv error: {e}"))),
        };

        match classify_callback(request.url(), expected_state) {
            CallbackOutcome::Ignore => {
                let _ = request.respond(tiny_http::Response::empty(204));
            }
            CallbackOutcome::Code(code) => {
                let _ = request.respond(html_page(
                    "Authenticated!",
                    "You can close this tab and return to spin.",
                ));
                return Ok(code);
            }
            CallbackOutcome::Failed(reason) => {
                let _ = request.respond(html_page("Auth failed", "Check the spin CLI output."));
                return Err(AuthError::BrowserFlowFailed(reason));
            }
        }
    }
}

fn html_page(title: &str, body: &str) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let response = tiny_http::Response::from_string(format!(
        "<html><body><h1>{title}</h1><p>{body}</p></body></html>"
    ));
    match tiny_http::Header::from_bytes("Content-Type", "text/html") {
        Ok(header) => response.with_header(header),
        Err(()) => response,
    }
}
