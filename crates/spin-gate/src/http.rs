//! Shared HTTP response helpers.

use serde_json::Value;

use crate::error::GateError;

/// Map non-success statuses to [`GateError::Api`], keeping the body.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, GateError> {
    let status = resp.status();
    if !status.is_success() {
        return Err(GateError::Api {
            status: status.as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

/// Read a response body as JSON. An empty body becomes `null`.
pub async fn read_json(resp: reqwest::Response) -> Result<Value, GateError> {
    let bytes = resp.bytes().await?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&bytes).map_err(|e| GateError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_response(status: u16, body: &'static str) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(status)
                .body(body)
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn check_response_keeps_error_body() {
        let err = check_response(mock_response(403, "forbidden"))
            .await
            .unwrap_err();
        match err {
            GateError::Api { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "forbidden");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn check_response_success() {
        assert!(check_response(mock_response(204, "")).await.is_ok());
    }

    #[tokio::test]
    async fn empty_body_reads_as_null() {
        let value = read_json(mock_response(200, "  \n")).await.unwrap();
        assert_eq!(value, Value::Null);
    }

    #[tokio::test]
    async fn malformed_body_is_parse_error() {
        let err = read_json(mock_response(200, "<html>")).await.unwrap_err();
        assert!(matches!(err, GateError::Parse(_)));
    }
}
