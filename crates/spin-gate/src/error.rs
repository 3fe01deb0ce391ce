//! Gate client error types.

use thiserror::Error;

/// Errors that can occur when talking to Gate.
#[derive(Debug, Error)]
pub enum GateError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Gate returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by Gate.
        status: u16,
        /// Response body, usually Gate's JSON error document.
        message: String,
    },

    /// A response body was not the JSON we expected.
    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid gate endpoint '{0}'")]
    InvalidEndpoint(String),

    #[error("invalid default header: {0}")]
    InvalidHeader(String),

    #[error("invalid client certificate: {0}")]
    Certificate(String),

    /// LDAP form login at `/login` was rejected.
    #[error("login failed ({status})")]
    Login { status: u16 },

    /// A task reached a terminal status other than success.
    #[error("task completed with status {status}: {}", render(.task))]
    TaskFailed {
        status: String,
        task: serde_json::Value,
    },

    /// The poll budget ran out before the task reached a terminal status.
    #[error("task did not complete after {attempts} polls: {}", render(.task))]
    TaskTimedOut {
        attempts: u32,
        task: serde_json::Value,
    },
}

impl GateError {
    /// HTTP status when Gate answered with an error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::Login { status } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }
}

fn render(task: &serde_json::Value) -> String {
    serde_json::to_string_pretty(task).unwrap_or_else(|_| task.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_and_not_found() {
        let err = GateError::Api {
            status: 404,
            message: String::new(),
        };
        assert_eq!(err.status(), Some(404));
        assert!(err.is_not_found());
        assert!(!GateError::Parse("x".into()).is_not_found());
        assert_eq!(GateError::Parse("x".into()).status(), None);
    }

    #[test]
    fn task_failure_includes_task_document() {
        let err = GateError::TaskFailed {
            status: "TERMINAL".into(),
            task: serde_json::json!({"id": "01ABC"}),
        };
        let rendered = err.to_string();
        assert!(rendered.starts_with("task completed with status TERMINAL"));
        assert!(rendered.contains("\"id\": \"01ABC\""));
    }
}
