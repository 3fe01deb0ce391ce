//! Orca tasks: submission and polling until a terminal status.
//!
//! Mutations of applications, projects and pipeline templates are not applied
//! by Gate directly. Gate hands them to orca and returns a task ref, which
//! [`TaskWatcher`] polls with a capped quadratic backoff.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use serde_json::{Value, json};
use tokio::time::Instant;

use crate::client::segment;
use crate::{GateClient, GateError};

/// A task reference: `/tasks/<id>` as Gate returns it, or a bare id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRef(String);

impl TaskRef {
    #[must_use]
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// Read the `ref` field of a task submission response.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Parse`] when the response carries no `ref`.
    pub fn from_response(response: &Value) -> Result<Self, GateError> {
        response
            .get("ref")
            .and_then(Value::as_str)
            .filter(|reference| !reference.is_empty())
            .map(Self::new)
            .ok_or_else(|| GateError::Parse(format!("response has no task ref: {response}")))
    }

    /// The task id: the last path segment of the reference.
    #[must_use]
    pub fn id(&self) -> &str {
        self.0
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(&self.0)
    }
}

impl fmt::Display for TaskRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Build the body for `POST /tasks`: one job on behalf of `application`.
#[must_use]
pub fn task_request(application: &str, description: &str, job: Value) -> Value {
    json!({
        "application": application,
        "description": description,
        "job": [job],
    })
}

impl GateClient {
    /// Submit an orca task.
    ///
    /// # Errors
    ///
    /// Returns [`GateError`] if the request fails or the response has no task ref.
    pub async fn submit_task(&self, task: &Value) -> Result<TaskRef, GateError> {
        let resp = self.post_json("/tasks", &[], task).await?;
        let task_ref = TaskRef::from_response(&resp)?;
        tracing::debug!(%task_ref, "task submitted");
        Ok(task_ref)
    }

    /// # Errors
    ///
    /// Returns [`GateError`] if the request fails or Gate answers non-2xx.
    pub async fn get_task(&self, id: &str) -> Result<Value, GateError> {
        self.get_json(&format!("/tasks/{}", segment(id)), &[]).await
    }
}

/// Orca execution status, as reported in a task's `status` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    NotStarted,
    Running,
    Paused,
    Suspended,
    Succeeded,
    Stopped,
    Skipped,
    Terminal,
    FailedContinue,
    Canceled,
    Buffered,
    Other(String),
}

impl TaskStatus {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "NOT_STARTED" => Self::NotStarted,
            "RUNNING" => Self::Running,
            "PAUSED" => Self::Paused,
            "SUSPENDED" => Self::Suspended,
            "SUCCEEDED" => Self::Succeeded,
            "STOPPED" => Self::Stopped,
            "SKIPPED" => Self::Skipped,
            "TERMINAL" => Self::Terminal,
            "FAILED_CONTINUE" => Self::FailedContinue,
            "CANCELED" => Self::Canceled,
            "BUFFERED" => Self::Buffered,
            other => Self::Other(other.to_string()),
        }
    }

    /// Status of a task document. A missing field counts as not started.
    #[must_use]
    pub fn of(task: &Value) -> Self {
        task.get("status")
            .and_then(Value::as_str)
            .map_or(Self::NotStarted, Self::parse)
    }

    /// Polling stops on these.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Succeeded | Self::Stopped | Self::Skipped | Self::Terminal | Self::FailedContinue
        )
    }

    #[must_use]
    pub const fn is_successful(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Stopped | Self::Skipped)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::NotStarted => "NOT_STARTED",
            Self::Running => "RUNNING",
            Self::Paused => "PAUSED",
            Self::Suspended => "SUSPENDED",
            Self::Succeeded => "SUCCEEDED",
            Self::Stopped => "STOPPED",
            Self::Skipped => "SKIPPED",
            Self::Terminal => "TERMINAL",
            Self::FailedContinue => "FAILED_CONTINUE",
            Self::Canceled => "CANCELED",
            Self::Buffered => "BUFFERED",
            Self::Other(raw) => raw,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sleep schedule between polls: `clamp(n² × unit, unit, max)` after poll `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    pub unit: Duration,
    pub max: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self::with_unit(Duration::from_secs(1))
    }
}

impl Backoff {
    /// Cap at twenty units.
    #[must_use]
    pub const fn with_unit(unit: Duration) -> Self {
        Self {
            unit,
            max: unit.saturating_mul(20),
        }
    }

    /// No sleeping at all.
    #[must_use]
    pub const fn immediate() -> Self {
        Self::with_unit(Duration::ZERO)
    }

    /// Delay after `attempt` polls, truncated to `remaining` when set.
    #[must_use]
    pub fn delay(&self, attempt: u32, remaining: Option<Duration>) -> Duration {
        let raw = self.unit.saturating_mul(attempt.saturating_mul(attempt));
        let delay = raw.max(self.unit).min(self.max.max(self.unit));
        remaining.map_or(delay, |remaining| delay.min(remaining))
    }
}

/// Where the watcher reads task documents from.
pub trait TaskSource {
    fn fetch_task(&self, id: &str) -> impl Future<Output = Result<Value, GateError>> + Send;
}

impl TaskSource for GateClient {
    fn fetch_task(&self, id: &str) -> impl Future<Output = Result<Value, GateError>> + Send {
        self.get_task(id)
    }
}

/// Polls a task until it is terminal, the attempt budget is spent, or the
/// deadline passes.
#[derive(Debug, Clone)]
pub struct TaskWatcher {
    max_attempts: u32,
    backoff: Backoff,
    timeout: Option<Duration>,
}

impl Default for TaskWatcher {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ATTEMPTS)
    }
}

impl TaskWatcher {
    pub const DEFAULT_ATTEMPTS: u32 = 15;

    #[must_use]
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff: Backoff::default(),
            timeout: None,
        }
    }

    #[must_use]
    pub const fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Overall deadline, measured from the first poll.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Wait for `task` to succeed and return its final document.
    ///
    /// # Errors
    ///
    /// - [`GateError::TaskFailed`] when the task ends `TERMINAL` or `FAILED_CONTINUE`.
    /// - [`GateError::TaskTimedOut`] when no terminal status was seen in time.
    /// - Any transport or API error from a poll, immediately.
    pub async fn wait_for_successful_task<S: TaskSource + Sync>(
        &self,
        source: &S,
        task: &TaskRef,
    ) -> Result<Value, GateError> {
        let deadline = self.timeout.map(|timeout| Instant::now() + timeout);
        let mut last = Value::Null;
        let mut attempts = 0;

        while attempts < self.max_attempts {
            attempts += 1;
            let document = source.fetch_task(task.id()).await?;
            let status = TaskStatus::of(&document);
            tracing::debug!(task = task.id(), attempt = attempts, %status, "polled task");

            if status.is_terminal() {
                if status.is_successful() {
                    return Ok(document);
                }
                return Err(GateError::TaskFailed {
                    status: status.to_string(),
                    task: document,
                });
            }
            last = document;

            if attempts == self.max_attempts {
                break;
            }
            let remaining = deadline.map(|deadline| deadline.saturating_duration_since(Instant::now()));
            if remaining.is_some_and(|remaining| remaining.is_zero()) {
                break;
            }
            tokio::time::sleep(self.backoff.delay(attempts, remaining)).await;
        }

        Err(GateError::TaskTimedOut {
            attempts,
            task: last,
        })
    }
}
