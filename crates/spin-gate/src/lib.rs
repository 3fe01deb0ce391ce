//! # spin-gate
//!
//! Typed HTTP client for Spinnaker's Gate API.
//!
//! Resources covered:
//! - accounts (`/credentials`)
//! - applications
//! - pipeline configs and executions
//! - v2 pipeline templates
//! - canary configs
//! - projects
//! - orca tasks, with [`TaskWatcher`] to wait on them
//!
//! Payloads are passed through as `serde_json::Value`: the CLI prints what
//! Gate returns and only inspects the few fields it validates.

pub mod accounts;
pub mod applications;
pub mod canary_configs;
pub mod executions;
pub mod pipeline_templates;
pub mod pipelines;
pub mod projects;
pub mod task;
pub mod version;

mod client;
mod error;
mod http;

pub use client::{DEFAULT_TIMEOUT, GateClient, GateClientBuilder, USER_AGENT};
pub use error::GateError;
pub use executions::ExecutionQuery;
pub use task::{Backoff, TaskRef, TaskSource, TaskStatus, TaskWatcher, task_request};
