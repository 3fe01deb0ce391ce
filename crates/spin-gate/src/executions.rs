//! Pipeline executions: query and lifecycle control.

use serde_json::Value;

use crate::client::segment;
use crate::{GateClient, GateError};

/// Filters for [`GateClient::list_executions`].
#[derive(Debug, Clone, Default)]
pub struct ExecutionQuery {
    pub pipeline_config_ids: Vec<String>,
    pub limit: Option<u32>,
    /// Orca statuses (`RUNNING`, `SUCCEEDED`, ...). Empty means all.
    pub statuses: Vec<String>,
}

impl GateClient {
    /// # Errors
    ///
    /// Returns [`GateError`] if the request fails or Gate answers non-2xx.
    pub async fn list_executions(&self, query: &ExecutionQuery) -> Result<Value, GateError> {
        let mut params = vec![("pipelineConfigIds", query.pipeline_config_ids.join(","))];
        if let Some(limit) = query.limit {
            params.push(("limit", limit.to_string()));
        }
        if !query.statuses.is_empty() {
            params.push(("statuses", query.statuses.join(",")));
        }
        self.get_json("/executions", &params).await
    }

    /// # Errors
    ///
    /// Returns [`GateError::Api`] with status 404 for unknown executions.
    pub async fn get_execution(&self, id: &str) -> Result<Value, GateError> {
        self.get_json(&format!("/pipelines/{}", segment(id)), &[])
            .await
    }

    /// # Errors
    ///
    /// Returns [`GateError`] if the request fails or Gate answers non-2xx.
    pub async fn cancel_execution(&self, id: &str, reason: Option<&str>) -> Result<(), GateError> {
        let query: Vec<(&str, String)> = reason
            .map(|reason| ("reason", reason.to_string()))
            .into_iter()
            .collect();
        self.put_json(&format!("/pipelines/{}/cancel", segment(id)), &query, None)
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`GateError`] if the request fails or Gate answers non-2xx.
    pub async fn pause_execution(&self, id: &str) -> Result<(), GateError> {
        self.put_json(&format!("/pipelines/{}/pause", segment(id)), &[], None)
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`GateError`] if the request fails or Gate answers non-2xx.
    pub async fn resume_execution(&self, id: &str) -> Result<(), GateError> {
        self.put_json(&format!("/pipelines/{}/resume", segment(id)), &[], None)
            .await?;
        Ok(())
    }
}
