//! `/projects`: reads only. Writes go through orca tasks.

use serde_json::Value;

use crate::client::segment;
use crate::{GateClient, GateError};

impl GateClient {
    /// # Errors
    ///
    /// Returns [`GateError`] if the request fails or Gate answers non-2xx.
    pub async fn list_projects(&self) -> Result<Value, GateError> {
        self.get_json("/projects", &[]).await
    }

    /// # Errors
    ///
    /// Returns [`GateError::Api`] with status 404 for unknown projects.
    pub async fn get_project(&self, name: &str) -> Result<Value, GateError> {
        self.get_json(&format!("/projects/{}", segment(name)), &[])
            .await
    }

    /// Recent executions of every pipeline in the project.
    ///
    /// # Errors
    ///
    /// Returns [`GateError`] if the request fails or Gate answers non-2xx.
    pub async fn get_project_pipelines(
        &self,
        name: &str,
        limit: Option<u32>,
    ) -> Result<Value, GateError> {
        let query: Vec<(&str, String)> = limit
            .map(|limit| ("limit", limit.to_string()))
            .into_iter()
            .collect();
        self.get_json(&format!("/projects/{}/pipelines", segment(name)), &query)
            .await
    }
}
