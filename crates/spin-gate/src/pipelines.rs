//! Pipeline configs and manual execution.

use serde_json::Value;

use crate::client::segment;
use crate::{GateClient, GateError};

impl GateClient {
    /// All pipeline configs for `application`.
    ///
    /// # Errors
    ///
    /// Returns [`GateError`] if the request fails or Gate answers non-2xx.
    pub async fn list_pipeline_configs(&self, application: &str) -> Result<Value, GateError> {
        self.get_json(
            &format!("/applications/{}/pipelineConfigs", segment(application)),
            &[],
        )
        .await
    }

    /// # Errors
    ///
    /// Returns [`GateError::Api`] with status 404 when the pipeline is unknown.
    pub async fn get_pipeline_config(
        &self,
        application: &str,
        name: &str,
    ) -> Result<Value, GateError> {
        self.get_json(
            &format!(
                "/applications/{}/pipelineConfigs/{}",
                segment(application),
                segment(name)
            ),
            &[],
        )
        .await
    }

    /// Create or replace a pipeline config. Gate matches on `id`.
    ///
    /// # Errors
    ///
    /// Returns [`GateError`] if the request fails or Gate answers non-2xx.
    pub async fn save_pipeline(&self, pipeline: &Value) -> Result<Value, GateError> {
        self.post_json("/pipelines", &[], pipeline).await
    }

    /// # Errors
    ///
    /// Returns [`GateError`] if the request fails or Gate answers non-2xx.
    pub async fn delete_pipeline(&self, application: &str, name: &str) -> Result<(), GateError> {
        self.delete(
            &format!("/pipelines/{}/{}", segment(application), segment(name)),
            &[],
        )
        .await?;
        Ok(())
    }

    /// Trigger a pipeline. Gate answers with the execution ref.
    ///
    /// # Errors
    ///
    /// Returns [`GateError`] if the request fails or Gate answers non-2xx.
    pub async fn invoke_pipeline(
        &self,
        application: &str,
        name: &str,
        trigger: &Value,
    ) -> Result<Value, GateError> {
        self.post_json(
            &format!("/pipelines/{}/{}", segment(application), segment(name)),
            &[],
            trigger,
        )
        .await
    }
}
