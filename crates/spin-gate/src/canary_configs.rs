//! Kayenta canary configs (`/v2/canaryConfig`).

use serde_json::Value;

use crate::client::segment;
use crate::{GateClient, GateError};

const BASE: &str = "/v2/canaryConfig";

impl GateClient {
    /// # Errors
    ///
    /// Returns [`GateError`] if the request fails or Gate answers non-2xx.
    pub async fn list_canary_configs(&self, application: Option<&str>) -> Result<Value, GateError> {
        let query: Vec<(&str, String)> = application
            .map(|app| ("application", app.to_string()))
            .into_iter()
            .collect();
        self.get_json(BASE, &query).await
    }

    /// # Errors
    ///
    /// Returns [`GateError::Api`] with status 404 for unknown configs.
    pub async fn get_canary_config(&self, id: &str) -> Result<Value, GateError> {
        self.get_json(&format!("{BASE}/{}", segment(id)), &[]).await
    }

    /// # Errors
    ///
    /// Returns [`GateError`] if the request fails or Gate answers non-2xx.
    pub async fn create_canary_config(&self, config: &Value) -> Result<Value, GateError> {
        self.post_json(BASE, &[], config).await
    }

    /// # Errors
    ///
    /// Returns [`GateError`] if the request fails or Gate answers non-2xx.
    pub async fn update_canary_config(&self, id: &str, config: &Value) -> Result<Value, GateError> {
        self.put_json(&format!("{BASE}/{}", segment(id)), &[], Some(config))
            .await
    }

    /// # Errors
    ///
    /// Returns [`GateError`] if the request fails or Gate answers non-2xx.
    pub async fn delete_canary_config(&self, id: &str) -> Result<(), GateError> {
        self.delete(&format!("{BASE}/{}", segment(id)), &[]).await?;
        Ok(())
    }
}
