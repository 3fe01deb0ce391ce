//! `/applications`: reads only. Writes go through orca tasks.

use serde_json::Value;

use crate::client::segment;
use crate::{GateClient, GateError};

impl GateClient {
    /// # Errors
    ///
    /// Returns [`GateError`] if the request fails or Gate answers non-2xx.
    pub async fn list_applications(&self, expand: bool) -> Result<Value, GateError> {
        self.get_json("/applications", &[("expand", expand.to_string())])
            .await
    }

    /// Fetch one application. Without `expand` Gate skips cluster data.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Api`] with status 404 for unknown applications.
    pub async fn get_application(&self, name: &str, expand: bool) -> Result<Value, GateError> {
        self.get_json(
            &format!("/applications/{}", segment(name)),
            &[("expand", expand.to_string())],
        )
        .await
    }
}
