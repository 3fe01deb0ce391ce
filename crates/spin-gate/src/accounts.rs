//! `/credentials`: cloud accounts known to clouddriver.

use serde_json::Value;

use crate::client::segment;
use crate::{GateClient, GateError};

impl GateClient {
    /// List accounts. `expand` includes each account's full detail.
    ///
    /// # Errors
    ///
    /// Returns [`GateError`] if the request fails or Gate answers non-2xx.
    pub async fn list_accounts(&self, expand: bool) -> Result<Value, GateError> {
        self.get_json("/credentials", &[("expand", expand.to_string())])
            .await
    }

    /// # Errors
    ///
    /// Returns [`GateError::Api`] with status 404 for unknown accounts.
    pub async fn get_account(&self, name: &str) -> Result<Value, GateError> {
        self.get_json(&format!("/credentials/{}", segment(name)), &[])
            .await
    }
}
