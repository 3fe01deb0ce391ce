use serde_json::Value;

use crate::{GateClient, GateError};

impl GateClient {
    /// Gate's build information.
    ///
    /// # Errors
    ///
    /// Returns [`GateError`] if the request fails or Gate answers non-2xx.
    pub async fn version(&self) -> Result<Value, GateError> {
        self.get_json("/version", &[]).await
    }
}
