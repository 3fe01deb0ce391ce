//! v2 pipeline templates (`/v2/pipelineTemplates`).
//!
//! Create, update and delete are asynchronous in Gate: they answer with a
//! task ref to hand to the task watcher.

use serde_json::Value;

use crate::client::segment;
use crate::{GateClient, GateError, TaskRef};

const BASE: &str = "/v2/pipelineTemplates";

fn tag_query(tag: Option<&str>) -> Vec<(&'static str, String)> {
    tag.map(|tag| ("tag", tag.to_string())).into_iter().collect()
}

fn version_query(tag: Option<&str>, digest: Option<&str>) -> Vec<(&'static str, String)> {
    let mut query = tag_query(tag);
    query.extend(digest.map(|digest| ("digest", digest.to_string())));
    query
}

impl GateClient {
    /// # Errors
    ///
    /// Returns [`GateError`] if the request fails or Gate answers non-2xx.
    pub async fn list_pipeline_templates(&self, scopes: &[String]) -> Result<Value, GateError> {
        let query: Vec<(&str, String)> = if scopes.is_empty() {
            Vec::new()
        } else {
            vec![("scopes", scopes.join(","))]
        };
        self.get_json(BASE, &query).await
    }

    /// # Errors
    ///
    /// Returns [`GateError::Api`] with status 404 for unknown templates.
    pub async fn get_pipeline_template(
        &self,
        id: &str,
        tag: Option<&str>,
        digest: Option<&str>,
    ) -> Result<Value, GateError> {
        self.get_json(&format!("{BASE}/{}", segment(id)), &version_query(tag, digest))
            .await
    }

    /// # Errors
    ///
    /// Returns [`GateError`] if the request fails or the response has no task ref.
    pub async fn create_pipeline_template(
        &self,
        template: &Value,
        tag: Option<&str>,
    ) -> Result<TaskRef, GateError> {
        let resp = self
            .post_json(&format!("{BASE}/create"), &tag_query(tag), template)
            .await?;
        TaskRef::from_response(&resp)
    }

    /// # Errors
    ///
    /// Returns [`GateError`] if the request fails or the response has no task ref.
    pub async fn update_pipeline_template(
        &self,
        id: &str,
        template: &Value,
        tag: Option<&str>,
        skip_plan_dependents: bool,
    ) -> Result<TaskRef, GateError> {
        let mut query = tag_query(tag);
        query.push(("skipPlanDependents", skip_plan_dependents.to_string()));
        let resp = self
            .post_json(&format!("{BASE}/update/{}", segment(id)), &query, template)
            .await?;
        TaskRef::from_response(&resp)
    }

    /// Gate answers with a task ref for the deletion.
    ///
    /// # Errors
    ///
    /// Returns [`GateError`] if the request fails or Gate answers non-2xx.
    pub async fn delete_pipeline_template(
        &self,
        id: &str,
        tag: Option<&str>,
        digest: Option<&str>,
    ) -> Result<Value, GateError> {
        self.delete(&format!("{BASE}/{}", segment(id)), &version_query(tag, digest))
            .await
    }

    /// Render a templated pipeline config without saving it.
    ///
    /// # Errors
    ///
    /// Returns [`GateError`] if the request fails or Gate answers non-2xx.
    pub async fn plan_pipeline_template(&self, config: &Value) -> Result<Value, GateError> {
        self.post_json(&format!("{BASE}/plan"), &[], config).await
    }
}
