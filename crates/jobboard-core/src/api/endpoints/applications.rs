use serde::Serialize;
use serde_json::{json, Value};

use super::segment;
use crate::api::{ApiClient, ApiError, RequestDescriptor};
use crate::models::Application;

impl ApiClient {
    /// Apply to a job. `application` must serialize to a JSON object;
    /// `job_post_id` is added unless it already carries one.
    pub async fn apply_to_job<B: Serialize + ?Sized>(
        &self,
        job_id: &str,
        application: &B,
    ) -> Result<Application, ApiError> {
        let mut body = serde_json::to_value(application)
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to serialize application: {}", e)))?;
        match body {
            Value::Object(ref mut fields) => {
                fields
                    .entry("job_post_id")
                    .or_insert_with(|| Value::String(job_id.to_string()));
            }
            Value::Null => body = json!({ "job_post_id": job_id }),
            _ => {
                return Err(ApiError::InvalidRequest(
                    "Application data must be a JSON object".to_string(),
                ))
            }
        }
        self.request_json(RequestDescriptor::post("/applications").json(&body)?)
            .await
    }

    pub async fn my_applications(&self) -> Result<Vec<Application>, ApiError> {
        self.request_json(RequestDescriptor::get("/applications/my-applications"))
            .await
    }

    /// Applications to postings owned by the current company account.
    pub async fn company_applications(&self) -> Result<Vec<Application>, ApiError> {
        self.request_json(RequestDescriptor::get("/applications/company-applications"))
            .await
    }

    pub async fn update_application_status(
        &self,
        id: &str,
        status: &str,
    ) -> Result<Application, ApiError> {
        let descriptor = RequestDescriptor::put(format!("/applications/{}/status", segment(id)))
            .json(&json!({ "status": status }))?;
        self.request_json(descriptor).await
    }

    pub async fn application(&self, id: &str) -> Result<Application, ApiError> {
        self.request_json(RequestDescriptor::get(format!("/applications/{}", segment(id))))
            .await
    }
}
