use serde::Serialize;

use super::segment;
use crate::api::{ApiClient, ApiError, RequestDescriptor};
use crate::models::job::JobsResponse;
use crate::models::{Job, JobFilter};

impl ApiClient {
    pub async fn jobs(&self, filter: &JobFilter) -> Result<Vec<Job>, ApiError> {
        let descriptor = RequestDescriptor::get("/jobs").query(&filter.to_params());
        let resp: JobsResponse = self.request_json(descriptor).await?;
        Ok(resp.into())
    }

    pub async fn job(&self, id: &str) -> Result<Job, ApiError> {
        self.request_json(RequestDescriptor::get(format!("/jobs/{}", segment(id))))
            .await
    }

    pub async fn create_job<B: Serialize + ?Sized>(&self, job: &B) -> Result<Job, ApiError> {
        self.request_json(RequestDescriptor::post("/jobs").json(job)?).await
    }

    pub async fn update_job<B: Serialize + ?Sized>(
        &self,
        id: &str,
        updates: &B,
    ) -> Result<Job, ApiError> {
        let descriptor = RequestDescriptor::put(format!("/jobs/{}", segment(id))).json(updates)?;
        self.request_json(descriptor).await
    }

    pub async fn delete_job(&self, id: &str) -> Result<(), ApiError> {
        self.request(RequestDescriptor::delete(format!("/jobs/{}", segment(id))))
            .await
            .map(|_| ())
    }

    /// Postings created by the current company account.
    pub async fn my_jobs(&self) -> Result<Vec<Job>, ApiError> {
        let resp: JobsResponse = self
            .request_json(RequestDescriptor::get("/jobs/company/my-jobs"))
            .await?;
        Ok(resp.into())
    }
}
