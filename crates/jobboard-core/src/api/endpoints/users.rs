use serde::Serialize;
use serde_json::Value;

use crate::api::{ApiClient, ApiError, RequestDescriptor};

impl ApiClient {
    /// Jobseeker bio of the current user.
    pub async fn user_profile(&self) -> Result<Value, ApiError> {
        self.request_json(RequestDescriptor::get("/users/profile")).await
    }

    pub async fn update_user_profile<B: Serialize + ?Sized>(
        &self,
        profile: &B,
    ) -> Result<Value, ApiError> {
        self.request_json(RequestDescriptor::put("/users/profile").json(profile)?)
            .await
    }

    /// Candidate profiles visible to companies.
    pub async fn candidates(&self) -> Result<Vec<Value>, ApiError> {
        self.request_json(RequestDescriptor::get("/users/candidates")).await
    }
}
