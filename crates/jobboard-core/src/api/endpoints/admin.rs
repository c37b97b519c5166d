use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{segment, Ack};
use crate::api::{ApiClient, ApiError, RequestDescriptor};
use crate::models::admin::UsersResponse;
use crate::models::{AdminStats, FormField, User, UserQuery};

#[derive(Deserialize)]
struct ChallengesEnvelope {
    #[serde(default)]
    challenges: Vec<Value>,
}

#[derive(Deserialize)]
struct ResultsEnvelope {
    #[serde(default)]
    results: Vec<Value>,
}

#[derive(Deserialize)]
struct StatsEnvelope {
    #[serde(default)]
    stats: Value,
}

impl ApiClient {
    pub async fn admin_stats(&self) -> Result<AdminStats, ApiError> {
        self.request_json(RequestDescriptor::get("/admin/stats")).await
    }

    /// Profile form fields, optionally only those of one form (`jobseeker`, `company`).
    pub async fn form_fields(&self, form_type: Option<&str>) -> Result<Vec<FormField>, ApiError> {
        let mut descriptor = RequestDescriptor::get("/admin/form-fields");
        if let Some(form_type) = form_type {
            descriptor = descriptor.query(&[("form_type", form_type)]);
        }
        self.request_json(descriptor).await
    }

    pub async fn create_form_field(&self, field: &FormField) -> Result<FormField, ApiError> {
        self.request_json(RequestDescriptor::post("/admin/form-fields").json(field)?)
            .await
    }

    pub async fn update_form_field<B: Serialize + ?Sized>(
        &self,
        id: &str,
        updates: &B,
    ) -> Result<FormField, ApiError> {
        let descriptor =
            RequestDescriptor::put(format!("/admin/form-fields/{}", segment(id))).json(updates)?;
        self.request_json(descriptor).await
    }

    pub async fn delete_form_field(&self, id: &str) -> Result<(), ApiError> {
        self.request(RequestDescriptor::delete(format!("/admin/form-fields/{}", segment(id))))
            .await
            .map(|_| ())
    }

    pub async fn admin_users(&self, query: &UserQuery) -> Result<Vec<User>, ApiError> {
        let descriptor = RequestDescriptor::get("/admin/users").query(&query.to_params());
        let resp: UsersResponse = self.request_json(descriptor).await?;
        Ok(resp.into())
    }

    pub async fn update_user_as_admin<B: Serialize + ?Sized>(
        &self,
        id: &str,
        updates: &B,
    ) -> Result<User, ApiError> {
        let descriptor =
            RequestDescriptor::put(format!("/admin/users/{}", segment(id))).json(updates)?;
        self.request_json(descriptor).await
    }

    pub async fn delete_user(&self, id: &str) -> Result<(), ApiError> {
        self.request(RequestDescriptor::delete(format!("/admin/users/{}", segment(id))))
            .await
            .map(|_| ())
    }

    /// Seed the default profile form fields. Returns the server's message.
    pub async fn init_form_fields(&self) -> Result<Option<String>, ApiError> {
        let ack: Ack = self
            .request_json(RequestDescriptor::post("/admin/init-form-fields"))
            .await?;
        Ok(ack.message)
    }

    /// Every challenge with its company information.
    pub async fn admin_challenges(&self) -> Result<Vec<Value>, ApiError> {
        let resp: ChallengesEnvelope = self
            .request_json(RequestDescriptor::get("/admin/challenges"))
            .await?;
        Ok(resp.challenges)
    }

    pub async fn admin_challenge_results(&self) -> Result<Vec<Value>, ApiError> {
        let resp: ResultsEnvelope = self
            .request_json(RequestDescriptor::get("/admin/challenge-results"))
            .await?;
        Ok(resp.results)
    }

    pub async fn admin_challenge_stats(&self) -> Result<Value, ApiError> {
        let resp: StatsEnvelope = self
            .request_json(RequestDescriptor::get("/admin/challenge-stats"))
            .await?;
        Ok(resp.stats)
    }

    pub async fn admin_delete_challenge(&self, id: &str) -> Result<(), ApiError> {
        self.request(RequestDescriptor::delete(format!("/admin/challenges/{}", segment(id))))
            .await
            .map(|_| ())
    }
}
