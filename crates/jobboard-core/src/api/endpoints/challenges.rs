use serde::Serialize;
use serde_json::json;

use super::segment;
use crate::api::{ApiClient, ApiError, RequestDescriptor};
use crate::models::challenge::GeneratedChallenges;
use crate::models::{Challenge, ChallengeResult, GenerateChallenges, ScoreUpdate};

impl ApiClient {
    pub async fn challenges_for_job(&self, job_id: &str) -> Result<Vec<Challenge>, ApiError> {
        self.request_json(RequestDescriptor::get(format!("/challenges/job/{}", segment(job_id))))
            .await
    }

    pub async fn challenge(&self, id: &str) -> Result<Challenge, ApiError> {
        self.request_json(RequestDescriptor::get(format!("/challenges/{}", segment(id))))
            .await
    }

    pub async fn create_challenge<B: Serialize + ?Sized>(
        &self,
        challenge: &B,
    ) -> Result<Challenge, ApiError> {
        self.request_json(RequestDescriptor::post("/challenges").json(challenge)?)
            .await
    }

    pub async fn update_challenge<B: Serialize + ?Sized>(
        &self,
        id: &str,
        updates: &B,
    ) -> Result<Challenge, ApiError> {
        let descriptor =
            RequestDescriptor::put(format!("/challenges/{}", segment(id))).json(updates)?;
        self.request_json(descriptor).await
    }

    pub async fn delete_challenge(&self, id: &str) -> Result<(), ApiError> {
        self.request(RequestDescriptor::delete(format!("/challenges/{}", segment(id))))
            .await
            .map(|_| ())
    }

    /// Template-based challenges for a job. They are returned, not saved;
    /// use [`ApiClient::create_challenge`] to keep one.
    pub async fn generate_ai_challenges(
        &self,
        params: &GenerateChallenges,
    ) -> Result<Vec<Challenge>, ApiError> {
        let descriptor = RequestDescriptor::post("/challenges/generate-ai").json(params)?;
        let resp: GeneratedChallenges = self.request_json(descriptor).await?;
        Ok(resp.challenges)
    }

    pub async fn submit_challenge(
        &self,
        challenge_id: &str,
        application_id: &str,
        submission: &str,
    ) -> Result<ChallengeResult, ApiError> {
        let descriptor =
            RequestDescriptor::post(format!("/challenges/{}/submit", segment(challenge_id)))
                .json(&json!({ "application_id": application_id, "submission": submission }))?;
        self.request_json(descriptor).await
    }

    pub async fn challenge_results(&self, challenge_id: &str) -> Result<Vec<ChallengeResult>, ApiError> {
        self.request_json(RequestDescriptor::get(format!(
            "/challenges/{}/results",
            segment(challenge_id)
        )))
        .await
    }

    pub async fn score_challenge_result(
        &self,
        result_id: &str,
        score: &ScoreUpdate,
    ) -> Result<ChallengeResult, ApiError> {
        let descriptor =
            RequestDescriptor::put(format!("/challenges/results/{}/score", segment(result_id)))
                .json(score)?;
        self.request_json(descriptor).await
    }

    /// Results submitted by the current candidate.
    pub async fn my_challenges(&self) -> Result<Vec<ChallengeResult>, ApiError> {
        self.request_json(RequestDescriptor::get("/challenges/my-challenges"))
            .await
    }
}
