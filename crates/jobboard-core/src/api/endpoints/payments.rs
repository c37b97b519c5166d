use serde_json::{json, Value};

use crate::api::{ApiClient, ApiError, RequestDescriptor};
use crate::models::{
    CheckoutSessionRequest, PaymentIntent, PaymentIntentRequest, PaymentTier, SubscriptionStatus,
};

impl ApiClient {
    /// Start a one-off payment, optionally tied to a job posting.
    pub async fn create_payment_intent(
        &self,
        amount: u64,
        job_post_id: Option<&str>,
        tier: PaymentTier,
    ) -> Result<PaymentIntent, ApiError> {
        let body = PaymentIntentRequest {
            amount,
            job_post_id: job_post_id.map(str::to_string),
            tier,
        };
        let descriptor = RequestDescriptor::post("/payments/create-payment-intent").json(&body)?;
        self.request_json(descriptor).await
    }

    pub async fn create_subscription(&self, price_id: &str) -> Result<Value, ApiError> {
        let descriptor = RequestDescriptor::post("/payments/create-subscription")
            .json(&json!({ "priceId": price_id }))?;
        self.request_json(descriptor).await
    }

    pub async fn cancel_subscription(&self, subscription_id: &str) -> Result<Value, ApiError> {
        let descriptor = RequestDescriptor::post("/payments/cancel-subscription")
            .json(&json!({ "subscriptionId": subscription_id }))?;
        self.request_json(descriptor).await
    }

    pub async fn subscription_status(&self) -> Result<SubscriptionStatus, ApiError> {
        self.request_json(RequestDescriptor::get("/payments/subscription-status"))
            .await
    }

    pub async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<Value, ApiError> {
        let descriptor =
            RequestDescriptor::post("/payments/create-checkout-session").json(request)?;
        self.request_json(descriptor).await
    }
}
