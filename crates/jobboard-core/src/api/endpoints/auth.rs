use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiError, RequestDescriptor};
use crate::models::{AuthResponse, Registration, User};

/// Backend message for a token whose account no longer exists.
pub const USER_NOT_FOUND: &str = "User not found";

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

impl ApiClient {
    /// Log in and store the returned token before resolving.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let descriptor =
            RequestDescriptor::post("/auth/login").json(&LoginRequest { email, password })?;
        let resp = self.authenticate(descriptor).await?;
        info!(user_id = %resp.user.id, "Login successful");
        Ok(resp)
    }

    /// Create an account. Like `login`, any returned token is stored.
    pub async fn register(&self, registration: &Registration) -> Result<AuthResponse, ApiError> {
        let descriptor = RequestDescriptor::post("/auth/register").json(registration)?;
        let resp = self.authenticate(descriptor).await?;
        info!(user_id = %resp.user.id, role = resp.user.role.as_str(), "Registration successful");
        Ok(resp)
    }

    /// Tell the server, then forget the local token whatever the server said.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = self.request(RequestDescriptor::post("/auth/logout")).await;
        self.clear_auth().await;
        if let Err(ref e) = result {
            warn!(error = %e, "Remote logout failed, local token cleared anyway");
        }
        result.map(|_| ())
    }

    /// The account behind the current token.
    ///
    /// A rejected token is cleared by the client; a token whose user was
    /// deleted is cleared here.
    pub async fn current_user(&self) -> Result<User, ApiError> {
        let result = self.request_json(RequestDescriptor::get("/auth/me")).await;
        if let Err(ApiError::Client { ref message, .. }) = result {
            if message == USER_NOT_FOUND {
                debug!("Token refers to a missing user, clearing it");
                self.clear_auth().await;
            }
        }
        result
    }

    pub async fn update_current_user<B: Serialize + ?Sized>(
        &self,
        updates: &B,
    ) -> Result<User, ApiError> {
        self.request_json(RequestDescriptor::put("/auth/me").json(updates)?)
            .await
    }

    async fn authenticate(&self, descriptor: RequestDescriptor) -> Result<AuthResponse, ApiError> {
        let body: Value = self.request_json(descriptor).await?;

        if let Some(token) = body.get("token").and_then(Value::as_str) {
            self.set_token(Some(token.to_string())).await;
        }

        serde_json::from_value(body)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse auth response: {}", e)))
    }
}
