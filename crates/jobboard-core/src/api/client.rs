//! API client for the job board REST backend.
//!
//! `ApiClient` turns a [`RequestDescriptor`] into authenticated HTTP attempts,
//! retrying transport failures and 5xx responses with linear backoff, and
//! dropping the stored token when the server rejects it.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use crate::auth::TokenStore;

use super::request::{self, RequestDescriptor};
use super::response::{self, Payload};
use super::retry::RetryPolicy;
use super::transport::{RawResponse, ReqwestTransport, Transport};
use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Base URL used when neither the environment nor the config file sets one.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3001/api";

/// Environment variable overriding the base URL.
pub const API_URL_ENV: &str = "JOBBOARD_API_URL";

// ============================================================================
// Configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Bound on each attempt. Defaults to `None`: an attempt waits for the
    /// server indefinitely unless a timeout is set here.
    pub request_timeout: Option<Duration>,
    pub retry: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: None,
            retry: RetryPolicy::default(),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Defaults, with the base URL taken from `JOBBOARD_API_URL` when set.
    pub fn from_env() -> Self {
        match std::env::var(API_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::with_base_url(url.trim()),
            _ => Self::default(),
        }
    }
}

// ============================================================================
// Call lifecycle
// ============================================================================

/// Where a logical call is in its lifecycle. Recorded in log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    Idle,
    Building,
    Sending,
    RetryScheduled,
    Succeeded,
    AuthFailed,
    Failed,
}

impl CallState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            CallState::Succeeded | CallState::AuthFailed | CallState::Failed
        )
    }
}

// ============================================================================
// Client
// ============================================================================

/// Job board API client.
/// Clone is cheap - clones share the transport and the token store.
#[derive(Clone)]
pub struct ApiClient {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
    tokens: Arc<TokenStore>,
}

impl ApiClient {
    /// Create a client backed by `reqwest`.
    pub fn new(config: ClientConfig, tokens: Arc<TokenStore>) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(config.request_timeout)?;
        Ok(Self::with_transport(config, tokens, Arc::new(transport)))
    }

    pub fn with_transport(
        config: ClientConfig,
        tokens: Arc<TokenStore>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            tokens,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn tokens(&self) -> &Arc<TokenStore> {
        &self.tokens
    }

    pub async fn set_token(&self, token: Option<String>) {
        self.tokens.set(token).await;
    }

    pub async fn is_authenticated(&self) -> bool {
        self.tokens.is_authenticated().await
    }

    /// Forget the stored token without contacting the server.
    pub async fn clear_auth(&self) {
        self.tokens.clear().await;
    }

    /// Run one logical call and decode its JSON payload into `T`.
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        descriptor: RequestDescriptor,
    ) -> Result<T, ApiError> {
        self.request(descriptor).await?.into_json()
    }

    /// Run one logical call.
    ///
    /// The token is read once, before the first attempt; every retry reuses
    /// the same prepared request.
    pub async fn request(&self, descriptor: RequestDescriptor) -> Result<Payload, ApiError> {
        debug!(state = ?CallState::Building, method = %descriptor.method, path = %descriptor.path, "Building request");
        let credential = self.tokens.get().await;
        let prepared = request::prepare(&self.config.base_url, &descriptor, credential.as_deref())?;

        let policy = &self.config.retry;
        let method = &prepared.method;
        let url = &prepared.url;
        let mut attempt: u32 = 1;

        loop {
            debug!(state = ?CallState::Sending, attempt, %method, %url, "Sending request");

            let err = match self.transport.send(&prepared).await {
                Ok(raw) if raw.status.is_success() => {
                    debug!(state = ?CallState::Succeeded, attempt, %method, %url, status = %raw.status, "Request succeeded");
                    return response::interpret(raw);
                }
                Ok(raw) => match self.classify(raw).await {
                    ApiError::Server { status, .. }
                        if policy.should_retry_status(status, method, attempt) =>
                    {
                        warn!(state = ?CallState::RetryScheduled, attempt, %method, %url, %status, "Server error, retrying");
                        self.backoff(attempt).await;
                        attempt += 1;
                        continue;
                    }
                    err => err,
                },
                Err(transport_err) => {
                    if policy.should_retry_transport(&transport_err, method, attempt) {
                        warn!(state = ?CallState::RetryScheduled, attempt, %method, %url, error = %transport_err, "Request failed, retrying");
                        self.backoff(attempt).await;
                        attempt += 1;
                        continue;
                    }
                    ApiError::from(transport_err)
                }
            };

            let state = if err.is_authentication() {
                CallState::AuthFailed
            } else {
                CallState::Failed
            };
            error!(state = ?state, attempt, %method, %url, kind = ?err.kind(), error = %err, "API request failed");
            return Err(err);
        }
    }

    /// Classify a failed response, clearing the token on 401/403.
    async fn classify(&self, raw: RawResponse) -> ApiError {
        let err = response::classify_failure(&raw);
        if err.is_authentication() {
            debug!(status = %raw.status, "Credential rejected, clearing stored token");
            self.tokens.clear().await;
        }
        err
    }

    async fn backoff(&self, attempt: u32) {
        let delay = self.config.retry.delay_for(attempt);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
