//! Core library for jobboard.
//!
//! A resilient client for the forensic accounting job board REST API:
//! bearer-token handling, linear retry with backoff, typed errors, and the
//! named operations (auth, jobs, applications, challenges, admin, payments).
//!
//! ```no_run
//! use std::sync::Arc;
//! use jobboard_core::{ApiClient, ClientConfig, JobFilter, TokenStore};
//!
//! # async fn run() -> Result<(), jobboard_core::ApiError> {
//! let tokens = Arc::new(TokenStore::in_memory());
//! let client = ApiClient::new(ClientConfig::from_env(), tokens)?;
//! client.login("kim@example.com", "secret").await?;
//! let jobs = client.jobs(&JobFilter::search("fraud")).await?;
//! # let _ = jobs;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod models;

pub use api::{ApiClient, ApiError, ClientConfig, ErrorKind, Payload, RequestDescriptor, RetryPolicy};
pub use auth::{TokenBackend, TokenStore};
pub use config::{Config, TokenStorage};
pub use models::*;
