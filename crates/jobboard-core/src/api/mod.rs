//! REST API client module for the job board backend.
//!
//! A logical call flows through these pieces in order:
//! `request` (descriptor → prepared request with bearer token),
//! `transport` (one physical attempt), `retry` (whether and when to try
//! again), `response` (payload or classified error). `client` ties them
//! together and `endpoints` holds the named operations.

pub mod client;
pub mod endpoints;
pub mod error;
pub mod request;
pub mod response;
pub mod retry;
pub mod transport;

pub use client::{ApiClient, CallState, ClientConfig, API_URL_ENV, DEFAULT_API_BASE_URL};
pub use error::{ApiError, ErrorKind, TransportError};
pub use request::{PreparedRequest, RequestBody, RequestDescriptor};
pub use response::{ErrorBody, Payload};
pub use retry::RetryPolicy;
pub use transport::{RawResponse, ReqwestTransport, Transport};
