//! Credential handling for the job board API.
//!
//! This module provides:
//! - `TokenStore`: the single bearer token shared by every client clone
//! - `TokenBackend`: where the token is persisted between runs
//!   (OS keychain, plain-text file, or process memory)
//!
//! The token carries no local expiry. It is dropped when the server answers
//! 401/403 or when the user logs out.

pub mod backend;
pub mod token_store;

pub use backend::{FileBackend, KeyringBackend, MemoryBackend, TokenBackend, TOKEN_KEY};
pub use token_store::{LoadState, TokenStore};
