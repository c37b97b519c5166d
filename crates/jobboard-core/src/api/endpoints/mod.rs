//! Named operations of the job board API.
//!
//! Each operation is a thin `impl ApiClient` method with a fixed method and
//! path; retry, authentication and error handling live in the client.

mod admin;
mod applications;
mod auth;
mod challenges;
mod jobs;
mod payments;
mod users;

use serde::Deserialize;
use url::Url;

pub use auth::USER_NOT_FOUND;

/// Percent-encode an id for use as a single path segment.
pub(crate) fn segment(id: &str) -> String {
    let Ok(mut url) = Url::parse("http://segment.invalid/") else {
        return id.to_string();
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.clear().push(id);
    }
    url.path().trim_start_matches('/').to_string()
}

/// `{ "message": "..." }` acknowledgement body.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Ack {
    #[serde(default)]
    pub message: Option<String>,
}
