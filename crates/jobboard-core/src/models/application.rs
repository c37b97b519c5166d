//! Job applications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Job;

/// Status values the backend uses for applications.
pub mod status {
    pub const PENDING: &str = "pending";
    pub const REVIEWED: &str = "reviewed";
    pub const ACCEPTED: &str = "accepted";
    pub const REJECTED: &str = "rejected";
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Application {
    pub id: String,
    pub job_post_id: String,
    #[serde(default)]
    pub jobseeker_user_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub cover_letter: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Included by the backend on some listings.
    #[serde(default)]
    pub job_post: Option<Job>,
    #[serde(flatten)]
    #[cfg_attr(feature = "ts", ts(skip))]
    pub extra: Map<String, Value>,
}

impl Application {
    pub fn is_pending(&self) -> bool {
        self.status.as_deref() == Some(status::PENDING)
    }
}

/// Candidate-supplied part of an application; the job id is added by
/// [`crate::api::ApiClient::apply_to_job`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct NewApplication {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_expectation: Option<f64>,
    #[serde(flatten)]
    #[cfg_attr(feature = "ts", ts(skip))]
    pub extra: Map<String, Value>,
}

impl NewApplication {
    pub fn with_cover_letter(cover_letter: impl Into<String>) -> Self {
        Self {
            cover_letter: Some(cover_letter.into()),
            ..Self::default()
        }
    }
}
