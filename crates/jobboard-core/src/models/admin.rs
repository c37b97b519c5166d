//! Admin dashboard and form configuration.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::User;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase", default)]
pub struct AdminStats {
    pub total_users: u64,
    pub total_jobs: u64,
    pub total_applications: u64,
    pub active_jobs: u64,
    pub pending_applications: u64,
    pub jobseekers: u64,
    pub companies: u64,
}

/// A configurable field on the jobseeker or company profile form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct FormField {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub order: i32,
    pub form_type: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(flatten)]
    #[cfg_attr(feature = "ts", ts(skip))]
    pub extra: Map<String, Value>,
}

fn default_visible() -> bool {
    true
}

/// Filters for `GET /admin/users`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub role: Option<String>,
    pub search: Option<String>,
}

impl UserQuery {
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(ref role) = self.role {
            params.push(("role", role.clone()));
        }
        if let Some(ref search) = self.search {
            params.push(("search", search.clone()));
        }
        params
    }
}

/// `GET /admin/users` answers `{ users: [...], pagination }` or a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum UsersResponse {
    Wrapped { users: Vec<User> },
    Bare(Vec<User>),
}

impl From<UsersResponse> for Vec<User> {
    fn from(resp: UsersResponse) -> Self {
        match resp {
            UsersResponse::Wrapped { users } => users,
            UsersResponse::Bare(users) => users,
        }
    }
}
