//! Job postings and listing filters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Job {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub employment_type: Option<String>,
    #[serde(default)]
    pub experience_level: Option<String>,
    #[serde(default)]
    pub salary_range_min: Option<f64>,
    #[serde(default)]
    pub salary_range_max: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    #[cfg_attr(feature = "ts", ts(skip))]
    pub extra: Map<String, Value>,
}

impl Job {
    /// Salary range for display, e.g. `$80,000 - $120,000`.
    pub fn salary_display(&self) -> Option<String> {
        match (self.salary_range_min, self.salary_range_max) {
            (Some(min), Some(max)) => Some(format!("{} - {}", format_dollars(min), format_dollars(max))),
            (Some(min), None) => Some(format!("From {}", format_dollars(min))),
            (None, Some(max)) => Some(format!("Up to {}", format_dollars(max))),
            (None, None) => None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.as_deref().map(|s| s.eq_ignore_ascii_case("active")).unwrap_or(true)
    }
}

fn format_dollars(amount: f64) -> String {
    let whole = amount.round() as i64;
    let digits = whole.abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if whole < 0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

/// Query parameters accepted by `GET /jobs`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFilter {
    pub search: Option<String>,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub experience_level: Option<String>,
    pub status: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl JobFilter {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
            ..Self::default()
        }
    }

    /// Set parameters in a stable order; unset ones are omitted.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        let text = [
            ("search", &self.search),
            ("location", &self.location),
            ("employment_type", &self.employment_type),
            ("experience_level", &self.experience_level),
            ("status", &self.status),
        ];
        for (key, value) in text {
            if let Some(v) = value {
                params.push((key, v.clone()));
            }
        }
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }
}

/// `GET /jobs` answers either with a bare array or with `{ jobs: [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum JobsResponse {
    Wrapped { jobs: Vec<Job> },
    Bare(Vec<Job>),
}

impl From<JobsResponse> for Vec<Job> {
    fn from(resp: JobsResponse) -> Self {
        match resp {
            JobsResponse::Wrapped { jobs } => jobs,
            JobsResponse::Bare(jobs) => jobs,
        }
    }
}
