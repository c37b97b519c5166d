//! Take-home challenges and their results.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Topics the backend has generation templates for. Any other topic falls
/// back to fraud detection on the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "snake_case")]
pub enum ChallengeTopic {
    FraudDetection,
    FinancialInvestigation,
    LitigationSupport,
}

impl ChallengeTopic {
    pub const ALL: [ChallengeTopic; 3] = [
        ChallengeTopic::FraudDetection,
        ChallengeTopic::FinancialInvestigation,
        ChallengeTopic::LitigationSupport,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChallengeTopic::FraudDetection => "fraud_detection",
            ChallengeTopic::FinancialInvestigation => "financial_investigation",
            ChallengeTopic::LitigationSupport => "litigation_support",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Challenge {
    /// Absent on freshly generated challenges that were not saved yet.
    #[serde(default)]
    pub id: Option<String>,
    pub job_id: String,
    #[serde(rename = "type", default)]
    pub challenge_type: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub answer_key: Option<String>,
    #[serde(default)]
    pub scoring_rubric: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(flatten)]
    #[cfg_attr(feature = "ts", ts(skip))]
    pub extra: Map<String, Value>,
}

/// Body of `POST /challenges/generate-ai`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct GenerateChallenges {
    pub job_id: String,
    pub topic: String,
    pub difficulty: String,
    pub count: u32,
}

impl GenerateChallenges {
    pub fn new(job_id: impl Into<String>, topic: ChallengeTopic, difficulty: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            topic: topic.as_str().to_string(),
            difficulty: difficulty.into(),
            count: 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct GeneratedChallenges {
    #[serde(default)]
    pub challenges: Vec<Challenge>,
}

/// A candidate's submission and its scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ChallengeResult {
    pub id: String,
    pub challenge_id: String,
    #[serde(default)]
    pub application_id: Option<String>,
    #[serde(default)]
    pub candidate_id: Option<String>,
    #[serde(default)]
    pub submission: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub flagged: Option<bool>,
    #[serde(flatten)]
    #[cfg_attr(feature = "ts", ts(skip))]
    pub extra: Map<String, Value>,
}

/// Body of `PUT /challenges/results/:id/score`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ScoreUpdate {
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flagged: Option<bool>,
}
