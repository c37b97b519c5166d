//! Turning raw responses into payloads or classified errors.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::PARSE_FALLBACK_MESSAGE;
use super::transport::RawResponse;
use super::ApiError;

/// Body of a successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Text(String),
}

impl Payload {
    /// Decode into `T`. A text payload is decoded if it happens to hold JSON.
    pub fn into_json<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        match self {
            Payload::Json(value) => serde_json::from_value(value)
                .map_err(|e| ApiError::InvalidResponse(format!("Unexpected response shape: {}", e))),
            Payload::Text(text) => serde_json::from_str(&text).map_err(|e| {
                ApiError::InvalidResponse(format!(
                    "Expected JSON, got text ({}): {}",
                    e,
                    ApiError::truncate_body(&text)
                ))
            }),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(value) => Some(value),
            Payload::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(text) => Some(text),
            Payload::Json(_) => None,
        }
    }
}

/// Interpret a 2xx response according to its declared content type.
pub fn interpret(raw: RawResponse) -> Result<Payload, ApiError> {
    if raw.is_json() {
        serde_json::from_slice(&raw.body)
            .map(Payload::Json)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse JSON response: {}", e)))
    } else {
        Ok(Payload::Text(String::from_utf8_lossy(&raw.body).into_owned()))
    }
}

/// Error body as sent by the backend: `{ "error": "..." }`, sometimes `message`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: Option<String>,
    pub message: Option<String>,
}

impl ErrorBody {
    /// Parse an error body. Anything that is not JSON becomes
    /// `{ message: "Network error" }` instead of a parse failure.
    pub fn parse(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(value) => Self {
                error: string_field(&value, "error"),
                message: string_field(&value, "message"),
            },
            Err(_) => Self {
                error: None,
                message: Some(PARSE_FALLBACK_MESSAGE.to_string()),
            },
        }
    }

    /// The message to surface: `error` first, then `message`.
    pub fn into_message(self) -> Option<String> {
        self.error.or(self.message)
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Classify a non-2xx response.
pub fn classify_failure(raw: &RawResponse) -> ApiError {
    let message = ErrorBody::parse(&raw.body).into_message();
    ApiError::from_status(raw.status, message)
}
