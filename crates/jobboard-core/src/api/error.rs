use reqwest::StatusCode;
use thiserror::Error;

/// Message used when the server rejects a credential without saying why.
pub const DEFAULT_AUTH_MESSAGE: &str = "Authentication failed";

/// Message substituted when an error body is missing or not JSON.
pub const PARSE_FALLBACK_MESSAGE: &str = "Network error";

/// Maximum length for response bodies quoted in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Failure before any HTTP response was received.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The connection was never established, so the request was not delivered.
    #[error("Connection failed: {0}")]
    Connect(String),

    /// The request may have reached the server (timeout, reset, body error).
    #[error("Request failed: {0}")]
    Request(String),
}

impl TransportError {
    /// True when the server cannot have seen the request.
    pub fn is_connect(&self) -> bool {
        matches!(self, TransportError::Connect(_))
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

/// Machine-readable tag for an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Transport,
    Authentication,
    Server,
    Client,
    InvalidResponse,
    InvalidRequest,
}

/// Every failure a logical call can surface.
///
/// `Display` is the human-readable message callers are expected to show;
/// branch on [`ApiError::kind`] rather than on the text.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Transport(#[from] TransportError),

    /// 401/403. The stored credential has already been cleared.
    #[error("{message}")]
    Authentication { status: StatusCode, message: String },

    /// 5xx after the retry ceiling was reached (or retry was not allowed).
    #[error("{message}")]
    Server { status: StatusCode, message: String },

    /// Any other non-success status. Never retried.
    #[error("{message}")]
    Client { status: StatusCode, message: String },

    /// A success response whose body did not match the declared content.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The request could not be assembled (bad URL, header or body).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Transport(_) => ErrorKind::Transport,
            ApiError::Authentication { .. } => ErrorKind::Authentication,
            ApiError::Server { .. } => ErrorKind::Server,
            ApiError::Client { .. } => ErrorKind::Client,
            ApiError::InvalidResponse(_) => ErrorKind::InvalidResponse,
            ApiError::InvalidRequest(_) => ErrorKind::InvalidRequest,
        }
    }

    /// HTTP status of the failed response, if one was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Authentication { status, .. }
            | ApiError::Server { status, .. }
            | ApiError::Client { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn is_authentication(&self) -> bool {
        self.kind() == ErrorKind::Authentication
    }

    /// Classify a non-success response.
    ///
    /// `server_message` is whatever the error body carried; when absent the
    /// kind's default message is used.
    pub fn from_status(status: StatusCode, server_message: Option<String>) -> Self {
        match status.as_u16() {
            401 | 403 => ApiError::Authentication {
                status,
                message: server_message.unwrap_or_else(|| DEFAULT_AUTH_MESSAGE.to_string()),
            },
            500..=599 => ApiError::Server {
                status,
                message: server_message.unwrap_or_else(|| http_status_message(status)),
            },
            _ => ApiError::Client {
                status,
                message: server_message.unwrap_or_else(|| http_status_message(status)),
            },
        }
    }

    /// Truncate a response body to avoid logging excessive data
    pub(crate) fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }
}

fn http_status_message(status: StatusCode) -> String {
    format!("HTTP {}", status.as_u16())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_classifies_auth() {
        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, None);
        assert_eq!(err.kind(), ErrorKind::Authentication);
        assert_eq!(err.to_string(), DEFAULT_AUTH_MESSAGE);

        let err = ApiError::from_status(StatusCode::FORBIDDEN, Some("Access denied".into()));
        assert_eq!(err.kind(), ErrorKind::Authentication);
        assert_eq!(err.to_string(), "Access denied");
    }

    #[test]
    fn test_from_status_defaults_to_http_code() {
        let err = ApiError::from_status(StatusCode::NOT_FOUND, None);
        assert_eq!(err.kind(), ErrorKind::Client);
        assert_eq!(err.to_string(), "HTTP 404");
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));

        let err = ApiError::from_status(StatusCode::BAD_GATEWAY, None);
        assert_eq!(err.kind(), ErrorKind::Server);
        assert_eq!(err.to_string(), "HTTP 502");
    }

    #[test]
    fn test_transport_error_has_no_status() {
        let err: ApiError = TransportError::Connect("refused".into()).into();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.status(), None);
        assert_eq!(err.message(), "Connection failed: refused");
    }

    #[test]
    fn test_truncate_body() {
        assert_eq!(ApiError::truncate_body("short"), "short");
        let long = "x".repeat(600);
        let truncated = ApiError::truncate_body(&long);
        assert!(truncated.starts_with(&"x".repeat(500)));
        assert!(truncated.ends_with("(truncated, 600 total bytes)"));
    }
}
