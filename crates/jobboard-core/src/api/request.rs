//! Request descriptors and their conversion into wire-ready requests.

use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, Url};
use serde::Serialize;
use serde_json::Value;

use super::ApiError;

/// Body of an outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Structured value, serialized to JSON text when the request is built.
    Json(Value),
    /// Sent unchanged.
    Text(String),
    /// Sent unchanged.
    Bytes(Vec<u8>),
}

/// What a single logical call asks for, before credentials are attached.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    pub path: String,
    pub body: Option<RequestBody>,
    /// Caller header overrides, validated when the request is prepared.
    pub headers: Vec<(String, String)>,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a structured body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to serialize body: {}", e)))?;
        self.body = Some(RequestBody::Json(value));
        Ok(self)
    }

    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.body = Some(RequestBody::Text(body.into()));
        self
    }

    pub fn bytes(mut self, body: Vec<u8>) -> Self {
        self.body = Some(RequestBody::Bytes(body));
        self
    }

    /// Override a header. Overrides win over the defaults, including
    /// `Authorization`.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Append URL-encoded query parameters. An empty set leaves the path alone.
    pub fn query<K, V>(mut self, params: &[(K, V)]) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        if params.is_empty() {
            return self;
        }
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in params {
            serializer.append_pair(key.as_ref(), value.as_ref());
        }
        let separator = if self.path.contains('?') { '&' } else { '?' };
        self.path = format!("{}{}{}", self.path, separator, serializer.finish());
        self
    }
}

/// A fully-formed request: absolute URL, merged headers, encoded body.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl PreparedRequest {
    /// Header value as text, for logging and assertions.
    pub fn header_str(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Build the request for `descriptor` against `base_url`.
///
/// `credential` is read once by the caller; a token change after this point
/// does not affect the returned request.
pub fn prepare(
    base_url: &str,
    descriptor: &RequestDescriptor,
    credential: Option<&str>,
) -> Result<PreparedRequest, ApiError> {
    let url = join_url(base_url, &descriptor.path)?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );

    for (name, value) in &descriptor.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ApiError::InvalidRequest(format!("Invalid header name {}: {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ApiError::InvalidRequest(format!("Invalid value for {}: {}", name, e)))?;
        headers.insert(name, value);
    }

    if let Some(token) = credential {
        if !headers.contains_key(header::AUTHORIZATION) {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ApiError::InvalidRequest(format!("Invalid bearer token: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }
    }

    let body = match &descriptor.body {
        None => None,
        Some(RequestBody::Json(value)) => Some(
            serde_json::to_vec(value)
                .map_err(|e| ApiError::InvalidRequest(format!("Failed to encode body: {}", e)))?,
        ),
        Some(RequestBody::Text(text)) => Some(text.clone().into_bytes()),
        Some(RequestBody::Bytes(bytes)) => Some(bytes.clone()),
    };

    Ok(PreparedRequest {
        method: descriptor.method.clone(),
        url,
        headers,
        body,
    })
}

fn join_url(base_url: &str, path: &str) -> Result<Url, ApiError> {
    let base = base_url.trim_end_matches('/');
    let full = if path.is_empty() {
        base.to_string()
    } else if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    };
    Url::parse(&full).map_err(|e| ApiError::InvalidRequest(format!("Invalid URL {}: {}", full, e)))
}
