//! Driven port for the single outbound HTTP interception point.
//!
//! Adapters attach the stored bearer credential and forward requests. They
//! return every HTTP response as-is, whatever its status; classifying error
//! statuses is the query layer's job.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use super::define_port_error;

define_port_error! {
    /// Failures raised before any HTTP response was received.
    pub enum GatewayError {
        /// Connection, TLS, or body transfer failed.
        Transport { message: String } => "api transport failed: {message}",
        /// The request exceeded the configured timeout.
        Timeout { message: String } => "api request timed out: {message}",
        /// The request could not be built (bad base address or path).
        InvalidRequest { message: String } => "api request invalid: {message}",
        /// The credential store could not be read.
        Credentials { message: String } => "api credentials unavailable: {message}",
    }
}

/// HTTP methods used by the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
}

impl ApiMethod {
    /// Upper-case method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for ApiMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Path below the configured base address, kept as raw segments so adapters
/// can percent-encode each one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApiPath(Vec<String>);

impl ApiPath {
    /// Build a path from segments.
    #[must_use]
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Append one segment.
    #[must_use]
    pub fn join(mut self, segment: impl Into<String>) -> Self {
        self.0.push(segment.into());
        self
    }

    /// Raw segments in order.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        self.0.as_slice()
    }
}

impl fmt::Display for ApiPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.0 {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

/// Outbound request description.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: ApiMethod,
    /// Path below the base address.
    pub path: ApiPath,
    /// Query parameters in wire order.
    pub query: Vec<(String, String)>,
    /// JSON body, if any.
    pub body: Option<Value>,
}

impl ApiRequest {
    fn new(method: ApiMethod, path: ApiPath, body: Option<Value>) -> Self {
        Self {
            method,
            path,
            query: Vec::new(),
            body,
        }
    }

    /// `GET path`
    #[must_use]
    pub fn get(path: ApiPath) -> Self {
        Self::new(ApiMethod::Get, path, None)
    }

    /// `POST path` with a JSON body.
    #[must_use]
    pub fn post(path: ApiPath, body: Value) -> Self {
        Self::new(ApiMethod::Post, path, Some(body))
    }

    /// `PUT path` with a JSON body.
    #[must_use]
    pub fn put(path: ApiPath, body: Value) -> Self {
        Self::new(ApiMethod::Put, path, Some(body))
    }

    /// `DELETE path`
    #[must_use]
    pub fn delete(path: ApiPath) -> Self {
        Self::new(ApiMethod::Delete, path, None)
    }

    /// Attach query parameters.
    #[must_use]
    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }
}

/// Raw HTTP response handed back to the query layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Undecoded body bytes.
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Build a response from a status and body.
    #[must_use]
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Build a response with a JSON body.
    #[must_use]
    pub fn json(status: u16, body: &Value) -> Self {
        Self::new(status, body.to_string())
    }

    /// Whether the status is in the 2xx range.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Outbound HTTP gateway.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApiGateway: Send + Sync {
    /// Send a request with the current credential attached, if any.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, GatewayError>;
}
