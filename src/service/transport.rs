//! HTTP exchange abstraction.

use crate::error::TransportError;
use std::time::Duration;

/// HTTP method used by the workflow API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Read.
    Get,
    /// Create.
    Post,
    /// Cancel.
    Delete,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// A fully prepared request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL including any query string.
    pub url: String,
    /// Service access key.
    pub access_key: String,
    /// JSON body.
    pub body: Option<String>,
    /// Per-call timeout.
    pub timeout: Duration,
}

/// Raw response from the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body text.
    pub body: String,
    /// Calls made to obtain this response, retries included.
    pub attempts: u32,
}

impl ApiResponse {
    /// Response from a single call.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            attempts: 1,
        }
    }
}

/// Sends a single request without retrying.
pub trait Transport {
    /// Exchange one request for one response.
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError>;
}
