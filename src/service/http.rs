//! HTTP transport backed by reqwest.

use crate::constants::{ACCESS_KEY_HEADER, USER_AGENT, http};
use crate::error::{Error, Result, TransportError};
use crate::service::transport::{ApiRequest, ApiResponse, Method, Transport};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;

/// Blocking [`Transport`] running reqwest on a private tokio runtime.
pub struct ReqwestTransport {
    runtime: tokio::runtime::Runtime,
    client: Client,
}

impl ReqwestTransport {
    /// Create the runtime and HTTP client.
    pub fn new() -> Result<Self> {
        let runtime = tokio::runtime::Runtime::new().map_err(|e| Error::Internal {
            message: format!("Failed to create async runtime: {e}"),
        })?;

        let client = Client::builder()
            .connect_timeout(http::CONNECT_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Internal {
                message: format!("Failed to create HTTP client: {e}"),
            })?;

        Ok(Self { runtime, client })
    }

    fn classify(url: &str, e: &reqwest::Error) -> TransportError {
        if e.is_timeout() {
            TransportError::Timeout {
                url: url.to_string(),
            }
        } else if e.is_connect() || e.is_request() || e.is_body() {
            TransportError::Connect {
                url: url.to_string(),
                reason: e.to_string(),
            }
        } else {
            TransportError::Request {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    }

    async fn exchange(&self, request: &ApiRequest) -> std::result::Result<ApiResponse, TransportError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self
            .client
            .request(method, &request.url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCESS_KEY_HEADER, &request.access_key)
            .timeout(request.timeout);
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Self::classify(&request.url, &e))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Self::classify(&request.url, &e))?;

        Ok(ApiResponse::new(status, body))
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: &ApiRequest) -> std::result::Result<ApiResponse, TransportError> {
        tracing::debug!("{} {}", request.method, request.url);
        self.runtime.block_on(self.exchange(request))
    }
}
