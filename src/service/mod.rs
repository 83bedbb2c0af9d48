//! Workflow service client.
//!
//! [`ServiceClient`] turns the four workflow operations into HTTP requests,
//! runs every call under a [`RetryPolicy`], and interprets the responses.
//! The executor only sees the [`WorkflowApi`] trait.

mod http;
mod record;
mod retry;
mod transport;

pub use http::ReqwestTransport;
pub use record::{ListPayload, WorkflowRecord, status_name};
pub use retry::RetryPolicy;
pub use transport::{ApiRequest, ApiResponse, Method, Transport};

use crate::constants::{WORKFLOWS_PATH, http as timeouts};
use crate::error::{Error, Result};
use crate::request::{ListQuery, ServiceSettings, SubmitBody};
use std::time::Duration;
use tracing::debug;

/// A response code together with the interpreted payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply<T> {
    /// HTTP status code of the final attempt.
    pub code: u16,
    /// Interpreted body.
    pub payload: T,
}

/// The remote workflow operations.
pub trait WorkflowApi {
    /// Create a workflow.
    fn create(&self, body: &SubmitBody) -> Result<Reply<WorkflowRecord>>;
    /// Request cancellation of a workflow.
    fn cancel(&self, workflow_id: &str) -> Result<Reply<WorkflowRecord>>;
    /// Fetch one workflow.
    fn status(&self, workflow_id: &str) -> Result<Reply<WorkflowRecord>>;
    /// Fetch a page of workflows.
    fn list(&self, query: &ListQuery) -> Result<Reply<ListPayload>>;
}

/// Query parameters for a list call.
pub fn list_params(query: &ListQuery) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    let order = query.range.map(|range| range.order).unwrap_or_default();
    params.push(("$orderby", format!("CreatedDate {}", order.as_str())));
    if let Some(range) = query.range {
        if let Some(skip) = range.skip {
            params.push(("$skip", skip.to_string()));
        }
        if let Some(top) = range.top {
            params.push(("$top", top.to_string()));
        }
    }

    let mut filters = Vec::new();
    if let Some(description) = &query.with_description {
        filters.push(format!("substringof('{description}', Description)"));
    }
    if let Some(process) = &query.with_process {
        filters.push(format!("substringof('{process}', Process)"));
    }
    if let Some(outcome) = query.outcome {
        filters.push(format!("Status eq '{}'", outcome.status_code()));
    }
    if !filters.is_empty() {
        params.push(("$filter", filters.join(" and ")));
    }
    params
}

/// [`WorkflowApi`] over HTTP.
pub struct ServiceClient<T> {
    transport: T,
    base_url: String,
    access_key: String,
    policy: RetryPolicy,
}

impl<T: Transport> ServiceClient<T> {
    /// Create a client with the default retry policy.
    pub fn new(transport: T, settings: &ServiceSettings) -> Self {
        Self {
            transport,
            base_url: format!(
                "{}/{WORKFLOWS_PATH}",
                settings.api_url_base.trim_end_matches('/')
            ),
            access_key: settings.access_key.clone(),
            policy: RetryPolicy::default(),
        }
    }

    /// Replace the retry policy.
    #[must_use]
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Collection URL (`<base>/api/workflows/`).
    pub fn workflows_url(&self) -> &str {
        &self.base_url
    }

    /// URL of a single workflow.
    pub fn workflow_url(&self, workflow_id: &str) -> String {
        format!("{}{workflow_id}", self.base_url)
    }

    fn call(
        &self,
        method: Method,
        url: String,
        body: Option<String>,
        timeout: Duration,
    ) -> Result<ApiResponse> {
        let request = ApiRequest {
            method,
            url,
            access_key: self.access_key.clone(),
            body,
            timeout,
        };
        let response = self.policy.run(|| self.transport.send(&request))?;
        debug!(
            "{} {} -> {} after {} attempt(s)",
            request.method, request.url, response.status, response.attempts
        );
        Ok(response)
    }

    fn record_reply(response: &ApiResponse) -> Reply<WorkflowRecord> {
        Reply {
            code: response.status,
            payload: WorkflowRecord::from_response(response.status, &response.body),
        }
    }
}

impl<T: Transport> WorkflowApi for ServiceClient<T> {
    fn create(&self, body: &SubmitBody) -> Result<Reply<WorkflowRecord>> {
        let json = serde_json::to_string(body).map_err(|e| Error::RequestSerialize { source: e })?;
        let response = self.call(
            Method::Post,
            self.base_url.clone(),
            Some(json),
            timeouts::SUBMIT_TIMEOUT,
        )?;
        Ok(Self::record_reply(&response))
    }

    fn cancel(&self, workflow_id: &str) -> Result<Reply<WorkflowRecord>> {
        let response = self.call(
            Method::Delete,
            self.workflow_url(workflow_id),
            None,
            timeouts::DEFAULT_TIMEOUT,
        )?;
        Ok(Self::record_reply(&response))
    }

    fn status(&self, workflow_id: &str) -> Result<Reply<WorkflowRecord>> {
        let response = self.call(
            Method::Get,
            self.workflow_url(workflow_id),
            None,
            timeouts::DEFAULT_TIMEOUT,
        )?;
        Ok(Self::record_reply(&response))
    }

    fn list(&self, query: &ListQuery) -> Result<Reply<ListPayload>> {
        let url = url::Url::parse_with_params(&self.base_url, list_params(query)).map_err(|e| {
            Error::Internal {
                message: format!("cannot build list URL from '{}': {e}", self.base_url),
            }
        })?;
        let response = self.call(Method::Get, url.into(), None, timeouts::DEFAULT_TIMEOUT)?;
        Ok(Reply {
            code: response.status,
            payload: ListPayload::from_body(&response.body),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::request::Outcome;
    use crate::validate::parse_range;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    #[derive(Default)]
    struct FakeTransport {
        replies: RefCell<VecDeque<std::result::Result<ApiResponse, TransportError>>>,
        requests: RefCell<Vec<ApiRequest>>,
    }

    impl FakeTransport {
        fn replying(replies: Vec<std::result::Result<ApiResponse, TransportError>>) -> Self {
            Self {
                replies: RefCell::new(replies.into()),
                requests: RefCell::default(),
            }
        }
    }

    impl Transport for &FakeTransport {
        fn send(&self, request: &ApiRequest) -> std::result::Result<ApiResponse, TransportError> {
            self.requests.borrow_mut().push(request.clone());
            self.replies.borrow_mut().pop_front().unwrap()
        }
    }

    fn settings() -> ServiceSettings {
        ServiceSettings {
            api_url_base: "https://genomics.example.net/".to_string(),
            access_key: "secret".to_string(),
        }
    }

    fn client(transport: &FakeTransport) -> ServiceClient<&FakeTransport> {
        ServiceClient::new(transport, &settings()).with_policy(RetryPolicy {
            start_delay: Duration::ZERO,
            ..RetryPolicy::default()
        })
    }

    #[test]
    fn test_urls() {
        let transport = FakeTransport::default();
        let client = client(&transport);
        assert_eq!(
            client.workflows_url(),
            "https://genomics.example.net/api/workflows/"
        );
        assert_eq!(
            client.workflow_url("42"),
            "https://genomics.example.net/api/workflows/42"
        );
    }

    #[test]
    fn test_status_retries_then_parses() {
        let transport = FakeTransport::replying(vec![
            Ok(ApiResponse::new(503, "")),
            Ok(ApiResponse::new(200, r#"{"Id": 42, "Status": 10000}"#)),
        ]);
        let reply = client(&transport).status("42").unwrap();
        assert_eq!(reply.code, 200);
        assert_eq!(reply.payload.status, 10_000);

        let requests = transport.requests.borrow();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].method, Method::Get);
        assert_eq!(requests[0].access_key, "secret");
        assert_eq!(requests[0].timeout, timeouts::DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_cancel_uses_delete() {
        let transport = FakeTransport::replying(vec![Ok(ApiResponse::new(404, "{}"))]);
        let reply = client(&transport).cancel("7").unwrap();
        assert_eq!(reply.code, 404);
        let requests = transport.requests.borrow();
        assert_eq!(requests[0].method, Method::Delete);
        assert!(requests[0].url.ends_with("/api/workflows/7"));
    }

    #[test]
    fn test_transport_failure_surfaces_as_error() {
        let transport = FakeTransport::replying(vec![Err(TransportError::Request {
            url: "x".to_string(),
            reason: "bad".to_string(),
        })]);
        let err = client(&transport).status("1").unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }

    #[test]
    fn test_list_params() {
        assert_eq!(
            list_params(&ListQuery::default()),
            vec![("$orderby", "CreatedDate asc".to_string())]
        );

        let query = ListQuery {
            range: Some(parse_range("-3:").unwrap()),
            outcome: Some(Outcome::Fail),
            with_description: Some("trio".to_string()),
            with_process: Some("snap".to_string()),
            ..ListQuery::default()
        };
        assert_eq!(
            list_params(&query),
            vec![
                ("$orderby", "CreatedDate desc".to_string()),
                ("$top", "3".to_string()),
                (
                    "$filter",
                    "substringof('trio', Description) and substringof('snap', Process) \
                     and Status eq '50000'"
                        .to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_list_encodes_query() {
        let transport = FakeTransport::replying(vec![Ok(ApiResponse::new(200, "[]"))]);
        let query = ListQuery {
            outcome: Some(Outcome::Pass),
            ..ListQuery::default()
        };
        let reply = client(&transport).list(&query).unwrap();
        assert_eq!(reply.payload, ListPayload::Records(Vec::new()));
        let url = transport.requests.borrow()[0].url.clone();
        assert!(url.starts_with("https://genomics.example.net/api/workflows/?"));
        assert!(url.contains("%24orderby=CreatedDate+asc"));
        assert!(url.contains("Status+eq+%2720000%27"));
    }
}
