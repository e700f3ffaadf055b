//! HTTP round-trip types and the executor seam.
//!
//! # Design
//! The transport describes every call as a plain-data `HttpRequest` and
//! consumes a plain-data `HttpResponse`; the actual I/O happens behind
//! `HttpExecutor`. This keeps encoding, interceptors and error mapping
//! deterministic and testable without a network. `UreqExecutor` is the
//! default implementation and runs ureq's blocking agent on tokio's
//! blocking pool.

use std::time::Duration;

use async_trait::async_trait;

use crate::config::Credentials;
use crate::error::{Code, RpcError};

/// An outbound HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    pub timeout: Duration,
    pub credentials: Credentials,
}

impl HttpRequest {
    /// First value of a header, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Set a header, replacing any existing values with the same name.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.remove_header(name);
        self.headers.push((name.to_string(), value.into()));
    }

    pub fn remove_header(&mut self, name: &str) {
        self.headers.retain(|(key, _)| !key.eq_ignore_ascii_case(name));
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Performs the network round-trip for a prepared request.
///
/// Non-2xx statuses are returned as `Ok(HttpResponse)`; only failures to
/// obtain a response at all are errors.
#[async_trait]
pub trait HttpExecutor: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, RpcError>;
}

/// Largest response body `UreqExecutor` reads unless told otherwise.
pub const DEFAULT_BODY_LIMIT: u64 = 64 * 1024 * 1024;

/// Default executor backed by a shared `ureq::Agent`.
///
/// Response bodies larger than the body limit fail with
/// `Code::ResourceExhausted`.
#[derive(Clone)]
pub struct UreqExecutor {
    agent: ureq::Agent,
    body_limit: u64,
}

impl UreqExecutor {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self {
            agent,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    pub fn with_body_limit(mut self, bytes: u64) -> Self {
        self.body_limit = bytes;
        self
    }

    fn execute_blocking(&self, request: HttpRequest) -> Result<HttpResponse, RpcError> {
        let mut builder = self
            .agent
            .post(&request.url)
            .config()
            .timeout_global(Some(request.timeout))
            .build();
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let mut response = builder.send(&request.body[..]).map_err(map_ureq_error)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .with_config()
            .limit(self.body_limit)
            .read_to_vec()
            .map_err(map_ureq_error)?;

        Ok(HttpResponse { status, headers, body })
    }
}

impl Default for UreqExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpExecutor for UreqExecutor {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, RpcError> {
        let executor = self.clone();
        tokio::task::spawn_blocking(move || executor.execute_blocking(request))
            .await
            .map_err(|e| RpcError::Transport(format!("executor task failed: {e}")))?
    }
}

fn map_ureq_error(err: ureq::Error) -> RpcError {
    match err {
        ureq::Error::Timeout(_) => RpcError::status(Code::DeadlineExceeded, err.to_string()),
        ureq::Error::BodyExceedsLimit(limit) => RpcError::status(
            Code::ResourceExhausted,
            format!("response body exceeds {limit} bytes"),
        ),
        other => RpcError::Transport(other.to_string()),
    }
}
