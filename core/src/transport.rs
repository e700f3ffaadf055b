//! Connect unary transport.
//!
//! # Design
//! A `Transport` is immutable once built: endpoint, wire format, credentials
//! mode, timeout and the interceptor chain are all fixed by `build`. No I/O
//! happens at build time; a bad URL or unreachable host only surfaces when
//! a call is attempted.
//!
//! A unary call is a `POST {base_url}/{service}/{method}` whose body is the
//! request message in the configured codec. HTTP 200 carries the response
//! message; anything else carries a JSON Connect error.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use epistemic_proto::SERVICE_NAME;
use prost::Message;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::{ClientConfig, Credentials, WireFormat};
use crate::error::{Code, RpcError};
use crate::http::{HttpExecutor, HttpRequest, HttpResponse};
use crate::interceptor::{self, Interceptor, ORIGIN_HEADER};

pub const PROTOCOL_VERSION_HEADER: &str = "connect-protocol-version";
pub const TIMEOUT_HEADER: &str = "connect-timeout-ms";

pub struct Transport {
    base_url: String,
    format: WireFormat,
    credentials: Credentials,
    timeout: Duration,
    interceptors: Vec<Box<dyn Interceptor>>,
    executor: Arc<dyn HttpExecutor>,
}

impl Transport {
    /// Build a transport from `config` with the key and origin resolved by
    /// the caller. Interceptors are installed auth first, origin second.
    pub fn build(
        config: &ClientConfig,
        api_key: Option<String>,
        origin: &str,
        executor: Arc<dyn HttpExecutor>,
    ) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            format: config.wire_format(),
            credentials: config.credentials,
            timeout: config.timeout(),
            interceptors: interceptor::default_chain(api_key, origin),
            executor,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn format(&self) -> WireFormat {
        self.format
    }

    pub fn credentials(&self) -> Credentials {
        self.credentials
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn procedure_url(&self, method: &str) -> String {
        format!("{}/{}/{}", self.base_url, SERVICE_NAME, method)
    }

    /// Prepare the HTTP request for one unary call, interceptors applied.
    pub fn build_request<Req>(&self, method: &str, message: &Req) -> Result<HttpRequest, RpcError>
    where
        Req: Message + Serialize,
    {
        let body = match self.format {
            WireFormat::Json => serde_json::to_vec(message).map_err(|e| RpcError::Encode(e.to_string()))?,
            WireFormat::Binary => message.encode_to_vec(),
        };

        let mut request = HttpRequest {
            url: self.procedure_url(method),
            headers: vec![
                ("content-type".to_string(), self.format.content_type().to_string()),
                (PROTOCOL_VERSION_HEADER.to_string(), "1".to_string()),
                (TIMEOUT_HEADER.to_string(), self.timeout.as_millis().to_string()),
            ],
            body,
            timeout: self.timeout,
            credentials: self.credentials,
        };
        for interceptor in &self.interceptors {
            interceptor.intercept(&mut request);
        }
        apply_credentials(&mut request);
        Ok(request)
    }

    /// Decode the HTTP response of one unary call.
    pub fn parse_response<Res>(&self, response: HttpResponse) -> Result<Res, RpcError>
    where
        Res: Message + DeserializeOwned + Default,
    {
        if response.status != 200 {
            return Err(connect_error(&response));
        }
        match self.format {
            WireFormat::Json => serde_json::from_slice(&response.body).map_err(|e| RpcError::Decode(e.to_string())),
            WireFormat::Binary => Res::decode(response.body.as_slice()).map_err(|e| RpcError::Decode(e.to_string())),
        }
    }

    pub async fn unary<Req, Res>(&self, method: &str, message: &Req) -> Result<Res, RpcError>
    where
        Req: Message + Serialize,
        Res: Message + DeserializeOwned + Default,
    {
        let request = self.build_request(method, message)?;
        let response = self.executor.execute(request).await?;
        self.parse_response(response)
    }
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("base_url", &self.base_url)
            .field("format", &self.format)
            .field("credentials", &self.credentials)
            .field("timeout", &self.timeout)
            .field("interceptors", &self.interceptors.len())
            .finish()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ErrorBody {
    code: String,
    #[serde(default)]
    message: String,
}

/// Map a non-200 response to an `RpcError`, preferring the Connect error in
/// the body over the HTTP status.
fn connect_error(response: &HttpResponse) -> RpcError {
    match serde_json::from_slice::<ErrorBody>(&response.body) {
        Ok(body) => {
            let code = body.code.parse().unwrap_or(Code::Unknown);
            RpcError::status(code, body.message)
        }
        Err(_) => {
            let message = String::from_utf8_lossy(&response.body).into_owned();
            let message = if message.is_empty() {
                format!("HTTP {}", response.status)
            } else {
                message
            };
            RpcError::status(Code::from_http_status(response.status), message)
        }
    }
}

/// Strip credential-bearing headers the credentials mode does not allow.
/// Only headers already on the request are affected; ambient credentials
/// are up to the executor, which sees the mode in `request.credentials`.
fn apply_credentials(request: &mut HttpRequest) {
    let allowed = match request.credentials {
        Credentials::Include => true,
        Credentials::Omit => false,
        Credentials::SameOrigin => match request.header(ORIGIN_HEADER) {
            Some(origin) => origin_of(&request.url) == origin.trim_end_matches('/'),
            None => false,
        },
    };
    if !allowed {
        request.remove_header("cookie");
        request.remove_header("authorization");
    }
}

/// `scheme://host[:port]` prefix of an absolute URL.
fn origin_of(url: &str) -> &str {
    let Some(scheme_end) = url.find("://") else {
        return url;
    };
    let authority_start = scheme_end + 3;
    match url[authority_start..].find('/') {
        Some(path_start) => &url[..authority_start + path_start],
        None => url,
    }
}
