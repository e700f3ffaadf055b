//! Error types for the epistemic-me client.
//!
//! # Design
//! Two layers. `RpcError` is what the transport reports for a single call:
//! a Connect status from the server, or a local transport/codec failure.
//! `ClientError` is what facade operations return: the two conditions the
//! facade raises itself (`AuthenticationRequired`, `InvalidArgument`) plus
//! an opaque passthrough of the transport error.

use std::fmt;
use std::str::FromStr;

/// Message for privileged operations invoked without a configured key.
pub const API_KEY_REQUIRED: &str = "API key is required. Please provide an API key in the client configuration. See documentation at /Docs for more information.";

/// Replacement message when the server rejects the key.
pub const API_KEY_REJECTED: &str = "Invalid or missing API key. Please check your API key configuration.";

pub const QA_BLOBS_REQUIRED: &str = "Question blob and answer blob are required";

/// Errors returned by `EpistemicMeClient` operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// No API key is configured for a privileged operation, or the server
    /// reported a missing or invalid key.
    #[error("{0}")]
    AuthenticationRequired(String),

    /// Caller-supplied arguments failed validation before any network call.
    #[error("{0}")]
    InvalidArgument(String),

    /// Any other failure of the remote call, unchanged.
    #[error(transparent)]
    RemoteCallFailed(#[from] RpcError),
}

impl ClientError {
    pub(crate) fn api_key_required() -> Self {
        ClientError::AuthenticationRequired(API_KEY_REQUIRED.to_string())
    }

    /// Replace a server-side key rejection with `AuthenticationRequired`;
    /// pass everything else through.
    pub(crate) fn from_remote(err: RpcError) -> Self {
        let text = err.to_string().to_ascii_lowercase();
        if text.contains("missing api key") || text.contains("invalid api key") {
            ClientError::AuthenticationRequired(API_KEY_REJECTED.to_string())
        } else {
            ClientError::RemoteCallFailed(err)
        }
    }
}

/// Errors produced by a single RPC over the transport.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RpcError {
    /// The server (or the HTTP layer) answered with a Connect error.
    #[error("[{code}] {message}")]
    Status { code: Code, message: String },

    /// The request never produced a response (connection, DNS, I/O).
    #[error("transport error: {0}")]
    Transport(String),

    #[error("encoding request failed: {0}")]
    Encode(String),

    #[error("decoding response failed: {0}")]
    Decode(String),
}

impl RpcError {
    pub fn status(code: Code, message: impl Into<String>) -> Self {
        RpcError::Status {
            code,
            message: message.into(),
        }
    }

    pub fn code(&self) -> Code {
        match self {
            RpcError::Status { code, .. } => *code,
            RpcError::Transport(_) => Code::Unavailable,
            RpcError::Encode(_) | RpcError::Decode(_) => Code::Internal,
        }
    }
}

/// Connect protocol error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Code {
    Canceled,
    Unknown,
    InvalidArgument,
    DeadlineExceeded,
    NotFound,
    AlreadyExists,
    PermissionDenied,
    ResourceExhausted,
    FailedPrecondition,
    Aborted,
    OutOfRange,
    Unimplemented,
    Internal,
    Unavailable,
    DataLoss,
    Unauthenticated,
}

impl Code {
    pub fn as_str(self) -> &'static str {
        match self {
            Code::Canceled => "canceled",
            Code::Unknown => "unknown",
            Code::InvalidArgument => "invalid_argument",
            Code::DeadlineExceeded => "deadline_exceeded",
            Code::NotFound => "not_found",
            Code::AlreadyExists => "already_exists",
            Code::PermissionDenied => "permission_denied",
            Code::ResourceExhausted => "resource_exhausted",
            Code::FailedPrecondition => "failed_precondition",
            Code::Aborted => "aborted",
            Code::OutOfRange => "out_of_range",
            Code::Unimplemented => "unimplemented",
            Code::Internal => "internal",
            Code::Unavailable => "unavailable",
            Code::DataLoss => "data_loss",
            Code::Unauthenticated => "unauthenticated",
        }
    }

    /// Code implied by an HTTP status when the body carries no Connect error.
    pub fn from_http_status(status: u16) -> Code {
        match status {
            400 => Code::Internal,
            401 => Code::Unauthenticated,
            403 => Code::PermissionDenied,
            404 => Code::Unimplemented,
            429 | 502 | 503 | 504 => Code::Unavailable,
            _ => Code::Unknown,
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Code {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = match s {
            "canceled" => Code::Canceled,
            "unknown" => Code::Unknown,
            "invalid_argument" => Code::InvalidArgument,
            "deadline_exceeded" => Code::DeadlineExceeded,
            "not_found" => Code::NotFound,
            "already_exists" => Code::AlreadyExists,
            "permission_denied" => Code::PermissionDenied,
            "resource_exhausted" => Code::ResourceExhausted,
            "failed_precondition" => Code::FailedPrecondition,
            "aborted" => Code::Aborted,
            "out_of_range" => Code::OutOfRange,
            "unimplemented" => Code::Unimplemented,
            "internal" => Code::Internal,
            "unavailable" => Code::Unavailable,
            "data_loss" => Code::DataLoss,
            "unauthenticated" => Code::Unauthenticated,
            _ => return Err(()),
        };
        Ok(code)
    }
}

/// Errors building a `ClientConfig` from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}
