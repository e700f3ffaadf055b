//! Typed client for the epistemic-me belief and dialectic service.
//!
//! # Overview
//! `EpistemicMeClient` exposes the service's fourteen remote operations as
//! async methods taking plain parameter records. Underneath, each call is a
//! Connect unary RPC: the parameters are mapped to the request message,
//! encoded as proto3 JSON or protobuf binary, decorated by the interceptor
//! chain (`x-api-key`, `Origin`) and sent through an `HttpExecutor`.
//!
//! # Design
//! - Transport and stub are immutable; changing the API key swaps in a
//!   freshly built pair rather than mutating anything in place.
//! - Privileged operations (`create_dialectic`, `create_philosophy`,
//!   `update_philosophy`) check for a key before any request is built.
//! - Responses are returned whole and unmodified. Failures are logged once
//!   with the failing operation and passed through, except for server-side
//!   key rejections, which become `ClientError::AuthenticationRequired`.
//! - No retries, caching or pooling beyond what the executor does itself.
//! - HTTP I/O sits behind `HttpExecutor` so everything above it can be
//!   exercised against an in-process fake.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod interceptor;
pub mod mapper;
pub mod stub;
pub mod transport;
pub mod types;

pub use client::EpistemicMeClient;
pub use config::{ClientConfig, Credentials, WireFormat, DEFAULT_ORIGIN, DEFAULT_TIMEOUT_MS};
pub use error::{ClientError, Code, ConfigError, RpcError};
pub use http::{HttpExecutor, HttpRequest, HttpResponse, UreqExecutor, DEFAULT_BODY_LIMIT};
pub use stub::EpistemicMeServiceClient;
pub use transport::Transport;
pub use types::*;

/// Protocol messages, re-exported for callers that inspect responses.
pub use epistemic_proto as proto;

// Vocabulary callers commonly need when building parameters.
pub use epistemic_proto::{
    ActionType, BeliefContext, BeliefType, DialecticStatus, DialecticType, EpistemicEmotion,
    InteractionType, LearningObjective, ObservationContext, UserAnswer,
};
