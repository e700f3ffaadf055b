//! Server side of the Connect unary protocol: codec negotiation and error
//! responses.

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use prost::Message;
use serde::{de::DeserializeOwned, Serialize};

/// Message codec, chosen from the request's `content-type`. Responses use
/// the same codec as the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    Json,
    Proto,
}

impl Codec {
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, Rejection> {
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        let essence = content_type.split(';').next().unwrap_or("").trim();
        match essence {
            "application/json" => Ok(Codec::Json),
            "application/proto" => Ok(Codec::Proto),
            other => Err(Rejection::new(
                "invalid_argument",
                format!("unsupported content-type {other:?}"),
            )),
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Codec::Json => "application/json",
            Codec::Proto => "application/proto",
        }
    }

    pub fn decode<T>(self, body: &[u8]) -> Result<T, Rejection>
    where
        T: Message + DeserializeOwned + Default,
    {
        match self {
            Codec::Json => serde_json::from_slice(body)
                .map_err(|e| Rejection::new("invalid_argument", format!("malformed JSON message: {e}"))),
            Codec::Proto => T::decode(body)
                .map_err(|e| Rejection::new("invalid_argument", format!("malformed protobuf message: {e}"))),
        }
    }

    pub fn encode<T>(self, message: &T) -> Response
    where
        T: Message + Serialize,
    {
        let body = match self {
            Codec::Json => match serde_json::to_vec(message) {
                Ok(body) => body,
                Err(e) => return Rejection::new("internal", e.to_string()).into_response(),
            },
            Codec::Proto => message.encode_to_vec(),
        };
        (StatusCode::OK, [(header::CONTENT_TYPE, self.content_type())], body).into_response()
    }
}

/// A Connect error: a code string plus a message, sent as JSON with the
/// HTTP status the protocol assigns to the code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub code: &'static str,
    pub message: String,
}

impl Rejection {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("not_found", message)
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new("invalid_argument", message)
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new("unauthenticated", message)
    }

    pub fn http_status(&self) -> StatusCode {
        match self.code {
            "canceled" => StatusCode::from_u16(499).unwrap_or(StatusCode::BAD_REQUEST),
            "invalid_argument" | "failed_precondition" | "out_of_range" => StatusCode::BAD_REQUEST,
            "unauthenticated" => StatusCode::UNAUTHORIZED,
            "permission_denied" => StatusCode::FORBIDDEN,
            "not_found" => StatusCode::NOT_FOUND,
            "already_exists" | "aborted" => StatusCode::CONFLICT,
            "resource_exhausted" => StatusCode::TOO_MANY_REQUESTS,
            "unimplemented" => StatusCode::NOT_IMPLEMENTED,
            "unavailable" => StatusCode::SERVICE_UNAVAILABLE,
            "deadline_exceeded" => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "code": self.code, "message": self.message });
        (
            self.http_status(),
            [(header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
