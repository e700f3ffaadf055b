//! Outbound request interceptors.
//!
//! Each interceptor is a small value fixed when its transport is built. It
//! never observes later facade state, so rotating the API key means
//! building a new transport rather than mutating an interceptor.

use crate::http::HttpRequest;

pub const API_KEY_HEADER: &str = "x-api-key";
pub const ORIGIN_HEADER: &str = "Origin";

/// A synchronous transform applied to every request a transport sends.
pub trait Interceptor: Send + Sync {
    fn intercept(&self, request: &mut HttpRequest);
}

/// Sets `x-api-key` when a key was present at build time. With no key the
/// header is left out entirely, never sent empty.
#[derive(Debug, Clone)]
pub struct ApiKeyInterceptor {
    api_key: Option<String>,
}

impl ApiKeyInterceptor {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|key| !key.is_empty()),
        }
    }
}

impl Interceptor for ApiKeyInterceptor {
    fn intercept(&self, request: &mut HttpRequest) {
        if let Some(key) = &self.api_key {
            request.set_header(API_KEY_HEADER, key.as_str());
        }
    }
}

#[derive(Debug, Clone)]
pub struct OriginInterceptor {
    origin: String,
}

impl OriginInterceptor {
    pub fn new(origin: impl Into<String>) -> Self {
        Self { origin: origin.into() }
    }
}

impl Interceptor for OriginInterceptor {
    fn intercept(&self, request: &mut HttpRequest) {
        request.set_header(ORIGIN_HEADER, self.origin.as_str());
    }
}

/// Interceptors in dispatch order: authentication first, then origin.
pub fn default_chain(api_key: Option<String>, origin: &str) -> Vec<Box<dyn Interceptor>> {
    vec![
        Box::new(ApiKeyInterceptor::new(api_key)),
        Box::new(OriginInterceptor::new(origin)),
    ]
}
