//! Shared fixtures for the facade tests.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use epistemic_core::{HttpExecutor, HttpRequest, HttpResponse, RpcError};
use parking_lot::Mutex;
use prost::Message;
use serde::Serialize;

type Responder = dyn Fn(&HttpRequest) -> Result<HttpResponse, RpcError> + Send + Sync;

/// Executor that records every request it is handed and answers with a
/// caller-supplied function.
pub struct RecordingExecutor {
    requests: Mutex<Vec<HttpRequest>>,
    responder: Box<Responder>,
}

impl RecordingExecutor {
    pub fn new<F>(responder: F) -> Arc<Self>
    where
        F: Fn(&HttpRequest) -> Result<HttpResponse, RpcError> + Send + Sync + 'static,
    {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            responder: Box::new(responder),
        })
    }

    /// Answers every call with HTTP 200 and `message` as JSON.
    pub fn json_ok<M: Serialize>(message: &M) -> Arc<Self> {
        let body = serde_json::to_vec(message).unwrap();
        Self::new(move |_| Ok(ok(body.clone())))
    }

    /// Answers every call with HTTP 200 and `message` as protobuf binary.
    pub fn proto_ok<M: Message>(message: &M) -> Arc<Self> {
        let body = message.encode_to_vec();
        Self::new(move |_| Ok(ok(body.clone())))
    }

    /// Answers every call with a Connect error.
    pub fn connect_error(status: u16, code: &str, message: &str) -> Arc<Self> {
        let body = serde_json::json!({ "code": code, "message": message }).to_string();
        Self::new(move |_| {
            Ok(HttpResponse {
                status,
                headers: vec![("content-type".to_string(), "application/json".to_string())],
                body: body.clone().into_bytes(),
            })
        })
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests.lock().last().cloned().expect("no request was sent")
    }
}

#[async_trait]
impl HttpExecutor for RecordingExecutor {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, RpcError> {
        let response = (self.responder)(&request);
        self.requests.lock().push(request);
        response
    }
}

pub fn ok(body: Vec<u8>) -> HttpResponse {
    HttpResponse {
        status: 200,
        headers: Vec::new(),
        body,
    }
}

/// The request body parsed as JSON.
pub fn json_body(request: &HttpRequest) -> serde_json::Value {
    serde_json::from_slice(&request.body).unwrap()
}
