//! In-process stand-in for the epistemic-me service, speaking the Connect
//! unary protocol over HTTP. Used by the client's integration tests and
//! runnable on its own for local development.

pub mod connect;
pub mod store;

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use bytes::Bytes;
use epistemic_proto::{methods, SERVICE_NAME};
use tokio::{net::TcpListener, sync::RwLock};

pub use connect::{Codec, Rejection};
pub use store::{Store, INVALID_API_KEY, MISSING_API_KEY};

/// Procedures that require a developer API key.
pub const PRIVILEGED: [&str; 3] = [
    methods::CREATE_DIALECTIC,
    methods::CREATE_PHILOSOPHY,
    methods::UPDATE_PHILOSOPHY,
];

/// What the server saw of one incoming call, for assertions in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub procedure: String,
    pub content_type: Option<String>,
    pub api_key: Option<String>,
    pub origin: Option<String>,
}

#[derive(Debug, Default)]
pub struct AppState {
    pub store: RwLock<Store>,
    requests: RwLock<Vec<RecordedRequest>>,
}

impl AppState {
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.read().await.clone()
    }

    pub async fn calls_to(&self, procedure: &str) -> usize {
        self.requests
            .read()
            .await
            .iter()
            .filter(|r| r.procedure == procedure)
            .count()
    }
}

pub type SharedState = Arc<AppState>;

pub fn app() -> Router {
    app_with_state(SharedState::default())
}

pub fn app_with_state(state: SharedState) -> Router {
    Router::new()
        .route(&format!("/{SERVICE_NAME}/{{procedure}}"), post(dispatch))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_state(listener: TcpListener, state: SharedState) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(state)).await
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn dispatch(
    State(state): State<SharedState>,
    Path(procedure): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let recorded = RecordedRequest {
        procedure: procedure.clone(),
        content_type: header_value(&headers, "content-type"),
        api_key: header_value(&headers, "x-api-key"),
        origin: header_value(&headers, "origin"),
    };
    tracing::debug!(
        procedure = %procedure,
        has_api_key = recorded.api_key.is_some(),
        "handling call"
    );
    state.requests.write().await.push(recorded);

    match handle(&state, &procedure, &headers, &body).await {
        Ok(response) => response,
        Err(rejection) => {
            tracing::debug!(procedure = %procedure, code = rejection.code, message = %rejection.message, "call rejected");
            rejection.into_response()
        }
    }
}

async fn handle(
    state: &AppState,
    procedure: &str,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<Response, Rejection> {
    let codec = Codec::from_headers(headers)?;
    let mut store = state.store.write().await;
    if PRIVILEGED.contains(&procedure) {
        let api_key = headers.get("x-api-key").and_then(|v| v.to_str().ok());
        store.authorize(api_key)?;
    }

    let response = match procedure {
        methods::CREATE_BELIEF => codec.encode(&store.create_belief(codec.decode(body)?)?),
        methods::LIST_BELIEFS => codec.encode(&store.list_beliefs(codec.decode(body)?)),
        methods::LIST_DIALECTICS => codec.encode(&store.list_dialectics(codec.decode(body)?)),
        methods::CREATE_DIALECTIC => codec.encode(&store.create_dialectic(codec.decode(body)?)?),
        methods::UPDATE_DIALECTIC => codec.encode(&store.update_dialectic(codec.decode(body)?)?),
        methods::GET_BELIEF_SYSTEM => codec.encode(&store.get_belief_system(codec.decode(body)?)),
        methods::CREATE_DEVELOPER => codec.encode(&store.create_developer(codec.decode(body)?)?),
        methods::GET_DEVELOPER => codec.encode(&store.get_developer(codec.decode(body)?)?),
        methods::CREATE_SELF_MODEL => codec.encode(&store.create_self_model(codec.decode(body)?)?),
        methods::GET_SELF_MODEL => codec.encode(&store.get_self_model(codec.decode(body)?)?),
        methods::ADD_PHILOSOPHY => codec.encode(&store.add_philosophy(codec.decode(body)?)?),
        methods::PREPROCESS_QUESTION_ANSWER => {
            codec.encode(&store.preprocess_question_answer(codec.decode(body)?)?)
        }
        methods::CREATE_PHILOSOPHY => codec.encode(&store.create_philosophy(codec.decode(body)?)?),
        methods::UPDATE_PHILOSOPHY => codec.encode(&store.update_philosophy(codec.decode(body)?)?),
        other => {
            return Err(Rejection::new(
                "unimplemented",
                format!("{SERVICE_NAME}/{other} is not implemented"),
            ))
        }
    };
    Ok(response)
}
