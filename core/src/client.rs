//! The `EpistemicMeClient` facade.
//!
//! # Design
//! The facade owns the construction config, the resolved origin, and a
//! single `Arc<Session>` holding the current API key together with the stub
//! (and through it the transport) built from that key. Every operation
//! takes one snapshot of the session up front, so the authorization gate
//! and the dispatched call always agree on the key. `set_api_key` builds a
//! complete new session and swaps it in under a write lock; calls already
//! in flight finish on the session they started with.
//!
//! Every operation follows the same shape: optional gate, map params to the
//! request message, call the stub, then `settle` the result, which logs the
//! failure and applies the key-rejection translation.

use std::fmt;
use std::sync::Arc;

use epistemic_proto::methods;
use epistemic_proto::{
    AddPhilosophyResponse, CreateBeliefResponse, CreateDeveloperResponse, CreateDialecticResponse,
    CreatePhilosophyResponse, CreateSelfModelResponse, GetBeliefSystemResponse, GetDeveloperResponse,
    GetSelfModelResponse, ListBeliefsResponse, ListDialecticsResponse, PreprocessQuestionAnswerResponse,
    UpdateDialecticResponse, UpdatePhilosophyResponse,
};
use parking_lot::RwLock;
use tracing::{debug, error, Instrument};

use crate::config::ClientConfig;
use crate::error::{ClientError, RpcError};
use crate::http::{HttpExecutor, UreqExecutor};
use crate::mapper;
use crate::stub::EpistemicMeServiceClient;
use crate::transport::Transport;
use crate::types::{
    AddPhilosophyParams, CreateBeliefParams, CreateDeveloperParams, CreateDialecticParams,
    CreatePhilosophyParams, CreateSelfModelParams, GetBeliefSystemDetailParams, GetDeveloperParams,
    GetSelfModelParams, ListBeliefsParams, ListDialecticsParams, UpdateDialecticParams,
    UpdatePhilosophyParams,
};

/// A key and the stub built from it. Never mutated; replaced whole.
struct Session {
    api_key: Option<String>,
    stub: EpistemicMeServiceClient,
}

pub struct EpistemicMeClient {
    config: ClientConfig,
    origin: String,
    executor: Arc<dyn HttpExecutor>,
    session: RwLock<Arc<Session>>,
}

impl EpistemicMeClient {
    /// Construct a client that performs HTTP with `UreqExecutor`.
    pub fn new(config: ClientConfig) -> Self {
        Self::with_executor(config, Arc::new(UreqExecutor::new()))
    }

    /// Construct a client that hands every HTTP round-trip to `executor`.
    pub fn with_executor(config: ClientConfig, executor: Arc<dyn HttpExecutor>) -> Self {
        let origin = config.resolved_origin().to_string();
        let api_key = config.api_key.clone().filter(|key| !key.is_empty());

        debug!(
            base_url = %config.base_url,
            has_api_key = api_key.is_some(),
            "initializing epistemic-me client"
        );

        let session = build_session(&config, api_key, &origin, &executor);
        Self {
            config,
            origin,
            executor,
            session: RwLock::new(Arc::new(session)),
        }
    }

    /// Replace the API key and rebuild the transport and stub from it.
    ///
    /// The rebuilt transport keeps the wire format, timeout and credentials
    /// mode the client was constructed with.
    pub fn set_api_key(&self, api_key: impl Into<String>) {
        let api_key = Some(api_key.into()).filter(|key| !key.is_empty());
        let session = build_session(&self.config, api_key, &self.origin, &self.executor);
        *self.session.write() = Arc::new(session);
        debug!(base_url = %self.config.base_url, "api key replaced, transport rebuilt");
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn has_api_key(&self) -> bool {
        self.snapshot().api_key.is_some()
    }

    /// The transport calls are currently dispatched on.
    pub fn transport(&self) -> Arc<Transport> {
        Arc::clone(self.snapshot().stub.transport())
    }

    fn snapshot(&self) -> Arc<Session> {
        Arc::clone(&*self.session.read())
    }

    /// Fails with `AuthenticationRequired` when no API key is set.
    pub fn require_api_key(&self) -> Result<(), ClientError> {
        require_api_key(&self.snapshot())
    }

    // --- beliefs ---

    pub async fn create_belief(&self, params: CreateBeliefParams) -> Result<CreateBeliefResponse, ClientError> {
        let session = self.snapshot();
        let request = mapper::create_belief(params);
        let result = session
            .stub
            .create_belief(request)
            .instrument(rpc_span(methods::CREATE_BELIEF))
            .await;
        self.settle(Operation::CreateBelief, result, None)
    }

    pub async fn list_beliefs(&self, params: ListBeliefsParams) -> Result<ListBeliefsResponse, ClientError> {
        let session = self.snapshot();
        let request = mapper::list_beliefs(params);
        let result = session
            .stub
            .list_beliefs(request)
            .instrument(rpc_span(methods::LIST_BELIEFS))
            .await;
        self.settle(Operation::ListBeliefs, result, None)
    }

    /// Fetch the belief system with metrics and conceptualization always
    /// requested.
    pub async fn get_belief_system_detail(
        &self,
        params: GetBeliefSystemDetailParams,
    ) -> Result<GetBeliefSystemResponse, ClientError> {
        let session = self.snapshot();
        let request = mapper::get_belief_system_detail(params);
        let result = session
            .stub
            .get_belief_system(request)
            .instrument(rpc_span(methods::GET_BELIEF_SYSTEM))
            .await;
        self.settle(Operation::GetBeliefSystem, result, None)
    }

    // --- dialectics ---

    pub async fn list_dialectics(&self, params: ListDialecticsParams) -> Result<ListDialecticsResponse, ClientError> {
        let session = self.snapshot();
        let request = mapper::list_dialectics(params);
        let result = session
            .stub
            .list_dialectics(request)
            .instrument(rpc_span(methods::LIST_DIALECTICS))
            .await;
        self.settle(Operation::ListDialectics, result, None)
    }

    /// Privileged: requires an API key before anything is sent.
    pub async fn create_dialectic(
        &self,
        params: CreateDialecticParams,
    ) -> Result<CreateDialecticResponse, ClientError> {
        let session = self.snapshot();
        require_api_key(&session)?;

        let request = mapper::create_dialectic(params.clone());
        let result = session
            .stub
            .create_dialectic(request)
            .instrument(rpc_span(methods::CREATE_DIALECTIC))
            .await;
        self.settle(Operation::CreateDialectic, result, Some(&params))
    }

    pub async fn update_dialectic(
        &self,
        params: UpdateDialecticParams,
    ) -> Result<UpdateDialecticResponse, ClientError> {
        let session = self.snapshot();
        let request = mapper::update_dialectic(params);
        let result = session
            .stub
            .update_dialectic(request)
            .instrument(rpc_span(methods::UPDATE_DIALECTIC))
            .await;
        self.settle(Operation::UpdateDialectic, result, None)
    }

    // --- developers ---

    pub async fn create_developer(
        &self,
        params: CreateDeveloperParams,
    ) -> Result<CreateDeveloperResponse, ClientError> {
        let session = self.snapshot();
        let request = mapper::create_developer(params);
        let result = session
            .stub
            .create_developer(request)
            .instrument(rpc_span(methods::CREATE_DEVELOPER))
            .await;
        self.settle(Operation::CreateDeveloper, result, None)
    }

    pub async fn get_developer(&self, params: GetDeveloperParams) -> Result<GetDeveloperResponse, ClientError> {
        let session = self.snapshot();
        let request = mapper::get_developer(params);
        let result = session
            .stub
            .get_developer(request)
            .instrument(rpc_span(methods::GET_DEVELOPER))
            .await;
        self.settle(Operation::GetDeveloper, result, None)
    }

    // --- self-models ---

    pub async fn create_self_model(
        &self,
        params: CreateSelfModelParams,
    ) -> Result<CreateSelfModelResponse, ClientError> {
        let session = self.snapshot();
        let request = mapper::create_self_model(params);
        let result = session
            .stub
            .create_self_model(request)
            .instrument(rpc_span(methods::CREATE_SELF_MODEL))
            .await;
        self.settle(Operation::CreateSelfModel, result, None)
    }

    pub async fn get_self_model(&self, params: GetSelfModelParams) -> Result<GetSelfModelResponse, ClientError> {
        let session = self.snapshot();
        let request = mapper::get_self_model(params);
        let result = session
            .stub
            .get_self_model(request)
            .instrument(rpc_span(methods::GET_SELF_MODEL))
            .await;
        self.settle(Operation::GetSelfModel, result, None)
    }

    pub async fn add_philosophy(&self, params: AddPhilosophyParams) -> Result<AddPhilosophyResponse, ClientError> {
        let session = self.snapshot();
        let request = mapper::add_philosophy(params);
        let result = session
            .stub
            .add_philosophy(request)
            .instrument(rpc_span(methods::ADD_PHILOSOPHY))
            .await;
        self.settle(Operation::AddPhilosophy, result, None)
    }

    // --- question/answer preprocessing ---

    /// Split raw question and answer text into QA pairs server-side.
    ///
    /// Both blobs are trimmed and must be non-empty; otherwise this fails
    /// with `InvalidArgument` without touching the network.
    pub async fn preprocess_question_answer(
        &self,
        question_blob: &str,
        answer_blob: &str,
    ) -> Result<PreprocessQuestionAnswerResponse, ClientError> {
        let request = mapper::preprocess_question_answer(question_blob, answer_blob)?;
        let session = self.snapshot();
        let result = session
            .stub
            .preprocess_question_answer(request)
            .instrument(rpc_span(methods::PREPROCESS_QUESTION_ANSWER))
            .await;
        self.settle(Operation::PreprocessQuestionAnswer, result, None)
    }

    /// Shorthand for [`preprocess_question_answer`](Self::preprocess_question_answer).
    pub async fn preprocess_qa(
        &self,
        question_blob: &str,
        answer_blob: &str,
    ) -> Result<PreprocessQuestionAnswerResponse, ClientError> {
        self.preprocess_question_answer(question_blob, answer_blob).await
    }

    // --- philosophies ---

    /// Privileged: requires an API key before anything is sent.
    pub async fn create_philosophy(
        &self,
        params: CreatePhilosophyParams,
    ) -> Result<CreatePhilosophyResponse, ClientError> {
        let session = self.snapshot();
        require_api_key(&session)?;

        let request = mapper::create_philosophy(params);
        let result = session
            .stub
            .create_philosophy(request)
            .instrument(rpc_span(methods::CREATE_PHILOSOPHY))
            .await;
        self.settle(Operation::CreatePhilosophy, result, None)
    }

    /// Privileged: requires an API key before anything is sent.
    pub async fn update_philosophy(
        &self,
        params: UpdatePhilosophyParams,
    ) -> Result<UpdatePhilosophyResponse, ClientError> {
        let session = self.snapshot();
        require_api_key(&session)?;

        let request = mapper::update_philosophy(params);
        let result = session
            .stub
            .update_philosophy(request)
            .instrument(rpc_span(methods::UPDATE_PHILOSOPHY))
            .await;
        self.settle(Operation::UpdatePhilosophy, result, None)
    }

    /// Log a failed call and convert it to the facade's error.
    ///
    /// `request` adds the caller's parameters and the target procedure to
    /// the diagnostic.
    fn settle<T>(
        &self,
        operation: Operation,
        result: Result<T, RpcError>,
        request: Option<&dyn fmt::Debug>,
    ) -> Result<T, ClientError> {
        result.map_err(|err| {
            match request {
                Some(request) => error!(
                    operation = operation.method(),
                    error = %err,
                    request = ?request,
                    url = %self.transport().procedure_url(operation.method()),
                    method = "POST",
                    "error {}",
                    operation.activity()
                ),
                None => error!(
                    operation = operation.method(),
                    error = %err,
                    "error {}",
                    operation.activity()
                ),
            }
            ClientError::from_remote(err)
        })
    }
}

impl fmt::Debug for EpistemicMeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EpistemicMeClient")
            .field("base_url", &self.config.base_url)
            .field("origin", &self.origin)
            .field("has_api_key", &self.has_api_key())
            .finish()
    }
}

fn build_session(
    config: &ClientConfig,
    api_key: Option<String>,
    origin: &str,
    executor: &Arc<dyn HttpExecutor>,
) -> Session {
    let transport = Transport::build(config, api_key.clone(), origin, Arc::clone(executor));
    Session {
        api_key,
        stub: EpistemicMeServiceClient::new(Arc::new(transport)),
    }
}

fn require_api_key(session: &Session) -> Result<(), ClientError> {
    match session.api_key {
        Some(_) => Ok(()),
        None => Err(ClientError::api_key_required()),
    }
}

fn rpc_span(method: &'static str) -> tracing::Span {
    tracing::debug_span!("rpc", procedure = method)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    CreateBelief,
    ListBeliefs,
    ListDialectics,
    CreateDialectic,
    UpdateDialectic,
    GetBeliefSystem,
    CreateDeveloper,
    GetDeveloper,
    CreateSelfModel,
    GetSelfModel,
    AddPhilosophy,
    PreprocessQuestionAnswer,
    CreatePhilosophy,
    UpdatePhilosophy,
}

impl Operation {
    fn method(self) -> &'static str {
        match self {
            Operation::CreateBelief => methods::CREATE_BELIEF,
            Operation::ListBeliefs => methods::LIST_BELIEFS,
            Operation::ListDialectics => methods::LIST_DIALECTICS,
            Operation::CreateDialectic => methods::CREATE_DIALECTIC,
            Operation::UpdateDialectic => methods::UPDATE_DIALECTIC,
            Operation::GetBeliefSystem => methods::GET_BELIEF_SYSTEM,
            Operation::CreateDeveloper => methods::CREATE_DEVELOPER,
            Operation::GetDeveloper => methods::GET_DEVELOPER,
            Operation::CreateSelfModel => methods::CREATE_SELF_MODEL,
            Operation::GetSelfModel => methods::GET_SELF_MODEL,
            Operation::AddPhilosophy => methods::ADD_PHILOSOPHY,
            Operation::PreprocessQuestionAnswer => methods::PREPROCESS_QUESTION_ANSWER,
            Operation::CreatePhilosophy => methods::CREATE_PHILOSOPHY,
            Operation::UpdatePhilosophy => methods::UPDATE_PHILOSOPHY,
        }
    }

    fn activity(self) -> &'static str {
        match self {
            Operation::CreateBelief => "creating belief",
            Operation::ListBeliefs => "listing beliefs",
            Operation::ListDialectics => "listing dialectics",
            Operation::CreateDialectic => "creating dialectic",
            Operation::UpdateDialectic => "updating dialectic",
            Operation::GetBeliefSystem => "getting belief system",
            Operation::CreateDeveloper => "creating developer",
            Operation::GetDeveloper => "getting developer",
            Operation::CreateSelfModel => "creating self model",
            Operation::GetSelfModel => "getting self model",
            Operation::AddPhilosophy => "adding philosophy",
            Operation::PreprocessQuestionAnswer => "preprocessing Q&A",
            Operation::CreatePhilosophy => "creating philosophy",
            Operation::UpdatePhilosophy => "updating philosophy",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(config: ClientConfig) -> EpistemicMeClient {
        EpistemicMeClient::new(config)
    }

    #[test]
    fn construction_resolves_default_origin() {
        let c = client(ClientConfig::new("http://localhost:8080"));
        assert_eq!(c.base_url(), "http://localhost:8080");
        assert_eq!(c.origin(), "http://localhost:3000");
        assert!(!c.has_api_key());
    }

    #[test]
    fn require_api_key_without_key_fails() {
        let c = client(ClientConfig::new("http://localhost:8080"));
        let err = c.require_api_key().unwrap_err();
        match err {
            ClientError::AuthenticationRequired(msg) => assert!(msg.starts_with("API key is required")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn require_api_key_with_key_succeeds() {
        let c = client(ClientConfig::new("http://localhost:8080").with_api_key("k1"));
        assert!(c.require_api_key().is_ok());
    }

    #[test]
    fn set_api_key_replaces_transport() {
        let c = client(ClientConfig::new("http://localhost:8080"));
        let before = c.transport();
        c.set_api_key("k1");
        let after = c.transport();
        assert!(!Arc::ptr_eq(&before, &after));
        assert!(c.has_api_key());
        assert_eq!(Arc::strong_count(&before), 1);
    }

    #[test]
    fn set_api_key_keeps_construction_transport_options() {
        let config = ClientConfig::new("http://localhost:8080")
            .with_binary_format(true)
            .with_timeout_ms(1200)
            .with_credentials(crate::config::Credentials::Omit);
        let c = client(config);
        c.set_api_key("k1");
        let transport = c.transport();
        assert_eq!(transport.format(), crate::config::WireFormat::Binary);
        assert_eq!(transport.timeout(), std::time::Duration::from_millis(1200));
        assert_eq!(transport.credentials(), crate::config::Credentials::Omit);
    }

    #[test]
    fn operation_methods_cover_every_procedure() {
        let ops = [
            Operation::CreateBelief,
            Operation::ListBeliefs,
            Operation::ListDialectics,
            Operation::CreateDialectic,
            Operation::UpdateDialectic,
            Operation::GetBeliefSystem,
            Operation::CreateDeveloper,
            Operation::GetDeveloper,
            Operation::CreateSelfModel,
            Operation::GetSelfModel,
            Operation::AddPhilosophy,
            Operation::PreprocessQuestionAnswer,
            Operation::CreatePhilosophy,
            Operation::UpdatePhilosophy,
        ];
        let mut names: Vec<_> = ops.iter().map(|op| op.method()).collect();
        names.sort_unstable();
        let mut expected = methods::ALL.to_vec();
        expected.sort_unstable();
        assert_eq!(names, expected);
    }
}
