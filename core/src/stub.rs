//! Typed stub for `epistemic.EpistemicMeService`.
//!
//! One method per remote procedure, each a thin unary call over the
//! transport it was built with.

use std::sync::Arc;

use epistemic_proto::methods;
use epistemic_proto::{
    AddPhilosophyRequest, AddPhilosophyResponse, CreateBeliefRequest, CreateBeliefResponse,
    CreateDeveloperRequest, CreateDeveloperResponse, CreateDialecticRequest, CreateDialecticResponse,
    CreatePhilosophyRequest, CreatePhilosophyResponse, CreateSelfModelRequest, CreateSelfModelResponse,
    GetBeliefSystemRequest, GetBeliefSystemResponse, GetDeveloperRequest, GetDeveloperResponse,
    GetSelfModelRequest, GetSelfModelResponse, ListBeliefsRequest, ListBeliefsResponse,
    ListDialecticsRequest, ListDialecticsResponse, PreprocessQuestionAnswerRequest,
    PreprocessQuestionAnswerResponse, UpdateDialecticRequest, UpdateDialecticResponse,
    UpdatePhilosophyRequest, UpdatePhilosophyResponse,
};

use crate::error::RpcError;
use crate::transport::Transport;

#[derive(Debug, Clone)]
pub struct EpistemicMeServiceClient {
    transport: Arc<Transport>,
}

impl EpistemicMeServiceClient {
    pub fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &Arc<Transport> {
        &self.transport
    }

    pub async fn create_belief(&self, request: CreateBeliefRequest) -> Result<CreateBeliefResponse, RpcError> {
        self.transport.unary(methods::CREATE_BELIEF, &request).await
    }

    pub async fn list_beliefs(&self, request: ListBeliefsRequest) -> Result<ListBeliefsResponse, RpcError> {
        self.transport.unary(methods::LIST_BELIEFS, &request).await
    }

    pub async fn list_dialectics(&self, request: ListDialecticsRequest) -> Result<ListDialecticsResponse, RpcError> {
        self.transport.unary(methods::LIST_DIALECTICS, &request).await
    }

    pub async fn create_dialectic(
        &self,
        request: CreateDialecticRequest,
    ) -> Result<CreateDialecticResponse, RpcError> {
        self.transport.unary(methods::CREATE_DIALECTIC, &request).await
    }

    pub async fn update_dialectic(
        &self,
        request: UpdateDialecticRequest,
    ) -> Result<UpdateDialecticResponse, RpcError> {
        self.transport.unary(methods::UPDATE_DIALECTIC, &request).await
    }

    pub async fn get_belief_system(
        &self,
        request: GetBeliefSystemRequest,
    ) -> Result<GetBeliefSystemResponse, RpcError> {
        self.transport.unary(methods::GET_BELIEF_SYSTEM, &request).await
    }

    pub async fn create_developer(
        &self,
        request: CreateDeveloperRequest,
    ) -> Result<CreateDeveloperResponse, RpcError> {
        self.transport.unary(methods::CREATE_DEVELOPER, &request).await
    }

    pub async fn get_developer(&self, request: GetDeveloperRequest) -> Result<GetDeveloperResponse, RpcError> {
        self.transport.unary(methods::GET_DEVELOPER, &request).await
    }

    pub async fn create_self_model(
        &self,
        request: CreateSelfModelRequest,
    ) -> Result<CreateSelfModelResponse, RpcError> {
        self.transport.unary(methods::CREATE_SELF_MODEL, &request).await
    }

    pub async fn get_self_model(&self, request: GetSelfModelRequest) -> Result<GetSelfModelResponse, RpcError> {
        self.transport.unary(methods::GET_SELF_MODEL, &request).await
    }

    pub async fn add_philosophy(&self, request: AddPhilosophyRequest) -> Result<AddPhilosophyResponse, RpcError> {
        self.transport.unary(methods::ADD_PHILOSOPHY, &request).await
    }

    pub async fn preprocess_question_answer(
        &self,
        request: PreprocessQuestionAnswerRequest,
    ) -> Result<PreprocessQuestionAnswerResponse, RpcError> {
        self.transport.unary(methods::PREPROCESS_QUESTION_ANSWER, &request).await
    }

    pub async fn create_philosophy(
        &self,
        request: CreatePhilosophyRequest,
    ) -> Result<CreatePhilosophyResponse, RpcError> {
        self.transport.unary(methods::CREATE_PHILOSOPHY, &request).await
    }

    pub async fn update_philosophy(
        &self,
        request: UpdatePhilosophyRequest,
    ) -> Result<UpdatePhilosophyResponse, RpcError> {
        self.transport.unary(methods::UPDATE_PHILOSOPHY, &request).await
    }
}
