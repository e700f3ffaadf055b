//! Parameter-to-message mapping, one function per remote operation.
//!
//! Fields are copied one-to-one; the only transformations are the
//! identifier renames (`user_id` to `self_model_id`, `dialectic_id` to `id`),
//! the fixed flags of `get_belief_system_detail`, the `false` default for
//! `extrapolate_contexts`, and the trim-and-wrap of QA blobs.

use epistemic_proto::{
    AddPhilosophyRequest, CreateBeliefRequest, CreateDeveloperRequest, CreateDialecticRequest,
    CreatePhilosophyRequest, CreateSelfModelRequest, GetBeliefSystemRequest, GetDeveloperRequest,
    GetSelfModelRequest, ListBeliefsRequest, ListDialecticsRequest, PreprocessQuestionAnswerRequest,
    UpdateDialecticRequest, UpdatePhilosophyRequest,
};

use crate::error::{ClientError, QA_BLOBS_REQUIRED};
use crate::types::{
    AddPhilosophyParams, CreateBeliefParams, CreateDeveloperParams, CreateDialecticParams,
    CreatePhilosophyParams, CreateSelfModelParams, GetBeliefSystemDetailParams, GetDeveloperParams,
    GetSelfModelParams, ListBeliefsParams, ListDialecticsParams, UpdateDialecticParams,
    UpdatePhilosophyParams,
};

pub fn create_belief(params: CreateBeliefParams) -> CreateBeliefRequest {
    CreateBeliefRequest {
        self_model_id: params.user_id,
        belief_content: params.belief_content,
    }
}

pub fn list_beliefs(params: ListBeliefsParams) -> ListBeliefsRequest {
    ListBeliefsRequest {
        self_model_id: params.user_id,
        belief_ids: Vec::new(),
    }
}

pub fn list_dialectics(params: ListDialecticsParams) -> ListDialecticsRequest {
    ListDialecticsRequest {
        self_model_id: params.self_model_id,
    }
}

pub fn create_dialectic(params: CreateDialecticParams) -> CreateDialecticRequest {
    CreateDialecticRequest {
        self_model_id: params.user_id,
        dialectic_type: params.dialectic_type.into(),
        learning_objective: params.learning_objective,
    }
}

pub fn update_dialectic(params: UpdateDialecticParams) -> UpdateDialecticRequest {
    UpdateDialecticRequest {
        id: params.dialectic_id,
        answer: Some(params.answer),
        self_model_id: params.user_id,
        custom_question: params.custom_question,
        question_blob: params.question_blob,
        answer_blob: params.answer_blob,
    }
}

/// Metrics and conceptualization are always requested, whatever the caller
/// passes.
pub fn get_belief_system_detail(params: GetBeliefSystemDetailParams) -> GetBeliefSystemRequest {
    GetBeliefSystemRequest {
        self_model_id: params.user_id,
        conceptualize: true,
        include_metrics: true,
    }
}

pub fn create_developer(params: CreateDeveloperParams) -> CreateDeveloperRequest {
    CreateDeveloperRequest {
        name: params.name,
        email: params.email,
    }
}

pub fn get_developer(params: GetDeveloperParams) -> GetDeveloperRequest {
    GetDeveloperRequest { id: params.id }
}

pub fn create_self_model(params: CreateSelfModelParams) -> CreateSelfModelRequest {
    CreateSelfModelRequest {
        id: params.id,
        philosophies: params.philosophies.unwrap_or_default(),
    }
}

pub fn get_self_model(params: GetSelfModelParams) -> GetSelfModelRequest {
    GetSelfModelRequest {
        self_model_id: params.id,
    }
}

pub fn add_philosophy(params: AddPhilosophyParams) -> AddPhilosophyRequest {
    AddPhilosophyRequest {
        self_model_id: params.self_model_id,
        philosophy_id: params.philosophy_id,
    }
}

/// Both blobs must be non-empty once surrounding whitespace is trimmed.
pub fn preprocess_question_answer(
    question_blob: &str,
    answer_blob: &str,
) -> Result<PreprocessQuestionAnswerRequest, ClientError> {
    let question = question_blob.trim();
    let answer = answer_blob.trim();
    if question.is_empty() || answer.is_empty() {
        return Err(ClientError::InvalidArgument(QA_BLOBS_REQUIRED.to_string()));
    }
    Ok(PreprocessQuestionAnswerRequest {
        question_blobs: vec![question.to_string()],
        answer_blobs: vec![answer.to_string()],
    })
}

pub fn create_philosophy(params: CreatePhilosophyParams) -> CreatePhilosophyRequest {
    CreatePhilosophyRequest {
        description: params.description,
        extrapolate_contexts: params.extrapolate_contexts.unwrap_or(false),
    }
}

pub fn update_philosophy(params: UpdatePhilosophyParams) -> UpdatePhilosophyRequest {
    UpdatePhilosophyRequest {
        philosophy_id: params.philosophy_id,
        description: params.description,
        extrapolate_contexts: params.extrapolate_contexts.unwrap_or(false),
    }
}
