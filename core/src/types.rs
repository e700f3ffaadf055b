//! Caller-facing parameter records, one per facade operation.
//!
//! # Design
//! These carry only the fields a caller supplies and are consumed by the
//! call they are passed to. Field names follow the caller's vocabulary
//! (`user_id`) rather than the wire's (`self_model_id`); the renaming
//! happens in `mapper`. They deserialize from camelCase JSON so request
//! fixtures can be written as plain data.

use epistemic_proto::{DialecticType, LearningObjective, UserAnswer};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBeliefParams {
    pub user_id: String,
    pub belief_content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBeliefsParams {
    pub user_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDialecticsParams {
    pub self_model_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDialecticParams {
    pub user_id: String,
    #[serde(default)]
    pub dialectic_type: DialecticType,
    #[serde(default)]
    pub learning_objective: Option<LearningObjective>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDialecticParams {
    pub dialectic_id: String,
    pub user_id: String,
    pub answer: UserAnswer,
    #[serde(default)]
    pub custom_question: Option<String>,
    #[serde(default)]
    pub question_blob: Option<String>,
    #[serde(default)]
    pub answer_blob: Option<String>,
}

/// `current_observation_context_ids` is accepted for compatibility with
/// existing callers but is not sent; the service always evaluates the full
/// belief system.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetBeliefSystemDetailParams {
    pub user_id: String,
    #[serde(default)]
    pub current_observation_context_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeveloperParams {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetDeveloperParams {
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSelfModelParams {
    pub id: String,
    #[serde(default)]
    pub philosophies: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetSelfModelParams {
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPhilosophyParams {
    pub self_model_id: String,
    pub philosophy_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePhilosophyParams {
    pub description: String,
    #[serde(default)]
    pub extrapolate_contexts: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePhilosophyParams {
    pub philosophy_id: String,
    pub description: String,
    #[serde(default)]
    pub extrapolate_contexts: Option<bool>,
}
