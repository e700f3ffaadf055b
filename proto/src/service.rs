//! Request and response messages of `epistemic.EpistemicMeService`.

use serde::{Deserialize, Serialize};

use crate::json;
use crate::models::{
    Belief, BeliefSystem, Developer, Dialectic, LearningObjective, ObservationContext, Philosophy,
    QaPair, SelfModel, UserAnswer,
};

/// Fully-qualified service name; every procedure path is
/// `/{SERVICE_NAME}/{method}`.
pub const SERVICE_NAME: &str = "epistemic.EpistemicMeService";

/// Method names as they appear in procedure paths.
pub mod methods {
    pub const CREATE_BELIEF: &str = "CreateBelief";
    pub const LIST_BELIEFS: &str = "ListBeliefs";
    pub const LIST_DIALECTICS: &str = "ListDialectics";
    pub const CREATE_DIALECTIC: &str = "CreateDialectic";
    pub const UPDATE_DIALECTIC: &str = "UpdateDialectic";
    pub const GET_BELIEF_SYSTEM: &str = "GetBeliefSystem";
    pub const CREATE_DEVELOPER: &str = "CreateDeveloper";
    pub const GET_DEVELOPER: &str = "GetDeveloper";
    pub const CREATE_SELF_MODEL: &str = "CreateSelfModel";
    pub const GET_SELF_MODEL: &str = "GetSelfModel";
    pub const ADD_PHILOSOPHY: &str = "AddPhilosophy";
    pub const PREPROCESS_QUESTION_ANSWER: &str = "PreprocessQuestionAnswer";
    pub const CREATE_PHILOSOPHY: &str = "CreatePhilosophy";
    pub const UPDATE_PHILOSOPHY: &str = "UpdatePhilosophy";

    pub const ALL: [&str; 14] = [
        CREATE_BELIEF,
        LIST_BELIEFS,
        LIST_DIALECTICS,
        CREATE_DIALECTIC,
        UPDATE_DIALECTIC,
        GET_BELIEF_SYSTEM,
        CREATE_DEVELOPER,
        GET_DEVELOPER,
        CREATE_SELF_MODEL,
        GET_SELF_MODEL,
        ADD_PHILOSOPHY,
        PREPROCESS_QUESTION_ANSWER,
        CREATE_PHILOSOPHY,
        UPDATE_PHILOSOPHY,
    ];
}

// --- beliefs ---

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateBeliefRequest {
    #[prost(string, tag = "1")]
    pub self_model_id: String,
    #[prost(string, tag = "2")]
    pub belief_content: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateBeliefResponse {
    #[prost(message, optional, tag = "1")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub belief: Option<Belief>,
    #[prost(message, optional, tag = "2")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub belief_system: Option<BeliefSystem>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListBeliefsRequest {
    #[prost(string, tag = "1")]
    pub self_model_id: String,
    #[prost(string, repeated, tag = "2")]
    pub belief_ids: Vec<String>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListBeliefsResponse {
    #[prost(message, repeated, tag = "1")]
    pub beliefs: Vec<Belief>,
    #[prost(message, optional, tag = "2")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub belief_system: Option<BeliefSystem>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetBeliefSystemRequest {
    #[prost(string, tag = "1")]
    pub self_model_id: String,
    #[prost(bool, tag = "2")]
    pub conceptualize: bool,
    #[prost(bool, tag = "3")]
    pub include_metrics: bool,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetBeliefSystemResponse {
    #[prost(message, optional, tag = "1")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub belief_system: Option<BeliefSystem>,
}

// --- dialectics ---

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListDialecticsRequest {
    #[prost(string, tag = "1")]
    pub self_model_id: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListDialecticsResponse {
    #[prost(message, repeated, tag = "1")]
    pub dialectics: Vec<Dialectic>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateDialecticRequest {
    #[prost(string, tag = "1")]
    pub self_model_id: String,
    #[prost(enumeration = "crate::models::DialecticType", tag = "2")]
    #[serde(with = "json::dialectic_type")]
    pub dialectic_type: i32,
    #[prost(message, optional, tag = "3")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learning_objective: Option<LearningObjective>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateDialecticResponse {
    #[prost(message, optional, tag = "1")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dialectic: Option<Dialectic>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateDialecticRequest {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(message, optional, tag = "2")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<UserAnswer>,
    #[prost(string, tag = "3")]
    pub self_model_id: String,
    #[prost(string, optional, tag = "4")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_question: Option<String>,
    #[prost(string, optional, tag = "5")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_blob: Option<String>,
    #[prost(string, optional, tag = "6")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer_blob: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateDialecticResponse {
    #[prost(message, optional, tag = "1")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dialectic: Option<Dialectic>,
}

// --- developers ---

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateDeveloperRequest {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub email: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateDeveloperResponse {
    #[prost(message, optional, tag = "1")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub developer: Option<Developer>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetDeveloperRequest {
    #[prost(string, tag = "1")]
    pub id: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetDeveloperResponse {
    #[prost(message, optional, tag = "1")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub developer: Option<Developer>,
}

// --- self-models ---

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateSelfModelRequest {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, repeated, tag = "2")]
    pub philosophies: Vec<String>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateSelfModelResponse {
    #[prost(message, optional, tag = "1")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_model: Option<SelfModel>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetSelfModelRequest {
    #[prost(string, tag = "1")]
    pub self_model_id: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetSelfModelResponse {
    #[prost(message, optional, tag = "1")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_model: Option<SelfModel>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddPhilosophyRequest {
    #[prost(string, tag = "1")]
    pub self_model_id: String,
    #[prost(string, tag = "2")]
    pub philosophy_id: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddPhilosophyResponse {
    #[prost(message, optional, tag = "1")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_model: Option<SelfModel>,
}

// --- question/answer preprocessing ---

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PreprocessQuestionAnswerRequest {
    #[prost(string, repeated, tag = "1")]
    pub question_blobs: Vec<String>,
    #[prost(string, repeated, tag = "2")]
    pub answer_blobs: Vec<String>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PreprocessQuestionAnswerResponse {
    #[prost(message, repeated, tag = "1")]
    pub qa_pairs: Vec<QaPair>,
}

// --- philosophies ---

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreatePhilosophyRequest {
    #[prost(string, tag = "1")]
    pub description: String,
    #[prost(bool, tag = "2")]
    pub extrapolate_contexts: bool,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreatePhilosophyResponse {
    #[prost(message, optional, tag = "1")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub philosophy: Option<Philosophy>,
    #[prost(message, repeated, tag = "2")]
    pub extrapolated_observation_contexts: Vec<ObservationContext>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdatePhilosophyRequest {
    #[prost(string, tag = "1")]
    pub philosophy_id: String,
    #[prost(string, tag = "2")]
    pub description: String,
    #[prost(bool, tag = "3")]
    pub extrapolate_contexts: bool,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdatePhilosophyResponse {
    #[prost(message, optional, tag = "1")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub philosophy: Option<Philosophy>,
    #[prost(message, repeated, tag = "2")]
    pub extrapolated_observation_contexts: Vec<ObservationContext>,
}

#[cfg(test)]
mod tests {
    use prost::Message;

    use super::*;
    use crate::models::DialecticType;

    #[test]
    fn create_dialectic_request_binary_round_trip() {
        let request = CreateDialecticRequest {
            self_model_id: "u1".to_string(),
            dialectic_type: DialecticType::SleepDietExercise as i32,
            learning_objective: Some(LearningObjective {
                description: "sleep habits".to_string(),
                topics: vec!["sleep".to_string()],
                ..Default::default()
            }),
        };
        let bytes = request.encode_to_vec();
        let decoded = CreateDialecticRequest::decode(bytes.as_slice()).unwrap();
        assert_eq!(decoded, request);
    }

    #[test]
    fn update_dialectic_request_omits_unset_optionals() {
        let request = UpdateDialecticRequest {
            id: "d1".to_string(),
            self_model_id: "u1".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({"id": "d1", "selfModelId": "u1"}));
    }

    #[test]
    fn preprocess_response_reads_qa_pairs() {
        let raw = r#"{"qaPairs":[{"question":"How long do you sleep?","answer":"8 hours"}]}"#;
        let response: PreprocessQuestionAnswerResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.qa_pairs.len(), 1);
        assert_eq!(response.qa_pairs[0].answer, "8 hours");
    }

    #[test]
    fn method_table_is_complete() {
        let mut names = methods::ALL.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 14);
    }
}
