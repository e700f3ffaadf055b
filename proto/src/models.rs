//! Shared model messages: beliefs, dialectics, developers, self-models and
//! philosophies.

use serde::{Deserialize, Serialize};

use crate::json;

macro_rules! proto_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident = $value:literal => $str:literal,)+ }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
        #[repr(i32)]
        pub enum $name {
            $($variant = $value,)+
        }

        impl $name {
            /// The variant's name as written in the protocol schema.
            pub fn as_str_name(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }

            pub fn from_str_name(value: &str) -> Option<Self> {
                match value {
                    $($str => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl json::ProtoEnum for $name {
            fn as_str_name(&self) -> &'static str {
                $name::as_str_name(self)
            }

            fn from_str_name(value: &str) -> Option<Self> {
                $name::from_str_name(value)
            }
        }

        impl Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str_name())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = json::deserialize_enum::<$name, D>(deserializer)?;
                $name::try_from(value).map_err(|_| {
                    serde::de::Error::custom(format!(
                        concat!("unknown ", stringify!($name), " value {}"),
                        value
                    ))
                })
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Beliefs
// ---------------------------------------------------------------------------

proto_enum! {
    BeliefType {
        Invalid = 0 => "BELIEF_TYPE_INVALID",
        Statement = 1 => "STATEMENT",
        Falsifiable = 2 => "FALSIFIABLE",
        Causal = 3 => "CAUSAL",
    }
}

proto_enum! {
    /// The emotional register attached to a belief in a given context.
    EpistemicEmotion {
        Invalid = 0 => "EPISTEMIC_EMOTION_INVALID",
        Confirmation = 1 => "CONFIRMATION",
        Surprise = 2 => "SURPRISE",
        Curiosity = 3 => "CURIOSITY",
        Confusion = 4 => "CONFUSION",
    }
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Content {
    #[prost(string, tag = "1")]
    pub raw_str: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Belief {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub self_model_id: String,
    #[prost(int32, tag = "3")]
    pub version: i32,
    #[prost(enumeration = "BeliefType", tag = "4")]
    #[serde(with = "json::belief_type")]
    pub r#type: i32,
    #[prost(message, repeated, tag = "5")]
    pub content: Vec<Content>,
}

/// A named situation a belief can be evaluated in.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObservationContext {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(string, tag = "3")]
    pub parent_id: String,
    #[prost(string, repeated, tag = "4")]
    pub possible_states: Vec<String>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BeliefContext {
    #[prost(string, tag = "1")]
    pub belief_id: String,
    #[prost(string, tag = "2")]
    pub observation_context_id: String,
    #[prost(double, tag = "3")]
    pub conditional_probability: f64,
    #[prost(enumeration = "EpistemicEmotion", tag = "4")]
    #[serde(with = "json::epistemic_emotion")]
    pub epistemic_emotion: i32,
    #[prost(float, tag = "5")]
    pub emotion_intensity: f32,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BeliefSystemMetrics {
    #[prost(int32, tag = "1")]
    pub total_beliefs: i32,
    #[prost(int32, tag = "2")]
    pub total_falsifiable_beliefs: i32,
    #[prost(int32, tag = "3")]
    pub total_causal_beliefs: i32,
    #[prost(int32, tag = "4")]
    pub total_belief_statements: i32,
    #[prost(double, tag = "5")]
    pub clarification_score: f64,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BeliefSystem {
    #[prost(message, repeated, tag = "1")]
    pub beliefs: Vec<Belief>,
    #[prost(message, repeated, tag = "2")]
    pub observation_contexts: Vec<ObservationContext>,
    #[prost(message, repeated, tag = "3")]
    pub belief_contexts: Vec<BeliefContext>,
    #[prost(message, optional, tag = "4")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<BeliefSystemMetrics>,
}

// ---------------------------------------------------------------------------
// Dialectics
// ---------------------------------------------------------------------------

proto_enum! {
    DialecticType {
        Default = 0 => "DEFAULT",
        Hypothesis = 1 => "HYPOTHESIS",
        SleepDietExercise = 2 => "SLEEP_DIET_EXERCISE",
    }
}

proto_enum! {
    /// Lifecycle of a single dialectical interaction. Named `STATUS` in the
    /// schema.
    DialecticStatus {
        Invalid = 0 => "STATUS_INVALID",
        PendingAnswer = 1 => "STATUS_PENDING_ANSWER",
        Answered = 2 => "STATUS_ANSWERED",
    }
}

proto_enum! {
    InteractionType {
        QuestionAnswer = 0 => "QUESTION_ANSWER",
        QuestionAnswerInterpretation = 1 => "QUESTION_ANSWER_INTERPRETATION",
        HypothesisAction = 2 => "HYPOTHESIS_ACTION",
    }
}

proto_enum! {
    ActionType {
        Invalid = 0 => "ACTION_TYPE_INVALID",
        AnswerQuestion = 1 => "ACTION_TYPE_ANSWER_QUESTION",
        TakeAction = 2 => "ACTION_TYPE_TAKE_ACTION",
    }
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserAnswer {
    #[prost(string, tag = "1")]
    pub user_answer: String,
    #[prost(int64, tag = "2")]
    #[serde(with = "json::int64")]
    pub created_at_millis_utc: i64,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Question {
    #[prost(string, tag = "1")]
    pub question: String,
    #[prost(int64, tag = "2")]
    #[serde(with = "json::int64")]
    pub created_at_millis_utc: i64,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuestionAnswerInteraction {
    #[prost(message, optional, tag = "1")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<Question>,
    #[prost(message, optional, tag = "2")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<UserAnswer>,
    #[prost(message, repeated, tag = "3")]
    pub extracted_beliefs: Vec<Belief>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DialecticalInteraction {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(enumeration = "DialecticStatus", tag = "2")]
    #[serde(with = "json::dialectic_status")]
    pub status: i32,
    #[prost(enumeration = "InteractionType", tag = "3")]
    #[serde(with = "json::interaction_type")]
    pub r#type: i32,
    #[prost(message, optional, tag = "4")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interaction: Option<QuestionAnswerInteraction>,
    #[prost(int64, tag = "5")]
    #[serde(with = "json::int64")]
    pub updated_at_millis_utc: i64,
}

/// What a dialectic is trying to learn about the self-model.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LearningObjective {
    #[prost(string, tag = "1")]
    pub description: String,
    #[prost(string, repeated, tag = "2")]
    pub topics: Vec<String>,
    #[prost(enumeration = "BeliefType", tag = "3")]
    #[serde(with = "json::belief_type")]
    pub target_belief_type: i32,
    #[prost(float, tag = "4")]
    pub completion_percentage: f32,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Dialectic {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub self_model_id: String,
    #[prost(message, repeated, tag = "3")]
    pub user_interactions: Vec<DialecticalInteraction>,
    #[prost(message, optional, tag = "4")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub belief_system: Option<BeliefSystem>,
    #[prost(message, optional, tag = "5")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learning_objective: Option<LearningObjective>,
    #[prost(enumeration = "DialecticType", tag = "6")]
    #[serde(with = "json::dialectic_type")]
    pub dialectic_type: i32,
}

// ---------------------------------------------------------------------------
// Developers, self-models, philosophies
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Developer {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(string, tag = "3")]
    pub email: String,
    #[prost(string, repeated, tag = "4")]
    pub api_keys: Vec<String>,
    #[prost(int64, tag = "5")]
    #[serde(with = "json::int64")]
    pub created_at: i64,
    #[prost(int64, tag = "6")]
    #[serde(with = "json::int64")]
    pub updated_at: i64,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SelfModel {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, repeated, tag = "2")]
    pub philosophies: Vec<String>,
    #[prost(message, optional, tag = "3")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub belief_system: Option<BeliefSystem>,
    #[prost(message, repeated, tag = "4")]
    pub dialectics: Vec<Dialectic>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Philosophy {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub description: String,
    #[prost(bool, tag = "3")]
    pub extrapolate_contexts: bool,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QaPair {
    #[prost(string, tag = "1")]
    pub question: String,
    #[prost(string, tag = "2")]
    pub answer: String,
}
