//! Proto3 JSON mapping helpers.
//!
//! prost only knows the binary encoding, so the JSON side of the Connect
//! protocol is expressed with serde. Two details of the canonical mapping
//! need help beyond `rename_all = "camelCase"`:
//!
//! - enum fields are stored as `i32` but travel as their proto names
//!   (`"BELIEF_TYPE_INVALID"`); numbers are accepted on input.
//! - 64-bit integers travel as JSON strings; numbers are accepted on input.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serializer};

/// Name lookup for a prost enumeration.
pub trait ProtoEnum: Copy + Into<i32> + TryFrom<i32> {
    fn as_str_name(&self) -> &'static str;
    fn from_str_name(value: &str) -> Option<Self>;
}

/// Serialize an `i32` enum field as its proto name, or as a number when the
/// value is not a known variant.
pub fn serialize_enum<E, S>(value: i32, serializer: S) -> Result<S::Ok, S::Error>
where
    E: ProtoEnum,
    S: Serializer,
{
    match E::try_from(value) {
        Ok(known) => serializer.serialize_str(known.as_str_name()),
        Err(_) => serializer.serialize_i32(value),
    }
}

pub fn deserialize_enum<'de, E, D>(deserializer: D) -> Result<i32, D::Error>
where
    E: ProtoEnum,
    D: Deserializer<'de>,
{
    match EnumRepr::deserialize(deserializer)? {
        EnumRepr::Number(value) => Ok(value),
        EnumRepr::Name(name) => E::from_str_name(&name)
            .map(Into::into)
            .ok_or_else(|| de::Error::custom(format!("unknown enum value `{name}`"))),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EnumRepr {
    Number(i32),
    Name(String),
}

macro_rules! enum_field {
    ($module:ident, $ty:ty) => {
        pub mod $module {
            pub fn serialize<S: serde::Serializer>(
                value: &i32,
                serializer: S,
            ) -> Result<S::Ok, S::Error> {
                super::serialize_enum::<$ty, S>(*value, serializer)
            }

            pub fn deserialize<'de, D: serde::Deserializer<'de>>(
                deserializer: D,
            ) -> Result<i32, D::Error> {
                super::deserialize_enum::<$ty, D>(deserializer)
            }
        }
    };
}

enum_field!(belief_type, crate::models::BeliefType);
enum_field!(epistemic_emotion, crate::models::EpistemicEmotion);
enum_field!(dialectic_type, crate::models::DialecticType);
enum_field!(dialectic_status, crate::models::DialecticStatus);
enum_field!(interaction_type, crate::models::InteractionType);

/// `int64` fields: written as strings, read from strings or numbers.
pub mod int64 {
    use super::*;

    pub fn serialize<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        deserializer.deserialize_any(Int64Visitor)
    }

    struct Int64Visitor;

    impl<'de> Visitor<'de> for Int64Visitor {
        type Value = i64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an int64 as a number or a decimal string")
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<i64, E> {
            Ok(value)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<i64, E> {
            i64::try_from(value).map_err(|_| E::custom(format!("int64 out of range: {value}")))
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<i64, E> {
            value
                .parse()
                .map_err(|_| E::custom(format!("invalid int64 string `{value}`")))
        }
    }
}
