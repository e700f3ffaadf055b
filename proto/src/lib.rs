//! Protocol schema for the `epistemic.EpistemicMeService` RPC service.
//!
//! # Overview
//! Message and enum definitions shared by the client core and the mock
//! server. Every message derives `prost::Message` for the binary wire format
//! and serde for the proto3 JSON mapping, so either Connect codec can carry
//! it. Enum-typed fields are stored as `i32`, as prost does.

pub mod json;
pub mod models;
pub mod service;

pub use models::*;
pub use service::*;
