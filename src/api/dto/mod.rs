//! Data Transfer Objects for REST request/response serialization.
//!
//! Responses reuse the domain types where they already serialize the way
//! clients expect; only request bodies and small envelopes live here.

pub mod capture_dto;
pub mod recording_dto;
pub mod speech_dto;

pub use capture_dto::*;
pub use recording_dto::*;
pub use speech_dto::*;
