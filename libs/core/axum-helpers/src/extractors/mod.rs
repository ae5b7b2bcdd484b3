//! Custom extractors for Axum handlers.
//!
//! These form the decoding boundary: a request either becomes a typed value
//! or a structured error response, before any handler logic runs.

pub mod id_path;
pub mod validated_json;

pub use id_path::IdPath;
pub use validated_json::ValidatedJson;
