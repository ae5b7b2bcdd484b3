//! # Axum Helpers
//!
//! Shared plumbing for building Axum web services.
//!
//! ## Modules
//!
//! - **[`errors`]**: the error translator — one `AppError` → HTTP status +
//!   JSON body (`timestamp` + `error`, optional validation `details`)
//! - **[`extractors`]**: custom extractors (integer id path, validated JSON)
//! - **[`server`]**: router assembly with OpenAPI docs, health endpoint,
//!   server startup with graceful shutdown

pub mod errors;
pub mod extractors;
pub mod server;

// Re-export error types
pub use errors::{AppError, ErrorResponse};

// Re-export extractors
pub use extractors::{IdPath, ValidatedJson};

// Re-export server types
pub use server::{
    create_app, create_router, health_router, shutdown_signal, HealthResponse,
};
