//! Chinook Relay - translation relay for a Chinook Jargon dictionary site
//!
//! This library forwards single words to an OpenAI-compatible chat-completion
//! API, serves the static dictionary file, and applies a strict cross-origin
//! allow-list for the frontend domain.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod core;
pub mod server;

// Re-export key types for convenience
pub use crate::core::{
    client::{AsyncTranslator, Translator},
    config::RelayConfig,
    errors::RelayError,
    models::{TranslationRequest, TranslationResult},
};

pub use server::{
    api::{build_app, run_server, ErrorResponse},
    cors::CorsPolicy,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
