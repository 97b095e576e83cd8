//! OpenAI responses API integration.
//!
//! Prompt rendering, the HTTP client, and normalization of response bodies
//! into display text.

pub mod clean;
pub mod client;
pub mod envelope;
pub mod error;
pub mod prompt;
pub mod request;

pub use client::{ApiClient, ApiResponse, ClientOptions, OPENAI_RESPONSES_URL};
pub use error::ApiError;
pub use request::{ModelConfig, Presets, ReasoningEffort};
