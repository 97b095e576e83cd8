//! Satirical company roasts and personality consultations generated through
//! the OpenAI responses API.

pub mod commands;
pub mod config;
pub mod credential;
pub mod logging;
pub mod openai;
pub mod questionnaire;
