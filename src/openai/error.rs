//! Failure modes of a provider call.

use thiserror::Error;

pub(crate) const UNKNOWN_ERROR: &str = "unknown error while calling the OpenAI API";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    /// Network, DNS, TLS or timeout failure before a full response was read.
    #[error("{message}")]
    Transport { message: String },
    /// The provider answered with a non-success status.
    #[error("OpenAI API error {status}: {body}")]
    Provider { status: u16, body: String },
}

impl ApiError {
    pub fn transport(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            return Self::Transport {
                message: UNKNOWN_ERROR.to_string(),
            };
        }
        Self::Transport { message }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Provider { status, .. } => Some(*status),
            Self::Transport { .. } => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::transport(err.to_string())
    }
}
