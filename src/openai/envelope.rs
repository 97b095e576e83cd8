use serde_json::Value;
use tracing::debug;

use crate::openai::clean::clean_text;

/// Recognized shapes of a provider response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiEnvelope {
    /// Responses API body: `output[type=message].content[type=output_text].text`.
    Output(String),
    /// JSON object with a top-level `text` field.
    Text(String),
    /// Decoded JSON value that is a plain string.
    JsonString(String),
    /// Anything else, taken verbatim.
    PlainText(String),
}

impl ApiEnvelope {
    /// Classifies a raw response body. Only bodies starting with `{` or `[`
    /// are decoded as JSON; a quoted body keeps its quotes. Never fails;
    /// unrecognized or malformed JSON becomes [`ApiEnvelope::PlainText`].
    pub fn parse(body: &str) -> Self {
        let trimmed = body.trim();
        if trimmed.starts_with('{') || trimmed.starts_with('[') {
            match serde_json::from_str::<Value>(trimmed) {
                Ok(value) => {
                    if let Some(envelope) = Self::from_json(value) {
                        return envelope;
                    }
                    debug!("response JSON matched no known envelope, using plain text");
                }
                Err(err) => debug!(error = %err, "response is not valid JSON, using plain text"),
            }
        }
        Self::PlainText(body.to_string())
    }

    fn from_json(value: Value) -> Option<Self> {
        if let Some(text) = output_text(&value) {
            return Some(Self::Output(text.to_string()));
        }
        match value {
            Value::Object(mut map) => match map.remove("text") {
                Some(Value::String(text)) if !text.is_empty() => Some(Self::Text(text)),
                _ => None,
            },
            Value::String(text) => Some(Self::JsonString(text)),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Output(_) => "output",
            Self::Text(_) => "text",
            Self::JsonString(_) => "json_string",
            Self::PlainText(_) => "plain_text",
        }
    }

    pub fn raw_text(&self) -> &str {
        match self {
            Self::Output(text)
            | Self::Text(text)
            | Self::JsonString(text)
            | Self::PlainText(text) => text,
        }
    }
}

fn output_text(value: &Value) -> Option<&str> {
    let message = value
        .get("output")?
        .as_array()?
        .iter()
        .find(|item| item.get("type").and_then(Value::as_str) == Some("message"))?;
    let content = message
        .get("content")?
        .as_array()?
        .iter()
        .find(|item| item.get("type").and_then(Value::as_str) == Some("output_text"))?;
    content
        .get("text")
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
}

/// Pulls the display text out of a raw response body and cleans it.
pub fn extract_text(body: &str) -> String {
    let envelope = ApiEnvelope::parse(body);
    debug!(envelope = envelope.kind(), "extracted response text");
    clean_text(envelope.raw_text())
}
