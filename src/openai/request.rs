use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::Serialize;

pub const DEFAULT_MODEL: &str = "gpt-5";
pub const WEB_SEARCH_TOOL: &str = "web_search";

/// How much internal reasoning the model spends before answering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningEffort {
    Minimal,
    Low,
    Medium,
    High,
}

impl ReasoningEffort {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for ReasoningEffort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReasoningEffort {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "minimal" => Ok(Self::Minimal),
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!(
                "Invalid reasoning effort '{other}'. Supported values: minimal, low, medium, high."
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolChoice {
    Auto,
    None,
    Required,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tool {
    #[serde(rename = "type")]
    pub kind: String,
}

impl Tool {
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Reasoning {
    pub effort: ReasoningEffort,
}

/// Request body for the responses endpoint. Every field is sent at the top
/// level; unset optionals are omitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelConfig {
    pub model: String,
    pub input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<Reasoning>,
}

impl ModelConfig {
    pub fn new(model: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            input: input.into(),
            tools: None,
            tool_choice: None,
            reasoning: None,
        }
    }

    pub fn with_tools(mut self, tools: Vec<Tool>, choice: ToolChoice) -> Self {
        self.tools = Some(tools);
        self.tool_choice = Some(choice);
        self
    }

    pub fn with_effort(mut self, effort: ReasoningEffort) -> Self {
        self.reasoning = Some(Reasoning { effort });
        self
    }

    pub fn tool_count(&self) -> usize {
        self.tools.as_ref().map_or(0, Vec::len)
    }
}

/// Per-call knobs for the two fixed operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presets {
    pub model: String,
    pub analysis_effort: ReasoningEffort,
    pub consultation_effort: ReasoningEffort,
    pub web_search: bool,
}

impl Default for Presets {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            analysis_effort: ReasoningEffort::Low,
            consultation_effort: ReasoningEffort::Medium,
            web_search: true,
        }
    }
}

impl Presets {
    /// Company roast: web search enabled, tool choice `auto`.
    pub fn analysis(&self, prompt: String) -> ModelConfig {
        let config = ModelConfig::new(&self.model, prompt).with_effort(self.analysis_effort);
        if self.web_search {
            config.with_tools(vec![Tool::new(WEB_SEARCH_TOOL)], ToolChoice::Auto)
        } else {
            config
        }
    }

    /// Consultation letter: no tools.
    pub fn consultation(&self, prompt: String) -> ModelConfig {
        ModelConfig::new(&self.model, prompt).with_effort(self.consultation_effort)
    }
}

#[cfg(test)]
mod tests {
    use super::{ModelConfig, Presets, ReasoningEffort};
    use serde_json::json;

    #[test]
    fn analysis_preset_serializes_all_fields_at_top_level() {
        let config = Presets::default().analysis("prompt".to_string());
        assert_eq!(
            serde_json::to_value(&config).unwrap(),
            json!({
                "model": "gpt-5",
                "input": "prompt",
                "tools": [{"type": "web_search"}],
                "tool_choice": "auto",
                "reasoning": {"effort": "low"}
            })
        );
    }

    #[test]
    fn consultation_preset_omits_tools() {
        let config = Presets::default().consultation("prompt".to_string());
        assert_eq!(
            serde_json::to_value(&config).unwrap(),
            json!({
                "model": "gpt-5",
                "input": "prompt",
                "reasoning": {"effort": "medium"}
            })
        );
        assert_eq!(config.tool_count(), 0);
    }

    #[test]
    fn web_search_can_be_disabled() {
        let presets = Presets {
            web_search: false,
            ..Presets::default()
        };
        let config = presets.analysis("p".to_string());
        assert!(config.tools.is_none());
        assert!(config.tool_choice.is_none());
    }

    #[test]
    fn bare_config_has_only_model_and_input() {
        let value = serde_json::to_value(ModelConfig::new("m", "i")).unwrap();
        assert_eq!(value, json!({"model": "m", "input": "i"}));
    }

    #[test]
    fn effort_parses_from_text() {
        assert_eq!("HIGH".parse::<ReasoningEffort>(), Ok(ReasoningEffort::High));
        assert!("extreme".parse::<ReasoningEffort>().is_err());
    }
}
