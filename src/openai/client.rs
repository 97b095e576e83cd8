use std::fmt;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, error, info};

use crate::openai::envelope::extract_text;
use crate::openai::error::ApiError;
use crate::openai::prompt::{build_analysis_prompt, build_consultation_prompt};
use crate::openai::request::{ModelConfig, Presets};
use crate::questionnaire::{Answer, Role};

pub const OPENAI_RESPONSES_URL: &str = "https://api.openai.com/v1/responses";

/// Outcome of one provider call. Either `content` is the cleaned text and
/// `error` is `None`, or `content` is empty and `error` says what failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApiResponse {
    pub content: String,
    pub error: Option<String>,
}

impl ApiResponse {
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            error: None,
        }
    }

    pub fn failure(err: &ApiError) -> Self {
        Self {
            content: String::new(),
            error: Some(err.to_string()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_result(self) -> Result<String, String> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.content),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    pub endpoint: String,
    pub timeout_secs: Option<u64>,
    pub presets: Presets,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            endpoint: OPENAI_RESPONSES_URL.to_string(),
            timeout_secs: None,
            presets: Presets::default(),
        }
    }
}

/// Client for the OpenAI responses endpoint, bound to one credential.
#[derive(Clone)]
pub struct ApiClient {
    credential: String,
    options: ClientOptions,
    http: reqwest::Client,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("credential", &"<redacted>")
            .field("options", &self.options)
            .finish()
    }
}

impl ApiClient {
    pub fn new(credential: impl Into<String>) -> Self {
        Self::with_options(credential, ClientOptions::default())
    }

    pub fn with_options(credential: impl Into<String>, options: ClientOptions) -> Self {
        Self {
            credential: credential.into(),
            options,
            http: reqwest::Client::new(),
        }
    }

    /// Posts `config` to the endpoint and returns the cleaned reply.
    ///
    /// Never fails: transport and provider errors are folded into
    /// [`ApiResponse::error`].
    pub async fn send(&self, config: &ModelConfig) -> ApiResponse {
        match self.try_send(config).await {
            Ok(content) => ApiResponse::success(content),
            Err(err) => {
                error!(error = %err, status = ?err.status(), "OpenAI API call failed");
                ApiResponse::failure(&err)
            }
        }
    }

    async fn try_send(&self, config: &ModelConfig) -> Result<String, ApiError> {
        info!(
            model = %config.model,
            endpoint = %self.options.endpoint,
            tools = config.tool_count(),
            effort = ?config.reasoning.map(|reasoning| reasoning.effort),
            "sending request"
        );

        let mut request = self
            .http
            .post(&self.options.endpoint)
            .bearer_auth(&self.credential)
            .json(config);
        if let Some(timeout_secs) = self.options.timeout_secs {
            request = request.timeout(Duration::from_secs(timeout_secs));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        debug!(status = status.as_u16(), bytes = body.len(), "response received");
        Ok(extract_text(&body))
    }

    /// Satirical roast of a company. The caller checks that `company_name`
    /// is non-empty.
    pub async fn analyze_company(&self, company_name: &str) -> ApiResponse {
        let prompt = build_analysis_prompt(company_name);
        self.send(&self.options.presets.analysis(prompt)).await
    }

    /// Personal consultation letter built from questionnaire answers.
    pub async fn generate_consultation(
        &self,
        company_name: &str,
        prior_analysis: &str,
        answers: &[Answer],
        role: Role,
    ) -> ApiResponse {
        let prompt = build_consultation_prompt(company_name, prior_analysis, answers, role);
        self.send(&self.options.presets.consultation(prompt)).await
    }
}

#[cfg(test)]
mod tests {
    use super::{ApiClient, ApiResponse};
    use crate::openai::error::ApiError;

    #[test]
    fn debug_output_redacts_credential() {
        let client = ApiClient::new("sk-secret-value");
        let rendered = format!("{client:?}");
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("sk-secret-value"));
    }

    #[test]
    fn failure_has_empty_content() {
        let response = ApiResponse::failure(&ApiError::Provider {
            status: 500,
            body: "boom".to_string(),
        });
        assert!(!response.is_ok());
        assert_eq!(response.content, "");
        assert_eq!(response.into_result(), Err("OpenAI API error 500: boom".to_string()));
    }

    #[test]
    fn success_converts_to_ok() {
        assert_eq!(ApiResponse::success("hi").into_result(), Ok("hi".to_string()));
    }
}
