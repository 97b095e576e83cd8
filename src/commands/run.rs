//! Request settings resolution and execution shared by `analyze` and `consult`.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use serde_json::json;
use tracing::{info, warn};

use crate::config::{self, ProfileConfig};
use crate::credential::{self, CredentialSource, FileCredentialStore};
use crate::logging::Verbosity;
use crate::openai::prompt::{build_analysis_prompt, build_consultation_prompt};
use crate::openai::{ApiClient, ApiResponse, ClientOptions, ModelConfig, ReasoningEffort};
use crate::questionnaire::{Answer, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    Text,
    Json,
}

impl OutputMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
        }
    }
}

/// Flags common to every command that calls the model.
#[derive(Debug, Args, Clone, Default)]
pub struct RequestArgs {
    /// Named profile from the config file.
    #[arg(long)]
    pub profile: Option<String>,
    /// Model id (env: FIRMROAST_MODEL).
    #[arg(long)]
    pub model: Option<String>,
    /// Responses endpoint URL (env: FIRMROAST_ENDPOINT).
    #[arg(long)]
    pub endpoint: Option<String>,
    /// Request timeout in seconds (env: FIRMROAST_TIMEOUT).
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,
    /// Reasoning effort for this call.
    #[arg(long, value_enum)]
    pub effort: Option<ReasoningEffort>,
    /// Disable the web search tool (analysis only).
    #[arg(long)]
    pub no_web_search: bool,
    #[arg(long, value_enum)]
    pub output: Option<OutputMode>,
    /// Shorthand for `--output json`.
    #[arg(long)]
    pub json: bool,
    /// Also write the output to this file.
    #[arg(long)]
    pub save: Option<PathBuf>,
    /// Print the request instead of sending it.
    #[arg(long)]
    pub dry_run: bool,
    #[arg(long)]
    pub verbose: bool,
    #[arg(long, short)]
    pub quiet: bool,
}

impl RequestArgs {
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.verbose, self.quiet)
    }
}

/// One model operation with its domain inputs.
#[derive(Debug, Clone)]
pub enum Operation {
    Analysis {
        company: String,
    },
    Consultation {
        company: String,
        prior_analysis: String,
        answers: Vec<Answer>,
        role: Role,
    },
}

impl Operation {
    fn request(&self, options: &ClientOptions) -> ModelConfig {
        match self {
            Self::Analysis { company } => options.presets.analysis(build_analysis_prompt(company)),
            Self::Consultation {
                company,
                prior_analysis,
                answers,
                role,
            } => options.presets.consultation(build_consultation_prompt(
                company,
                prior_analysis,
                answers,
                *role,
            )),
        }
    }

    async fn call(&self, client: &ApiClient) -> ApiResponse {
        match self {
            Self::Analysis { company } => client.analyze_company(company).await,
            Self::Consultation {
                company,
                prior_analysis,
                answers,
                role,
            } => {
                client
                    .generate_consultation(company, prior_analysis, answers, *role)
                    .await
            }
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Analysis { .. } => "analysis",
            Self::Consultation { .. } => "consultation",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub options: ClientOptions,
    pub output: OutputMode,
}

/// Resolves settings with precedence CLI flag > environment > profile > default.
/// `--effort` overrides the preset of the operation being run.
pub fn resolve_settings(args: &RequestArgs, operation: &Operation) -> Result<Settings, String> {
    let profile = match &args.profile {
        Some(name) => config::load_profile(name)?,
        None => ProfileConfig::default(),
    };

    let mut options = ClientOptions::default();

    if let Some(model) = args
        .model
        .clone()
        .or_else(|| env_value("FIRMROAST_MODEL"))
        .or(profile.model)
    {
        options.presets.model = model;
    }

    if let Some(endpoint) = args
        .endpoint
        .clone()
        .or_else(|| env_value("FIRMROAST_ENDPOINT"))
        .or(profile.endpoint)
    {
        options.endpoint = endpoint;
    }

    options.timeout_secs = match args.timeout {
        Some(timeout) => Some(timeout),
        None => match env_value("FIRMROAST_TIMEOUT") {
            Some(raw) => Some(parse_timeout(&raw)?),
            None => profile.timeout,
        },
    };

    if let Some(effort) = &profile.analysis_effort {
        options.presets.analysis_effort = effort.parse()?;
    }
    if let Some(effort) = &profile.consultation_effort {
        options.presets.consultation_effort = effort.parse()?;
    }
    if args.no_web_search {
        options.presets.web_search = false;
    } else if let Some(web_search) = profile.web_search {
        options.presets.web_search = web_search;
    }
    if let Some(effort) = args.effort {
        match operation {
            Operation::Analysis { .. } => options.presets.analysis_effort = effort,
            Operation::Consultation { .. } => options.presets.consultation_effort = effort,
        }
    }

    let output = if args.json {
        OutputMode::Json
    } else if let Some(output) = args.output {
        output
    } else {
        match profile.output.as_deref() {
            Some("json") => OutputMode::Json,
            Some("text") | None => OutputMode::Text,
            Some(other) => {
                return Err(format!(
                    "Invalid profile output '{other}'. Supported values: text, json."
                ));
            }
        }
    };

    Ok(Settings { options, output })
}

fn env_value(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_timeout(raw: &str) -> Result<u64, String> {
    match raw.parse::<u64>() {
        Ok(timeout) if timeout > 0 => Ok(timeout),
        _ => Err(format!(
            "Invalid FIRMROAST_TIMEOUT '{raw}'. Expected a positive number of seconds."
        )),
    }
}

/// Runs `operation` end to end: settings, credential, call, output.
pub async fn execute(args: &RequestArgs, operation: Operation) -> Result<(), String> {
    let settings = resolve_settings(args, &operation)?;

    if args.dry_run {
        let request = operation.request(&settings.options);
        let body = json!({
            "dry_run": true,
            "operation": operation.name(),
            "endpoint": settings.options.endpoint,
            "timeout_secs": settings.options.timeout_secs,
            "output": settings.output.as_str(),
            "request": request,
        });
        let rendered = serde_json::to_string(&body)
            .map_err(|err| format!("Failed to render dry-run request: {err}"))?;
        println!("{rendered}");
        if let Some(path) = &args.save {
            save_output(path, &rendered)?;
        }
        return Ok(());
    }

    let store = FileCredentialStore::new(config::credentials_path()?);
    let resolved = credential::resolve(&store).map_err(|err| err.to_string())?;
    info!(
        api_key_present = resolved.is_some(),
        from_env = matches!(resolved, Some((_, CredentialSource::Environment))),
        "credential resolved"
    );
    let (api_key, _) = resolved.ok_or_else(|| {
        format!(
            "No OpenAI credential found. Set {} or run `firmroast credential set`.",
            credential::CREDENTIAL_ENV
        )
    })?;

    let client = ApiClient::with_options(api_key, settings.options);
    let response = operation.call(&client).await;

    match settings.output {
        OutputMode::Json => {
            let rendered = serde_json::to_string(&response)
                .map_err(|err| format!("Failed to render response: {err}"))?;
            println!("{rendered}");
            if let Some(path) = &args.save {
                save_output(path, &rendered)?;
            }
            response.into_result().map(|_| ())
        }
        OutputMode::Text => {
            let content = response.into_result()?;
            if content.is_empty() {
                warn!("model returned empty text");
            }
            println!("{content}");
            if let Some(path) = &args.save {
                save_output(path, &content)?;
            }
            Ok(())
        }
    }
}

fn save_output(path: &Path, content: &str) -> Result<(), String> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| {
            format!(
                "Failed to create output directory '{}': {err}",
                parent.display()
            )
        })?;
    }
    fs::write(path, content)
        .map_err(|err| format!("Failed to write output file '{}': {err}", path.display()))
}
