use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::openai::ReasoningEffort;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ProfileConfig {
    pub model: Option<String>,
    pub endpoint: Option<String>,
    pub timeout: Option<u64>,
    pub analysis_effort: Option<String>,
    pub consultation_effort: Option<String>,
    pub web_search: Option<bool>,
    pub output: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    profiles: Option<HashMap<String, ProfileConfig>>,
}

pub fn load_profile(name: &str) -> Result<ProfileConfig, String> {
    let path = config_path()?;
    let config = read_config(&path)?;

    let profiles = config.profiles.ok_or_else(|| {
        format!(
            "Config file '{}' does not contain a [profiles] section.",
            path.display()
        )
    })?;

    let profile = profiles.get(name).cloned().ok_or_else(|| {
        format!(
            "Profile '{}' not found in config file '{}'.",
            name,
            path.display()
        )
    })?;
    validate_profile(name, &profile)?;
    Ok(profile)
}

/// Parses the config file and checks every profile, or only `profile` when given.
pub fn validate_config(profile: Option<&str>) -> Result<PathBuf, String> {
    let path = config_path()?;
    let config = read_config(&path)?;
    let profiles = config.profiles.unwrap_or_default();

    match profile {
        Some(name) => {
            let selected = profiles.get(name).ok_or_else(|| {
                format!(
                    "Profile '{}' not found in config file '{}'.",
                    name,
                    path.display()
                )
            })?;
            validate_profile(name, selected)?;
        }
        None => {
            for (name, selected) in &profiles {
                validate_profile(name, selected)?;
            }
        }
    }

    Ok(path)
}

fn read_config(path: &Path) -> Result<ConfigFile, String> {
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read config file '{}': {err}", path.display()))?;

    toml::from_str(&raw)
        .map_err(|err| format!("Failed to parse config file '{}': {err}", path.display()))
}

fn validate_profile(name: &str, profile: &ProfileConfig) -> Result<(), String> {
    for effort in [&profile.analysis_effort, &profile.consultation_effort]
        .into_iter()
        .flatten()
    {
        effort
            .parse::<ReasoningEffort>()
            .map_err(|err| format!("Invalid profile '{name}': {err}"))?;
    }

    if let Some(output) = &profile.output {
        if output != "text" && output != "json" {
            return Err(format!(
                "Invalid profile output '{output}' in profile '{name}'. Supported values: text, json."
            ));
        }
    }

    if profile.timeout == Some(0) {
        return Err(format!(
            "Invalid profile timeout in profile '{name}': must be greater than zero."
        ));
    }

    Ok(())
}

pub fn config_path() -> Result<PathBuf, String> {
    if let Ok(path) = env::var("FIRMROAST_CONFIG") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return Ok(PathBuf::from(trimmed));
        }
    }

    Ok(config_dir()?.join("config.toml"))
}

/// Credential file location: `FIRMROAST_CREDENTIALS`, else next to the config file.
pub fn credentials_path() -> Result<PathBuf, String> {
    if let Ok(path) = env::var("FIRMROAST_CREDENTIALS") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return Ok(PathBuf::from(trimmed));
        }
    }

    let config = config_path()?;
    Ok(config
        .parent()
        .map(|dir| dir.join("credentials.toml"))
        .unwrap_or_else(|| PathBuf::from("credentials.toml")))
}

fn config_dir() -> Result<PathBuf, String> {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        let trimmed = xdg.trim();
        if !trimmed.is_empty() {
            return Ok(PathBuf::from(trimmed).join("firmroast"));
        }
    }

    let home = env::var("HOME").map_err(|_| {
        "Cannot resolve config path: set FIRMROAST_CONFIG or HOME/XDG_CONFIG_HOME.".to_string()
    })?;
    Ok(PathBuf::from(home).join(".config").join("firmroast"))
}

#[cfg(test)]
mod tests {
    use super::{ProfileConfig, validate_profile};

    #[test]
    fn profile_with_valid_values_passes() {
        let profile: ProfileConfig = toml::from_str(
            "model = \"gpt-5-mini\"\nanalysis_effort = \"minimal\"\nconsultation_effort = \"high\"\noutput = \"json\"\ntimeout = 30\n",
        )
        .unwrap();
        assert!(validate_profile("fast", &profile).is_ok());
    }

    #[test]
    fn invalid_effort_is_rejected() {
        let profile = ProfileConfig {
            analysis_effort: Some("turbo".to_string()),
            ..ProfileConfig::default()
        };
        let err = validate_profile("bad", &profile).unwrap_err();
        assert!(err.contains("Invalid reasoning effort 'turbo'"));
    }

    #[test]
    fn invalid_output_is_rejected() {
        let profile = ProfileConfig {
            output: Some("yaml".to_string()),
            ..ProfileConfig::default()
        };
        let err = validate_profile("bad", &profile).unwrap_err();
        assert!(err.contains("Invalid profile output 'yaml'"));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let profile = ProfileConfig {
            timeout: Some(0),
            ..ProfileConfig::default()
        };
        assert!(validate_profile("bad", &profile).is_err());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<ProfileConfig>("api_key = \"sk-oops\"\n").is_err());
    }
}
