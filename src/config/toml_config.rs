use crate::core::ConfigProvider;
use crate::utils::error::{LookupError, Result};
use crate::utils::validation::{validate_path, validate_positive_number, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

const SUPPORTED_FORMATS: [&str; 3] = ["csv", "tsv", "json"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    /// username = "password" pairs accepted by the login gate.
    #[serde(default)]
    pub credentials: HashMap<String, String>,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub key: Option<String>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: String,
    #[serde(default = "default_output_formats")]
    pub formats: Vec<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            formats: default_output_formats(),
        }
    }
}

fn default_base_url() -> String {
    "https://tsdrapi.uspto.gov".to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_output_path() -> String {
    "./output".to_string()
}

fn default_output_formats() -> Vec<String> {
    vec!["csv".to_string(), "tsv".to_string()]
}

impl AppConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(LookupError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| LookupError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_url("api.base_url", &self.api.base_url)?;
        validate_path("output.path", &self.output.path)?;
        validate_positive_number("api.timeout_seconds", self.api.timeout_seconds, 1)?;

        for format in &self.output.formats {
            if !SUPPORTED_FORMATS.contains(&format.as_str()) {
                return Err(LookupError::InvalidConfigValueError {
                    field: "output.formats".to_string(),
                    value: format.clone(),
                    reason: format!(
                        "Unsupported format. Valid formats: {}",
                        SUPPORTED_FORMATS.join(", ")
                    ),
                });
            }
        }

        Ok(())
    }
}

/// Substitute `${VAR_NAME}` placeholders from the environment. Unset
/// variables leave the placeholder in place, which the API-key check
/// then treats as "not configured".
fn substitute_env_vars(content: &str) -> String {
    use regex::Regex;

    let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    })
    .to_string()
}

impl ConfigProvider for AppConfig {
    fn base_url(&self) -> &str {
        &self.api.base_url
    }

    fn api_key(&self) -> Option<&str> {
        match self.api.key.as_deref() {
            Some(key) if !key.trim().is_empty() && !key.starts_with("${") => Some(key),
            _ => None,
        }
    }

    fn timeout_seconds(&self) -> u64 {
        self.api.timeout_seconds
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn output_formats(&self) -> &[String] {
        &self.output.formats
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
