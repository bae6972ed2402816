use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::core::client::DEFAULT_ENDPOINT;
use crate::core::models::ModelTier;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_format")]
    pub default_format: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_true")]
    pub include_tenant_field: bool,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}
fn default_format() -> String {
    "text".to_string()
}
fn default_color() -> String {
    "auto".to_string()
}
fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            default_format: default_format(),
            color: default_color(),
            include_tenant_field: true,
        }
    }
}

/// Prefilled request fields, overridable per invocation from the command
/// line. The shipped values match the demo tenant the service seeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestDefaults {
    #[serde(default = "default_tenant")]
    pub tenant_id: String,
    #[serde(default = "default_user")]
    pub user_id: String,
    #[serde(default = "default_model")]
    pub model_id: String,
    #[serde(default = "default_tier")]
    pub model_tier: String,
}

fn default_tenant() -> String {
    "enterprise_co".to_string()
}
fn default_user() -> String {
    "ent-user-1".to_string()
}
fn default_model() -> String {
    "gpt-4o".to_string()
}
fn default_tier() -> String {
    "premium".to_string()
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self {
            tenant_id: default_tenant(),
            user_id: default_user(),
            model_id: default_model(),
            model_tier: default_tier(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub defaults: RequestDefaults,
}

impl AppConfig {
    /// Get the config file path, respecting XDG_CONFIG_HOME
    pub fn config_path() -> PathBuf {
        let config_dir = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("~"))
                    .join(".config")
            });
        config_dir.join("rlc").join("config.toml")
    }

    /// Load config from the default path, falling back to defaults if not found
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Serialize and write this config to the config file path.
    pub fn save(&self) -> Result<PathBuf, std::io::Error> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Validate the config
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if !["text", "json"].contains(&self.settings.default_format.as_str()) {
            issues.push(format!(
                "Invalid default_format: '{}' (must be 'text' or 'json')",
                self.settings.default_format
            ));
        }
        if !["auto", "always", "never"].contains(&self.settings.color.as_str()) {
            issues.push(format!(
                "Invalid color: '{}' (must be 'auto', 'always', or 'never')",
                self.settings.color
            ));
        }
        if self.settings.endpoint.is_empty() {
            issues.push("Endpoint must not be empty".to_string());
        } else if !self.settings.endpoint.starts_with("http://")
            && !self.settings.endpoint.starts_with("https://")
        {
            issues.push(format!(
                "Endpoint must use http or https, got: '{}'",
                self.settings.endpoint
            ));
        }
        if ModelTier::from_id(&self.defaults.model_tier).is_none() {
            issues.push(format!(
                "Invalid model_tier: '{}' (must be premium|standard|free)",
                self.defaults.model_tier
            ));
        }
        issues
    }
}
