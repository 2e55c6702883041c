//! Configuration loading and validation for Switchboard.
//!
//! Loads configuration from `~/.switchboard/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.switchboard/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Bearer token for the model endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Full chat-completions endpoint URL
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Model id sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature; omitted from requests when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Extra instructions appended to the global context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt_suffix: Option<String>,

    /// Maximum model calls in one chain
    #[serde(default = "default_max_steps")]
    pub max_steps: u32,

    /// HTTP timeout for a single model call
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_server_url() -> String {
    "https://api.openai.com/v1/chat/completions".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_max_steps() -> u32 {
    25
}
fn default_request_timeout_secs() -> u64 {
    120
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("server_url", &self.server_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("system_prompt_suffix", &self.system_prompt_suffix)
            .field("max_steps", &self.max_steps)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.switchboard/config.toml).
    ///
    /// Also checks environment variables:
    /// - `SWITCHBOARD_API_KEY`, then `OPENAI_API_KEY`, when no key is configured
    /// - `SWITCHBOARD_SERVER_URL`
    /// - `SWITCHBOARD_MODEL`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through `lookup` (injectable for tests).
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.api_key.is_none() {
            self.api_key = lookup("SWITCHBOARD_API_KEY").or_else(|| lookup("OPENAI_API_KEY"));
        }

        if let Some(url) = lookup("SWITCHBOARD_SERVER_URL") {
            self.server_url = url;
        }

        if let Some(model) = lookup("SWITCHBOARD_MODEL") {
            self.model = model;
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".switchboard")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(t) = self.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(ConfigError::ValidationError(
                    "temperature must be between 0.0 and 2.0".into(),
                ));
            }
        }

        if self.max_steps == 0 {
            return Err(ConfigError::ValidationError("max_steps must be at least 1".into()));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "request_timeout_secs must be at least 1".into(),
            ));
        }

        if !self.server_url.starts_with("http://") && !self.server_url.starts_with("https://") {
            return Err(ConfigError::ValidationError(format!(
                "server_url must be an http(s) URL, got '{}'",
                self.server_url
            )));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a default config TOML string (for the `init` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            server_url: default_server_url(),
            model: default_model(),
            temperature: None,
            system_prompt_suffix: None,
            max_steps: default_max_steps(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
