//! Configuration loading and validation for Yuki.
//!
//! Loads configuration from `~/.yuki/config.toml` with environment
//! variable overrides. Validates all settings at startup — a
//! zero-sized context window or token budget is rejected before the
//! first turn, not discovered mid-conversation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.yuki/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the OpenAI-compatible server (without the
    /// `/chat/completions` suffix)
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Model name sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Upper bound on generated tokens per response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Maximum messages sent per request (the context window)
    #[serde(default = "default_context_window")]
    pub context_window: usize,

    /// Override for the chat history file path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_file: Option<PathBuf>,
}

fn default_server_url() -> String {
    "http://127.0.0.1:8080/v1".into()
}
fn default_model() -> String {
    "local".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    256
}
fn default_context_window() -> usize {
    6
}

impl AppConfig {
    /// Load configuration from the default path (~/.yuki/config.toml).
    ///
    /// Environment variables take priority over the file:
    /// - `YUKI_SERVER_URL` — server base URL
    /// - `YUKI_MODEL` — model name
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if let Ok(url) = std::env::var("YUKI_SERVER_URL") {
            config.server_url = url;
        }
        if let Ok(model) = std::env::var("YUKI_MODEL") {
            config.model = model;
        }

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

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".yuki")
    }

    /// Resolve the chat history file path: the configured override, or
    /// `~/.yuki/chats/default.json`.
    pub fn chat_file_path(&self) -> PathBuf {
        self.chat_file
            .clone()
            .unwrap_or_else(|| Self::config_dir().join("chats").join("default.json"))
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.context_window == 0 {
            return Err(ConfigError::ValidationError(
                "context_window must be at least 1".into(),
            ));
        }

        if self.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "max_tokens must be at least 1".into(),
            ));
        }

        if self.temperature < 0.0 || self.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            context_window: default_context_window(),
            chat_file: None,
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
