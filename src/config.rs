//! Configuration management for Mdchat
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::cli::Cli;
use crate::error::{MdchatError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for Mdchat
///
/// Holds the gateway connection settings and chat session behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Gateway connection configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Chat session configuration
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Gateway connection configuration
///
/// The API key may come from this file, the `MDCHAT_API_KEY` or
/// `GEMINI_API_KEY` environment variables, or the `--api-key` CLI flag,
/// in increasing order of precedence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// API key passed as a query parameter on every request
    #[serde(default)]
    pub api_key: Option<String>,

    /// Optional API base URL override (useful for tests and local mocks)
    ///
    /// When set, this base replaces the production endpoint, which allows
    /// tests to point the gateway at a mock server.
    #[serde(default)]
    pub api_base: Option<String>,

    /// Model used for text generation
    #[serde(default = "default_text_model")]
    pub text_model: String,

    /// Model used for image generation and editing
    #[serde(default = "default_image_model")]
    pub image_model: String,

    /// HTTP request timeout (seconds)
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_text_model() -> String {
    "gemini-1.5-pro".to_string()
}

fn default_image_model() -> String {
    "gemini-2.0-flash-exp-image-generation".to_string()
}

fn default_timeout() -> u64 {
    120
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: None,
            text_model: default_text_model(),
            image_model: default_image_model(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Chat session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Number of prior messages included in the context window
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Persona used for assistant turns until switched ("blue", "red",
    /// "green", "purple")
    #[serde(default = "default_persona")]
    pub default_persona: String,
}

fn default_history_window() -> usize {
    10
}

fn default_persona() -> String {
    "blue".to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_window: default_history_window(),
            default_persona: default_persona(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gateway: GatewayConfig::default(),
            chat: ChatConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file with CLI and environment overrides
    ///
    /// A missing file is not an error; defaults are used so that
    /// `MDCHAT_API_KEY=... mdchat chat` works without any file on disk.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    /// * `cli` - Parsed CLI arguments whose flags override file values
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            let contents = std::fs::read_to_string(path)?;
            serde_yaml::from_str(&contents).map_err(MdchatError::Yaml)?
        } else {
            tracing::debug!("Config file {} not found, using defaults", path);
            Self::default()
        };

        // Environment fills in a missing key; an explicit CLI flag wins.
        if config.gateway.api_key.is_none() {
            config.gateway.api_key = std::env::var("MDCHAT_API_KEY")
                .or_else(|_| std::env::var("GEMINI_API_KEY"))
                .ok();
        }
        if let Some(key) = &cli.api_key {
            config.gateway.api_key = Some(key.clone());
        }

        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `MdchatError::Config` if the API key is missing, a model
    /// name is empty, or the history window is zero
    pub fn validate(&self) -> Result<()> {
        if self
            .gateway
            .api_key
            .as_deref()
            .map(str::trim)
            .unwrap_or("")
            .is_empty()
        {
            return Err(MdchatError::Config(
                "No API key configured; set MDCHAT_API_KEY, GEMINI_API_KEY, or gateway.api_key"
                    .to_string(),
            )
            .into());
        }

        if self.gateway.text_model.trim().is_empty() {
            return Err(MdchatError::Config("gateway.text_model is empty".to_string()).into());
        }

        if self.gateway.image_model.trim().is_empty() {
            return Err(MdchatError::Config("gateway.image_model is empty".to_string()).into());
        }

        if self.chat.history_window == 0 {
            return Err(
                MdchatError::Config("chat.history_window must be at least 1".to_string()).into(),
            );
        }

        crate::persona::Sender::parse_persona(&self.chat.default_persona)
            .map_err(MdchatError::Config)?;

        Ok(())
    }
}
