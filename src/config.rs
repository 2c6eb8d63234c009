use crate::error::ReqscribeError;
use crate::llm_providers::LLMProviderConfig;
use crate::log_debug;
use crate::render::ViewMode;

use anyhow::{Context, Result, anyhow};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Environment variable holding the generation service credential
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
/// Checked when [`API_KEY_ENV`] is unset
pub const API_KEY_ENV_FALLBACK: &str = "GOOGLE_API_KEY";

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Configuration structure for reqscribe
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Generation service API key; environment variables take precedence
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_key: String,
    /// Model used for every request
    #[serde(default = "default_model")]
    pub model: String,
    /// Service root, overridable for proxies and tests
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// How long to wait for the service before giving up
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Where downloads are written when no directory is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    /// View shown after a successful generation
    #[serde(default)]
    pub default_view: ViewMode,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_seconds() -> u64 {
    120
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
            output_dir: None,
            default_view: ViewMode::default(),
        }
    }
}

impl Config {
    /// Load the configuration file, then apply environment overrides
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|name| std::env::var(name).ok());
        log_debug!(
            "Configuration loaded: model={}, base_url={}, api_key={}",
            config.model,
            config.base_url,
            config.masked_api_key()
        );
        Ok(config)
    }

    /// Load from a specific file; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content).map_err(|e| {
            anyhow!(
                "Invalid configuration file format: {}. Please check {} for syntax errors.",
                e,
                path.display()
            )
        })
    }

    /// Override the API key from the environment, using `lookup` to read variables
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let from_env = lookup(API_KEY_ENV)
            .filter(|v| !v.trim().is_empty())
            .or_else(|| lookup(API_KEY_ENV_FALLBACK).filter(|v| !v.trim().is_empty()));

        if let Some(key) = from_env {
            log_debug!("Using API key from the environment");
            self.api_key = key.trim().to_string();
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let config_content = toml::to_string_pretty(self)?;
        fs::write(path, config_content)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        log_debug!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Get the path to the configuration file
    pub fn get_config_path() -> Result<PathBuf> {
        let mut path =
            config_dir().ok_or_else(|| anyhow!("Unable to determine config directory"))?;
        path.push("reqscribe");
        fs::create_dir_all(&path)?;
        path.push("config.toml");
        Ok(path)
    }

    /// Check that a client can be built from this configuration
    pub fn validate(&self) -> Result<(), ReqscribeError> {
        if self.api_key.trim().is_empty() {
            return Err(ReqscribeError::Configuration(format!(
                "no API key found. Set {API_KEY_ENV} or run 'reqscribe config --api-key <KEY>'"
            )));
        }
        if self.model.trim().is_empty() {
            return Err(ReqscribeError::Configuration(
                "model name is empty".to_string(),
            ));
        }
        Url::parse(&self.base_url).map_err(|e| {
            ReqscribeError::Configuration(format!("invalid base_url '{}': {e}", self.base_url))
        })?;
        if self.timeout_seconds == 0 {
            return Err(ReqscribeError::Configuration(
                "timeout_seconds must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Connection settings for the generation service, validated
    pub fn provider_config(&self) -> Result<LLMProviderConfig, ReqscribeError> {
        self.validate()?;
        Ok(LLMProviderConfig {
            api_key: self.api_key.trim().to_string(),
            model: self.model.trim().to_string(),
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.timeout_seconds),
        })
    }

    /// Update the configuration with new values, returning whether anything changed
    pub fn update(
        &mut self,
        api_key: Option<String>,
        model: Option<String>,
        base_url: Option<String>,
        timeout_seconds: Option<u64>,
        default_view: Option<ViewMode>,
    ) -> bool {
        let mut changes_made = false;

        if let Some(key) = api_key
            && self.api_key != key
        {
            self.api_key = key;
            changes_made = true;
        }
        if let Some(model) = model
            && self.model != model
        {
            self.model = model;
            changes_made = true;
        }
        if let Some(base_url) = base_url
            && self.base_url != base_url
        {
            self.base_url = base_url;
            changes_made = true;
        }
        if let Some(timeout) = timeout_seconds
            && self.timeout_seconds != timeout
        {
            self.timeout_seconds = timeout;
            changes_made = true;
        }
        if let Some(view) = default_view
            && self.default_view != view
        {
            self.default_view = view;
            changes_made = true;
        }

        changes_made
    }

    /// API key with everything but the last four characters hidden
    pub fn masked_api_key(&self) -> String {
        let key = self.api_key.trim();
        if key.is_empty() {
            return "(not set)".to_string();
        }
        let visible: String = key
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("{}{visible}", "*".repeat(key.chars().count().saturating_sub(4)))
    }
}
