//! Client configuration.
//!
//! The base endpoint of the agent API is always injected explicitly. Values
//! are layered: built-in defaults, then an optional TOML file, then the
//! `REMIT_API_BASE_URL` environment variable. Front ends apply their own
//! flags on top with the builder methods.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ChatError, ChatResult};

/// Base URL used when nothing else is configured
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Environment variable overriding the base URL
pub const API_BASE_URL_ENV: &str = "REMIT_API_BASE_URL";

/// Configuration for the chat client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatConfig {
    /// Base URL of the agent API, without trailing slash
    pub api_base_url: String,
    /// Per-request timeout applied by the HTTP client (none by default)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    /// User-Agent header sent with each request
    pub user_agent: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: None,
            user_agent: concat!("remit/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ChatConfig {
    /// Create a config pointing at the given base URL.
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self::default().api_base_url(api_base_url)
    }

    /// Set the base URL.
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Set the request timeout in seconds.
    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = Some(secs);
        self
    }

    /// Read a TOML config file.
    pub fn from_file(path: impl AsRef<Path>) -> ChatResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        toml::from_str(&content).map_err(|e| {
            ChatError::Config(format!("{}: {}", path.as_ref().display(), e))
        })
    }

    /// Defaults, overlaid with the file (when it exists) and the environment.
    ///
    /// The result is not validated; callers layer their own overrides first
    /// and then call `validated`.
    pub fn load(path: Option<&Path>) -> ChatResult<Self> {
        let mut config = match path {
            Some(p) if p.exists() => Self::from_file(p)?,
            _ => Self::default(),
        };

        if let Ok(url) = std::env::var(API_BASE_URL_ENV) {
            if !url.trim().is_empty() {
                config.api_base_url = url;
            }
        }

        Ok(config)
    }

    /// Check the base URL and strip any trailing slash.
    pub fn validated(mut self) -> ChatResult<Self> {
        let trimmed = self.api_base_url.trim().trim_end_matches('/').to_string();
        let parsed = reqwest::Url::parse(&trimmed)
            .map_err(|e| ChatError::Config(format!("invalid apiBaseUrl '{}': {}", trimmed, e)))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ChatError::Config(format!(
                "apiBaseUrl must use http or https, got '{}'",
                parsed.scheme()
            )));
        }

        self.api_base_url = trimmed;
        Ok(self)
    }

    /// Timeout as a `Duration`, if configured.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Join a path onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }
}
