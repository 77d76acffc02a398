//! Client configuration
//!
//! Endpoints and timeouts for the translation and history services. Values
//! can be set through [`ClientConfigBuilder`] or read from the environment.

use std::time::Duration;

use crate::error::{Result, TranslatorError};
use crate::retry::RetryPolicy;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_HISTORY_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_STREAM_PATH: &str = "/api/translate/stream";

/// Plain translations can take a while on long inputs.
pub const DEFAULT_TRANSLATE_TIMEOUT: Duration = Duration::from_secs(120);
/// Health probes should fail fast.
pub const DEFAULT_HEALTH_TIMEOUT: Duration = Duration::from_secs(5);
/// Upper bound for plain requests without a dedicated timeout, and for
/// establishing any connection. Streaming bodies are not bounded by it.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

pub const ENV_API_BASE_URL: &str = "FANYI_API_BASE_URL";
pub const ENV_HISTORY_BASE_URL: &str = "FANYI_HISTORY_BASE_URL";
pub const ENV_TRANSLATE_TIMEOUT_SECS: &str = "FANYI_TRANSLATE_TIMEOUT_SECS";
pub const ENV_HEALTH_TIMEOUT_SECS: &str = "FANYI_HEALTH_TIMEOUT_SECS";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub history_base_url: String,
    pub stream_path: String,
    pub translate_timeout: Duration,
    pub health_timeout: Duration,
    pub request_timeout: Duration,
    /// Retry policy for plain (non-streaming) requests. Streams are never retried.
    pub retry_policy: Option<RetryPolicy>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            history_base_url: DEFAULT_HISTORY_BASE_URL.to_string(),
            stream_path: DEFAULT_STREAM_PATH.to_string(),
            translate_timeout: DEFAULT_TRANSLATE_TIMEOUT,
            health_timeout: DEFAULT_HEALTH_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            retry_policy: None,
        }
    }
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Defaults overridden by `FANYI_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`ClientConfig::from_env`] but with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder();
        if let Some(url) = lookup(ENV_API_BASE_URL) {
            builder = builder.api_base_url(url);
        }
        if let Some(url) = lookup(ENV_HISTORY_BASE_URL) {
            builder = builder.history_base_url(url);
        }
        if let Some(secs) = lookup(ENV_TRANSLATE_TIMEOUT_SECS) {
            builder = builder.translate_timeout(parse_secs(ENV_TRANSLATE_TIMEOUT_SECS, &secs)?);
        }
        if let Some(secs) = lookup(ENV_HEALTH_TIMEOUT_SECS) {
            builder = builder.health_timeout(parse_secs(ENV_HEALTH_TIMEOUT_SECS, &secs)?);
        }
        builder.build()
    }

    pub fn validate(&self) -> Result<()> {
        check_base_url("api_base_url", &self.api_base_url)?;
        check_base_url("history_base_url", &self.history_base_url)?;
        if !self.stream_path.starts_with('/') {
            return Err(TranslatorError::ConfigurationError(format!(
                "stream_path must start with '/': {:?}",
                self.stream_path
            )));
        }
        if self.translate_timeout.is_zero() || self.health_timeout.is_zero() {
            return Err(TranslatorError::ConfigurationError(
                "timeouts must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Absolute URL of a translation-service endpoint.
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url, path)
    }

    /// Absolute URL of a history-service endpoint.
    pub fn history_url(&self, path: &str) -> String {
        format!("{}{}", self.history_base_url, path)
    }
}

fn parse_secs(key: &str, raw: &str) -> Result<Duration> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| TranslatorError::ConfigurationError(format!("{key}={raw:?}: {e}")))
}

fn check_base_url(name: &str, url: &str) -> Result<()> {
    if url.is_empty() {
        return Err(TranslatorError::ConfigurationError(format!(
            "{name} must not be empty"
        )));
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(TranslatorError::ConfigurationError(format!(
            "{name} must be an http(s) URL: {url:?}"
        )));
    }
    Ok(())
}

fn normalize_base_url(url: impl Into<String>) -> String {
    url.into().trim().trim_end_matches('/').to_string()
}

/// Fluent builder for [`ClientConfig`].
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_base_url = normalize_base_url(url);
        self
    }

    pub fn history_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.history_base_url = normalize_base_url(url);
        self
    }

    pub fn stream_path(mut self, path: impl Into<String>) -> Self {
        self.config.stream_path = path.into();
        self
    }

    pub fn translate_timeout(mut self, timeout: Duration) -> Self {
        self.config.translate_timeout = timeout;
        self
    }

    pub fn health_timeout(mut self, timeout: Duration) -> Self {
        self.config.health_timeout = timeout;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.config.retry_policy = Some(policy);
        self
    }

    pub fn build(self) -> Result<ClientConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
