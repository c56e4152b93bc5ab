//! Backend configuration, read from the environment with builder overrides.

use std::time::Duration;

pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";
pub const API_BASE_ENV: &str = "SPARROW_API_BASE";
pub const MODEL_ENV: &str = "SPARROW_MODEL";
pub const TIMEOUT_ENV: &str = "SPARROW_TIMEOUT_SECS";

pub const DEFAULT_API_BASE: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    api_key: Option<String>,
    base_url: String,
    model: Option<String>,
    timeout: Duration,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_API_BASE.to_string(),
            model: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ChatConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the environment. Empty variables count as unset; an
    /// unparseable timeout keeps the default.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.api_key = non_empty_env(API_KEY_ENV);
        if let Some(base) = non_empty_env(API_BASE_ENV) {
            config.base_url = base;
        }
        config.model = non_empty_env(MODEL_ENV);
        if let Some(raw) = non_empty_env(TIMEOUT_ENV) {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => tracing::warn!("ignoring invalid {}={:?}", TIMEOUT_ENV, raw),
            }
        }
        config
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// `None` leaves the current model untouched.
    pub fn with_model(mut self, model: Option<String>) -> Self {
        if model.is_some() {
            self.model = model;
        }
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Full URL of the chat-completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ChatConfig::new();
        assert_eq!(config.base_url(), DEFAULT_API_BASE);
        assert_eq!(config.timeout(), Duration::from_secs(120));
        assert!(config.api_key().is_none());
        assert!(config.model().is_none());
    }

    #[test]
    fn test_builder_overrides() {
        let config = ChatConfig::new()
            .with_api_key("sk-test")
            .with_base_url("http://localhost:8080/v1/")
            .with_model(Some("qwen/qwen3-coder:free".into()))
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.api_key(), Some("sk-test"));
        assert_eq!(
            config.completions_url(),
            "http://localhost:8080/v1/chat/completions"
        );
        assert_eq!(config.model(), Some("qwen/qwen3-coder:free"));
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_with_model_none_keeps_existing() {
        let config = ChatConfig::new()
            .with_model(Some("a".into()))
            .with_model(None);
        assert_eq!(config.model(), Some("a"));
    }
}
