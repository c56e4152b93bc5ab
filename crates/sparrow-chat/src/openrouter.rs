//! Blocking client for OpenRouter's OpenAI-compatible chat completions.

use reqwest::blocking::Client;
use serde_json::{Value, json};

use crate::backend::ChatBackend;
use crate::config::ChatConfig;
use crate::error::{ChatError, Result};
use crate::reply::ChatReply;
use crate::types::ChatMessage;

const APP_TITLE: &str = "Sparrow";

pub struct OpenRouterBackend {
    client: Client,
    api_key: String,
    url: String,
}

impl std::fmt::Debug for OpenRouterBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRouterBackend")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl OpenRouterBackend {
    pub fn new(config: &ChatConfig) -> Result<Self> {
        let api_key = config
            .api_key()
            .ok_or(ChatError::MissingApiKey)?
            .to_string();
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            api_key,
            url: config.completions_url(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn request_body(messages: &[ChatMessage], model: &str) -> Value {
        json!({
            "model": model,
            "messages": messages,
        })
    }

    fn redact(&self, text: &str) -> String {
        if self.api_key.is_empty() {
            text.to_string()
        } else {
            text.replace(&self.api_key, "[REDACTED]")
        }
    }
}

impl ChatBackend for OpenRouterBackend {
    fn chat(&self, messages: &[ChatMessage], model: &str) -> Result<ChatReply> {
        tracing::debug!(url = %self.url, model, messages = messages.len(), "sending chat request");

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .header("X-Title", APP_TITLE)
            .json(&Self::request_body(messages, model))
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "chat request failed");
            return Err(ChatError::Provider {
                status: status.as_u16(),
                body: self.redact(&body),
            });
        }

        let value: Value = serde_json::from_str(&body)?;
        if let Some(message) = value.pointer("/error/message").and_then(Value::as_str) {
            let status = value
                .pointer("/error/code")
                .and_then(Value::as_u64)
                .and_then(|c| u16::try_from(c).ok())
                .unwrap_or(status.as_u16());
            return Err(ChatError::Provider {
                status,
                body: self.redact(message),
            });
        }

        Ok(ChatReply::Structured(value))
    }
}
