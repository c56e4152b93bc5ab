use sparrow::SinkError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChatError>;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("provider returned {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("no API key configured (set OPENROUTER_API_KEY)")]
    MissingApiKey,

    #[error("a request is already in flight")]
    Busy,

    #[error("prompt is empty")]
    EmptyPrompt,

    #[error("failed to apply generated files: {0}")]
    Apply(#[source] SinkError),
}
