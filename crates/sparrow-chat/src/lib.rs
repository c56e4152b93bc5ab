#![doc = include_str!("../README.md")]

pub mod agent;
pub mod backend;
pub mod config;
pub mod error;
pub mod models;
pub mod openrouter;
pub mod reply;
pub mod types;

pub use agent::{ChatAgent, Generation, SYSTEM_PROMPT};
pub use backend::ChatBackend;
pub use config::ChatConfig;
pub use error::{ChatError, Result};
pub use models::{MODELS, ModelInfo, find_model, select_model};
pub use openrouter::OpenRouterBackend;
pub use reply::ChatReply;
pub use types::{AgentStep, ChatMessage, ChatSession, Message, Phase, Role, StepStatus};
