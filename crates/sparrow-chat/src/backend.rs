use crate::error::Result;
use crate::reply::ChatReply;
use crate::types::ChatMessage;

/// Anything that can answer a chat request.
///
/// Implementations make a single attempt; retry policy (there is none)
/// belongs to the caller.
pub trait ChatBackend {
    fn chat(&self, messages: &[ChatMessage], model: &str) -> Result<ChatReply>;
}

impl<B: ChatBackend + ?Sized> ChatBackend for &B {
    fn chat(&self, messages: &[ChatMessage], model: &str) -> Result<ChatReply> {
        (**self).chat(messages, model)
    }
}

impl<B: ChatBackend + ?Sized> ChatBackend for Box<B> {
    fn chat(&self, messages: &[ChatMessage], model: &str) -> Result<ChatReply> {
        (**self).chat(messages, model)
    }
}
