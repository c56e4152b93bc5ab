use serde_json::Value;

/// What a backend hands back: bare text, or a structured envelope that
/// carries the text somewhere inside.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatReply {
    Text(String),
    Structured(Value),
}

impl ChatReply {
    /// The textual payload, or an empty string when none can be found.
    ///
    /// Structured replies are searched in order: a bare JSON string,
    /// `message.content`, then `choices[0].message.content` (the
    /// chat-completions shape).
    ///
    /// ```
    /// use sparrow_chat::ChatReply;
    /// use serde_json::json;
    ///
    /// let reply = ChatReply::Structured(json!({"message": {"content": "hi"}}));
    /// assert_eq!(reply.text(), "hi");
    /// ```
    pub fn text(&self) -> String {
        match self {
            ChatReply::Text(text) => text.clone(),
            ChatReply::Structured(value) => structured_text(value).unwrap_or_default(),
        }
    }
}

fn structured_text(value: &Value) -> Option<String> {
    if let Some(s) = value.as_str() {
        return Some(s.to_string());
    }
    let message = value
        .get("message")
        .or_else(|| value.pointer("/choices/0/message"))?;
    content_text(message.get("content")?)
}

/// `content` is either a string or a list of typed parts.
fn content_text(content: &Value) -> Option<String> {
    match content {
        Value::String(s) => Some(s.clone()),
        Value::Array(parts) => {
            let texts: Vec<&str> = parts
                .iter()
                .filter_map(|p| p.get("text").and_then(Value::as_str))
                .collect();
            if texts.is_empty() {
                None
            } else {
                Some(texts.join(""))
            }
        }
        _ => None,
    }
}
