//! Request/response model shared by LLM clients.

use serde::{Deserialize, Serialize};

/// Conversation role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// A single piece of message content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Part {
    Text { content: String },
    Reasoning { content: String },
}

impl Part {
    pub fn text(content: impl Into<String>) -> Self {
        Part::Text {
            content: content.into(),
        }
    }
}

/// A conversation message, tagged by role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Message {
    User(Vec<Part>),
    Assistant(Vec<Part>),
    System(Vec<Part>),
}

impl Message {
    /// Convenience constructor for a single-part user message.
    pub fn user(text: impl Into<String>) -> Self {
        Message::User(vec![Part::text(text)])
    }

    pub fn role(&self) -> Role {
        match self {
            Message::User(_) => Role::User,
            Message::Assistant(_) => Role::Assistant,
            Message::System(_) => Role::System,
        }
    }

    pub fn parts(&self) -> &[Part] {
        match self {
            Message::User(parts) | Message::Assistant(parts) | Message::System(parts) => parts,
        }
    }

    /// Concatenated visible text of this message, skipping reasoning parts.
    pub fn content(&self) -> Option<String> {
        let text: Vec<&str> = self
            .parts()
            .iter()
            .filter_map(|part| match part {
                Part::Text { content } => Some(content.as_str()),
                Part::Reasoning { .. } => None,
            })
            .collect();

        if text.is_empty() {
            None
        } else {
            Some(text.concat())
        }
    }
}

/// A completed model response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub data: Vec<Message>,
}

impl Response {
    /// All assistant text in the response, joined in order.
    pub fn text(&self) -> String {
        self.data
            .iter()
            .filter(|m| m.role() == Role::Assistant)
            .filter_map(Message::content)
            .collect()
    }
}
