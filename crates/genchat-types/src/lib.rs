//! Core types and structures for genchat
//!
//! This crate provides the data model shared by the generation client, the
//! export pipeline, and the web gateway.

pub mod error;

pub use error::GenerationError;

use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;

// ============================================================================
// Constants
// ============================================================================

/// Maximum number of retries for generation calls (total attempts = retries + 1)
pub const MAX_RETRIES: u32 = 2;

/// Per-attempt timeout for generation calls
pub const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(600);

/// Fixed wait between failed attempts
pub const RETRY_BACKOFF: Duration = Duration::from_secs(2);

/// How often to log progress while a generation call is in flight
pub const PROGRESS_INTERVAL: Duration = Duration::from_secs(30);

// ============================================================================
// Chat Types
// ============================================================================

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    #[default]
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// Tolerant conversion from wire strings. Anything that is not a user
    /// message is treated as coming from the assistant.
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("user") {
            Role::User
        } else {
            Role::Assistant
        }
    }
}

/// Helper function to deserialize role strings without failing on
/// service-specific values
pub fn deserialize_role<'de, D>(deserializer: D) -> Result<Role, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(Role::parse(&s)),
        _ => Ok(Role::Assistant),
    }
}

/// Helper function to deserialize string or null values
pub fn deserialize_string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        _ => Ok(String::new()),
    }
}

/// A single message in a generation chat. Immutable once received.
///
/// The service calls the structured payload `experimental_content` on the
/// wire; the gateway surfaces it as `structuredContent`.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(default)]
    pub id: String,
    #[serde(deserialize_with = "deserialize_role", default)]
    pub role: Role,
    #[serde(deserialize_with = "deserialize_string_or_null", default)]
    pub content: String,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        alias = "experimental_content"
    )]
    pub structured_content: Option<serde_json::Value>,
}

/// A conversation with the generation service. The id is assigned by the
/// service on creation and stays stable across continuation calls; the chat
/// is never persisted server-side.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none", default, alias = "demo")]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub messages: Vec<Message>,
}

// ============================================================================
// Export Types
// ============================================================================

/// A generated file pulled out of a message's structured content. Derived on
/// each export request, never stored.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct FileArtifact {
    pub name: String,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_parses_wire_shape() {
        // The service sends `demo` and `experimental_content`
        let raw = serde_json::json!({
            "id": "chat_7",
            "demo": "https://preview.example/chat_7",
            "messages": [
                {
                    "id": "m1",
                    "role": "user",
                    "content": "build a todo app"
                },
                {
                    "id": "m2",
                    "role": "assistant",
                    "content": "done",
                    "experimental_content": { "files": [] }
                }
            ]
        });

        let chat: Chat = serde_json::from_value(raw).unwrap();
        assert_eq!(chat.id, "chat_7");
        assert_eq!(chat.preview_url.as_deref(), Some("https://preview.example/chat_7"));
        assert_eq!(chat.messages.len(), 2);
        assert_eq!(chat.messages[0].role, Role::User);
        assert!(chat.messages[1].structured_content.is_some());
    }

    #[test]
    fn missing_message_list_is_zero_messages() {
        let chat: Chat = serde_json::from_value(serde_json::json!({ "id": "chat_8" })).unwrap();
        assert!(chat.messages.is_empty());
        assert!(chat.preview_url.is_none());
    }

    #[test]
    fn unknown_roles_fold_into_assistant() {
        let msg: Message = serde_json::from_value(serde_json::json!({
            "id": "m3",
            "role": "system",
            "content": "hi"
        }))
        .unwrap();
        assert_eq!(msg.role, Role::Assistant);
    }

    #[test]
    fn structured_content_serializes_camel_case() {
        let msg = Message {
            id: "m4".to_string(),
            role: Role::Assistant,
            content: "here".to_string(),
            structured_content: Some(serde_json::json!({ "name": "a.ts", "content": "x" })),
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert!(value.get("structuredContent").is_some());
        assert!(value.get("experimental_content").is_none());
    }
}
