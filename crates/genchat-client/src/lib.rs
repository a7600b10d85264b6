//! Client for the v0 app-generation API and the retry/timeout wrapper
//! around it.

pub mod retry;
pub mod v0;

pub use retry::{call_with_retry, RetryPolicy};
pub use v0::{V0GenerationClient, V0_API_URL};

use async_trait::async_trait;
use genchat_types::{Chat, GenerationError};

/// Abstraction over the remote generation service. The concrete
/// implementation is constructed once at startup and injected into the
/// request handlers.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Start a new chat from a prompt.
    async fn create_chat(&self, message: &str) -> Result<Chat, GenerationError>;

    /// Append a prompt to an existing chat.
    async fn continue_chat(&self, chat_id: &str, message: &str) -> Result<Chat, GenerationError>;
}

/// A single create-or-continue request as seen by the retry wrapper.
#[derive(Debug, Clone)]
pub enum GenerationRequest {
    Create { message: String },
    Continue { chat_id: String, message: String },
}

impl GenerationRequest {
    /// The chat this request targets, if it continues an existing one.
    pub fn chat_id(&self) -> Option<&str> {
        match self {
            GenerationRequest::Create { .. } => None,
            GenerationRequest::Continue { chat_id, .. } => Some(chat_id),
        }
    }
}
