use serde::{Deserialize, Serialize};

use genchat_types::Message;

/// Body of POST /api/chat
///
/// A null or non-string message folds into the empty string so validation
/// answers with the 400 error body instead of a serde rejection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(
        deserialize_with = "genchat_types::deserialize_string_or_null",
        default
    )]
    pub message: String,
    #[serde(default)]
    pub chat_id: Option<String>,
}

/// Failure body shared by every error response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub details: String,
    pub timestamp: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: details.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Body of POST /api/export
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub messages: Vec<Message>,
}

/// Body of GET /api/probe
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeReport {
    pub status: String,
    pub message: String,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,
    pub timestamp: String,
}
