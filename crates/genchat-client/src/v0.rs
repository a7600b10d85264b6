use async_trait::async_trait;
use serde_json::Value;

use genchat_types::{Chat, GenerationError};

use crate::GenerationClient;

/// Default base URL for the v0 Platform API
pub const V0_API_URL: &str = "https://api.v0.dev/v1";

/// Generation client backed by the v0 Platform API
pub struct V0GenerationClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl V0GenerationClient {
    pub fn new(api_key: String, base_url: String) -> Self {
        // Ensure base_url doesn't end with a slash
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            api_key,
            base_url,
            client: reqwest::Client::new(),
        }
    }

    fn chats_url(&self) -> String {
        format!("{}/chats", self.base_url)
    }

    fn messages_url(&self, chat_id: &str) -> String {
        format!("{}/chats/{}/messages", self.base_url, chat_id)
    }

    async fn send(&self, url: &str, body: Value) -> Result<Chat, GenerationError> {
        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_string());
            return Err(GenerationError::from_status(
                status.as_u16(),
                extract_error_message(&error_body),
            ));
        }

        let text = response
            .text()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| GenerationError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl GenerationClient for V0GenerationClient {
    async fn create_chat(&self, message: &str) -> Result<Chat, GenerationError> {
        self.send(&self.chats_url(), serde_json::json!({ "message": message }))
            .await
    }

    async fn continue_chat(&self, chat_id: &str, message: &str) -> Result<Chat, GenerationError> {
        self.send(
            &self.messages_url(chat_id),
            serde_json::json!({ "message": message }),
        )
        .await
    }
}

/// Pull a human-readable message out of a JSON error body, falling back to
/// the raw text.
fn extract_error_message(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        if let Some(msg) = json["error"]["message"]
            .as_str()
            .or_else(|| json["error"].as_str())
            .or_else(|| json["message"].as_str())
        {
            return msg.to_string();
        }
    }
    body.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_extraction() {
        assert_eq!(
            extract_error_message(r#"{"error":{"message":"invalid api key"}}"#),
            "invalid api key"
        );
        assert_eq!(extract_error_message(r#"{"error":"nope"}"#), "nope");
        assert_eq!(extract_error_message(r#"{"message":"rate limited"}"#), "rate limited");
        assert_eq!(extract_error_message("<html>bad gateway</html>"), "<html>bad gateway</html>");
    }

    #[test]
    fn base_url_slash_is_trimmed() {
        let client = V0GenerationClient::new("key".into(), "https://api.v0.dev/v1/".into());
        assert_eq!(client.chats_url(), "https://api.v0.dev/v1/chats");
        assert_eq!(
            client.messages_url("chat_9"),
            "https://api.v0.dev/v1/chats/chat_9/messages"
        );
    }
}
