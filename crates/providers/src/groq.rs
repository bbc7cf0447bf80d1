//! Groq chat-completion client (OpenAI-compatible wire format).
//!
//! One request per call: non-streaming, fixed model id, no retries.
//! Transport failures map to `UpstreamError::Network`, non-success status
//! codes to `UpstreamError::Api`, and an empty choice list to
//! `UpstreamError::MalformedResponse`.

use async_trait::async_trait;
use interdesk_config::ProviderConfig;
use interdesk_core::error::UpstreamError;
use interdesk_core::message::Message;
use interdesk_core::CompletionClient;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A client for Groq's OpenAI-compatible chat-completion API.
pub struct GroqClient {
    name: String,
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl GroqClient {
    /// Build a client from provider configuration.
    ///
    /// Fails with `UpstreamError::Network` when the underlying HTTP client
    /// cannot be constructed (TLS backend unavailable).
    pub fn new(config: &ProviderConfig) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| UpstreamError::Network(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            name: "groq".into(),
            base_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().unwrap_or_default(),
            model: config.model.clone(),
            client,
        })
    }

    /// Convert our Message types to the OpenAI API format.
    fn to_api_messages(messages: &[Message]) -> Vec<ApiMessage<'_>> {
        messages
            .iter()
            .map(|m| ApiMessage {
                role: m.role.as_str(),
                content: &m.content,
            })
            .collect()
    }
}

#[async_trait]
impl CompletionClient for GroqClient {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, messages: &[Message]) -> Result<String, UpstreamError> {
        let url = format!("{}/chat/completions", self.base_url);

        let body = ApiRequest {
            model: &self.model,
            messages: Self::to_api_messages(messages),
            stream: false,
        };

        debug!(client = %self.name, model = %self.model, messages = messages.len(), "Sending completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        let status = response.status().as_u16();

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Completion endpoint returned error");
            return Err(UpstreamError::Api {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::MalformedResponse(format!("Failed to parse body: {e}")))?;

        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| UpstreamError::MalformedResponse("No choices in response".into()))?;

        Ok(choice.message.content.unwrap_or_default())
    }
}

// --- OpenAI-compatible wire format ---

#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: Vec<ApiMessage<'a>>,
    stream: bool,
}

#[derive(Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
}

#[derive(Deserialize)]
struct ApiChoice {
    message: ApiResponseMessage,
}

#[derive(Deserialize)]
struct ApiResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use interdesk_core::message::Role;

    fn test_config() -> ProviderConfig {
        ProviderConfig {
            api_key: Some("gsk_test".into()),
            api_url: "https://api.groq.com/openai/v1/".into(),
            model: "llama-3.1-8b-instant".into(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn strips_trailing_slash_from_base_url() {
        let client = GroqClient::new(&test_config()).unwrap();
        assert_eq!(client.base_url, "https://api.groq.com/openai/v1");
    }

    #[test]
    fn api_messages_preserve_order_and_roles() {
        let messages = vec![
            Message::system("You are a support agent"),
            Message::user("Hi"),
            Message::assistant("Hello, how can I help?"),
        ];
        let api = GroqClient::to_api_messages(&messages);
        assert_eq!(api.len(), 3);
        assert_eq!(api[0].role, Role::System.as_str());
        assert_eq!(api[2].content, "Hello, how can I help?");
    }

    #[test]
    fn request_body_serializes_in_openai_shape() {
        let body = ApiRequest {
            model: "llama-3.1-8b-instant",
            messages: vec![ApiMessage {
                role: "user",
                content: "billing question",
            }],
            stream: false,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains(r#""model":"llama-3.1-8b-instant""#));
        assert!(json.contains(r#""stream":false"#));
    }

    #[tokio::test]
    async fn unreachable_endpoint_maps_to_network_error() {
        let mut config = test_config();
        // Reserved TEST-NET address, nothing listens there.
        config.api_url = "http://192.0.2.1:9".into();
        config.timeout_secs = 1;

        let client = GroqClient::new(&config).unwrap();
        let err = client.complete(&[Message::user("hello")]).await.unwrap_err();
        assert!(matches!(err, UpstreamError::Network(_)));
    }
}
