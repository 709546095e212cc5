//! GroqBrain implementation using an OpenAI-compatible API.

use brain_core::{async_trait, prompt_fingerprint, Brain, BrainError, GenerationRequest};
use reqwest::Client;
use tracing::{debug, warn};

use crate::api_types::{ApiError, ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use crate::config::GroqBrainConfig;

/// A brain implementation that calls a chat-completions endpoint.
///
/// GroqBrain keeps no conversation state; every request carries its own
/// system prompt and history.
pub struct GroqBrain {
    client: Client,
    config: GroqBrainConfig,
}

impl GroqBrain {
    /// Create a new GroqBrain with the given configuration.
    pub fn new(config: GroqBrainConfig) -> Result<Self, BrainError> {
        if config.api_key.trim().is_empty() {
            return Err(BrainError::Configuration("API key is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BrainError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "GroqBrain initialized with model: {}, timeout: {:?}",
            config.model,
            config.timeout
        );

        Ok(Self { client, config })
    }

    /// Create a GroqBrain from environment variables.
    ///
    /// See [`GroqBrainConfig::from_env`] for required environment variables.
    pub fn from_env() -> Result<Self, BrainError> {
        let config = GroqBrainConfig::from_env()?;
        Self::new(config)
    }

    /// Get the configuration.
    pub fn config(&self) -> &GroqBrainConfig {
        &self.config
    }

    /// Build the messages array for a chat completion request.
    fn build_messages(request: GenerationRequest) -> Vec<ChatMessage> {
        request.to_messages().into_iter().map(ChatMessage::from).collect()
    }

    /// Make a chat completion request.
    async fn chat_completion(
        &self,
        messages: Vec<ChatMessage>,
    ) -> Result<ChatCompletionResponse, BrainError> {
        let url = format!(
            "{}/v1/chat/completions",
            self.config.api_url.trim_end_matches('/')
        );

        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        debug!(
            "Sending request to {} with {} messages",
            url,
            request.messages.len()
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BrainError::Timeout
                } else {
                    BrainError::Network(format!("Failed to send request: {}", e))
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            // Try to parse as API error
            if let Ok(api_error) = serde_json::from_str::<ApiError>(&error_text) {
                return Err(BrainError::ProcessingFailed(format!(
                    "API error ({}): {}",
                    status.as_u16(),
                    api_error.error.message
                )));
            }

            return Err(BrainError::ProcessingFailed(format!(
                "API error ({}): {}",
                status.as_u16(),
                error_text
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| BrainError::ProcessingFailed(format!("Failed to parse response: {}", e)))?;

        Ok(completion)
    }
}

#[async_trait]
impl Brain for GroqBrain {
    async fn generate(&self, request: GenerationRequest) -> Result<String, BrainError> {
        debug!(
            "Generating reply (prompt {}, {} history messages)",
            prompt_fingerprint(&request.system_prompt),
            request.history.len()
        );

        let messages = Self::build_messages(request);
        let completion = self.chat_completion(messages).await?;

        if let Some(usage) = &completion.usage {
            debug!(
                "Token usage - prompt: {}, completion: {}, total: {}",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        let choice = completion.choices.into_iter().next().ok_or_else(|| {
            BrainError::ProcessingFailed("Response contained no choices".to_string())
        })?;

        match choice.message.content {
            Some(content) if !content.trim().is_empty() => Ok(content),
            _ => {
                warn!(
                    finish_reason = ?choice.finish_reason,
                    "Response contained no content"
                );
                Err(BrainError::ProcessingFailed(
                    "Response contained no content".to_string(),
                ))
            }
        }
    }

    fn name(&self) -> &str {
        "GroqBrain"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brain_core::HistoryMessage;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn brain_for(server: &MockServer) -> GroqBrain {
        let config = GroqBrainConfig::builder()
            .api_key("test-key")
            .api_url(server.uri())
            .build();
        GroqBrain::new(config).unwrap()
    }

    fn completion_body(content: serde_json::Value) -> serde_json::Value {
        json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "created": 1736000000,
            "model": "llama-3.1-8b-instant",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        })
    }

    #[test]
    fn test_brain_name() {
        let config = GroqBrainConfig::builder().api_key("test-key").build();
        let brain = GroqBrain::new(config).unwrap();
        assert_eq!(brain.name(), "GroqBrain");
    }

    #[test]
    fn test_new_rejects_empty_key() {
        let result = GroqBrain::new(GroqBrainConfig::default());
        assert!(matches!(result, Err(BrainError::Configuration(_))));
    }

    #[test]
    fn test_build_messages_order() {
        let request = GenerationRequest::new("rules", "new question")
            .with_history(vec![HistoryMessage::user("q1"), HistoryMessage::assistant("a1")]);

        let messages = GroqBrain::build_messages(request);
        let roles: Vec<&str> = messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, vec!["system", "user", "assistant", "user"]);
        assert_eq!(messages[3].content, "new question");
    }

    #[tokio::test]
    async fn test_generate_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(json!({
                "model": "llama-3.1-8b-instant",
                "max_tokens": 500,
                "messages": [
                    {"role": "system", "content": "rules"},
                    {"role": "user", "content": "What is SkyPay?"}
                ]
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion_body(json!("SkyPay is a payment gateway."))),
            )
            .expect(1)
            .mount(&server)
            .await;

        let brain = brain_for(&server);
        let reply = brain
            .generate(GenerationRequest::new("rules", "What is SkyPay?"))
            .await
            .unwrap();

        assert_eq!(reply, "SkyPay is a payment gateway.");
    }

    #[tokio::test]
    async fn test_generate_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": {"message": "Rate limit reached", "type": "tokens"}
            })))
            .mount(&server)
            .await;

        let brain = brain_for(&server);
        let err = brain
            .generate(GenerationRequest::new("rules", "hi"))
            .await
            .unwrap_err();

        match err {
            BrainError::ProcessingFailed(msg) => {
                assert!(msg.contains("429"));
                assert!(msg.contains("Rate limit reached"));
            }
            other => panic!("Expected ProcessingFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_generate_null_content_is_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(json!(null))))
            .mount(&server)
            .await;

        let brain = brain_for(&server);
        let result = brain.generate(GenerationRequest::new("rules", "hi")).await;
        assert!(matches!(result, Err(BrainError::ProcessingFailed(_))));
    }

    #[tokio::test]
    async fn test_generate_malformed_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let brain = brain_for(&server);
        let result = brain.generate(GenerationRequest::new("rules", "hi")).await;
        assert!(matches!(result, Err(BrainError::ProcessingFailed(_))));
    }

    #[tokio::test]
    async fn test_generate_timeout() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion_body(json!("late")))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let config = GroqBrainConfig::builder()
            .api_key("test-key")
            .api_url(server.uri())
            .timeout(Duration::from_millis(50))
            .build();
        let brain = GroqBrain::new(config).unwrap();

        let result = brain.generate(GenerationRequest::new("rules", "hi")).await;
        assert!(matches!(result, Err(BrainError::Timeout)));
    }

    #[tokio::test]
    async fn test_generate_connection_refused() {
        let config = GroqBrainConfig::builder()
            .api_key("test-key")
            .api_url("http://127.0.0.1:9")
            .build();
        let brain = GroqBrain::new(config).unwrap();

        let result = brain.generate(GenerationRequest::new("rules", "hi")).await;
        assert!(matches!(result, Err(BrainError::Network(_))));
    }
}
