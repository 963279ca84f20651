use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::BridgeConfig;
use crate::errors::{BridgeError, BridgeResult};
use crate::types::{build_payload, ApiErrorBody, Provider};

/// Something that turns a prompt into generated text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for a single prompt
    async fn generate(&self, prompt: &str) -> BridgeResult<String>;

    /// Get the model name being used
    fn model_name(&self) -> &str;
}

/// HTTP client for the configured text-generation API
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    config: BridgeConfig,
}

impl UpstreamClient {
    /// Create a new client, failing fast on invalid configuration
    pub fn new(config: BridgeConfig) -> BridgeResult<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10).min(config.timeout))
            .build()
            .map_err(|e| BridgeError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Sends one request for `prompt` and returns the raw JSON body of a successful reply
    async fn send(&self, prompt: &str) -> BridgeResult<Value> {
        let payload = build_payload(
            self.config.provider,
            &self.config.model,
            prompt,
            &self.config.params,
        )
        .map_err(|e| BridgeError::ParsingError(format!("Failed to encode request: {}", e)))?;

        let request = self.client.post(&self.config.endpoint).json(&payload);
        let request = match self.config.provider {
            Provider::Gemini => request.header("x-goog-api-key", &self.config.api_key),
            Provider::Completions | Provider::Chat => request.bearer_auth(&self.config.api_key),
        };

        let response = request
            .send()
            .await
            .map_err(|e| BridgeError::from_reqwest(e, self.config.timeout))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BridgeError::from_reqwest(e, self.config.timeout))?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ApiErrorBody>(&body) {
                Ok(error_body) => error_body.error.to_string(),
                Err(_) => body,
            };
            return Err(BridgeError::HttpError {
                status_code: status.as_u16(),
                message,
            });
        }

        let value: Value = serde_json::from_str(&body)
            .map_err(|e| BridgeError::ParsingError(format!("Failed to parse response: {}", e)))?;

        // Some gateways report failures with a 200 status
        if let Ok(error_body) = serde_json::from_value::<ApiErrorBody>(value.clone()) {
            return Err(BridgeError::ApiError(error_body.error.to_string()));
        }

        Ok(value)
    }
}

/// Pulls the generated text out of `body` at `pointer`
pub fn extract_text(body: &Value, pointer: &str) -> BridgeResult<String> {
    match body.pointer(pointer) {
        Some(Value::String(text)) => Ok(text.clone()),
        Some(other) => Err(BridgeError::MissingField(format!(
            "{} (found {} instead of a string)",
            pointer,
            json_kind(other)
        ))),
        None => Err(BridgeError::MissingField(pointer.to_string())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[async_trait]
impl TextGenerator for UpstreamClient {
    async fn generate(&self, prompt: &str) -> BridgeResult<String> {
        debug!(
            provider = %self.config.provider,
            model = %self.config.model,
            prompt_len = prompt.len(),
            "Sending request to upstream"
        );

        let body = self.send(prompt).await?;

        if self.config.provider != Provider::Gemini {
            if let Some(reason) = body.pointer("/choices/0/finish_reason").and_then(Value::as_str) {
                if reason == "length" {
                    warn!("Upstream truncated the answer at the token limit");
                }
            }
        } else if let Some(reason) = body
            .pointer("/candidates/0/finishReason")
            .and_then(Value::as_str)
        {
            if reason != "STOP" {
                warn!("Gemini generation finish reason: {}", reason);
            }
        }

        extract_text(&body, &self.config.answer_pointer)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_text_completions_shape() {
        let body = json!({"choices": [{"text": "Hi there"}]});
        assert_eq!(extract_text(&body, "/choices/0/text").unwrap(), "Hi there");
    }

    #[test]
    fn test_extract_text_preserves_whitespace() {
        let body = json!({"choices": [{"text": "\n  Hi there  \n"}]});
        assert_eq!(
            extract_text(&body, "/choices/0/text").unwrap(),
            "\n  Hi there  \n"
        );
    }

    #[test]
    fn test_extract_text_missing_field() {
        let body = json!({"choices": []});
        match extract_text(&body, "/choices/0/text") {
            Err(BridgeError::MissingField(pointer)) => assert_eq!(pointer, "/choices/0/text"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_extract_text_wrong_type() {
        let body = json!({"choices": [{"text": 42}]});
        let err = extract_text(&body, "/choices/0/text").unwrap_err();
        assert!(err.to_string().contains("a number"));
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = BridgeConfig::new(Provider::Chat, "key");
        config.api_key = String::new();
        assert!(matches!(
            UpstreamClient::new(config),
            Err(BridgeError::ConfigError(_))
        ));
    }
}
