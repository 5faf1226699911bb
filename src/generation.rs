//! Generation (chat completion) provider abstraction.
//!
//! Defines the [`Generator`] trait and the [`OpenAiGenerator`] implementation,
//! which calls the OpenAI chat completions API. Retry policy matches the
//! embedding provider: 429/5xx and network errors retry with exponential
//! backoff, other client errors fail immediately.

use async_trait::async_trait;
use std::time::Duration;

use crate::config::GenerationConfig;
use crate::error::{Error, Result};

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Trait for text-generation providers.
///
/// Takes a system instruction and a user message, returns the generated
/// text of the first choice. The pipeline holds an `Arc<dyn Generator>` so
/// tests can substitute a mock and assert the exact prompts passed through.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a completion for the given system and user messages.
    async fn complete(&self, system: &str, user: &str) -> Result<String>;

    /// Returns the model identifier (e.g. `"gpt-3.5-turbo"`).
    fn model_name(&self) -> &str;
}

/// Generation provider using the OpenAI chat completions API.
pub struct OpenAiGenerator {
    model: String,
    max_tokens: u32,
    api_key: String,
    max_retries: u32,
    client: reqwest::Client,
}

impl OpenAiGenerator {
    /// Create a new OpenAI generator from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `OPENAI_API_KEY` is not in the environment or
    /// the HTTP client cannot be built.
    pub fn new(config: &GenerationConfig) -> anyhow::Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY environment variable not set"))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            api_key,
            max_retries: config.max_retries,
            client,
        })
    }
}

#[async_trait]
impl Generator for OpenAiGenerator {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
            "max_tokens": self.max_tokens,
        });

        let mut last_err = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = Duration::from_secs(1 << (attempt - 1).min(5));
                tokio::time::sleep(delay).await;
            }

            let resp = self
                .client
                .post(OPENAI_CHAT_URL)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("Content-Type", "application/json")
                .json(&body)
                .send()
                .await;

            match resp {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        let json: serde_json::Value = response
                            .json()
                            .await
                            .map_err(|e| Error::generation(e.to_string()))?;
                        return parse_chat_response(&json);
                    }

                    if status.as_u16() == 429 || status.is_server_error() {
                        let body_text = response.text().await.unwrap_or_default();
                        last_err = Some(format!("OpenAI API error {}: {}", status, body_text));
                        continue;
                    }

                    let body_text = response.text().await.unwrap_or_default();
                    return Err(Error::generation(format!(
                        "OpenAI API error {}: {}",
                        status, body_text
                    )));
                }
                Err(e) => {
                    last_err = Some(e.to_string());
                    continue;
                }
            }
        }

        Err(Error::generation(
            last_err.unwrap_or_else(|| "Completion failed after retries".to_string()),
        ))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Parse the OpenAI chat completions response JSON.
///
/// Extracts `choices[0].message.content`.
fn parse_chat_response(json: &serde_json::Value) -> Result<String> {
    let content = json
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .ok_or_else(|| Error::generation("Invalid OpenAI response: missing message content"))?;

    Ok(content.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chat_response() {
        let json = serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": "Paris." } }]
        });
        assert_eq!(parse_chat_response(&json).unwrap(), "Paris.");
    }

    #[test]
    fn test_parse_chat_response_no_choices() {
        let json = serde_json::json!({ "choices": [] });
        let err = parse_chat_response(&json).unwrap_err();
        assert!(err.to_string().contains("generation provider error"));
    }

    #[test]
    fn test_parse_chat_response_missing_content() {
        let json = serde_json::json!({ "choices": [{ "message": { "role": "assistant" } }] });
        assert!(parse_chat_response(&json).is_err());
    }
}
