//! Insight generation via an external language model.
//!
//! The collaborator sits behind the narrow [`InsightGenerator`] trait
//! (one method: text in, text out, or failure) so tests can substitute
//! a deterministic stub and assert exact prompt content without
//! network access. The production implementation speaks the Mistral
//! chat-completions protocol.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use salespulse::insight::{InsightGenerator, MistralClient, rep_prompt, system_prompt};
//!
//! let client = MistralClient::from_env()?;
//! let text = client.generate(&rep_prompt(&summary), system_prompt()).await?;
//! ```

pub mod prompt;

use async_trait::async_trait;
use serde::Deserialize;
use std::env;

use crate::error::{InsightError, InsightResult};

pub use prompt::{rep_prompt, system_prompt, team_prompt, trends_prompt};

/// Chat completions endpoint.
const API_URL: &str = "https://api.mistral.ai/v1/chat/completions";

/// Environment variable holding the API key.
const API_KEY_ENV: &str = "MISTRAL_API_KEY";

// Completion defaults.
const DEFAULT_MODEL: &str = "mistral-large-latest";
const DEFAULT_MAX_TOKENS: u32 = 500;
const DEFAULT_TEMPERATURE: f64 = 0.7;

/// The external insight collaborator.
///
/// Takes a rendered summary prompt plus a system instruction and
/// returns prose commentary, or fails. No retries, no timeout: a
/// request either completes or fails.
#[async_trait]
pub trait InsightGenerator: Send + Sync {
    /// Generate narrative commentary for a rendered summary.
    async fn generate(&self, prompt: &str, system: &str) -> InsightResult<String>;
}

/// Mistral API client.
#[derive(Clone)]
pub struct MistralClient {
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f64,
    http: reqwest::Client,
}

/// Chat completion response structure.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

/// Provider error response.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl MistralClient {
    /// Create a new client with an explicit API key.
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            http: reqwest::Client::new(),
        }
    }

    /// Create a client from the MISTRAL_API_KEY environment variable.
    pub fn from_env() -> InsightResult<Self> {
        // Try loading .env file
        let _ = dotenvy::dotenv();

        let api_key = env::var(API_KEY_ENV).map_err(|_| InsightError::MissingApiKey)?;

        Ok(Self::new(api_key))
    }

    /// Set the model to use.
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Set the completion token budget.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }
}

#[async_trait]
impl InsightGenerator for MistralClient {
    async fn generate(&self, prompt: &str, system: &str) -> InsightResult<String> {
        let request_body = serde_json::json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": prompt }
            ]
        });

        let response = self
            .http
            .post(API_URL)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| InsightError::RequestFailed(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| InsightError::RequestFailed(e.to_string()))?;

        if !status.is_success() {
            // Try to parse the provider's error message
            if let Ok(error) = serde_json::from_str::<ApiErrorBody>(&body) {
                return Err(InsightError::ApiError(error.message));
            }
            return Err(InsightError::ApiError(format!("HTTP {status}: {body}")));
        }

        let response: ChatResponse =
            serde_json::from_str(&body).map_err(|e| InsightError::InvalidResponse(e.to_string()))?;

        let text = response
            .choices
            .first()
            .map(|choice| choice.message.content.trim().to_string())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(InsightError::InvalidResponse("Empty completion".to_string()));
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides() {
        let client = MistralClient::new("test-key".into())
            .with_model("mistral-small-latest")
            .with_max_tokens(128)
            .with_temperature(0.0);

        assert_eq!(client.model, "mistral-small-latest");
        assert_eq!(client.max_tokens, 128);
        assert_eq!(client.temperature, 0.0);
    }

    #[test]
    fn test_default_configuration() {
        let client = MistralClient::new("test-key".into());
        assert_eq!(client.model, "mistral-large-latest");
        assert_eq!(client.max_tokens, 500);
        assert_eq!(client.temperature, 0.7);
    }

    #[test]
    fn test_parse_completion_body() {
        let body = r#"{
            "id": "cmpl-1",
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "  Strong quarter.  " } }
            ],
            "usage": { "total_tokens": 12 }
        }"#;

        let response: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            response.choices[0].message.content.trim(),
            "Strong quarter."
        );
    }

    #[test]
    fn test_parse_provider_error_body() {
        let body = r#"{ "object": "error", "message": "Unauthorized", "type": "invalid_request_error" }"#;
        let error: ApiErrorBody = serde_json::from_str(body).unwrap();
        assert_eq!(error.message, "Unauthorized");
    }
}
