//! OpenAI-compatible chat-completions backend.
//!
//! One blocking HTTP request per role exchange: the role's persona goes in
//! the system message and the rendered briefing in the user message. Any
//! transport or API failure maps to a per-role `GeneratorFailure`, which
//! the orchestrator absorbs with fallback text.

use pitwall_core::{GeneratorBackendConfig, PromptBuilder};
use pitwall_proto::{Error, Result, RoleGenerator, RoleId};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::factory::BackendError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Generator backed by an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Debug)]
pub struct HttpGenerator {
    client: reqwest::blocking::Client,
    base_url: String,
    model: String,
    api_key: String,
    temperature: f32,
}

impl HttpGenerator {
    /// Builds the backend from configuration, reading the API key from the
    /// configured environment variable.
    pub fn from_config(config: &GeneratorBackendConfig) -> std::result::Result<Self, BackendError> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| BackendError::MissingApiKey {
            env: config.api_key_env.clone(),
        })?;
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            temperature: config.temperature,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

impl RoleGenerator for HttpGenerator {
    fn generate(&self, role: RoleId, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: PromptBuilder::persona(role),
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        debug!(%role, model = %self.model, "chat completion request");
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .map_err(|e| Error::generator(role, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::generator(role, format!("endpoint returned {status}")));
        }

        let body: ChatResponse = response
            .json()
            .map_err(|e| Error::generator(role, format!("malformed completion: {e}")))?;
        body.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| Error::generator(role, "empty completion"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_to_the_wire_shape() {
        let request = ChatRequest {
            model: "llama3-8b-8192",
            temperature: 0.6,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "persona",
                },
                ChatMessage {
                    role: "user",
                    content: "briefing",
                },
            ],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "llama3-8b-8192");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "briefing");
    }

    #[test]
    fn response_parses_the_first_choice() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"Box this lap."}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices[0].message.content, "Box this lap.");
    }

    #[test]
    fn missing_api_key_is_reported_before_any_request() {
        let config = GeneratorBackendConfig {
            api_key_env: "PITWALL_TEST_UNSET_KEY".to_string(),
            ..GeneratorBackendConfig::default()
        };
        let err = HttpGenerator::from_config(&config).unwrap_err();
        assert!(matches!(err, BackendError::MissingApiKey { .. }));
        assert!(err.to_string().contains("PITWALL_TEST_UNSET_KEY"));
    }
}
