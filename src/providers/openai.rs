use std::time::Duration;

use async_trait::async_trait;
use log::error;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::app_config::GenerationConfig;
use crate::errors::GenerationError;

use super::GenerationProvider;

/// Client for an OpenAI-compatible chat completions API
///
/// The client owns a pooled reqwest::Client and is meant to be constructed
/// once and shared; callers inject it behind the `GenerationProvider` trait.
pub struct OpenAiProvider {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API endpoint base URL
    endpoint: String,
    /// Model identifier sent with every request
    model: String,
}

/// Chat completion request body
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    response_format: ResponseFormat<'a>,
}

/// Chat message
#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response format selector; `json_object` forces JSON mode
#[derive(Debug, Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    format_type: &'a str,
}

/// Chat completion response
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

/// Individual completion choice
#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

/// Message inside a completion choice
#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

impl OpenAiProvider {
    /// Create a new provider from the generation config.
    pub fn new(config: &GenerationConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .pool_idle_timeout(Duration::from_secs(90))
                .tcp_keepalive(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            api_key: config.api_key.clone(),
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
        }
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.endpoint.trim_end_matches('/')
        )
    }

    /// Classify a transport-level reqwest error.
    fn map_transport_error(e: reqwest::Error) -> GenerationError {
        // Timeouts and connection failures are both transient connectivity
        GenerationError::Connection(e.to_string())
    }
}

#[async_trait]
impl GenerationProvider for OpenAiProvider {
    async fn complete_json(
        &self,
        system_prompt: &str,
        user_content: &str,
        temperature: f32,
    ) -> Result<Value, GenerationError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: system_prompt },
                ChatMessage { role: "user", content: user_content },
            ],
            temperature,
            response_format: ResponseFormat { format_type: "json_object" },
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Generation API error ({}): {}", status, error_text);
            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(GenerationError::RateLimited(error_text));
            }
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let chat_response = response
            .json::<ChatResponse>()
            .await
            .map_err(|e| GenerationError::Parse(e.to_string()))?;

        let content = chat_response
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .ok_or_else(|| {
                GenerationError::Parse("response contained no choices".to_string())
            })?;

        serde_json::from_str(content).map_err(|e| {
            error!(
                "Model returned invalid JSON: {} (first 200 chars: {})",
                e,
                content.chars().take(200).collect::<String>()
            );
            GenerationError::Parse(e.to_string())
        })
    }
}
