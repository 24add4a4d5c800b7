/*!
 * Provider implementations for the text-generation API.
 *
 * The translation pipeline and any other model-calling code depend on the
 * `GenerationProvider` trait rather than a concrete client, so tests can
 * inject scripted providers and the HTTP client can be shared and reused
 * across requests.
 */

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::GenerationError;

/// Common trait for text-generation providers
///
/// Implementations are expected to request JSON output from the model and
/// return the parsed document; anything the model produces that is not valid
/// JSON surfaces as `GenerationError::Parse`.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Complete a chat request and parse the model output as JSON.
    ///
    /// # Arguments
    /// * `system_prompt` - The system message guiding the model
    /// * `user_content` - The user message content
    /// * `temperature` - Sampling temperature for this call
    async fn complete_json(
        &self,
        system_prompt: &str,
        user_content: &str,
        temperature: f32,
    ) -> Result<Value, GenerationError>;
}

pub mod openai;

pub use openai::OpenAiProvider;
