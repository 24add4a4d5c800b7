/*!
 * Core translation pipeline.
 *
 * The Translator dispatches batches in rounds of bounded size. Within a
 * round, batches run concurrently against the generation API; rounds execute
 * strictly sequentially so the rolling context can be updated exactly once
 * between them. Every failure mode degrades to the original text, so
 * `translate_segments` always returns one output per input segment.
 */

use std::collections::HashMap;
use std::sync::Arc;

use futures::future;
use log::{debug, info, warn};
use serde_json::Value;

use crate::app_config::{GenerationConfig, PipelineConfig, RetryConfig};
use crate::errors::GenerationError;
use crate::providers::GenerationProvider;
use crate::retry::{RetryPolicy, retry_with_policy};
use crate::transcript::{TimedSegment, TranslatedSegment};

use super::batch::chunk_segments;
use super::context::trailing_context;
use super::prompts;

/// Context-preserving batch translator
pub struct Translator {
    /// Injected generation provider, shared across batches
    provider: Arc<dyn GenerationProvider>,

    /// Pipeline knobs: batch size, context size, concurrent-batch count
    pipeline: PipelineConfig,

    /// Retry policy applied to each batch's generation call
    retry: RetryPolicy,

    /// Sampling temperature passed through to the provider
    temperature: f32,
}

impl Translator {
    /// Create a translator from config with an injected provider.
    pub fn new(
        provider: Arc<dyn GenerationProvider>,
        pipeline: &PipelineConfig,
        retry: &RetryConfig,
        generation: &GenerationConfig,
    ) -> Self {
        Self {
            provider,
            pipeline: pipeline.clone(),
            retry: retry.policy(),
            temperature: generation.temperature,
        }
    }

    /// Translate all segments, preserving order and timing.
    ///
    /// Never fails: a batch whose generation call exhausts retries, returns
    /// unparsable output or hits a terminal API error falls back to its
    /// original text, and the rest of the pipeline continues unaffected.
    pub async fn translate_segments(
        &self,
        segments: &[TimedSegment],
        source_language: &str,
        target_language: &str,
    ) -> Vec<TranslatedSegment> {
        if segments.is_empty() {
            return Vec::new();
        }

        info!(
            "Starting translation of {} segments ({} -> {})",
            segments.len(),
            source_language,
            target_language
        );

        let system_prompt = prompts::system_prompt(source_language, target_language);
        let batches = chunk_segments(segments, self.pipeline.batch_size);
        let total_batches = batches.len();
        info!(
            "Created {} batches (size {})",
            total_batches, self.pipeline.batch_size
        );

        let concurrent = self.pipeline.concurrent_batches.max(1);
        let mut translated: Vec<TranslatedSegment> = Vec::with_capacity(segments.len());
        // First round always starts with empty context
        let mut context = String::new();
        let mut completed = 0;

        for round in batches.chunks(concurrent) {
            // All batches of a round share the context computed before the
            // round started; join_all preserves input order, so each batch
            // effectively writes to its own slot no matter which of the
            // concurrent calls finishes first.
            let round_futures = round
                .iter()
                .map(|batch| self.translate_batch(batch, &system_prompt, &context));
            let round_results = future::join_all(round_futures).await;

            for (batch, texts) in round.iter().zip(round_results) {
                for (segment, translated_text) in batch.iter().zip(texts) {
                    translated.push(TranslatedSegment {
                        start: segment.start,
                        end: segment.end,
                        original_text: segment.text.clone(),
                        translated_text,
                    });
                }
            }

            completed = (completed + round.len()).min(total_batches);
            info!("Batch progress: {}/{}", completed, total_batches);

            // Context for the next round comes from the trailing segments of
            // this round's final batch, always from the original text.
            if let Some(last_batch) = round.last() {
                context = trailing_context(last_batch, self.pipeline.context_size);
            }
        }

        info!("Translation completed: {} segments", translated.len());
        translated
    }

    /// Translate a single batch, returning one text per input segment.
    ///
    /// The generation call goes through the retry wrapper, which retries
    /// only transient connectivity classes. Whatever error survives it is
    /// converted into a fallback to the original text here.
    async fn translate_batch(
        &self,
        batch: &[TimedSegment],
        system_prompt: &str,
        context: &str,
    ) -> Vec<String> {
        if batch.is_empty() {
            return Vec::new();
        }

        let user_content = prompts::batch_user_content(batch, context);
        debug!("Translating batch of {} segments", batch.len());

        let result = retry_with_policy(&self.retry, GenerationError::is_retryable, || {
            self.provider
                .complete_json(system_prompt, &user_content, self.temperature)
        })
        .await;

        match result {
            Ok(value) => Self::assemble_translations(batch, &value),
            Err(e) => {
                warn!(
                    "Batch of {} segments fell back to original text: {}",
                    batch.len(),
                    e
                );
                batch.iter().map(|s| s.text.clone()).collect()
            }
        }
    }

    /// Re-index the model response by id, falling back per missing id.
    ///
    /// Response order is never trusted; ids outside the batch range are
    /// ignored. A missing or malformed `translations` field means every id
    /// is missing, which degrades to a full-batch fallback.
    fn assemble_translations(batch: &[TimedSegment], value: &Value) -> Vec<String> {
        let mut by_id: HashMap<usize, &str> = HashMap::new();
        if let Some(translations) = value.get("translations").and_then(Value::as_array) {
            for entry in translations {
                let id = entry.get("id").and_then(Value::as_u64);
                let text = entry.get("text").and_then(Value::as_str);
                if let (Some(id), Some(text)) = (id, text) {
                    by_id.entry(id as usize).or_insert(text);
                }
            }
        } else {
            warn!("Model response is missing the translations array");
        }

        batch
            .iter()
            .enumerate()
            .map(|(id, segment)| match by_id.get(&id) {
                Some(text) => (*text).to_string(),
                None => {
                    debug!("No translation for id {}, keeping original text", id);
                    segment.text.clone()
                }
            })
            .collect()
    }
}
