/*!
 * # aiscribe
 *
 * A Rust library for reconciling noisy AI model output with speech
 * recognition results: batch translation of timed transcript segments and
 * grounding of model-proposed highlight timestamps.
 *
 * ## Features
 *
 * - Context-preserving, concurrency-bounded batch translation of transcript
 *   segments via an OpenAI-compatible generation API
 * - Grounding correction that remaps model-proposed highlight timestamps
 *   onto real transcript segment boundaries
 * - Policy-driven retry with exponential backoff for outbound API calls
 * - Speech-to-text client for WhisperX-style transcription services
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `transcript`: Timed segment, translation and highlight data model
 * - `translation`: AI-powered batch translation pipeline:
 *   - `translation::batch`: Segment chunking
 *   - `translation::context`: Rolling context between rounds
 *   - `translation::core`: Round executor and fallback policy
 *   - `translation::prompts`: Prompt templates and payload builders
 * - `grounding`: Highlight timestamp correction
 * - `providers`: Generation API clients behind the `GenerationProvider` trait
 * - `stt`: Speech-to-text API client
 * - `retry`: Policy-driven retry wrapper
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod errors;
pub mod grounding;
pub mod language_utils;
pub mod providers;
pub mod retry;
pub mod stt;
pub mod transcript;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, GenerationError, SttError};
pub use grounding::correct_highlights;
pub use providers::GenerationProvider;
pub use transcript::{Highlight, TimedSegment, Transcription, TranslatedSegment};
pub use translation::Translator;
