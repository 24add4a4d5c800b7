use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::retry::RetryPolicy;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings. Defaults mirror the knobs
/// the pipeline consumes: batch size, context size, concurrent-batch count,
/// retry attempts, base backoff delay, model identifier and temperature.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO)
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code (ISO)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Generation API config
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Speech-to-text API config
    #[serde(default)]
    pub stt: SttConfig,

    /// Translation pipeline config
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Retry config shared by outbound API calls
    #[serde(default)]
    pub retry: RetryConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Text-generation API configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GenerationConfig {
    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// API key for the service
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Service endpoint URL (OpenAI-compatible chat completions base)
    #[serde(default = "default_generation_endpoint")]
    pub endpoint: String,

    /// Temperature parameter for text generation (0.0 to 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Request timeout in seconds
    #[serde(default = "default_generation_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: String::new(),
            endpoint: default_generation_endpoint(),
            temperature: default_temperature(),
            timeout_secs: default_generation_timeout_secs(),
        }
    }
}

/// Speech-to-text API configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SttConfig {
    /// Base URL of the STT service
    #[serde(default = "default_stt_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds (transcription of long audio is slow)
    #[serde(default = "default_stt_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum accepted audio file size in megabytes
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,

    /// Maximum accepted audio duration in minutes
    #[serde(default = "default_max_duration_minutes")]
    pub max_duration_minutes: u64,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            endpoint: default_stt_endpoint(),
            timeout_secs: default_stt_timeout_secs(),
            max_file_size_mb: default_max_file_size_mb(),
            max_duration_minutes: default_max_duration_minutes(),
        }
    }
}

/// Translation pipeline configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PipelineConfig {
    /// Number of segments per batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Number of trailing segments carried as context between rounds
    #[serde(default = "default_context_size")]
    pub context_size: usize,

    /// Number of batches dispatched concurrently per round
    #[serde(default = "default_concurrent_batches")]
    pub concurrent_batches: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            context_size: default_context_size(),
            concurrent_batches: default_concurrent_batches(),
        }
    }
}

/// Retry configuration for outbound API calls
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RetryConfig {
    /// Total attempts per call, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base backoff delay in milliseconds, doubled per retry and capped at 4x
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

impl RetryConfig {
    /// Build the retry policy this config describes.
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.base_delay_ms))
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Map to the log crate's level filter.
    pub fn to_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_target_language() -> String {
    "ko".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_generation_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_temperature() -> f32 {
    0.3
}

fn default_generation_timeout_secs() -> u64 {
    30
}

fn default_stt_endpoint() -> String {
    "http://localhost:12321".to_string()
}

fn default_stt_timeout_secs() -> u64 {
    300
}

fn default_max_file_size_mb() -> u64 {
    500
}

fn default_max_duration_minutes() -> u64 {
    120
}

fn default_batch_size() -> usize {
    10
}

fn default_context_size() -> usize {
    2
}

fn default_concurrent_batches() -> usize {
    3
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path.display(), e))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path.display(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        crate::language_utils::validate_language_code(&self.source_language)?;
        crate::language_utils::validate_language_code(&self.target_language)?;

        if self.pipeline.batch_size == 0 {
            return Err(anyhow!("pipeline.batch_size must be at least 1"));
        }
        if self.pipeline.concurrent_batches == 0 {
            return Err(anyhow!("pipeline.concurrent_batches must be at least 1"));
        }
        if self.generation.model.is_empty() {
            return Err(anyhow!("generation.model must not be empty"));
        }

        Url::parse(&self.generation.endpoint)
            .map_err(|e| anyhow!("Invalid generation endpoint {}: {}", self.generation.endpoint, e))?;
        Url::parse(&self.stt.endpoint)
            .map_err(|e| anyhow!("Invalid STT endpoint {}: {}", self.stt.endpoint, e))?;

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            generation: GenerationConfig::default(),
            stt: SttConfig::default(),
            pipeline: PipelineConfig::default(),
            retry: RetryConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
