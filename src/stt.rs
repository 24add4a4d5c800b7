/*!
 * Speech-to-text API client.
 *
 * Wraps an external WhisperX-style transcription endpoint: validates the
 * audio file locally, uploads it as multipart form data and parses the
 * transcription result. Connection failures and timeouts are retried with
 * the shared backoff policy; HTTP status errors are terminal and propagate
 * to the caller immediately.
 */

use std::time::Duration;

use bytes::Bytes;
use log::{info, warn};
use reqwest::Client;
use reqwest::multipart::{Form, Part};

use crate::app_config::SttConfig;
use crate::errors::SttError;
use crate::retry::{RetryPolicy, retry_with_policy};
use crate::transcript::Transcription;

/// Audio file extensions accepted for transcription
const ALLOWED_AUDIO_FORMATS: &[&str] = &["webm", "mp3", "wav", "m4a", "ogg", "flac"];

/// Content types we recognize; anything else is logged but not rejected
const ALLOWED_CONTENT_TYPES: &[&str] = &[
    "audio/webm",
    "audio/mpeg",
    "audio/mp3",
    "audio/wav",
    "audio/x-wav",
    "audio/m4a",
    "audio/mp4",
    "audio/ogg",
    "audio/flac",
    "audio/x-flac",
    "application/octet-stream",
];

/// Client for the external speech-to-text API
pub struct SttClient {
    /// HTTP client for API requests
    client: Client,
    /// Base URL of the STT service
    endpoint: String,
    /// Maximum accepted file size in megabytes
    max_file_size_mb: u64,
    /// Maximum accepted audio duration in minutes
    max_duration_minutes: u64,
    /// Retry policy for transient connectivity failures
    retry: RetryPolicy,
}

impl SttClient {
    /// Create a new STT client from config.
    pub fn new(config: &SttConfig, retry: RetryPolicy) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_default(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            max_file_size_mb: config.max_file_size_mb,
            max_duration_minutes: config.max_duration_minutes,
            retry,
        }
    }

    /// Validate an audio file before uploading it.
    pub fn validate_file(
        &self,
        audio: &[u8],
        filename: &str,
        content_type: Option<&str>,
    ) -> Result<(), SttError> {
        let file_size_mb = audio.len() as u64 / (1024 * 1024);
        if file_size_mb > self.max_file_size_mb {
            return Err(SttError::Validation(format!(
                "file size {}MB exceeds the {}MB limit",
                file_size_mb, self.max_file_size_mb
            )));
        }

        if let Some(ext) = filename.rsplit('.').next().filter(|_| filename.contains('.')) {
            let ext = ext.to_lowercase();
            if !ext.is_empty() && !ALLOWED_AUDIO_FORMATS.contains(&ext.as_str()) {
                return Err(SttError::Validation(format!(
                    "unsupported audio format '{}', supported: {}",
                    ext,
                    ALLOWED_AUDIO_FORMATS.join(", ")
                )));
            }
        }

        if let Some(ct) = content_type {
            if !ALLOWED_CONTENT_TYPES.contains(&ct) {
                warn!("Unknown content type '{}' for file '{}'", ct, filename);
            }
        }

        Ok(())
    }

    /// Check if an audio duration is within the configured limit.
    pub fn is_within_duration_limit(&self, duration_seconds: f64) -> bool {
        duration_seconds <= (self.max_duration_minutes * 60) as f64
    }

    /// Transcribe audio bytes via the external STT API.
    ///
    /// The language hint may be "auto" for server-side detection. Connection
    /// and timeout errors are retried; an HTTP error status is returned as
    /// `SttError::Status` without retrying.
    pub async fn transcribe(
        &self,
        audio: Bytes,
        filename: &str,
        language: &str,
    ) -> Result<Transcription, SttError> {
        self.validate_file(&audio, filename, None)?;

        info!(
            "STT request: {} bytes, file '{}', language '{}'",
            audio.len(),
            filename,
            language
        );

        let url = format!("{}/whisperX/transcribe", self.endpoint);
        let transcription = retry_with_policy(&self.retry, SttError::is_retryable, || {
            self.send_transcribe_request(&url, audio.clone(), filename, language)
        })
        .await?;

        if let (Some(first), Some(last)) =
            (transcription.segments.first(), transcription.segments.last())
        {
            info!(
                "STT complete: {} chars, language '{}', {} segments spanning {:.1}s - {:.1}s",
                transcription.text.len(),
                transcription.language,
                transcription.segments.len(),
                first.start,
                last.end
            );
        } else {
            info!(
                "STT complete: {} chars, language '{}', no segments",
                transcription.text.len(),
                transcription.language
            );
        }

        Ok(transcription)
    }

    async fn send_transcribe_request(
        &self,
        url: &str,
        audio: Bytes,
        filename: &str,
        language: &str,
    ) -> Result<Transcription, SttError> {
        let part = Part::stream(audio)
            .file_name(filename.to_string())
            .mime_str("audio/webm")
            .map_err(|e| SttError::Validation(e.to_string()))?;
        let form = Form::new()
            .part("audio", part)
            .text("language", language.to_string());

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SttError::Timeout(e.to_string())
                } else {
                    SttError::Connection(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            return Err(SttError::Status {
                status: status.as_u16(),
                message: error_text,
            });
        }

        response
            .json::<Transcription>()
            .await
            .map_err(|e| SttError::Parse(e.to_string()))
    }
}
