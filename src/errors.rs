/*!
 * Error types for the aiscribe application.
 *
 * This module contains custom error types for the generation and speech
 * services, using the thiserror crate for ergonomic error definitions.
 * The split between retryable connectivity errors and terminal application
 * errors drives the retry wrapper and the batch fallback policy.
 */

use thiserror::Error;

/// Errors raised by the text-generation API client
#[derive(Error, Debug)]
pub enum GenerationError {
    /// Error establishing or maintaining a connection (includes timeouts)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Upstream rate limit hit
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// Terminal error returned by the API itself (quota, validation, auth)
    #[error("API responded with error: {status} - {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// The model returned output that could not be parsed as the expected JSON
    #[error("Failed to parse model response: {0}")]
    Parse(String),
}

impl GenerationError {
    /// Whether this error belongs to the transient-connectivity class.
    ///
    /// Only connection failures and upstream rate limits are worth retrying;
    /// API status errors and unparsable output never change on retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::RateLimited(_))
    }
}

/// Errors raised by the speech-to-text API client
#[derive(Error, Debug)]
pub enum SttError {
    /// Error establishing a connection to the STT service
    #[error("Connection error: {0}")]
    Connection(String),

    /// The STT request timed out
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// HTTP error status returned by the STT service
    #[error("STT service responded with error: {status} - {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Error message from the service
        message: String,
    },

    /// The audio file was rejected before any request was made
    #[error("Invalid audio file: {0}")]
    Validation(String),

    /// The STT response body could not be parsed
    #[error("Failed to parse STT response: {0}")]
    Parse(String),
}

impl SttError {
    /// Whether this error belongs to the transient-connectivity class.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Timeout(_))
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from the generation client
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    /// Error from the STT client
    #[error("STT error: {0}")]
    Stt(#[from] SttError),

    /// Error loading or validating configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
