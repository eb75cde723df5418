//! Error types for the Gemini client.

use thiserror::Error;

/// Result type for Gemini operations.
pub type GeminiResult<T> = Result<T, GeminiError>;

/// Errors from the upload, polling, and generation phases.
#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("GEMINI_API_KEY is not configured")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Remote processing of {name} failed")]
    ProcessingFailed { name: String },

    #[error("Unexpected file state: {state}")]
    UnexpectedFileState { state: String },

    #[error("File did not become active within {secs} seconds")]
    PollTimeout { secs: u64 },

    #[error("Generation response contained no content")]
    EmptyResponse,

    #[error("Response did not match the requested schema: {message}")]
    ResponseFormat { message: String },
}

impl GeminiError {
    /// Create an API error from a status code and response body.
    pub fn api(status: u16, body: impl Into<String>) -> Self {
        Self::Api {
            status,
            body: body.into(),
        }
    }

    /// Create a response format error.
    pub fn response_format(message: impl Into<String>) -> Self {
        Self::ResponseFormat {
            message: message.into(),
        }
    }
}
