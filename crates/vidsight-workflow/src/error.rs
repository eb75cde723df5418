//! Workflow error taxonomy.
//!
//! Every stage error is caught at the orchestrator boundary, converted to a
//! single user-facing string, and never retried automatically.

use thiserror::Error;

use vidsight_gemini::GeminiError;
use vidsight_media::MediaError;

/// Result type for workflow operations.
pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Fixed suffix appended to every stage failure shown to the user.
pub const RETRY_SUFFIX: &str = "Please try again shortly.";

/// A run failure, tagged with the stage that produced it.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("an analysis run is already in progress")]
    AlreadyRunning,

    #[error("{0}")]
    Validation(String),

    #[error("acquisition failed: {0}")]
    Acquisition(#[source] MediaError),

    #[error("upload failed: {0}")]
    Upload(#[source] GeminiError),

    #[error("remote processing failed: {0}")]
    Processing(#[source] GeminiError),

    #[error("generation failed: {0}")]
    Generation(#[source] GeminiError),

    #[error("response format invalid: {0}")]
    ResponseFormat(#[source] GeminiError),

    #[error("thumbnail extraction failed: {0}")]
    Thumbnail(#[source] MediaError),
}

impl WorkflowError {
    /// Tag a generation-phase error, separating schema violations from the
    /// rest of the taxonomy.
    pub fn from_generation(err: GeminiError) -> Self {
        match err {
            GeminiError::ResponseFormat { .. } | GeminiError::EmptyResponse => {
                Self::ResponseFormat(err)
            }
            other => Self::Generation(other),
        }
    }

    /// The message shown near the input controls, without the retry suffix.
    pub fn user_message(&self) -> String {
        match self {
            Self::AlreadyRunning => "An analysis is already in progress.".to_string(),
            Self::Validation(message) => message.clone(),
            Self::Acquisition(e) => format!("Could not load the media: {}", e),
            Self::Upload(e) => format!("Upload failed: {}", e),
            Self::Processing(e) => format!("Remote processing failed: {}", e),
            Self::Generation(e) => format!("Analysis failed: {}", e),
            Self::ResponseFormat(e) => format!("The analysis response was malformed: {}", e),
            Self::Thumbnail(e) => format!("Thumbnail capture failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_tagging_separates_format_errors() {
        let format = WorkflowError::from_generation(GeminiError::response_format("bad json"));
        assert!(matches!(format, WorkflowError::ResponseFormat(_)));

        let empty = WorkflowError::from_generation(GeminiError::EmptyResponse);
        assert!(matches!(empty, WorkflowError::ResponseFormat(_)));

        let api = WorkflowError::from_generation(GeminiError::api(500, "boom"));
        assert!(matches!(api, WorkflowError::Generation(_)));
    }

    #[test]
    fn test_user_message_carries_cause() {
        let err = WorkflowError::Processing(GeminiError::ProcessingFailed {
            name: "files/abc".to_string(),
        });
        assert!(err.user_message().contains("files/abc"));
    }
}
