//! Structured analysis result models.
//!
//! These types mirror the response schema the generation service is asked to
//! conform to. Which optional sections are populated depends on the
//! [`AnalysisVariant`](crate::variant::AnalysisVariant) the run was configured
//! with; `chapters` is the one section every variant requests.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parsed response from a structured analysis run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Overall video summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Titled timeline markers
    pub chapters: Vec<Chapter>,

    /// Suggested hashtags
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hashtags: Option<Vec<String>>,

    /// Paragraph-level transcript
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<Vec<TranscriptSegment>>,

    /// Speakers and their dialogue lines
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cast: Option<Vec<CastMember>>,

    /// Detected brand references
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_exposure: Option<Vec<BrandMention>>,

    /// Content evaluation scores and feedback
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<Evaluation>,
}

/// A titled timeline marker, optionally illustrated by a captured frame.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    /// Start offset as `HH:MM:SS` or `MM:SS`
    pub timestamp: String,

    /// Chapter title
    pub title: String,

    /// JPEG data URI captured at the chapter offset, when extraction ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl Chapter {
    /// Create a chapter without a thumbnail.
    pub fn new(timestamp: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            title: title.into(),
            thumbnail: None,
        }
    }
}

/// One transcript paragraph. The timestamp is only requested by variants
/// that ask for a timestamped transcript.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptSegment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    pub text: String,
}

/// A speaker and their dialogue lines.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CastMember {
    pub speaker: String,
    pub dialogues: Vec<Dialogue>,
}

/// One dialogue line with its timeline offset.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Dialogue {
    pub timestamp: String,
    pub text: String,
}

/// A detected reference to a named company or product.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BrandMention {
    pub company_name: String,
    pub appearances: Vec<BrandAppearance>,
}

/// One on-screen or spoken brand appearance.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BrandAppearance {
    pub timestamp: String,
    pub context: String,
}

/// Content evaluation: per-category scores plus free-form feedback.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub scores: Vec<ScoreEntry>,
    pub positive_feedback: String,
    pub improvement_points: String,
}

/// One scored evaluation category.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEntry {
    pub category: String,
    pub details: String,
    /// 0..=10
    pub score: u8,
}
