//! Analysis variant configuration.
//!
//! The service supports four request shapes that differ only in which
//! optional result sections are requested and required. They are one
//! configuration value, not separate code paths.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Which result sections a run requests from the generation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisVariant {
    /// Chapters only. The sole variant that runs thumbnail extraction.
    ChaptersOnly,
    /// Summary, chapters, hashtags, timestamped transcript, cast.
    #[default]
    Standard,
    /// Standard plus brand exposure detection.
    BrandExposure,
    /// BrandExposure plus content evaluation.
    Full,
}

impl AnalysisVariant {
    /// Returns the variant as a string for display and logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChaptersOnly => "chapters_only",
            Self::Standard => "standard",
            Self::BrandExposure => "brand_exposure",
            Self::Full => "full",
        }
    }

    /// Whether this variant captures a frame per chapter after generation.
    pub fn wants_thumbnails(&self) -> bool {
        matches!(self, Self::ChaptersOnly)
    }

    /// Whether the summary, hashtags, transcript, and cast sections are requested.
    pub fn wants_narrative(&self) -> bool {
        !matches!(self, Self::ChaptersOnly)
    }

    /// Whether brand exposure detection is requested.
    pub fn wants_brands(&self) -> bool {
        matches!(self, Self::BrandExposure | Self::Full)
    }

    /// Whether the evaluation section is requested.
    pub fn wants_evaluation(&self) -> bool {
        matches!(self, Self::Full)
    }
}
