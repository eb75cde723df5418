//! Shared data models for the vidsight analysis pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Timeline timestamps and their display codec
//! - The structured analysis result (chapters, transcript, cast, brands, evaluation)
//! - The analysis variant configuration
//! - The workflow state machine published to presentation code

pub mod result;
pub mod state;
pub mod timecode;
pub mod variant;

// Re-export common types
pub use result::{
    AnalysisResult, BrandAppearance, BrandMention, CastMember, Chapter, Dialogue, Evaluation,
    ScoreEntry, TranscriptSegment,
};
pub use state::{WorkflowPhase, WorkflowState};
pub use variant::AnalysisVariant;
