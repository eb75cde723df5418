//! Workflow state machine types.
//!
//! One run moves `Idle → Acquiring → Uploading → WaitingRemote → Generating →
//! [ExtractingThumbnails] → Done`, with every non-terminal phase able to fall
//! to `Failed`. The orchestrator owns the state; presentation code only reads
//! snapshots of it.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::result::AnalysisResult;

/// Phase of an analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowPhase {
    /// No run has started, or input validation rejected the last attempt
    #[default]
    Idle,
    /// Resolving the selected file or URL into an in-memory blob
    Acquiring,
    /// Uploading the blob to the remote asset store
    Uploading,
    /// Polling the remote asset until it becomes active
    WaitingRemote,
    /// Structured generation call in flight
    Generating,
    /// Capturing a frame for each reported chapter
    ExtractingThumbnails,
    /// Run finished with a result
    Done,
    /// Run failed; the error field carries the user-facing message
    Failed,
}

impl WorkflowPhase {
    /// Returns the phase as a string for display and logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Acquiring => "acquiring",
            Self::Uploading => "uploading",
            Self::WaitingRemote => "waiting_remote",
            Self::Generating => "generating",
            Self::ExtractingThumbnails => "extracting_thumbnails",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }

    /// Returns true if the phase ends a run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Returns true while a run is actively executing.
    pub fn is_in_progress(&self) -> bool {
        !matches!(self, Self::Idle | Self::Done | Self::Failed)
    }
}

/// Snapshot of the orchestrator's state, published after every transition.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct WorkflowState {
    /// Current phase
    pub phase: WorkflowPhase,

    /// Human-readable description of what the run is doing
    pub progress_message: String,

    /// Wall-clock seconds since the run started; cosmetic only
    pub elapsed_secs: u64,

    /// Assembled result, present once the phase is `Done`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<AnalysisResult>,

    /// User-facing error message, present once the phase is `Failed`
    /// or when input validation rejected a run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WorkflowState {
    /// Fresh idle state with no result, error, or elapsed time.
    pub fn idle() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_is_terminal() {
        assert!(WorkflowPhase::Done.is_terminal());
        assert!(WorkflowPhase::Failed.is_terminal());
        assert!(!WorkflowPhase::Idle.is_terminal());
        assert!(!WorkflowPhase::Acquiring.is_terminal());
        assert!(!WorkflowPhase::ExtractingThumbnails.is_terminal());
    }

    #[test]
    fn test_phase_in_progress() {
        assert!(!WorkflowPhase::Idle.is_in_progress());
        assert!(!WorkflowPhase::Done.is_in_progress());
        assert!(!WorkflowPhase::Failed.is_in_progress());
        assert!(WorkflowPhase::Uploading.is_in_progress());
        assert!(WorkflowPhase::WaitingRemote.is_in_progress());
    }

    #[test]
    fn test_idle_state_is_empty() {
        let state = WorkflowState::idle();
        assert_eq!(state.phase, WorkflowPhase::Idle);
        assert_eq!(state.elapsed_secs, 0);
        assert!(state.result.is_none());
        assert!(state.error.is_none());
    }
}
