//! End-to-end analysis orchestration.
//!
//! [`AnalysisWorkflow`] sequences acquisition, upload, readiness polling,
//! structured generation, and optional thumbnail extraction into one run,
//! owns the loading/error/progress state, and publishes snapshots through a
//! watch channel that presentation code observes.

pub mod config;
pub mod error;
pub mod workflow;

pub use config::WorkflowConfig;
pub use error::{WorkflowError, WorkflowResult, RETRY_SUFFIX};
pub use workflow::AnalysisWorkflow;
