//! Gemini client for the vidsight analysis pipeline.
//!
//! Covers the three remote phases of a run:
//! 1. Upload the media blob to the file store
//! 2. Poll the file until it leaves `PROCESSING`
//! 3. Issue one structured generation call constrained by a response schema

pub mod client;
pub mod error;
pub mod prompt;
pub mod schema;
pub mod types;

pub use client::{GeminiClient, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use error::{GeminiError, GeminiResult};
pub use schema::response_schema;
pub use types::{FileState, RemoteFile};
