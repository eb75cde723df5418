//! Media acquisition and frame capture for the vidsight pipeline.
//!
//! This crate provides:
//! - Resolving a local file or remote URL into an in-memory blob
//! - The owned temp-file resource backing the in-page player
//! - Type-safe FFmpeg command building for single-frame capture
//! - Serial per-chapter thumbnail extraction

pub mod acquire;
pub mod command;
pub mod error;
pub mod playable;
pub mod thumbnail;

pub use acquire::{acquire, MediaBlob, SourceInput};
pub use command::{check_ffmpeg, FfmpegCommand, FfmpegRunner};
pub use error::{MediaError, MediaResult};
pub use playable::PlayableMedia;
pub use thumbnail::{attach_thumbnails, FfmpegFrameCapture, FrameCapture, THUMBNAIL_WIDTH};
