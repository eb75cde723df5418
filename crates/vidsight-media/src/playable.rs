//! Owned temp-file resource backing the in-page player.
//!
//! The browser original held a single process-wide object URL for the
//! currently playable media. Here that lifecycle is an owned value: the blob
//! is written once to a named temp file, the path is handed to the player and
//! to frame capture, and the file is removed exactly once when the value is
//! released or dropped. Never more than one is live per workflow.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::acquire::MediaBlob;
use crate::error::MediaResult;

/// A playable media file with an explicit create/release lifecycle.
#[derive(Debug)]
pub struct PlayableMedia {
    file: NamedTempFile,
    path: PathBuf,
    mime_type: String,
}

impl PlayableMedia {
    /// Materialize a blob into a temp file.
    pub fn write(blob: &MediaBlob) -> MediaResult<Self> {
        let mut file = NamedTempFile::with_suffix(suffix_for(&blob.name))?;
        file.write_all(&blob.bytes)?;
        file.flush()?;
        let path = file.path().to_path_buf();
        debug!(path = %path.display(), mime = %blob.mime_type, "Materialized playable media");
        Ok(Self {
            file,
            path,
            mime_type: blob.mime_type.clone(),
        })
    }

    /// Path to the materialized file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Declared mime type of the media.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Whether the media is playable video.
    pub fn is_video(&self) -> bool {
        self.mime_type.starts_with("video/")
    }

    /// Release the backing file. Equivalent to dropping, spelled out for
    /// call sites where the release point matters.
    pub fn release(self) {
        debug!(path = %self.path.display(), "Releasing playable media");
        drop(self.file);
    }
}

/// Keep the original extension so players and FFmpeg can sniff the container.
fn suffix_for(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() && ext.len() <= 5 => format!(".{}", ext),
        _ => ".bin".to_string(),
    }
}
