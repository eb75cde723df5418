//! Per-chapter thumbnail extraction.
//!
//! For each chapter reported by the analysis, a frame is captured at the
//! chapter's offset and attached as a JPEG data URI. Captures run strictly
//! serially, in list order; the display order and the capture order are the
//! same. One failed capture fails the whole operation, never yielding a
//! partial list with gaps.

use std::path::Path;

use async_trait::async_trait;
use base64::Engine;
use tracing::{debug, info};

use vidsight_models::result::Chapter;
use vidsight_models::timecode;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// Fixed capture width; height follows the source aspect ratio.
pub const THUMBNAIL_WIDTH: u32 = 480;

/// Captures one frame of a media file at a second offset.
///
/// The seam exists so extraction logic can be exercised without FFmpeg.
#[async_trait]
pub trait FrameCapture: Send + Sync {
    /// Capture the frame at `offset_secs` as encoded JPEG bytes.
    async fn capture(&self, source: &Path, offset_secs: u64) -> MediaResult<Vec<u8>>;
}

/// Production capture backed by an FFmpeg single-frame extraction.
#[derive(Debug)]
pub struct FfmpegFrameCapture {
    width: u32,
}

impl FfmpegFrameCapture {
    pub fn new(width: u32) -> Self {
        Self { width }
    }
}

impl Default for FfmpegFrameCapture {
    fn default() -> Self {
        Self::new(THUMBNAIL_WIDTH)
    }
}

#[async_trait]
impl FrameCapture for FfmpegFrameCapture {
    async fn capture(&self, source: &Path, offset_secs: u64) -> MediaResult<Vec<u8>> {
        let out = tempfile::Builder::new().suffix(".jpg").tempfile()?;
        let filter = format!("scale={}:-2", self.width);

        let cmd = FfmpegCommand::new(source, out.path())
            .seek(offset_secs as f64)
            .single_frame()
            .video_filter(&filter)
            .log_level("error");

        FfmpegRunner::new()
            .run(&cmd)
            .await
            .map_err(|e| MediaError::thumbnail_failed(format!("frame at {}s: {}", offset_secs, e)))?;

        let bytes = tokio::fs::read(out.path()).await?;
        if bytes.is_empty() {
            return Err(MediaError::thumbnail_failed(format!(
                "frame at {}s produced no image data",
                offset_secs
            )));
        }
        Ok(bytes)
    }
}

/// Attach a captured thumbnail to every chapter, strictly in list order.
///
/// `progress` receives `(done, total)` after each capture. Zero chapters is a
/// no-op. Any capture failure aborts the operation and the partially
/// augmented list is discarded by returning the error.
pub async fn attach_thumbnails<C, F>(
    capture: &C,
    source: &Path,
    chapters: Vec<Chapter>,
    mut progress: F,
) -> MediaResult<Vec<Chapter>>
where
    C: FrameCapture + ?Sized,
    F: FnMut(usize, usize),
{
    if chapters.is_empty() {
        return Ok(chapters);
    }

    let total = chapters.len();
    info!(total, source = %source.display(), "Extracting chapter thumbnails");

    let mut augmented = Vec::with_capacity(total);
    for (index, mut chapter) in chapters.into_iter().enumerate() {
        let offset = timecode::parse(&chapter.timestamp);
        debug!(index, offset, timestamp = %chapter.timestamp, "Capturing chapter frame");

        let bytes = capture.capture(source, offset).await?;
        chapter.thumbnail = Some(to_data_uri(&bytes));
        augmented.push(chapter);

        progress(index + 1, total);
    }

    Ok(augmented)
}

/// Encode JPEG bytes as a `data:` URI for direct embedding.
fn to_data_uri(jpeg: &[u8]) -> String {
    format!(
        "data:image/jpeg;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(jpeg)
    )
}
