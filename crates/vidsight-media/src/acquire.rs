//! Media acquisition.
//!
//! Resolves the user's selected input, a local file or a remote URL, into one
//! in-memory blob ready for upload. Remote fetches can be routed through a
//! CORS-relaxing proxy for parity with embedded deployments; native callers
//! usually leave the proxy unset and fetch directly.

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use url::Url;

use crate::error::{MediaError, MediaResult};

/// Fallback name when a remote URL has no usable path segment.
const DEFAULT_REMOTE_NAME: &str = "remote-media";

/// Fallback content type when the remote response declares none.
const DEFAULT_REMOTE_MIME: &str = "video/mp4";

/// The user's selected input for one run. Immutable once constructed.
#[derive(Debug, Clone)]
pub enum SourceInput {
    /// A local media file
    File { path: PathBuf },
    /// A remote media URL
    Url { location: String },
}

/// An in-memory media blob ready for upload.
#[derive(Debug, Clone)]
pub struct MediaBlob {
    pub bytes: Vec<u8>,
    pub name: String,
    pub mime_type: String,
}

impl MediaBlob {
    /// Whether the declared type is playable video.
    pub fn is_video(&self) -> bool {
        self.mime_type.starts_with("video/")
    }
}

/// Resolve a source input into a media blob.
///
/// File inputs are read from disk with the mime type guessed from the
/// extension. URL inputs are fetched, through `proxy_base` when provided,
/// with the filename derived from the URL path. Transport errors and
/// non-success statuses fail immediately; there is no retry.
pub async fn acquire(
    client: &reqwest::Client,
    input: &SourceInput,
    proxy_base: Option<&str>,
) -> MediaResult<MediaBlob> {
    match input {
        SourceInput::File { path } => acquire_file(path).await,
        SourceInput::Url { location } => acquire_url(client, location, proxy_base).await,
    }
}

async fn acquire_file(path: &Path) -> MediaResult<MediaBlob> {
    if !path.is_file() {
        return Err(MediaError::FileNotFound(path.to_path_buf()));
    }

    let bytes = tokio::fs::read(path).await?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| DEFAULT_REMOTE_NAME.to_string());
    let mime_type = mime_for_path(path).to_string();

    debug!(name = %name, mime = %mime_type, size = bytes.len(), "Read local media file");
    Ok(MediaBlob {
        bytes,
        name,
        mime_type,
    })
}

async fn acquire_url(
    client: &reqwest::Client,
    location: &str,
    proxy_base: Option<&str>,
) -> MediaResult<MediaBlob> {
    let fetch_url = match proxy_base {
        Some(base) => proxied_url(base, location),
        None => location.to_string(),
    };

    info!(url = %location, proxied = proxy_base.is_some(), "Fetching remote media");

    let response = client.get(&fetch_url).send().await.map_err(|e| {
        MediaError::acquisition_failed(format!("request to {} failed: {}", location, e))
    })?;

    if !response.status().is_success() {
        return Err(MediaError::acquisition_failed(format!(
            "fetch of {} returned HTTP {}",
            location,
            response.status()
        )));
    }

    let mime_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_REMOTE_MIME.to_string());

    let name = filename_from_url(location);

    let bytes = response.bytes().await.map_err(|e| {
        MediaError::acquisition_failed(format!("reading body of {} failed: {}", location, e))
    })?;

    debug!(name = %name, mime = %mime_type, size = bytes.len(), "Fetched remote media");
    Ok(MediaBlob {
        bytes: bytes.to_vec(),
        name,
        mime_type,
    })
}

/// Build the proxied fetch URL: `{base}?url={percent-encoded target}`.
pub fn proxied_url(proxy_base: &str, target: &str) -> String {
    format!(
        "{}?url={}",
        proxy_base.trim_end_matches('?'),
        urlencoding::encode(target)
    )
}

/// Derive a filename from the last path segment of a URL.
pub fn filename_from_url(location: &str) -> String {
    Url::parse(location)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|segments| segments.last().map(|s| s.to_string()))
        })
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_REMOTE_NAME.to_string())
}

/// Guess a mime type from a file extension. Unknown extensions fall back to
/// a generic binary type; the remote service inspects content anyway.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        "avi" => "video/x-msvideo",
        "mp3" => "audio/mpeg",
        "m4a" => "audio/mp4",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "flac" => "audio/flac",
        "aac" => "audio/aac",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_from_url() {
        assert_eq!(
            filename_from_url("https://cdn.example.com/media/clip.mp4"),
            "clip.mp4"
        );
        assert_eq!(
            filename_from_url("https://cdn.example.com/media/clip.mp4?sig=abc"),
            "clip.mp4"
        );
        assert_eq!(filename_from_url("https://example.com/"), "remote-media");
        assert_eq!(filename_from_url("not a url"), "remote-media");
    }

    #[test]
    fn test_proxied_url_encodes_target() {
        let url = proxied_url(
            "https://proxy.example.com/fetch",
            "https://cdn.example.com/a b.mp4",
        );
        assert_eq!(
            url,
            "https://proxy.example.com/fetch?url=https%3A%2F%2Fcdn.example.com%2Fa%20b.mp4"
        );
    }

    #[test]
    fn test_mime_for_path() {
        assert_eq!(mime_for_path(Path::new("clip.MP4")), "video/mp4");
        assert_eq!(mime_for_path(Path::new("talk.mov")), "video/quicktime");
        assert_eq!(mime_for_path(Path::new("song.mp3")), "audio/mpeg");
        assert_eq!(
            mime_for_path(Path::new("mystery.bin")),
            "application/octet-stream"
        );
        assert_eq!(mime_for_path(Path::new("noext")), "application/octet-stream");
    }

    #[test]
    fn test_blob_is_video() {
        let blob = MediaBlob {
            bytes: vec![],
            name: "clip.mp4".into(),
            mime_type: "video/mp4".into(),
        };
        assert!(blob.is_video());

        let audio = MediaBlob {
            bytes: vec![],
            name: "song.mp3".into(),
            mime_type: "audio/mpeg".into(),
        };
        assert!(!audio.is_video());
    }
}
