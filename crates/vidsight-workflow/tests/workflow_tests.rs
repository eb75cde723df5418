//! End-to-end state machine tests against a stub Gemini server.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vidsight_media::{FrameCapture, MediaError, MediaResult, SourceInput};
use vidsight_models::{AnalysisVariant, WorkflowPhase};
use vidsight_workflow::{AnalysisWorkflow, WorkflowConfig, WorkflowError, RETRY_SUFFIX};

/// Records capture offsets; optionally fails at one of them.
struct RecordingCapture {
    offsets: Mutex<Vec<u64>>,
    fail_at: Option<u64>,
}

impl RecordingCapture {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            offsets: Mutex::new(Vec::new()),
            fail_at: None,
        })
    }

    fn failing_at(offset: u64) -> Arc<Self> {
        Arc::new(Self {
            offsets: Mutex::new(Vec::new()),
            fail_at: Some(offset),
        })
    }

    fn offsets(&self) -> Vec<u64> {
        self.offsets.lock().unwrap().clone()
    }
}

#[async_trait]
impl FrameCapture for RecordingCapture {
    async fn capture(&self, _source: &Path, offset_secs: u64) -> MediaResult<Vec<u8>> {
        self.offsets.lock().unwrap().push(offset_secs);
        if self.fail_at == Some(offset_secs) {
            return Err(MediaError::thumbnail_failed("decode error"));
        }
        Ok(vec![0xFF, 0xD8, 0xFF])
    }
}

fn test_config(server: &MockServer) -> WorkflowConfig {
    WorkflowConfig {
        api_key: "test-key".to_string(),
        api_base: server.uri(),
        poll_interval: Duration::from_millis(5),
        ..WorkflowConfig::default()
    }
}

fn file_json(state: &str) -> serde_json::Value {
    json!({
        "name": "files/abc123",
        "uri": "https://files.example.com/abc123",
        "mimeType": "video/mp4",
        "state": state
    })
}

fn generate_response(payload: &serde_json::Value) -> serde_json::Value {
    json!({
        "candidates": [
            { "content": { "parts": [ { "text": payload.to_string() } ] } }
        ]
    })
}

/// Mount upload, status polling, and generation mocks for one happy pipeline.
async fn mount_pipeline(server: &MockServer, processing_polls: u64, payload: &serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/upload/v1beta/files"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "file": file_json("PROCESSING") })),
        )
        .mount(server)
        .await;

    if processing_polls > 0 {
        Mock::given(method("GET"))
            .and(path("/v1beta/files/abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(file_json("PROCESSING")))
            .up_to_n_times(processing_polls)
            .mount(server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/v1beta/files/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(file_json("ACTIVE")))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(generate_response(payload)))
        .mount(server)
        .await;
}

async fn sample_video(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("sample.mp4");
    tokio::fs::write(&path, b"fake-mp4-bytes").await.unwrap();
    path
}

#[tokio::test]
async fn test_blank_url_fails_validation_with_no_network_calls() {
    let server = MockServer::start().await;
    let workflow = AnalysisWorkflow::new(test_config(&server));

    let err = workflow
        .run(
            SourceInput::Url {
                location: "  ".to_string(),
            },
            AnalysisVariant::Standard,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, WorkflowError::Validation(_)));

    let state = workflow.state();
    assert_eq!(state.phase, WorkflowPhase::Idle);
    assert!(state.error.as_ref().unwrap().contains("URL"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_standard_run_completes_without_thumbnails() {
    let server = MockServer::start().await;
    let payload = json!({
        "summary": "A walkthrough.",
        "chapters": [{ "timestamp": "00:00", "title": "Intro" }],
        "hashtags": ["#demo"],
        "transcript": [{ "timestamp": "00:05", "text": "Hello." }],
        "cast": [{ "speaker": "Host", "dialogues": [{ "timestamp": "00:05", "text": "Hello." }] }]
    });
    mount_pipeline(&server, 2, &payload).await;

    let capture = RecordingCapture::new();
    let workflow =
        AnalysisWorkflow::new(test_config(&server)).with_capture(capture.clone());

    let dir = tempfile::tempdir().unwrap();
    let path = sample_video(&dir).await;

    let result = workflow
        .run(SourceInput::File { path }, AnalysisVariant::Standard)
        .await
        .unwrap();

    assert_eq!(result.summary.as_deref(), Some("A walkthrough."));
    assert_eq!(result.chapters.len(), 1);
    assert!(capture.offsets().is_empty());

    let state = workflow.state();
    assert_eq!(state.phase, WorkflowPhase::Done);
    assert!(state.error.is_none());
    assert_eq!(state.elapsed_secs, 0);
    assert!(state.result.is_some());
}

#[tokio::test]
async fn test_chapters_only_run_captures_in_list_order() {
    let server = MockServer::start().await;
    let payload = json!({
        "chapters": [
            { "timestamp": "00:00:05", "title": "One" },
            { "timestamp": "1:30", "title": "Two" },
            { "timestamp": "10:00", "title": "Three" }
        ]
    });
    mount_pipeline(&server, 0, &payload).await;

    let capture = RecordingCapture::new();
    let workflow =
        AnalysisWorkflow::new(test_config(&server)).with_capture(capture.clone());

    let dir = tempfile::tempdir().unwrap();
    let path = sample_video(&dir).await;

    let result = workflow
        .run(SourceInput::File { path }, AnalysisVariant::ChaptersOnly)
        .await
        .unwrap();

    assert_eq!(capture.offsets(), vec![5, 90, 600]);
    assert_eq!(result.chapters.len(), 3);
    assert!(result.chapters.iter().all(|c| c.thumbnail.is_some()));
    assert_eq!(workflow.state().phase, WorkflowPhase::Done);
}

#[tokio::test]
async fn test_remote_processing_failure_skips_generation() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upload/v1beta/files"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "file": file_json("PROCESSING") })),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1beta/files/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(file_json("FAILED")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let workflow = AnalysisWorkflow::new(test_config(&server));
    let dir = tempfile::tempdir().unwrap();
    let path = sample_video(&dir).await;

    let err = workflow
        .run(SourceInput::File { path }, AnalysisVariant::Standard)
        .await
        .unwrap_err();

    assert!(matches!(err, WorkflowError::Processing(_)));

    let state = workflow.state();
    assert_eq!(state.phase, WorkflowPhase::Failed);
    assert!(state.error.as_ref().unwrap().ends_with(RETRY_SUFFIX));
}

#[tokio::test]
async fn test_malformed_generation_payload_fails_with_format_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upload/v1beta/files"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "file": file_json("ACTIVE") })),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1beta/files/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(file_json("ACTIVE")))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [ { "content": { "parts": [ { "text": "{not json" } ] } } ]
        })))
        .mount(&server)
        .await;

    let workflow = AnalysisWorkflow::new(test_config(&server));
    let dir = tempfile::tempdir().unwrap();
    let path = sample_video(&dir).await;

    let err = workflow
        .run(SourceInput::File { path }, AnalysisVariant::Standard)
        .await
        .unwrap_err();

    assert!(matches!(err, WorkflowError::ResponseFormat(_)));
    assert!(workflow
        .state()
        .error
        .as_ref()
        .unwrap()
        .contains("malformed"));
}

#[tokio::test]
async fn test_thumbnail_failure_fails_run_and_releases_playable() {
    let server = MockServer::start().await;
    let payload = json!({
        "chapters": [
            { "timestamp": "00:05", "title": "One" },
            { "timestamp": "01:30", "title": "Two" }
        ]
    });
    mount_pipeline(&server, 0, &payload).await;

    let capture = RecordingCapture::failing_at(90);
    let workflow =
        AnalysisWorkflow::new(test_config(&server)).with_capture(capture.clone());

    let dir = tempfile::tempdir().unwrap();
    let path = sample_video(&dir).await;

    let err = workflow
        .run(SourceInput::File { path }, AnalysisVariant::ChaptersOnly)
        .await
        .unwrap_err();

    assert!(matches!(err, WorkflowError::Thumbnail(_)));
    assert_eq!(capture.offsets(), vec![5, 90]);
    assert_eq!(workflow.state().phase, WorkflowPhase::Failed);
    assert!(workflow.state().result.is_none());
    assert!(workflow.playable_path().await.is_none());
}

#[tokio::test]
async fn test_exactly_one_playable_file_across_runs() {
    let server = MockServer::start().await;
    let payload = json!({ "chapters": [] });
    mount_pipeline(&server, 0, &payload).await;

    let workflow = AnalysisWorkflow::new(test_config(&server));
    let dir = tempfile::tempdir().unwrap();

    let path = sample_video(&dir).await;
    workflow
        .run(
            SourceInput::File { path: path.clone() },
            AnalysisVariant::Standard,
        )
        .await
        .unwrap();

    let first = workflow.playable_path().await.unwrap();
    assert!(first.exists());

    workflow
        .run(SourceInput::File { path }, AnalysisVariant::Standard)
        .await
        .unwrap();

    let second = workflow.playable_path().await.unwrap();
    assert!(second.exists());
    assert_ne!(first, second);
    assert!(!first.exists(), "previous playable file must be released");
}

#[tokio::test]
async fn test_overlapping_run_is_refused() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upload/v1beta/files"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(200))
                .set_body_json(json!({ "file": file_json("ACTIVE") })),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1beta/files/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(file_json("ACTIVE")))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(generate_response(&json!({
            "chapters": []
        }))))
        .mount(&server)
        .await;

    let workflow = Arc::new(AnalysisWorkflow::new(test_config(&server)));
    let dir = tempfile::tempdir().unwrap();
    let path = sample_video(&dir).await;

    let background = {
        let workflow = workflow.clone();
        let path = path.clone();
        tokio::spawn(async move {
            workflow
                .run(SourceInput::File { path }, AnalysisVariant::ChaptersOnly)
                .await
        })
    };

    // Let the background run reach the delayed upload.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let err = workflow
        .run(SourceInput::File { path }, AnalysisVariant::Standard)
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::AlreadyRunning));

    background.await.unwrap().unwrap();
    assert_eq!(workflow.state().phase, WorkflowPhase::Done);
}
