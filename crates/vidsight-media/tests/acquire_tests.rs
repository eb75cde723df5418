//! Acquisition contract tests against a stub HTTP server.

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vidsight_media::{acquire, MediaError, SourceInput};

#[tokio::test]
async fn test_proxied_fetch_produces_blob() {
    let server = MockServer::start().await;
    let target = "https://cdn.example.com/videos/clip.mp4";

    Mock::given(method("GET"))
        .and(path("/fetch"))
        .and(query_param("url", target))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "video/mp4")
                .set_body_bytes(vec![0u8; 64]),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let proxy = format!("{}/fetch", server.uri());
    let input = SourceInput::Url {
        location: target.to_string(),
    };

    let blob = acquire(&client, &input, Some(&proxy)).await.unwrap();
    assert_eq!(blob.bytes.len(), 64);
    assert_eq!(blob.name, "clip.mp4");
    assert_eq!(blob.mime_type, "video/mp4");
    assert!(blob.is_video());
}

#[tokio::test]
async fn test_direct_fetch_defaults_mime_and_name() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1, 2, 3]))
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let input = SourceInput::Url {
        location: format!("{}/", server.uri()),
    };

    let blob = acquire(&client, &input, None).await.unwrap();
    assert_eq!(blob.bytes, vec![1, 2, 3]);
    assert_eq!(blob.name, "remote-media");
    assert_eq!(blob.mime_type, "video/mp4");
}

#[tokio::test]
async fn test_non_success_status_fails_without_retry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let input = SourceInput::Url {
        location: format!("{}/clip.mp4", server.uri()),
    };

    let err = acquire(&client, &input, None).await.unwrap_err();
    assert!(matches!(err, MediaError::AcquisitionFailed { .. }));
    assert!(err.to_string().contains("502"));
}

#[tokio::test]
async fn test_missing_file_fails() {
    let client = reqwest::Client::new();
    let input = SourceInput::File {
        path: "/definitely/not/here.mp4".into(),
    };

    let err = acquire(&client, &input, None).await.unwrap_err();
    assert!(matches!(err, MediaError::FileNotFound(_)));
}

#[tokio::test]
async fn test_local_file_passthrough() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample.webm");
    tokio::fs::write(&path, b"fake-container-bytes").await.unwrap();

    let client = reqwest::Client::new();
    let input = SourceInput::File { path: path.clone() };

    let blob = acquire(&client, &input, None).await.unwrap();
    assert_eq!(blob.bytes, b"fake-container-bytes");
    assert_eq!(blob.name, "sample.webm");
    assert_eq!(blob.mime_type, "video/webm");
}
