use std::sync::Arc;

use inkpost_engine::{
    ApiClient, ClientSettings, ImageKitUploader, MediaFile, MediaUploader, StaticSession,
    UploadError,
};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn uploader(server: &MockServer) -> ImageKitUploader {
    inkpost_logging::initialize_for_tests();
    let settings = ClientSettings::default()
        .with_api_url(server.uri())
        .with_upload_url(format!("{}/api/v1/files/upload", server.uri()));
    let api = ApiClient::new(settings.clone(), Arc::new(StaticSession::signed_out())).expect("client");
    ImageKitUploader::new(&settings, Arc::new(api)).expect("uploader")
}

async fn mount_credentials(server: &MockServer, expected: u64) {
    Mock::given(method("GET"))
        .and(path("/blogs/upload-auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "signature": "sig_abc",
            "expire": 1_700_000_000u64,
            "token": "one-time-token",
            "publicKey": "public_demo"
        })))
        .expect(expected)
        .mount(server)
        .await;
}

fn cat() -> MediaFile {
    MediaFile::new("cat.png", "image/png", vec![0x89, b'P', b'N', b'G'])
}

#[tokio::test]
async fn every_upload_fetches_fresh_credentials() {
    let server = MockServer::start().await;
    mount_credentials(&server, 2).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/files/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "fileId": "f1",
            "name": "cat.png",
            "filePath": "/img/cat123.png",
            "url": "https://ik.imagekit.io/demo/img/cat123.png"
        })))
        .expect(2)
        .mount(&server)
        .await;

    let uploader = uploader(&server);
    assert_eq!(uploader.upload(&cat()).await.expect("first"), "/img/cat123.png");
    assert_eq!(uploader.upload(&cat()).await.expect("second"), "/img/cat123.png");
}

#[tokio::test]
async fn multipart_form_carries_credentials() {
    let server = MockServer::start().await;
    mount_credentials(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/files/upload"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "filePath": "/img/cat123.png" })),
        )
        .mount(&server)
        .await;

    uploader(&server).upload(&cat()).await.expect("uploaded");

    let requests = server.received_requests().await.unwrap_or_default();
    let upload = requests
        .iter()
        .find(|request| request.url.path() == "/api/v1/files/upload")
        .expect("upload request");
    let body = String::from_utf8_lossy(&upload.body);
    for field in ["file", "fileName", "publicKey", "signature", "expire", "token"] {
        assert!(
            body.contains(&format!("name=\"{field}\"")),
            "missing multipart field {field}"
        );
    }
    assert!(body.contains("public_demo"));
    assert!(body.contains("sig_abc"));
    assert!(body.contains("1700000000"));
}

#[tokio::test]
async fn credential_failure_skips_transfer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/blogs/upload-auth"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/files/upload"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = uploader(&server).upload(&cat()).await.expect_err("no credentials");
    assert!(matches!(err, UploadError::Credentials(_)));
}

#[tokio::test]
async fn rejected_transfer_names_the_file() {
    let server = MockServer::start().await;
    mount_credentials(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/files/upload"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Your request contains expired signature"))
        .mount(&server)
        .await;

    let err = uploader(&server).upload(&cat()).await.expect_err("rejected");
    match err {
        UploadError::Transfer { file_name, source } => {
            assert_eq!(file_name, "cat.png");
            assert!(source.message.contains("expired signature"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn response_without_path_is_an_error() {
    let server = MockServer::start().await;
    mount_credentials(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/files/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "fileId": "f1" })))
        .mount(&server)
        .await;

    let err = uploader(&server).upload(&cat()).await.expect_err("no path");
    assert!(matches!(err, UploadError::MissingPath(name) if name == "cat.png"));
}

#[test]
fn from_path_sniffs_mime_type() {
    let dir = tempfile::TempDir::new().unwrap();
    let file_path = dir.path().join("pixel.png");
    // PNG signature followed by an IHDR chunk header.
    let png = [
        0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0, 0x0d, b'I', b'H', b'D', b'R',
    ];
    std::fs::write(&file_path, png).unwrap();

    let file = MediaFile::from_path(&file_path).expect("read");
    assert_eq!(file.name, "pixel.png");
    assert_eq!(file.mime, "image/png");
    assert_eq!(file.size(), png.len() as u64);
}

#[test]
fn text_based_images_fall_back_to_extension() {
    let dir = tempfile::TempDir::new().unwrap();
    let with_prolog = dir.path().join("logo.svg");
    std::fs::write(
        &with_prolog,
        r#"<?xml version="1.0"?><svg xmlns="http://www.w3.org/2000/svg"/>"#,
    )
    .unwrap();
    let bare = dir.path().join("ICON.SVG");
    std::fs::write(&bare, r#"<svg xmlns="http://www.w3.org/2000/svg"/>"#).unwrap();
    let notes = dir.path().join("notes.txt");
    std::fs::write(&notes, "plain words").unwrap();

    assert_eq!(MediaFile::from_path(&with_prolog).expect("read").mime, "image/svg+xml");
    assert_eq!(MediaFile::from_path(&bare).expect("read").mime, "image/svg+xml");
    assert_eq!(
        MediaFile::from_path(&notes).expect("read").mime,
        "application/octet-stream"
    );
}
