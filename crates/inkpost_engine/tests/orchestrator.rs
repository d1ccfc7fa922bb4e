use std::sync::{Arc, Mutex};

use inkpost_core::{count_placeholders, MediaKind, SelectionError};
use inkpost_engine::{
    ClientSettings, EngineEvent, FinalizeError, MediaFile, MediaUploader, ProgressSink,
    UploadError, UploadOrchestrator,
};
use pretty_assertions::assert_eq;

const ENDPOINT: &str = "https://ik.imagekit.io/demo";

/// Answers `/img/<stem>123.<ext>` for every file and records the call order.
#[derive(Default)]
struct FakeUploader {
    calls: Mutex<Vec<String>>,
    fail_on: Option<usize>,
}

impl FakeUploader {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn failing_on(call: usize) -> Arc<Self> {
        Arc::new(Self {
            fail_on: Some(call),
            ..Self::default()
        })
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl MediaUploader for FakeUploader {
    async fn upload(&self, file: &MediaFile) -> Result<String, UploadError> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(file.name.clone());
            calls.len()
        };
        if self.fail_on == Some(call) {
            return Err(UploadError::MissingPath(file.name.clone()));
        }
        let (stem, ext) = file.name.rsplit_once('.').unwrap_or((&file.name, "bin"));
        Ok(format!("/img/{stem}123.{ext}"))
    }
}

#[derive(Default)]
struct RecordingSink {
    progress: Mutex<Vec<u8>>,
}

impl ProgressSink for RecordingSink {
    fn emit(&self, event: EngineEvent) {
        if let EngineEvent::PublishProgress(value) = event {
            self.progress.lock().unwrap().push(value);
        }
    }
}

fn settings() -> ClientSettings {
    ClientSettings::default().with_media_url_endpoint(ENDPOINT)
}

fn png(name: &str) -> MediaFile {
    MediaFile::new(name, "image/png", vec![0x89, b'P', b'N', b'G'])
}

fn mp4(name: &str) -> MediaFile {
    MediaFile::new(name, "video/mp4", vec![0, 0, 0, 0x18])
}

fn orchestrator(uploader: Arc<FakeUploader>) -> UploadOrchestrator {
    inkpost_logging::initialize_for_tests();
    let mut orchestrator = UploadOrchestrator::new(uploader);
    orchestrator.set_content("<p>Intro</p>");
    orchestrator
}

#[test]
fn wrong_mime_is_rejected_without_change() {
    let mut orchestrator = orchestrator(FakeUploader::new());
    let result = orchestrator.select_file(
        MediaKind::Image,
        MediaFile::new("notes.pdf", "application/pdf", vec![1, 2, 3]),
    );
    assert!(matches!(result, Err(SelectionError::WrongType { .. })));
    assert_eq!(
        result.unwrap_err().to_string(),
        "Please select an image file"
    );
    assert_eq!(orchestrator.content(), "<p>Intro</p>");
    assert!(orchestrator.images().is_empty());
}

#[test]
fn image_over_five_megabytes_is_rejected() {
    let mut orchestrator = orchestrator(FakeUploader::new());
    let big = MediaFile::new("big.png", "image/png", vec![0u8; 6 * 1024 * 1024]);
    let result = orchestrator.select_file(MediaKind::Image, big);
    assert!(matches!(result, Err(SelectionError::TooLarge { .. })));
    assert_eq!(orchestrator.content(), "<p>Intro</p>");
    assert_eq!(orchestrator.pending_uploads(), 0);
}

#[test]
fn video_may_exceed_the_image_ceiling() {
    let mut orchestrator = orchestrator(FakeUploader::new());
    let clip = MediaFile::new("clip.mp4", "video/mp4", vec![0u8; 6 * 1024 * 1024]);
    assert!(orchestrator.select_file(MediaKind::Video, clip).is_ok());
    assert_eq!(orchestrator.videos().len(), 1);
}

#[test]
fn accepted_file_appends_exactly_one_block() {
    let uploader = FakeUploader::new();
    let mut orchestrator = orchestrator(uploader.clone());

    let entry = orchestrator
        .select_file(MediaKind::Image, png("cat.png"))
        .expect("accepted");
    assert_eq!(entry.placeholder.token(), "[IMAGE: cat.png]");
    assert!(entry.preview_url.starts_with("data:image/png;base64,"));

    assert_eq!(
        orchestrator.content(),
        "<p>Intro</p><p>[IMAGE: cat.png]<br/></p>"
    );
    assert_eq!(orchestrator.images().len(), 1);
    assert!(uploader.calls().is_empty(), "selection must not upload");
}

#[test]
fn whitespace_in_names_becomes_underscore() {
    let mut orchestrator = orchestrator(FakeUploader::new());
    let entry = orchestrator
        .select_file(MediaKind::Image, png("summer trip.png"))
        .expect("accepted");
    assert_eq!(entry.placeholder.token(), "[IMAGE: summer_trip.png]");
}

#[test]
fn duplicate_names_get_distinct_placeholders() {
    let mut orchestrator = orchestrator(FakeUploader::new());
    orchestrator
        .select_file(MediaKind::Image, png("cat.png"))
        .expect("first");
    let second = orchestrator
        .select_file(MediaKind::Image, png("cat.png"))
        .expect("second");
    assert_eq!(second.placeholder.token(), "[IMAGE: cat_2.png]");
}

#[test]
fn queued_entries_are_found_by_placeholder_name() {
    let mut orchestrator = orchestrator(FakeUploader::new());
    let first = orchestrator
        .select_file(MediaKind::Image, png("cat.png"))
        .expect("first")
        .id;
    let second = orchestrator
        .select_file(MediaKind::Image, png("cat.png"))
        .expect("second")
        .id;
    let clip = orchestrator
        .select_file(MediaKind::Video, mp4("clip.mp4"))
        .expect("clip")
        .id;

    assert_eq!(orchestrator.queued_id("cat.png"), Some(first));
    assert_eq!(orchestrator.queued_id("cat_2.png"), Some(second));
    assert_eq!(orchestrator.queued_id("clip.mp4"), Some(clip));
    assert_eq!(orchestrator.queued_id("dog.png"), None);

    orchestrator.remove(second);
    assert_eq!(orchestrator.queued_id("cat_2.png"), None);
}

#[test]
fn remove_strips_block_and_is_idempotent() {
    let uploader = FakeUploader::new();
    let mut orchestrator = orchestrator(uploader.clone());
    let id = orchestrator
        .select_file(MediaKind::Image, png("cat.png"))
        .expect("accepted")
        .id;

    assert!(orchestrator.remove(id).is_some());
    assert_eq!(orchestrator.content(), "<p>Intro</p>");
    assert!(orchestrator.remove(id).is_none());
    assert_eq!(orchestrator.content(), "<p>Intro</p>");
    assert!(orchestrator.images().is_empty());
    assert!(uploader.calls().is_empty());
}

#[test]
fn remove_matches_editor_rewritten_separator() {
    let mut orchestrator = orchestrator(FakeUploader::new());
    let id = orchestrator
        .select_file(MediaKind::Video, mp4("clip.mp4"))
        .expect("accepted")
        .id;
    orchestrator.set_content("<p>Intro</p><p>[VIDEO:&nbsp;clip.mp4]<br></p><p>Outro</p>");

    orchestrator.remove(id);
    assert_eq!(orchestrator.content(), "<p>Intro</p><p>Outro</p>");
}

#[tokio::test]
async fn single_image_is_substituted_with_public_url() {
    let uploader = FakeUploader::new();
    let mut orchestrator = orchestrator(uploader.clone());
    orchestrator
        .select_file(MediaKind::Image, png("cat.png"))
        .expect("accepted");

    let sink = RecordingSink::default();
    let article = orchestrator
        .finalize(&settings(), &sink)
        .await
        .expect("finalized");

    assert_eq!(
        article.content,
        r#"<p>Intro</p><p><img src="https://ik.imagekit.io/demo/img/cat123.png" /><br/></p>"#
    );
    assert_eq!(article.cover_url, "");
    assert_eq!(uploader.calls(), vec!["cat.png".to_string()]);
}

#[tokio::test]
async fn select_then_remove_uploads_nothing() {
    let uploader = FakeUploader::new();
    let mut orchestrator = orchestrator(uploader.clone());
    let id = orchestrator
        .select_file(MediaKind::Image, png("cat.png"))
        .expect("accepted")
        .id;
    orchestrator.remove(id);

    let article = orchestrator
        .finalize(&settings(), &RecordingSink::default())
        .await
        .expect("finalized");
    assert_eq!(article.content, "<p>Intro</p>");
    assert!(uploader.calls().is_empty());
}

#[tokio::test]
async fn cover_then_images_then_videos_in_selection_order() {
    let uploader = FakeUploader::new();
    let mut orchestrator = orchestrator(uploader.clone());
    orchestrator
        .select_file(MediaKind::Video, mp4("clip.mp4"))
        .expect("video");
    orchestrator
        .select_file(MediaKind::Image, png("a.png"))
        .expect("a");
    orchestrator
        .select_file(MediaKind::Image, png("b.png"))
        .expect("b");
    orchestrator
        .set_cover(MediaFile::new("cover.jpg", "image/jpeg", vec![0xff, 0xd8]))
        .expect("cover");

    let sink = RecordingSink::default();
    let article = orchestrator
        .finalize(&settings(), &sink)
        .await
        .expect("finalized");

    assert_eq!(
        uploader.calls(),
        vec!["cover.jpg", "a.png", "b.png", "clip.mp4"]
    );
    assert_eq!(article.cover_url, format!("{ENDPOINT}/img/cover123.jpg"));
    assert_eq!(count_placeholders(&article.content), 0);
    assert_eq!(article.content.matches("<img ").count(), 2);
    assert_eq!(article.content.matches("<video ").count(), 1);
    assert!(article
        .content
        .contains(r#"<video src="https://ik.imagekit.io/demo/img/clip123.mp4" controls></video>"#));
    assert_eq!(*sink.progress.lock().unwrap(), vec![1, 10, 36, 63, 90]);
}

#[tokio::test]
async fn kth_failure_stops_after_k_calls_and_keeps_draft() {
    let uploader = FakeUploader::failing_on(2);
    let mut orchestrator = orchestrator(uploader.clone());
    for name in ["a.png", "b.png", "c.png"] {
        orchestrator
            .select_file(MediaKind::Image, png(name))
            .expect("accepted");
    }
    let before = orchestrator.content().to_string();

    let err = orchestrator
        .finalize(&settings(), &RecordingSink::default())
        .await
        .expect_err("second upload fails");

    match &err {
        FinalizeError::Media {
            kind, file_name, ..
        } => {
            assert_eq!(*kind, MediaKind::Image);
            assert_eq!(file_name, "b.png");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(uploader.calls().len(), 2);
    assert_eq!(orchestrator.content(), before);
    assert_eq!(orchestrator.images().len(), 3);
}

#[tokio::test]
async fn cover_failure_aborts_before_media() {
    let uploader = FakeUploader::failing_on(1);
    let mut orchestrator = orchestrator(uploader.clone());
    orchestrator
        .select_file(MediaKind::Image, png("a.png"))
        .expect("accepted");
    orchestrator.set_cover(png("cover.png")).expect("cover");

    let err = orchestrator
        .finalize(&settings(), &RecordingSink::default())
        .await
        .expect_err("cover fails");
    assert!(matches!(err, FinalizeError::Cover(_)));
    assert_eq!(uploader.calls(), vec!["cover.png"]);
}

#[tokio::test]
async fn retry_after_failure_uploads_everything_again() {
    let uploader = FakeUploader::failing_on(1);
    let mut orchestrator = orchestrator(uploader.clone());
    orchestrator
        .select_file(MediaKind::Image, png("a.png"))
        .expect("accepted");

    assert!(orchestrator
        .finalize(&settings(), &RecordingSink::default())
        .await
        .is_err());
    let article = orchestrator
        .finalize(&settings(), &RecordingSink::default())
        .await
        .expect("retry succeeds");
    assert_eq!(count_placeholders(&article.content), 0);
    assert_eq!(uploader.calls(), vec!["a.png", "a.png"]);
}

#[test]
fn cover_is_replaced_and_cleared() {
    let mut orchestrator = orchestrator(FakeUploader::new());
    orchestrator.set_cover(png("one.png")).expect("first");
    orchestrator.set_cover(png("two.png")).expect("second");
    assert_eq!(orchestrator.cover().map(|c| c.file.name.as_str()), Some("two.png"));
    assert!(orchestrator
        .set_cover(mp4("clip.mp4"))
        .is_err());
    assert_eq!(orchestrator.pending_uploads(), 1);
    orchestrator.clear_cover();
    assert!(orchestrator.cover().is_none());
}
