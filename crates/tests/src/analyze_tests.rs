use std::sync::Arc;
use std::time::Duration;

use readscore_analysis::{AnalysisConfig, AnalysisError, JobStatus, StatusReport};
use reqwest::multipart::{Form, Part};
use serde_json::Value;

use crate::fixtures::fakes::{FakeDiffer, FakeTranscriber, word};
use crate::fixtures::test_app::{TestApp, fake_mp3, fast_polling, mp3_part, reading_form};

const DIFF_TEXT: &str = "**Feedback**\nThe child skipped one word.\nOmissions: 1\n\n**Corrected Transcription**\nThe [quick|omission] brown fox";

fn brown_fox_transcriber() -> FakeTranscriber {
    FakeTranscriber::completing(
        "The brown fox.",
        vec![word("The", 0, 400), word("brown", 500, 900), word("fox.", 1000, 1500)],
        120.0,
    )
}

#[tokio::test]
async fn analyze_scores_reading() {
    let transcriber = Arc::new(brown_fox_transcriber());
    let differ = Arc::new(FakeDiffer::with_text(DIFF_TEXT, 500));
    let app = TestApp::spawn(transcriber.clone(), differ.clone()).await;

    let resp = app.post_analyze(reading_form("The quick brown fox")).await;

    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["transcription"], "The brown fox.");
    assert_eq!(json["accuracy"], 75.0);
    assert_eq!(json["accuracy_details"]["matched_count"], 3);
    assert_eq!(json["accuracy_details"]["reference_word_count"], 4);
    assert_eq!(json["accuracy_details"]["transcribed_word_count"], 3);
    assert_eq!(json["reading_speed"], 120.0);
    assert_eq!(json["feedback"], "The child skipped one word.\nOmissions: 1");
    assert_eq!(json["corrected_transcription"], "The [quick|omission] brown fox");
    assert_eq!(json["analysis"], DIFF_TEXT);
    assert_eq!(json["cost"]["assemblyAI"], 0.0124);
    assert_eq!(json["cost"]["openAI"], 0.015);

    assert_eq!(transcriber.queries(), 1);
    assert_eq!(differ.calls(), 1);
}

#[tokio::test]
async fn analyze_forwards_upload_and_language() {
    let transcriber = Arc::new(brown_fox_transcriber());
    let app = TestApp::spawn(transcriber.clone(), Arc::new(FakeDiffer::with_text(DIFF_TEXT, 10))).await;

    let form = reading_form("The quick brown fox").text("language", "en");
    let resp = app.post_analyze(form).await;
    assert_eq!(resp.status().as_u16(), 200);

    let submissions = transcriber.submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].file_name, "reading.mp3");
    assert_eq!(submissions[0].mime_type, "audio/mpeg");
    assert_eq!(submissions[0].bytes, fake_mp3());
    assert_eq!(submissions[0].language_hint.as_deref(), Some("en"));
}

#[tokio::test]
async fn analyze_polls_until_completed() {
    let transcriber = Arc::new(FakeTranscriber::new(vec![vec![
        StatusReport::pending(JobStatus::Queued),
        StatusReport::pending(JobStatus::Processing),
        StatusReport::completed("hello world", vec![], 1.0),
    ]]));
    let app = TestApp::spawn(transcriber.clone(), Arc::new(FakeDiffer::with_text(DIFF_TEXT, 10))).await;

    let resp = app.post_analyze(reading_form("Hello, world!")).await;

    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["accuracy"], 100.0);
    // No words: speed falls back to zero.
    assert_eq!(json["reading_speed"], 0.0);
    assert_eq!(transcriber.queries(), 3);
}

#[tokio::test]
async fn analyze_requires_file() {
    let transcriber = Arc::new(brown_fox_transcriber());
    let app = TestApp::spawn(transcriber.clone(), Arc::new(FakeDiffer::with_text(DIFF_TEXT, 10))).await;

    let form = Form::new().text("text", "The quick brown fox");
    let resp = app.post_analyze(form).await;

    assert_eq!(resp.status().as_u16(), 422);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["error"], "validation");
    assert_eq!(json["message"], "Audio file is required.");
    assert!(transcriber.submissions().is_empty());
}

#[tokio::test]
async fn analyze_rejects_non_mp3() {
    let app = TestApp::spawn(
        Arc::new(brown_fox_transcriber()),
        Arc::new(FakeDiffer::with_text(DIFF_TEXT, 10)),
    )
    .await;

    let part = Part::bytes(vec![0x52, 0x49, 0x46, 0x46, 0, 0, 0, 0])
        .file_name("reading.wav")
        .mime_str("audio/wav")
        .unwrap();
    let form = Form::new().part("file", part).text("text", "The quick brown fox");
    let resp = app.post_analyze(form).await;

    assert_eq!(resp.status().as_u16(), 422);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["message"], "Only mp3 file formats are allowed.");
}

#[tokio::test]
async fn analyze_requires_text() {
    let app = TestApp::spawn(
        Arc::new(brown_fox_transcriber()),
        Arc::new(FakeDiffer::with_text(DIFF_TEXT, 10)),
    )
    .await;

    let form = Form::new().part("file", mp3_part(fake_mp3())).text("text", "   ");
    let resp = app.post_analyze(form).await;

    assert_eq!(resp.status().as_u16(), 422);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["message"], "Text input is required.");
}

#[tokio::test]
async fn analyze_rejects_oversized_upload() {
    let transcriber = Arc::new(brown_fox_transcriber());
    let app = TestApp::spawn_with(
        transcriber.clone(),
        Arc::new(FakeDiffer::with_text(DIFF_TEXT, 10)),
        fast_polling(),
        1024,
    )
    .await;

    let resp = app.post_analyze(reading_form("The quick brown fox")).await;

    assert_eq!(resp.status().as_u16(), 422);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["message"], "File size cannot exceed 1024 bytes.");
    assert!(transcriber.submissions().is_empty());
}

#[tokio::test]
async fn analyze_reports_job_failure() {
    let transcriber = Arc::new(FakeTranscriber::new(vec![vec![StatusReport::failed(
        "audio too short",
    )]]));
    let differ = Arc::new(FakeDiffer::with_text(DIFF_TEXT, 10));
    let app = TestApp::spawn(transcriber.clone(), differ.clone()).await;

    let resp = app.post_analyze(reading_form("The quick brown fox")).await;

    assert_eq!(resp.status().as_u16(), 500);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["error"], "transcription_failed");
    assert_eq!(json["message"], "Transcription failed: audio too short");
    assert_eq!(transcriber.queries(), 1);
    assert_eq!(differ.calls(), 0);
}

#[tokio::test]
async fn analyze_reports_timeout() {
    let config = AnalysisConfig {
        max_poll_attempts: 4,
        ..fast_polling()
    };
    let transcriber = Arc::new(FakeTranscriber::new(vec![]));
    let app = TestApp::spawn_with(
        transcriber.clone(),
        Arc::new(FakeDiffer::with_text(DIFF_TEXT, 10)),
        config,
        1024 * 1024,
    )
    .await;

    let resp = app.post_analyze(reading_form("The quick brown fox")).await;

    assert_eq!(resp.status().as_u16(), 500);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["error"], "transcription_timeout");
    assert_eq!(json["message"], "Transcription timed out after 4 polling attempts");
    assert_eq!(transcriber.queries(), 4);
}

#[tokio::test]
async fn analyze_reports_diff_failure() {
    let differ = Arc::new(FakeDiffer::new(Err(AnalysisError::CompletionFailed(
        "response content is empty".to_string(),
    ))));
    let app = TestApp::spawn(Arc::new(brown_fox_transcriber()), differ).await;

    let resp = app.post_analyze(reading_form("The quick brown fox")).await;

    assert_eq!(resp.status().as_u16(), 500);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["error"], "comparison_failed");
    assert_eq!(json["message"], "Text comparison failed: response content is empty");
}

#[tokio::test]
async fn slow_job_does_not_block_other_requests() {
    // job-1 never finishes; job-2 and job-3 complete immediately.
    let transcriber = Arc::new(FakeTranscriber::new(vec![
        vec![],
        vec![StatusReport::completed("the brown fox", vec![], 1.0)],
        vec![StatusReport::completed("the quick brown fox", vec![], 1.0)],
    ]));
    let config = AnalysisConfig {
        poll_interval_secs: 1,
        ..AnalysisConfig::default()
    };
    let app = TestApp::spawn_with(
        transcriber.clone(),
        Arc::new(FakeDiffer::with_text(DIFF_TEXT, 10)),
        config,
        1024 * 1024,
    )
    .await;

    let slow = tokio::spawn({
        let client = app.client.clone();
        let url = app.url("/analyze");
        async move {
            client
                .post(url)
                .multipart(reading_form("The quick brown fox"))
                .send()
                .await
        }
    });

    // Wait until the slow job has been submitted so it gets job-1.
    while transcriber.submissions().is_empty() {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let responses = futures::future::join_all([
        app.post_analyze(reading_form("The quick brown fox")),
        app.post_analyze(reading_form("The quick brown fox")),
    ])
    .await;

    let mut accuracies = Vec::new();
    for resp in responses {
        assert_eq!(resp.status().as_u16(), 200);
        let json: Value = resp.json().await.unwrap();
        accuracies.push(json["accuracy"].as_f64().unwrap());
    }
    accuracies.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(accuracies, vec![75.0, 100.0]);
    assert!(!slow.is_finished());

    slow.abort();
}

#[tokio::test]
async fn health_check() {
    let app = TestApp::spawn(
        Arc::new(brown_fox_transcriber()),
        Arc::new(FakeDiffer::with_text(DIFF_TEXT, 10)),
    )
    .await;

    let resp = app.client.get(app.url("/health")).send().await.unwrap();

    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "ok");
}
