use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use super::{AudioUpload, JobHandle, JobStatus, StatusReport, TranscriptionProvider, WordTiming};
use crate::error::{AnalysisError, AnalysisResult};

pub const DEFAULT_BASE_URL: &str = "https://api.assemblyai.com/v2";

/// AssemblyAI hosted transcription backend.
///
/// Audio is uploaded first, then a transcript job is created from the returned
/// upload URL. The service has no completion callback usable here, so the job
/// is polled through `query_status`.
pub struct AssemblyAiProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    language_code: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    upload_url: Option<String>,
}

#[derive(Debug, Serialize)]
struct TranscriptRequest<'a> {
    audio_url: &'a str,
    language_code: &'a str,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TranscriptResponse {
    status: String,
    text: Option<String>,
    words: Option<Vec<TranscriptWord>>,
    /// Seconds.
    audio_duration: Option<f64>,
    error: Option<String>,
}

/// Word as returned by the API, timestamps in milliseconds.
#[derive(Debug, Deserialize)]
struct TranscriptWord {
    text: String,
    start: i64,
    end: i64,
}

impl From<TranscriptResponse> for StatusReport {
    fn from(body: TranscriptResponse) -> Self {
        StatusReport {
            status: JobStatus::from_provider(&body.status),
            text: body.text,
            words: body.words.map(|words| {
                words
                    .into_iter()
                    .map(|w| WordTiming {
                        text: w.text,
                        start_ms: w.start,
                        end_ms: w.end,
                    })
                    .collect()
            }),
            duration_seconds: body.audio_duration,
            error_message: body.error,
        }
    }
}

impl AssemblyAiProvider {
    pub fn new(api_key: &str, base_url: Option<&str>, language_code: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            base_url: base_url
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            language_code: language_code.to_string(),
        }
    }

    async fn upload(&self, audio: AudioUpload) -> AnalysisResult<String> {
        let resp = self
            .client
            .post(format!("{}/upload", self.base_url))
            .header("authorization", &self.api_key)
            .header("content-type", &audio.mime_type)
            .body(audio.bytes)
            .send()
            .await
            .map_err(|e| AnalysisError::SubmissionFailed(format!("upload request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            error!(%status, %body, "Audio upload failed");
            return Err(AnalysisError::SubmissionFailed(format!(
                "upload returned HTTP {status}: {body}"
            )));
        }

        let body: UploadResponse = resp
            .json()
            .await
            .map_err(|e| AnalysisError::SubmissionFailed(format!("invalid upload response: {e}")))?;
        body.upload_url
            .ok_or_else(|| AnalysisError::SubmissionFailed("upload response has no upload_url".to_string()))
    }
}

#[async_trait]
impl TranscriptionProvider for AssemblyAiProvider {
    async fn submit(&self, audio: AudioUpload) -> AnalysisResult<JobHandle> {
        info!(
            file_name = %audio.file_name,
            mime_type = %audio.mime_type,
            bytes = audio.bytes.len(),
            "Uploading audio for transcription"
        );

        let language_code = audio
            .language_hint
            .clone()
            .unwrap_or_else(|| self.language_code.clone());
        let audio_url = self.upload(audio).await?;
        debug!(%audio_url, "Audio uploaded");

        let resp = self
            .client
            .post(format!("{}/transcript", self.base_url))
            .header("authorization", &self.api_key)
            .json(&TranscriptRequest {
                audio_url: &audio_url,
                language_code: &language_code,
            })
            .send()
            .await
            .map_err(|e| AnalysisError::SubmissionFailed(format!("transcript request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            error!(%status, %body, "Failed to submit file for transcription");
            return Err(AnalysisError::SubmissionFailed(format!(
                "transcript returned HTTP {status}: {body}"
            )));
        }

        let body: SubmitResponse = resp
            .json()
            .await
            .map_err(|e| AnalysisError::SubmissionFailed(format!("invalid transcript response: {e}")))?;
        let id = body
            .id
            .ok_or_else(|| AnalysisError::SubmissionFailed("transcript response has no id".to_string()))?;

        info!(job_id = %id, %language_code, "Transcription job submitted");
        Ok(JobHandle::new(id))
    }

    async fn query_status(&self, handle: &JobHandle) -> AnalysisResult<StatusReport> {
        let resp = self
            .client
            .get(format!("{}/transcript/{}", self.base_url, handle))
            .header("authorization", &self.api_key)
            .send()
            .await
            .map_err(|e| AnalysisError::QueryFailed(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            error!(job_id = %handle, %status, %body, "Polling failed");
            return Err(AnalysisError::QueryFailed(format!("HTTP {status}: {body}")));
        }

        let body: TranscriptResponse = resp
            .json()
            .await
            .map_err(|e| AnalysisError::QueryFailed(format!("invalid status response: {e}")))?;
        Ok(body.into())
    }

    fn name(&self) -> &str {
        "assemblyai"
    }
}
