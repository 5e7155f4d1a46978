pub mod assemblyai;
pub mod openai;
mod prompt;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AnalysisResult;

/// Opaque identifier of a submitted transcription job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobHandle(String);

impl JobHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Processing status of a transcription job as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Error,
}

impl JobStatus {
    /// Maps a provider status string. Anything unrecognised keeps polling.
    pub fn from_provider(status: &str) -> Self {
        match status {
            "queued" => JobStatus::Queued,
            "completed" => JobStatus::Completed,
            "error" => JobStatus::Error,
            _ => JobStatus::Processing,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Error)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobStatus::Queued => "queued",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Error => "error",
        };
        f.write_str(s)
    }
}

/// A transcribed word with its position in the recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordTiming {
    pub text: String,
    pub start_ms: i64,
    pub end_ms: i64,
}

/// Final payload of a completed transcription job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptResult {
    pub text: String,
    /// Words in utterance order. May be empty.
    pub words: Vec<WordTiming>,
    pub duration_seconds: f64,
}

/// One answer to a status query.
///
/// The payload fields are only populated once the job is terminal.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub status: JobStatus,
    pub text: Option<String>,
    pub words: Option<Vec<WordTiming>>,
    pub duration_seconds: Option<f64>,
    pub error_message: Option<String>,
}

impl StatusReport {
    /// A non-terminal report carrying no payload.
    pub fn pending(status: JobStatus) -> Self {
        Self {
            status,
            text: None,
            words: None,
            duration_seconds: None,
            error_message: None,
        }
    }

    pub fn completed(text: impl Into<String>, words: Vec<WordTiming>, duration_seconds: f64) -> Self {
        Self {
            status: JobStatus::Completed,
            text: Some(text.into()),
            words: Some(words),
            duration_seconds: Some(duration_seconds),
            error_message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error_message: Some(message.into()),
            ..Self::pending(JobStatus::Error)
        }
    }
}

/// Audio recording handed to a transcription provider.
#[derive(Debug, Clone)]
pub struct AudioUpload {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub file_name: String,
    /// Language hint (e.g. "tr", "en"). None = provider default.
    pub language_hint: Option<String>,
}

/// Output of a semantic diff call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffOutcome {
    /// Free-form diff with inline error tags plus feedback sections.
    pub diff_text: String,
    pub usage_tokens: u64,
}

/// Asynchronous speech-to-text job service.
#[async_trait]
pub trait TranscriptionProvider: Send + Sync + 'static {
    /// Uploads the audio and creates a transcription job.
    async fn submit(&self, audio: AudioUpload) -> AnalysisResult<JobHandle>;

    /// Queries the current status of a job.
    ///
    /// A job that failed on the provider side is a successful query whose
    /// report has `JobStatus::Error`; `Err` is reserved for transport failures.
    async fn query_status(&self, handle: &JobHandle) -> AnalysisResult<StatusReport>;

    /// Human-readable provider name.
    fn name(&self) -> &str;
}

/// Language-model service that classifies reading errors between two texts.
#[async_trait]
pub trait SemanticDiffProvider: Send + Sync + 'static {
    async fn compare(&self, reference: &str, transcribed: &str) -> AnalysisResult<DiffOutcome>;

    /// Human-readable provider name.
    fn name(&self) -> &str;
}
