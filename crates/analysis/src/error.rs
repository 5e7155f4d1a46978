use thiserror::Error;

/// Failures of a reading analysis, one variant per collaborator step.
///
/// Every variant carries the upstream message where one is available so the
/// HTTP boundary can surface it without string matching.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// Uploading the audio or creating the transcription job failed.
    #[error("Audio submission failed: {0}")]
    SubmissionFailed(String),

    /// A status query failed at the transport or HTTP layer.
    #[error("Transcription status query failed: {0}")]
    QueryFailed(String),

    /// The provider reported the job itself as failed.
    #[error("Transcription failed: {0}")]
    JobFailed(String),

    /// The polling budget ran out before the job reached a terminal state.
    #[error("Transcription timed out after {attempts} polling attempts")]
    JobTimeout { attempts: u32 },

    /// The semantic diff call failed or returned no content.
    #[error("Text comparison failed: {0}")]
    CompletionFailed(String),
}

/// Result type alias for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;
