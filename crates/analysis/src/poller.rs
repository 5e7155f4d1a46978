use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::{AnalysisError, AnalysisResult};
use crate::provider::{JobHandle, JobStatus, StatusReport, TranscriptResult, TranscriptionProvider};

/// Polling budget for a transcription job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerConfig {
    /// Maximum number of status queries.
    pub max_attempts: u32,
    /// Fixed wait between two queries. No backoff, no jitter.
    pub interval: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            max_attempts: 100,
            interval: Duration::from_secs(3),
        }
    }
}

/// Where a job stands from the poller's point of view.
#[derive(Debug)]
enum PollState {
    /// `attempt` queries have been made so far.
    Polling { attempt: u32 },
    Completed(TranscriptResult),
    Failed(AnalysisError),
}

impl PollState {
    /// Applies one status report to a job that has seen `attempt` queries
    /// before this one.
    fn after_report(attempt: u32, report: StatusReport) -> Self {
        if !report.status.is_terminal() {
            return PollState::Polling {
                attempt: attempt + 1,
            };
        }

        if report.status == JobStatus::Completed {
            PollState::Completed(TranscriptResult {
                text: report.text.unwrap_or_default(),
                words: report.words.unwrap_or_default(),
                duration_seconds: report.duration_seconds.unwrap_or(0.0),
            })
        } else {
            PollState::Failed(AnalysisError::JobFailed(
                report
                    .error_message
                    .unwrap_or_else(|| "provider reported an error without a message".to_string()),
            ))
        }
    }
}

/// Drives a submitted transcription job to a terminal state.
///
/// Status queries for one job are strictly sequential. The only suspension
/// point between two queries is a `tokio::time::sleep`, so dropping the
/// `resolve` future cancels the wait and stops any further query.
pub struct JobPoller {
    provider: Arc<dyn TranscriptionProvider>,
    config: PollerConfig,
}

impl JobPoller {
    pub fn new(provider: Arc<dyn TranscriptionProvider>, config: PollerConfig) -> Self {
        Self { provider, config }
    }

    /// Polls until the job completes, fails, or the attempt budget runs out.
    ///
    /// A transport failure of a single query is returned immediately as
    /// `QueryFailed`; it is not retried.
    pub async fn resolve(&self, handle: &JobHandle) -> AnalysisResult<TranscriptResult> {
        info!(
            job_id = %handle,
            provider = %self.provider.name(),
            max_attempts = self.config.max_attempts,
            "Waiting for transcription"
        );

        let mut state = PollState::Polling { attempt: 0 };
        loop {
            state = match state {
                PollState::Completed(result) => {
                    info!(
                        job_id = %handle,
                        words = result.words.len(),
                        duration_seconds = result.duration_seconds,
                        "Transcription completed"
                    );
                    return Ok(result);
                }
                PollState::Failed(err) => {
                    warn!(job_id = %handle, error = %err, "Transcription did not complete");
                    return Err(err);
                }
                PollState::Polling { attempt } if attempt >= self.config.max_attempts => {
                    PollState::Failed(AnalysisError::JobTimeout { attempts: attempt })
                }
                PollState::Polling { attempt } => {
                    if attempt > 0 {
                        tokio::time::sleep(self.config.interval).await;
                    }

                    let report = self.provider.query_status(handle).await?;
                    debug!(
                        job_id = %handle,
                        polling_attempt = attempt + 1,
                        status = %report.status,
                        "Polling result"
                    );
                    PollState::after_report(attempt, report)
                }
            };
        }
    }
}
