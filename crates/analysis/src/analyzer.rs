use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::accuracy::{self, AccuracyResult};
use crate::config::AnalysisConfig;
use crate::error::AnalysisResult;
use crate::feedback::{extract_corrected_transcription, extract_feedback};
use crate::metrics;
use crate::poller::JobPoller;
use crate::provider::{AudioUpload, SemanticDiffProvider, TranscriptionProvider};

/// Provider charges for one analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub transcription: f64,
    pub diff: f64,
}

/// Everything computed for one reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingReport {
    pub transcription: String,
    /// Raw diff text with inline error tags.
    pub analysis: String,
    /// Words per minute.
    pub reading_speed: f64,
    pub feedback: String,
    pub corrected_transcription: String,
    pub accuracy: AccuracyResult,
    pub cost: CostBreakdown,
}

/// Runs one reading analysis end to end: submit, poll, score, diff.
///
/// Holds no per-request state; one instance is shared via `Arc` across requests.
pub struct ReadingAnalyzer {
    transcriber: Arc<dyn TranscriptionProvider>,
    differ: Arc<dyn SemanticDiffProvider>,
    poller: JobPoller,
    config: AnalysisConfig,
}

impl ReadingAnalyzer {
    pub fn new(
        transcriber: Arc<dyn TranscriptionProvider>,
        differ: Arc<dyn SemanticDiffProvider>,
        config: AnalysisConfig,
    ) -> Self {
        info!(
            transcriber = %transcriber.name(),
            differ = %differ.name(),
            max_poll_attempts = config.max_poll_attempts,
            poll_interval_secs = config.poll_interval_secs,
            "Reading analyzer created"
        );

        let poller = JobPoller::new(transcriber.clone(), config.poller());
        Self {
            transcriber,
            differ,
            poller,
            config,
        }
    }

    pub async fn analyze(&self, audio: AudioUpload, reference: &str) -> AnalysisResult<ReadingReport> {
        info!(file_name = %audio.file_name, "Analyze process started");

        let handle = self.transcriber.submit(audio).await?;
        let transcript = self.poller.resolve(&handle).await?;

        let reading_speed = metrics::words_per_minute(&transcript.words);
        let accuracy = accuracy::score(reference, &transcript.text);
        info!(
            job_id = %handle,
            accuracy = accuracy.percentage,
            matched = accuracy.matched_count,
            reading_speed,
            "Accuracy calculated"
        );

        let diff = self.differ.compare(reference, &transcript.text).await?;
        let feedback = extract_feedback(&diff.diff_text);
        let corrected_transcription = extract_corrected_transcription(&diff.diff_text);

        let cost = CostBreakdown {
            transcription: metrics::transcription_cost(
                transcript.duration_seconds,
                self.config.transcription_cost_per_minute,
            ),
            diff: metrics::diff_cost(diff.usage_tokens, self.config.diff_cost_per_thousand_tokens),
        };
        info!(
            job_id = %handle,
            transcription_cost = cost.transcription,
            diff_cost = cost.diff,
            "Analyze process completed"
        );

        Ok(ReadingReport {
            transcription: transcript.text,
            analysis: diff.diff_text,
            reading_speed,
            feedback,
            corrected_transcription,
            accuracy,
            cost,
        })
    }
}
