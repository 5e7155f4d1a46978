use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::poller::PollerConfig;

/// Configuration for the reading analysis pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Maximum number of status queries before giving up on a job.
    pub max_poll_attempts: u32,
    /// Fixed wait between two status queries, in seconds.
    pub poll_interval_secs: u64,
    /// Transcription price per audio minute.
    pub transcription_cost_per_minute: f64,
    /// Language model price per thousand tokens.
    pub diff_cost_per_thousand_tokens: f64,
}

impl AnalysisConfig {
    pub fn poller(&self) -> PollerConfig {
        PollerConfig {
            max_attempts: self.max_poll_attempts,
            interval: Duration::from_secs(self.poll_interval_secs),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_poll_attempts: 100,
            poll_interval_secs: 3,
            transcription_cost_per_minute: 0.0062,
            diff_cost_per_thousand_tokens: 0.03,
        }
    }
}
