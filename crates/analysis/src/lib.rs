pub mod accuracy;
pub mod analyzer;
pub mod config;
pub mod error;
pub mod feedback;
pub mod metrics;
pub mod poller;
pub mod provider;

pub use accuracy::{AccuracyResult, score};
pub use analyzer::{CostBreakdown, ReadingAnalyzer, ReadingReport};
pub use config::AnalysisConfig;
pub use error::{AnalysisError, AnalysisResult};
pub use poller::{JobPoller, PollerConfig};
pub use provider::{
    AudioUpload, DiffOutcome, JobHandle, JobStatus, SemanticDiffProvider, StatusReport, TranscriptResult,
    TranscriptionProvider, WordTiming,
};
