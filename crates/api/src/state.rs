use std::sync::Arc;

use readscore_analysis::ReadingAnalyzer;

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<ReadingAnalyzer>,
    /// Largest accepted audio upload, in bytes.
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(analyzer: Arc<ReadingAnalyzer>, max_upload_bytes: usize) -> Self {
        Self {
            analyzer,
            max_upload_bytes,
        }
    }
}
