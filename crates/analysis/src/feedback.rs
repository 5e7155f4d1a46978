//! Best-effort section splitting of the semantic diff text.
//!
//! The diff provider is asked for a `**Feedback**` section followed by a
//! `**Corrected Transcription**` section. Missing sections fall back to fixed
//! placeholder strings instead of failing the analysis.

/// Heading that opens the summary section.
pub const FEEDBACK_MARKER: &str = "**Feedback**";

/// Heading that opens the tagged transcription section.
pub const CORRECTED_MARKER: &str = "**Corrected Transcription**";

pub const NO_FEEDBACK: &str = "No feedback available.";
pub const NO_CORRECTED_TRANSCRIPTION: &str = "No transcription available.";

/// Text between the feedback heading and the corrected transcription heading.
pub fn extract_feedback(analysis: &str) -> String {
    analysis
        .find(FEEDBACK_MARKER)
        .map(|start| &analysis[start + FEEDBACK_MARKER.len()..])
        .and_then(|rest| rest.find(CORRECTED_MARKER).map(|end| rest[..end].trim()))
        .map(str::to_string)
        .unwrap_or_else(|| NO_FEEDBACK.to_string())
}

/// Everything after the corrected transcription heading.
pub fn extract_corrected_transcription(analysis: &str) -> String {
    analysis
        .find(CORRECTED_MARKER)
        .map(|start| analysis[start + CORRECTED_MARKER.len()..].trim().to_string())
        .unwrap_or_else(|| NO_CORRECTED_TRANSCRIPTION.to_string())
}
