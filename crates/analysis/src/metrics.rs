use crate::accuracy::round_to;
use crate::provider::WordTiming;

/// Reading speed in words per minute, measured from the first word's start to
/// the last word's end.
///
/// Returns 0 when there are no words or the span is not positive.
pub fn words_per_minute(words: &[WordTiming]) -> f64 {
    let (Some(first), Some(last)) = (words.first(), words.last()) else {
        return 0.0;
    };

    let span_secs = (last.end_ms - first.start_ms) as f64 / 1000.0;
    if span_secs <= 0.0 {
        return 0.0;
    }

    round_to(words.len() as f64 / span_secs * 60.0, 2)
}

/// Transcription cost for a recording of `duration_seconds`.
pub fn transcription_cost(duration_seconds: f64, cost_per_minute: f64) -> f64 {
    round_to(duration_seconds / 60.0 * cost_per_minute, 4)
}

/// Language model cost for `tokens` billed tokens.
pub fn diff_cost(tokens: u64, cost_per_thousand_tokens: f64) -> f64 {
    round_to(tokens as f64 / 1000.0 * cost_per_thousand_tokens, 4)
}
