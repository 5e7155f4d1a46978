use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Word accuracy of a reading compared to its reference text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccuracyResult {
    /// Matched words over the longer of the two texts, 0-100, two decimals.
    pub percentage: f64,
    pub matched_count: usize,
    pub reference_word_count: usize,
    pub transcribed_word_count: usize,
}

/// Anything outside the Unicode letter and number categories, or whitespace.
/// Combining marks (Mn/Mc) are dropped too, so vowel signs of Indic scripts
/// and the dot left by lowercasing `İ` do not survive.
static NON_WORD_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}\s]").expect("static pattern compiles"));

/// Lowercases `text` and removes every character that is not a letter, a
/// digit or whitespace.
fn strip_to_word_chars(text: &str) -> String {
    NON_WORD_CHARS.replace_all(&text.to_lowercase(), "").into_owned()
}

/// Tokenizes a reading into comparable words.
pub fn normalize_words(text: &str) -> Vec<String> {
    strip_to_word_chars(text)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Counts greedy exact matches between two word sequences.
///
/// Each reference word takes the first transcribed word that is equal and not
/// yet consumed, scanning from the start of the transcription every time. A
/// transcribed word is consumed by at most one match. This is not a global
/// alignment: duplicates out of their natural order can be under-counted.
pub fn greedy_match_count(reference: &[String], transcribed: &[String]) -> usize {
    let mut consumed = vec![false; transcribed.len()];
    let mut matched = 0;

    for word in reference {
        if let Some(pos) = (0..transcribed.len()).find(|&i| !consumed[i] && transcribed[i] == *word) {
            consumed[pos] = true;
            matched += 1;
        }
    }
    matched
}

/// Scores a transcription against the text the reader was given.
///
/// Never fails: empty input on both sides yields 0%.
pub fn score(reference: &str, transcribed: &str) -> AccuracyResult {
    let ref_words = normalize_words(reference);
    let hyp_words = normalize_words(transcribed);

    let matched_count = greedy_match_count(&ref_words, &hyp_words);
    let denominator = ref_words.len().max(hyp_words.len());

    let percentage = if denominator == 0 {
        0.0
    } else {
        round_to(matched_count as f64 / denominator as f64 * 100.0, 2)
    };

    AccuracyResult {
        percentage,
        matched_count,
        reference_word_count: ref_words.len(),
        transcribed_word_count: hyp_words.len(),
    }
}

/// Rounds half away from zero to `decimals` places.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
