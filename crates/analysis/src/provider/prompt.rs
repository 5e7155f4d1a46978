use crate::feedback::{CORRECTED_MARKER, FEEDBACK_MARKER};

pub(crate) const SYSTEM_PROMPT: &str =
    "You are an expert reading analyzer for children's reading performance.";

/// Builds the user message asking the model to tag reading errors inline.
pub(crate) fn comparison_prompt(original: &str, transcribed: &str) -> String {
    format!(
        r#"Compare the original text with the transcription of a child reading it aloud and mark every reading error inline.

### Rules

1. Punctuation and whitespace never count. Ignore commas, periods, ellipses and other symbols; compare words only. Never emit an empty tag such as `[|addition]` or `[|omission]`.

2. Tag formats (use them exactly):

   - Addition, a word in the transcription that is not in the original: `[transcribed_word|addition]`
     Original: "The cat sleeps on the mat" / Transcription: "The cat sleeps on the soft mat"
     Result: "The cat sleeps on the [soft|addition] mat"

   - Omission, an original word missing from the transcription, tagged where it should have been: `[missing_original_word|omission]`
     Original: "The quick brown fox" / Transcription: "The brown fox"
     Result: "The [quick|omission] brown fox"
     A missing word ending is tagged on its own: "jump[ed|omission]".

   - Replacement, a transcribed word standing in for an original word: `[transcribed_word|replacement|original_word]`
     Original: "The quick brown fox" / Transcription: "The lazy brown fox"
     Result: "The [lazy|replacement|quick] brown fox"
     A partially changed word is a replacement of the whole word, never an omission plus an addition.

   - Repetition, an extra occurrence of a word that was just read: `[repeated_word|repetition]`
     Original: "She is running fast" / Transcription: "She is is running fast"
     Result: "She [is|repetition] running fast"
     Only the extra occurrence is tagged.

   - Reversal, a word read with its letters reversed: `[reversed_word|reversal|original_word]`
     Original: "dog" / Transcription: "god"
     Result: "[god|reversal|dog]"

3. Keep the original word order. Leave correct words untouched. Words inside tags must match the original and transcribed texts exactly.

4. Output exactly these two sections and nothing else:

{feedback}
<summary of the performance, the number of additions, omissions, replacements, repetitions and reversals, and the most common issues>

{corrected}
<the whole text, line by line, with inline tags where errors occur>

### Original Text
{original}

### Transcribed Text
{transcribed}
"#,
        feedback = FEEDBACK_MARKER,
        corrected = CORRECTED_MARKER,
        original = original,
        transcribed = transcribed,
    )
}
