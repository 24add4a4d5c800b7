/*!
 * Rolling context carried between translation rounds.
 *
 * After a round of concurrently dispatched batches completes, the trailing
 * segments of the round's final batch become the context for every batch of
 * the next round. The context is always built from ORIGINAL text, never from
 * translations: the model sees source-language continuity, and a fallback
 * round cannot poison the context of the rounds after it.
 */

use crate::transcript::TimedSegment;

/// Build the context string from the trailing `context_size` segments.
///
/// Texts are joined by single spaces. An empty batch or a zero context size
/// yields an empty context.
pub fn trailing_context(batch: &[TimedSegment], context_size: usize) -> String {
    if context_size == 0 {
        return String::new();
    }
    let start = batch.len().saturating_sub(context_size);
    batch[start..]
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
