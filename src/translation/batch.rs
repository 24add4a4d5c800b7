/*!
 * Segment chunking for batch translation.
 *
 * Splitting is a pure partition: every segment lands in exactly one batch,
 * batches preserve the input order, and only the last batch may be shorter
 * than the requested size.
 */

use crate::transcript::TimedSegment;

/// Split ordered segments into contiguous batches of at most `batch_size`.
///
/// A `batch_size` of 0 is treated as 1 so the function stays total.
pub fn chunk_segments(segments: &[TimedSegment], batch_size: usize) -> Vec<&[TimedSegment]> {
    let size = batch_size.max(1);
    segments.chunks(size).collect()
}
