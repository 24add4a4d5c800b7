/*!
 * Highlight grounding: correcting model-proposed timestamps against the
 * real transcript segment boundaries.
 *
 * Generative models hallucinate or drift timestamps relative to the evidence
 * they were shown. Grounding each proposed timestamp to the nearest real
 * segment start removes a class of user-visible inconsistency while keeping
 * the model's qualitative judgment of where the content divisions are.
 *
 * Correction is total: out-of-range input is corrected, never rejected, and
 * the function has no error path.
 */

use log::{info, warn};

use crate::transcript::{Highlight, TimedSegment};

/// Maximum allowed drift in seconds between a proposed timestamp and the
/// nearest segment start before the timestamp snaps to that start.
///
/// Fixed rather than configurable to keep the numeric behavior stable.
pub const DRIFT_THRESHOLD_SECS: f64 = 10.0;

/// Correct highlight timestamps against the ground-truth segment sequence.
///
/// Segments must be ordered and non-overlapping with increasing times.
/// Empty highlights or empty segments pass through unchanged. Per highlight,
/// in input order:
///
/// 1. Timestamps beyond the last segment's end clamp to the last segment's
///    start; timestamps before the first segment's start clamp to that start.
/// 2. The segment whose start is numerically closest wins; ties go to the
///    earliest segment scanned.
/// 3. If the closest start is still farther than the drift threshold, the
///    timestamp snaps to it; otherwise the current value is kept.
///
/// Other highlight fields are never touched.
pub fn correct_highlights(
    highlights: &[Highlight],
    segments: &[TimedSegment],
) -> Vec<Highlight> {
    if highlights.is_empty() || segments.is_empty() {
        return highlights.to_vec();
    }

    // Safe: segments is non-empty here
    let first = &segments[0];
    let last = &segments[segments.len() - 1];
    let video_duration = last.end;
    let first_start = first.start;

    info!(
        "Grounding {} highlights against {} segments (video spans {:.1}s - {:.1}s)",
        highlights.len(),
        segments.len(),
        first_start,
        video_duration
    );

    highlights
        .iter()
        .enumerate()
        .map(|(idx, highlight)| {
            let corrected = correct_timestamp(idx, highlight, segments, first_start, video_duration);
            Highlight {
                timestamp: corrected,
                title: highlight.title.clone(),
                description: highlight.description.clone(),
            }
        })
        .collect()
}

fn correct_timestamp(
    idx: usize,
    highlight: &Highlight,
    segments: &[TimedSegment],
    first_start: f64,
    video_duration: f64,
) -> u32 {
    let original = highlight.timestamp;
    let mut timestamp = original;

    if (timestamp as f64) > video_duration {
        warn!(
            "Highlight {} timestamp {}s exceeds video duration {:.1}s ({})",
            idx, timestamp, video_duration, highlight.title
        );
        // Clamp to the start of the last segment, truncated to whole seconds
        timestamp = segments[segments.len() - 1].start as u32;
    } else if (timestamp as f64) < first_start {
        warn!(
            "Highlight {} timestamp {}s precedes first segment start {:.1}s ({})",
            idx, timestamp, first_start, highlight.title
        );
        timestamp = first_start as u32;
    }

    let closest = nearest_segment(segments, timestamp as f64);

    let corrected = if (closest.start - timestamp as f64).abs() > DRIFT_THRESHOLD_SECS {
        closest.start as u32
    } else {
        timestamp
    };

    if corrected != original {
        info!(
            "Highlight {} timestamp corrected: {}s -> {}s (closest segment start {:.1}s)",
            idx, original, corrected, closest.start
        );
    }

    corrected
}

/// Find the segment whose start is numerically closest to the timestamp.
///
/// Linear scan; stable minimum (the earliest of equally distant segments
/// wins). O(segments) per highlight is fine at the expected scale.
fn nearest_segment(segments: &[TimedSegment], timestamp: f64) -> &TimedSegment {
    let mut closest = &segments[0];
    let mut best = (closest.start - timestamp).abs();
    for segment in &segments[1..] {
        let distance = (segment.start - timestamp).abs();
        if distance < best {
            best = distance;
            closest = segment;
        }
    }
    closest
}
