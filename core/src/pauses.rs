//! Pause redistribution between recognized spans.
//!
//! Timestamped ASR output usually leaves silence gaps between adjacent
//! spans. Tier building turns span ends into interval boundaries, so a gap
//! would otherwise be glued entirely to the following span. This module
//! splits each gap between its neighbors, capped by a threshold.

use crate::transcript::{Chunk, Segment};

/// Default ceiling for how much silence is redistributed, in seconds.
pub const DEFAULT_SPLIT_THRESHOLD: f64 = 0.12;

/// Splits silence gaps between adjacent spans.
///
/// For each adjacent pair with a positive gap, half of
/// `min(gap, split_threshold)` is added to the left span's end and
/// subtracted from the right span's start. The pass runs left to right
/// exactly once; each pair sees the already-adjusted end of its left
/// neighbor. Non-positive gaps (touching or overlapping spans) are left
/// alone. The first span's start and the last span's end are never
/// modified.
#[derive(Debug, Clone)]
pub struct PauseRedistributor {
    split_threshold: f64,
}

impl Default for PauseRedistributor {
    fn default() -> Self {
        Self {
            split_threshold: DEFAULT_SPLIT_THRESHOLD,
        }
    }
}

impl PauseRedistributor {
    /// Create a redistributor with a custom threshold in seconds.
    pub fn new(split_threshold: f64) -> Self {
        Self { split_threshold }
    }

    /// The configured redistribution ceiling in seconds.
    pub fn split_threshold(&self) -> f64 {
        self.split_threshold
    }

    /// Redistribute pauses in a raw chunk list.
    ///
    /// Returns an adjusted copy; the input is left untouched.
    pub fn redistribute(&self, chunks: &[Chunk]) -> Vec<Chunk> {
        let mut bounds: Vec<(f64, f64)> = chunks.iter().map(|c| c.timestamp).collect();
        self.adjust(&mut bounds);

        chunks
            .iter()
            .zip(bounds)
            .map(|(chunk, timestamp)| Chunk {
                text: chunk.text.clone(),
                timestamp,
            })
            .collect()
    }

    /// Redistribute pauses between segment spans.
    ///
    /// Only segment boundaries move; nested word spans keep their original
    /// timestamps. Returns an adjusted copy; the input is left untouched.
    pub fn redistribute_segments(&self, segments: &[Segment]) -> Vec<Segment> {
        let mut bounds: Vec<(f64, f64)> = segments.iter().map(|s| (s.start, s.end)).collect();
        self.adjust(&mut bounds);

        segments
            .iter()
            .zip(bounds)
            .map(|(segment, (start, end))| Segment {
                start,
                end,
                text: segment.text.clone(),
                words: segment.words.clone(),
            })
            .collect()
    }

    /// Single left-to-right pass over adjacent (start, end) pairs.
    fn adjust(&self, bounds: &mut [(f64, f64)]) {
        for i in 0..bounds.len().saturating_sub(1) {
            let gap = bounds[i + 1].0 - bounds[i].1;
            if gap <= 0.0 {
                continue;
            }
            let distribute = gap.min(self.split_threshold) / 2.0;
            bounds[i].1 += distribute;
            bounds[i + 1].0 -= distribute;
        }
    }
}

#[cfg(test)]
#[path = "pauses_test.rs"]
mod tests;
