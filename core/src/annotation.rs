//! Tiered interval annotation built from timestamped transcriptions.
//!
//! A tier is a named, gap-free, overlap-free sequence of labeled intervals
//! covering `[0, duration]`. The builder turns ordered span sequences
//! (segments, words, raw chunks) into tiers by inserting a boundary at
//! each span's end and labeling the interval left of it. Zero-duration
//! spans never get an interval of their own: their labels are folded into
//! the interval the current merge run started from.

use tracing::warn;

use crate::transcript::{RawTranscript, TimedSpan, Transcription, WordSource};

/// Gap inserted after a zero-duration span at the sequence origin, so the
/// tier never starts with a zero-width interval.
const ORIGIN_EPSILON: f64 = 0.001;

/// One member of a [`Tier`]. `index` is the 1-based position within the
/// tier, Praat style.
#[derive(Debug, Clone, PartialEq)]
pub struct Interval {
    pub index: usize,
    pub start: f64,
    pub end: f64,
    pub label: String,
}

/// Named interval sequence covering the full annotation range.
///
/// Invariant: intervals are contiguous (`intervals[i].end ==
/// intervals[i + 1].start`), the first starts at 0 and the last ends at
/// the document duration.
#[derive(Debug, Clone, PartialEq)]
pub struct Tier {
    pub name: String,
    pub intervals: Vec<Interval>,
}

/// Final annotation output: ordered tiers over a shared duration.
///
/// The "text" tier is always present and always first; "segments" and
/// "words" follow in that order when emitted.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationDocument {
    pub duration: f64,
    pub tiers: Vec<Tier>,
}

impl AnnotationDocument {
    /// Look up a tier by name.
    pub fn tier(&self, name: &str) -> Option<&Tier> {
        self.tiers.iter().find(|tier| tier.name == name)
    }
}

/// Which optional tiers to emit.
#[derive(Debug, Clone, Copy, Default)]
pub struct TierOptions {
    pub segment_level: bool,
    pub word_level: bool,
}

/// Labels of consecutive zero-duration spans folded into one interval.
struct MergeRun {
    /// Index of the interval the run started from.
    target: usize,
    labels: Vec<String>,
}

/// Incremental single-tier construction.
///
/// The last interval always reaches to `duration`; inserting a boundary
/// splits it. The merge run is an explicit label accumulator attached to
/// the most recently labeled interval, not index arithmetic over the span
/// list, so segment-local and tier-global positions never mix.
struct TierBuilder {
    name: String,
    duration: f64,
    intervals: Vec<Interval>,
    run: Option<MergeRun>,
}

impl TierBuilder {
    fn new(name: impl Into<String>, duration: f64) -> Self {
        Self {
            name: name.into(),
            duration,
            intervals: vec![Interval {
                index: 0,
                start: 0.0,
                end: duration,
                label: String::new(),
            }],
            run: None,
        }
    }

    /// Feed one ordered span sequence.
    ///
    /// Each call is an independent run: merge state resets, interval
    /// numbering continues tier-wide. Nested word lists call this once per
    /// segment.
    fn push_spans<S: TimedSpan>(&mut self, spans: &[S]) {
        self.run = None;
        for (k, span) in spans.iter().enumerate() {
            if span.start() == span.end() {
                if k == 0 {
                    // Zero-duration span at the sequence origin: give it a
                    // minimal interval instead of merging into nothing.
                    self.split(span.end() + ORIGIN_EPSILON, span.label());
                } else {
                    self.merge(span.label());
                }
            } else if span.end() < self.duration {
                self.split(span.end(), span.label());
            } else {
                // Span reaches or exceeds the total duration. The trailing
                // interval already ends exactly at `duration`, so only the
                // label is assigned; timestamp drift past the end is
                // absorbed here.
                self.assign_trailing(span.label());
            }
        }
    }

    /// Insert a boundary at `at`, label the interval left of it and start
    /// a new merge run there. When the boundary would not leave room for a
    /// split (at or past the end, or not past the trailing start), the
    /// label goes to the trailing interval instead.
    fn split(&mut self, at: f64, label: &str) {
        let trailing = self.intervals.len() - 1;
        if at <= self.intervals[trailing].start || at >= self.duration {
            self.assign_trailing(label);
            return;
        }

        self.intervals[trailing].end = at;
        self.intervals[trailing].label = label.to_string();
        self.intervals.push(Interval {
            index: 0,
            start: at,
            end: self.duration,
            label: String::new(),
        });
        self.run = Some(MergeRun {
            target: trailing,
            labels: vec![label.to_string()],
        });
    }

    /// Label the trailing interval and start a new merge run on it.
    fn assign_trailing(&mut self, label: &str) {
        let trailing = self.intervals.len() - 1;
        self.intervals[trailing].label = label.to_string();
        self.run = Some(MergeRun {
            target: trailing,
            labels: vec![label.to_string()],
        });
    }

    /// Fold a zero-duration span into the current run's interval: no new
    /// boundary, labels joined by single spaces.
    fn merge(&mut self, label: &str) {
        match &mut self.run {
            Some(run) => {
                run.labels.push(label.to_string());
                self.intervals[run.target].label = run.labels.join(" ");
            }
            // No labeled interval in this run yet; fold into the trailing
            // interval as a fresh run.
            None => self.assign_trailing(label),
        }
    }

    fn finish(mut self) -> Tier {
        for (i, interval) in self.intervals.iter_mut().enumerate() {
            interval.index = i + 1;
        }
        Tier {
            name: self.name,
            intervals: self.intervals,
        }
    }
}

/// Single full-range interval labeled with the whole text.
fn full_range_tier(name: &str, label: &str, duration: f64) -> Tier {
    Tier {
        name: name.to_string(),
        intervals: vec![Interval {
            index: 1,
            start: 0.0,
            end: duration,
            label: label.to_string(),
        }],
    }
}

/// Build the tier set for a structured transcription.
///
/// The "text" tier (full transcript over the whole duration) is always
/// emitted. Segment and word tiers are added on request when the
/// transcription carries the spans; a requested level without spans is
/// logged and skipped rather than failing the call.
pub fn build_annotation(
    transcription: &Transcription,
    duration: f64,
    options: TierOptions,
) -> AnnotationDocument {
    let mut tiers = vec![full_range_tier("text", &transcription.text, duration)];

    if options.segment_level {
        match &transcription.segments {
            Some(segments) => {
                let mut builder = TierBuilder::new("segments", duration);
                builder.push_spans(segments);
                tiers.push(builder.finish());
            }
            None => warn!("Segment level requested but transcription has no segments, skipping tier"),
        }
    }

    if options.word_level {
        match transcription.word_source() {
            Some(WordSource::Flat(words)) => {
                let mut builder = TierBuilder::new("words", duration);
                builder.push_spans(words);
                tiers.push(builder.finish());
            }
            Some(WordSource::Nested(segments)) => {
                let mut builder = TierBuilder::new("words", duration);
                for segment in segments {
                    if let Some(words) = &segment.words {
                        builder.push_spans(words);
                    }
                }
                tiers.push(builder.finish());
            }
            None => warn!("Word level requested but transcription has no words, skipping tier"),
        }
    }

    AnnotationDocument { duration, tiers }
}

/// Single-tier variant for raw pipeline output.
///
/// Builds one "transcription" tier from the flat chunk list. Without
/// chunks there are no boundaries; the tier is a single interval labeled
/// with the full text.
pub fn build_raw_annotation(transcript: &RawTranscript, duration: f64) -> AnnotationDocument {
    let tier = match &transcript.chunks {
        Some(chunks) => {
            let mut builder = TierBuilder::new("transcription", duration);
            builder.push_spans(chunks);
            builder.finish()
        }
        None => {
            warn!("Only 'text' available, no boundaries");
            full_range_tier("transcription", &transcript.text, duration)
        }
    };

    AnnotationDocument {
        duration,
        tiers: vec![tier],
    }
}

#[cfg(test)]
#[path = "annotation_test.rs"]
mod tests;
