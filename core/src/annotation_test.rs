use super::*;
use crate::transcript::{Chunk, Segment, Word};

fn segment(start: f64, end: f64, text: &str) -> Segment {
    Segment {
        start,
        end,
        text: text.to_string(),
        words: None,
    }
}

fn word(start: f64, end: f64, text: &str) -> Word {
    Word {
        start,
        end,
        word: text.to_string(),
    }
}

fn transcription(text: &str, segments: Vec<Segment>) -> Transcription {
    Transcription {
        text: text.to_string(),
        segments: Some(segments),
        words: None,
    }
}

/// Checks the tier invariant: contiguous intervals from 0 to duration,
/// 1-based indices, no zero-width members.
fn assert_covers(tier: &Tier, duration: f64) {
    assert!(!tier.intervals.is_empty(), "tier '{}' is empty", tier.name);
    assert_eq!(tier.intervals.first().unwrap().start, 0.0);
    assert_eq!(tier.intervals.last().unwrap().end, duration);

    for pair in tier.intervals.windows(2) {
        assert_eq!(
            pair[0].end, pair[1].start,
            "gap or overlap in tier '{}'",
            tier.name
        );
    }
    for (i, interval) in tier.intervals.iter().enumerate() {
        assert_eq!(interval.index, i + 1);
        assert!(
            interval.start < interval.end,
            "zero-width interval {} in tier '{}'",
            interval.index,
            tier.name
        );
    }
}

#[test]
fn test_text_tier_always_first() {
    let t = transcription("full text", vec![segment(0.0, 1.0, "full text")]);
    let doc = build_annotation(&t, 2.0, TierOptions::default());

    assert_eq!(doc.tiers.len(), 1);
    assert_eq!(doc.tiers[0].name, "text");
    assert_eq!(doc.tiers[0].intervals.len(), 1);
    assert_eq!(doc.tiers[0].intervals[0].label, "full text");
    assert_covers(&doc.tiers[0], 2.0);
}

#[test]
fn test_segment_tier_interior_boundaries() {
    let t = transcription(
        "one two",
        vec![segment(0.0, 1.0, "one"), segment(1.0, 2.5, "two")],
    );
    let doc = build_annotation(
        &t,
        3.0,
        TierOptions {
            segment_level: true,
            ..Default::default()
        },
    );

    let tier = doc.tier("segments").unwrap();
    assert_covers(tier, 3.0);
    assert_eq!(tier.intervals.len(), 3);
    assert_eq!(tier.intervals[0].end, 1.0);
    assert_eq!(tier.intervals[0].label, "one");
    assert_eq!(tier.intervals[1].end, 2.5);
    assert_eq!(tier.intervals[1].label, "two");
    // Trailing remainder stays unlabeled.
    assert_eq!(tier.intervals[2].label, "");
}

#[test]
fn test_final_span_clamped_to_duration() {
    // Timestamp drift past the audio end must not push the tier past it.
    let t = transcription(
        "a b",
        vec![segment(0.0, 1.0, "a"), segment(1.0, 2.2, "b")],
    );
    let doc = build_annotation(
        &t,
        2.0,
        TierOptions {
            segment_level: true,
            ..Default::default()
        },
    );

    let tier = doc.tier("segments").unwrap();
    assert_covers(tier, 2.0);
    assert_eq!(tier.intervals.len(), 2);
    assert_eq!(tier.intervals[1].label, "b");
    assert_eq!(tier.intervals[1].end, 2.0);
}

#[test]
fn test_clamp_is_identity_when_span_ends_at_duration() {
    let t = transcription(
        "a b",
        vec![segment(0.0, 1.0, "a"), segment(1.0, 2.0, "b")],
    );
    let doc = build_annotation(
        &t,
        2.0,
        TierOptions {
            segment_level: true,
            ..Default::default()
        },
    );

    let tier = doc.tier("segments").unwrap();
    assert_eq!(tier.intervals.last().unwrap().end, 2.0);
    assert_eq!(tier.intervals.last().unwrap().label, "b");
}

#[test]
fn test_degenerate_run_merges_into_one_interval() {
    let t = transcription(
        "a b c d",
        vec![
            segment(0.0, 1.0, "a"),
            segment(1.0, 1.0, "b"),
            segment(1.0, 1.0, "c"),
            segment(1.0, 2.0, "d"),
        ],
    );
    let doc = build_annotation(
        &t,
        2.0,
        TierOptions {
            segment_level: true,
            ..Default::default()
        },
    );

    let tier = doc.tier("segments").unwrap();
    assert_covers(tier, 2.0);
    // The run a,b,c occupies exactly one interval, space-joined in order.
    assert_eq!(tier.intervals.len(), 2);
    assert_eq!(tier.intervals[0].label, "a b c");
    assert_eq!(tier.intervals[0].end, 1.0);
    assert_eq!(tier.intervals[1].label, "d");
}

#[test]
fn test_degenerate_span_at_origin_gets_epsilon_interval() {
    // A zero-duration "Hi" opening the sequence gets a 1ms interval.
    let t = transcription(
        "Hi there",
        vec![segment(0.0, 0.0, "Hi"), segment(0.0, 1.0, " there")],
    );
    let doc = build_annotation(
        &t,
        1.0,
        TierOptions {
            segment_level: true,
            ..Default::default()
        },
    );

    assert_eq!(doc.tier("text").unwrap().intervals[0].label, "Hi there");

    let tier = doc.tier("segments").unwrap();
    assert_covers(tier, 1.0);
    assert_eq!(tier.intervals.len(), 2);
    assert!((tier.intervals[0].end - 0.001).abs() < 1e-12);
    assert_eq!(tier.intervals[0].label, "Hi");
    assert_eq!(tier.intervals[1].label, " there");
}

#[test]
fn test_degenerate_span_after_trailing_assignment_merges() {
    let t = transcription(
        "a b",
        vec![segment(0.0, 2.0, "a"), segment(2.0, 2.0, "b")],
    );
    let doc = build_annotation(
        &t,
        2.0,
        TierOptions {
            segment_level: true,
            ..Default::default()
        },
    );

    let tier = doc.tier("segments").unwrap();
    assert_covers(tier, 2.0);
    assert_eq!(tier.intervals.len(), 1);
    assert_eq!(tier.intervals[0].label, "a b");
}

#[test]
fn test_word_tier_indices_are_tier_global() {
    // Words nested per segment share one tier; numbering never resets.
    let segments = vec![
        Segment {
            start: 0.0,
            end: 0.8,
            text: "w1 w2".to_string(),
            words: Some(vec![word(0.0, 0.4, "w1"), word(0.4, 0.8, "w2")]),
        },
        Segment {
            start: 1.0,
            end: 1.4,
            text: "w3".to_string(),
            words: Some(vec![word(1.0, 1.4, "w3")]),
        },
    ];
    let t = transcription("w1 w2 w3", segments);
    let doc = build_annotation(
        &t,
        2.0,
        TierOptions {
            segment_level: true,
            word_level: true,
        },
    );

    assert_eq!(
        doc.tiers.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
        vec!["text", "segments", "words"]
    );

    let tier = doc.tier("words").unwrap();
    assert_covers(tier, 2.0);
    let labels: Vec<_> = tier.intervals.iter().map(|i| i.label.as_str()).collect();
    assert_eq!(labels, vec!["w1", "w2", "w3", ""]);
    let indices: Vec<_> = tier.intervals.iter().map(|i| i.index).collect();
    assert_eq!(indices, vec![1, 2, 3, 4]);
}

#[test]
fn test_nested_word_runs_reset_per_segment() {
    // A zero-duration word opening the second segment is the origin of its
    // own run, not a continuation of the first segment's.
    let segments = vec![
        Segment {
            start: 0.0,
            end: 0.5,
            text: "w1".to_string(),
            words: Some(vec![word(0.0, 0.5, "w1")]),
        },
        Segment {
            start: 1.0,
            end: 1.5,
            text: "x".to_string(),
            words: Some(vec![word(1.0, 1.0, "x")]),
        },
    ];
    let t = transcription("w1 x", segments);
    let doc = build_annotation(
        &t,
        2.0,
        TierOptions {
            word_level: true,
            ..Default::default()
        },
    );

    let tier = doc.tier("words").unwrap();
    assert_covers(tier, 2.0);
    let labels: Vec<_> = tier.intervals.iter().map(|i| i.label.as_str()).collect();
    assert_eq!(labels, vec!["w1", "x", ""]);
    assert!((tier.intervals[1].end - 1.001).abs() < 1e-12);
}

#[test]
fn test_flat_word_list_builds_word_tier() {
    let t = Transcription {
        text: "w1 w2".to_string(),
        segments: None,
        words: Some(vec![word(0.0, 0.4, "w1"), word(0.4, 1.0, "w2")]),
    };
    let doc = build_annotation(
        &t,
        1.0,
        TierOptions {
            word_level: true,
            ..Default::default()
        },
    );

    // No segment tier requested: word tier sits at position 2.
    assert_eq!(
        doc.tiers.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
        vec!["text", "words"]
    );
    assert_covers(doc.tier("words").unwrap(), 1.0);
}

#[test]
fn test_requested_levels_without_spans_are_skipped() {
    let t = Transcription {
        text: "just text".to_string(),
        segments: None,
        words: None,
    };
    let doc = build_annotation(
        &t,
        1.0,
        TierOptions {
            segment_level: true,
            word_level: true,
        },
    );

    assert_eq!(doc.tiers.len(), 1);
    assert!(doc.tier("segments").is_none());
    assert!(doc.tier("words").is_none());
}

#[test]
fn test_raw_annotation_from_chunks() {
    let raw = RawTranscript {
        text: " hello there".to_string(),
        chunks: Some(vec![
            Chunk {
                text: " hello".to_string(),
                timestamp: (0.0, 1.05),
            },
            Chunk {
                text: " there".to_string(),
                timestamp: (1.05, 2.0),
            },
        ]),
    };
    let doc = build_raw_annotation(&raw, 2.0);

    assert_eq!(doc.tiers.len(), 1);
    let tier = doc.tier("transcription").unwrap();
    assert_covers(tier, 2.0);
    assert_eq!(tier.intervals.len(), 2);
    assert_eq!(tier.intervals[0].label, " hello");
    assert_eq!(tier.intervals[1].label, " there");
}

#[test]
fn test_raw_annotation_without_chunks() {
    let raw = RawTranscript {
        text: "no boundaries".to_string(),
        chunks: None,
    };
    let doc = build_raw_annotation(&raw, 4.0);

    let tier = doc.tier("transcription").unwrap();
    assert_covers(tier, 4.0);
    assert_eq!(tier.intervals.len(), 1);
    assert_eq!(tier.intervals[0].label, "no boundaries");
}

#[test]
fn test_interval_count_tracks_insertions() {
    // n non-degenerate interior spans -> 1 + n intervals.
    let t = transcription(
        "a b c",
        vec![
            segment(0.0, 1.0, "a"),
            segment(1.0, 2.0, "b"),
            segment(2.0, 3.0, "c"),
        ],
    );
    let doc = build_annotation(
        &t,
        4.0,
        TierOptions {
            segment_level: true,
            ..Default::default()
        },
    );

    assert_eq!(doc.tier("segments").unwrap().intervals.len(), 4);
}
