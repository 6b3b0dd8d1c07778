use super::*;

#[test]
fn test_parse_text_only() {
    let t = Transcription::from_json(r#"{"text": "hello world"}"#).unwrap();
    assert_eq!(t.text, "hello world");
    assert!(t.segments.is_none());
    assert!(t.words.is_none());
}

#[test]
fn test_parse_nested_words() {
    let json = r#"{
        "text": "hello world",
        "segments": [
            {
                "start": 0.0,
                "end": 1.2,
                "text": "hello world",
                "words": [
                    {"start": 0.0, "end": 0.5, "word": "hello"},
                    {"start": 0.6, "end": 1.2, "word": "world"}
                ]
            }
        ]
    }"#;

    let t = Transcription::from_json(json).unwrap();
    let segments = t.segments.as_ref().unwrap();
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].text, "hello world");
    assert_eq!(segments[0].words.as_ref().unwrap().len(), 2);

    match t.word_source() {
        Some(WordSource::Nested(segments)) => assert_eq!(segments.len(), 1),
        other => panic!("expected nested word source, got {other:?}"),
    }
}

#[test]
fn test_parse_flat_words() {
    let json = r#"{
        "text": "hello world",
        "words": [
            {"start": 0.0, "end": 0.5, "word": "hello"},
            {"start": 0.6, "end": 1.2, "word": "world"}
        ]
    }"#;

    let t = Transcription::from_json(json).unwrap();
    match t.word_source() {
        Some(WordSource::Flat(words)) => {
            assert_eq!(words.len(), 2);
            assert_eq!(words[1].word, "world");
        }
        other => panic!("expected flat word source, got {other:?}"),
    }
}

#[test]
fn test_flat_words_win_over_nested() {
    let json = r#"{
        "text": "hi",
        "words": [{"start": 0.0, "end": 0.3, "word": "hi"}],
        "segments": [
            {
                "start": 0.0,
                "end": 0.3,
                "text": "hi",
                "words": [{"start": 0.0, "end": 0.3, "word": "hi"}]
            }
        ]
    }"#;

    let t = Transcription::from_json(json).unwrap();
    assert!(matches!(t.word_source(), Some(WordSource::Flat(_))));
}

#[test]
fn test_no_word_source_without_words() {
    let json = r#"{
        "text": "hi",
        "segments": [{"start": 0.0, "end": 0.3, "text": "hi"}]
    }"#;

    let t = Transcription::from_json(json).unwrap();
    assert!(t.word_source().is_none());
}

#[test]
fn test_missing_text_is_rejected() {
    let result = Transcription::from_json(r#"{"segments": []}"#);
    assert!(result.is_err());
    let err = format!("{:#}", result.unwrap_err());
    assert!(err.contains("'text'"), "unexpected error: {err}");
}

#[test]
fn test_non_object_is_rejected() {
    assert!(Transcription::from_json(r#""just a string""#).is_err());
    assert!(Transcription::from_json("[1, 2, 3]").is_err());
}

#[test]
fn test_parse_raw_chunks() {
    let json = r#"{
        "text": " hello there",
        "chunks": [
            {"text": " hello", "timestamp": [0.0, 1.0]},
            {"text": " there", "timestamp": [1.1, 2.0]}
        ]
    }"#;

    let raw = RawTranscript::from_json(json).unwrap();
    let chunks = raw.chunks.as_ref().unwrap();
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].timestamp, (0.0, 1.0));
    assert_eq!(chunks[1].label(), " there");
}

#[test]
fn test_raw_without_chunks() {
    let raw = RawTranscript::from_json(r#"{"text": "hi"}"#).unwrap();
    assert!(raw.chunks.is_none());
}

#[test]
fn test_timed_span_views() {
    let segment = Segment {
        start: 1.0,
        end: 2.5,
        text: "abc".to_string(),
        words: None,
    };
    assert_eq!(segment.start(), 1.0);
    assert_eq!(segment.end(), 2.5);
    assert_eq!(segment.label(), "abc");

    let chunk = Chunk {
        text: "x".to_string(),
        timestamp: (0.25, 0.75),
    };
    assert_eq!(chunk.start(), 0.25);
    assert_eq!(chunk.end(), 0.75);
}
