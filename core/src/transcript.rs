//! Transcription data model.
//!
//! Two input shapes are supported, matching what timestamped ASR pipelines
//! emit: a structured transcription with segment spans that may carry word
//! spans, and the flat chunk list produced by Hugging Face style pipelines.
//! Word spans may live at the transcription root or nested per segment;
//! [`Transcription::word_source`] resolves both behind one accessor.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// A labeled time span.
///
/// The tier builder is generic over this, so segments, words and raw
/// chunks all feed the same construction routine.
pub trait TimedSpan {
    /// Span start in seconds.
    fn start(&self) -> f64;
    /// Span end in seconds.
    fn end(&self) -> f64;
    /// Text label carried by the span.
    fn label(&self) -> &str;
}

/// Word-level span, nested in a [`Segment`] or listed at the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub start: f64,
    pub end: f64,
    pub word: String,
}

/// Sentence/phrase-level span, optionally carrying its word spans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub words: Option<Vec<Word>>,
}

/// Structured transcription: full text plus optional span hierarchies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcription {
    /// Full transcript text. Required; parsing fails without it.
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<Segment>>,
    /// Root-level word list (the flat shape). When absent, word spans may
    /// still be nested inside segments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub words: Option<Vec<Word>>,
}

/// Raw ASR pipeline output: full text plus a flat timestamped chunk list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTranscript {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunks: Option<Vec<Chunk>>,
}

/// A single recognized chunk with a (start, end) timestamp pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub timestamp: (f64, f64),
}

impl TimedSpan for Word {
    fn start(&self) -> f64 {
        self.start
    }

    fn end(&self) -> f64 {
        self.end
    }

    fn label(&self) -> &str {
        &self.word
    }
}

impl TimedSpan for Segment {
    fn start(&self) -> f64 {
        self.start
    }

    fn end(&self) -> f64 {
        self.end
    }

    fn label(&self) -> &str {
        &self.text
    }
}

impl TimedSpan for Chunk {
    fn start(&self) -> f64 {
        self.timestamp.0
    }

    fn end(&self) -> f64 {
        self.timestamp.1
    }

    fn label(&self) -> &str {
        &self.text
    }
}

/// Where the word spans of a transcription live.
#[derive(Debug)]
pub enum WordSource<'a> {
    /// Flat list at the transcription root.
    Flat(&'a [Word]),
    /// Nested per segment; each segment's list forms a separate merge run.
    Nested(&'a [Segment]),
}

impl Transcription {
    /// Parse a transcription from JSON.
    ///
    /// Fails when the input is not a JSON object or lacks the `text` field.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .context("transcription must be a JSON object with a 'text' field")
    }

    /// Resolve where word spans live, if anywhere.
    ///
    /// A root-level list wins over nested lists when both are present.
    /// Nesting is detected on the first segment only; a transcription
    /// carries nested words either everywhere or not at all.
    pub fn word_source(&self) -> Option<WordSource<'_>> {
        if let Some(words) = &self.words {
            return Some(WordSource::Flat(words));
        }
        let segments = self.segments.as_deref()?;
        if segments.first()?.words.is_some() {
            return Some(WordSource::Nested(segments));
        }
        None
    }
}

impl RawTranscript {
    /// Parse a raw pipeline transcript from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .context("transcript must be a JSON object with a 'text' field")
    }
}

#[cfg(test)]
#[path = "transcript_test.rs"]
mod tests;
