//! Speech-to-text transcription.
//!
//! This module provides a trait abstraction for transcription backends
//! and implementations for specific models.

use anyhow::Result;

use crate::transcript::Transcription;

mod whisper;

pub use whisper::WhisperTranscriber;

/// Speech-to-text transcriber producing timestamped output.
///
/// Implementations convert audio samples to a [`Transcription`] carrying
/// the full text and segment-level time spans.
pub trait Transcriber: Send {
    /// Transcribe audio samples.
    ///
    /// # Arguments
    /// * `audio` - Audio samples as f32, expected to be 16kHz mono
    /// * `sample_rate` - Sample rate of the audio in Hz (must be 16000)
    ///
    /// # Returns
    /// The timestamped transcription, or an error if transcription failed.
    fn transcribe(&mut self, audio: &[f32], sample_rate: u32) -> Result<Transcription>;
}
