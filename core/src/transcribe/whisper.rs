//! Whisper transcription backend.
//!
//! Uses whisper.cpp via whisper-rs for speech-to-text with segment-level
//! timestamps.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};
use whisper_rs::{
    FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters, WhisperState,
};

use super::Transcriber;
use crate::config::Device;
use crate::transcript::{Segment, Transcription};

/// Whisper speech-to-text transcriber.
///
/// The underlying WhisperContext is leaked intentionally - the model stays
/// loaded for the process lifetime. This avoids complex self-referential
/// struct patterns while allowing the state to be reused across files.
pub struct WhisperTranscriber {
    state: WhisperState,
    language: Option<String>,
}

impl WhisperTranscriber {
    /// Create a new Whisper transcriber.
    ///
    /// # Arguments
    /// * `model_path` - Path to the Whisper GGML model file
    /// * `language` - Language code (e.g., "en", "de") or None for auto-detect
    /// * `device` - Compute device; GPU offload is requested per instance
    pub fn new(
        model_path: impl AsRef<Path>,
        language: Option<String>,
        device: Device,
    ) -> Result<Self> {
        info!(
            path = %model_path.as_ref().display(),
            language = ?language,
            device = ?device,
            "Loading Whisper model"
        );

        let mut context_params = WhisperContextParameters::default();
        context_params.use_gpu(device.use_gpu());

        let ctx = WhisperContext::new_with_params(
            model_path.as_ref().to_str().context("Invalid model path")?,
            context_params,
        )
        .context("Failed to load Whisper model")?;

        // Box and leak the context to get a 'static reference. The model
        // stays loaded for the process lifetime.
        let ctx_box = Box::new(ctx);
        let ctx_ref: &'static WhisperContext = Box::leak(ctx_box);

        let state = ctx_ref
            .create_state()
            .context("Failed to create Whisper state")?;

        info!("Whisper model and state loaded successfully");

        Ok(Self { state, language })
    }
}

/// Whisper reports segment bounds in centisecond ticks.
fn ticks_to_secs(ticks: i64) -> f64 {
    ticks as f64 / 100.0
}

impl Transcriber for WhisperTranscriber {
    fn transcribe(&mut self, audio: &[f32], sample_rate: u32) -> Result<Transcription> {
        debug!(
            samples = audio.len(),
            sample_rate = sample_rate,
            duration_secs = audio.len() as f32 / sample_rate as f32,
            "Transcribing audio with Whisper"
        );

        // Whisper expects 16kHz audio
        if sample_rate != 16000 {
            anyhow::bail!(
                "Whisper expects 16kHz audio, got {}Hz. Resample before calling transcribe.",
                sample_rate
            );
        }

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });

        // Configure language
        if let Some(ref lang) = self.language {
            params.set_language(Some(lang));
        } else {
            params.set_language(None); // Auto-detect
        }

        // Disable printing to stdout
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);

        // Run inference using the pre-created state
        self.state
            .full(params, audio)
            .context("Whisper inference failed")?;

        // Collect segments with their time spans
        let num_segments = self.state.full_n_segments();
        let mut text = String::new();
        let mut segments = Vec::new();

        for i in 0..num_segments {
            let Some(segment) = self.state.get_segment(i) else {
                continue;
            };
            let Ok(segment_text) = segment.to_str_lossy() else {
                continue;
            };

            text.push_str(&segment_text);
            segments.push(Segment {
                start: ticks_to_secs(segment.start_timestamp()),
                end: ticks_to_secs(segment.end_timestamp()),
                text: segment_text.to_string(),
                words: None,
            });
        }

        debug!(
            text_len = text.len(),
            segments = segments.len(),
            "Transcription complete"
        );

        Ok(Transcription {
            text: text.trim().to_string(),
            segments: Some(segments),
            words: None,
        })
    }
}
