//! End-to-end pipeline: audio file in, TextGrid out.
//!
//! The engine owns and orchestrates:
//! - Model download and loading
//! - Audio file loading and resampling
//! - Transcription
//! - Pause redistribution
//! - Tier building and TextGrid export

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::annotation::{TierOptions, build_annotation, build_raw_annotation};
use crate::audio;
use crate::config::{Config, SpeechModel};
use crate::models::{ModelId, ModelManager};
use crate::pauses::PauseRedistributor;
use crate::textgrid::write_textgrid;
use crate::transcribe::{Transcriber, WhisperTranscriber};
use crate::transcript::{RawTranscript, Transcription};

/// Transcription pipeline. Owns the configuration and, once initialized,
/// the loaded model.
pub struct Engine {
    config: Config,
    model_manager: ModelManager,
    transcriber: Option<WhisperTranscriber>,
}

impl Engine {
    /// Create a new engine with the given configuration.
    pub fn new(config: Config) -> Result<Self> {
        let model_manager = ModelManager::new()?;
        Ok(Self {
            config,
            model_manager,
            transcriber: None,
        })
    }

    /// Create a new engine with a custom model manager.
    pub fn with_model_manager(config: Config, model_manager: ModelManager) -> Self {
        Self {
            config,
            model_manager,
            transcriber: None,
        }
    }

    /// Check if the engine has been initialized (model loaded).
    pub fn is_initialized(&self) -> bool {
        self.transcriber.is_some()
    }

    /// Initialize the engine: download the configured model if needed and
    /// load it. After this returns Ok(()), files can be processed.
    pub async fn initialize(&mut self) -> Result<()> {
        info!("Initializing engine");

        // Route whisper.cpp and GGML logs through tracing
        whisper_rs::install_logging_hooks();

        let model_id = speech_model_to_model_id(self.config.model.model);
        let model_path = self
            .model_manager
            .ensure_model(model_id)
            .await
            .context("Failed to ensure Whisper model")?;

        let language = if self.config.model.language == "auto" {
            None
        } else {
            Some(self.config.model.language.clone())
        };

        let transcriber =
            WhisperTranscriber::new(&model_path, language, self.config.model.device)
                .context("Failed to initialize Whisper")?;
        self.transcriber = Some(transcriber);

        info!("Engine initialized");
        Ok(())
    }

    /// Process one audio file into a TextGrid.
    ///
    /// Defaults the output path to the audio path with a `.TextGrid`
    /// extension. Returns the written path.
    pub fn process_file(&mut self, audio_path: &Path, output: Option<&Path>) -> Result<PathBuf> {
        let transcriber = self
            .transcriber
            .as_mut()
            .context("Engine not initialized - call initialize() first")?;

        let (buffer, duration) = audio::load_wav(audio_path)?;
        info!(
            path = %audio_path.display(),
            duration_secs = duration,
            "Audio loaded"
        );

        let mut transcription = transcriber.transcribe(&buffer.samples, buffer.sample_rate)?;
        info!(text = %transcription.text, "Transcription complete");

        if self.config.annotation.redistribute_pauses {
            transcription = redistribute_pauses(
                transcription,
                self.config.annotation.split_threshold,
            );
        }

        let options = TierOptions {
            segment_level: self.config.annotation.segment_level,
            word_level: self.config.annotation.word_level,
        };
        let document = build_annotation(&transcription, duration, options);

        let out_path = match output {
            Some(path) => path.to_path_buf(),
            None => default_output_path(audio_path),
        };
        write_textgrid(&document, &out_path)?;
        info!(
            path = %out_path.display(),
            tiers = document.tiers.len(),
            "TextGrid written"
        );

        Ok(out_path)
    }
}

/// Build a TextGrid from an existing transcription JSON file.
///
/// No model is involved; this is the entry point for annotating upstream
/// ASR output. Returns the written path.
pub fn annotate_transcript_file(
    transcript_path: &Path,
    duration: f64,
    options: TierOptions,
    output: Option<&Path>,
) -> Result<PathBuf> {
    let json = std::fs::read_to_string(transcript_path).with_context(|| {
        format!(
            "failed to read transcript file: {}",
            transcript_path.display()
        )
    })?;
    let transcription = Transcription::from_json(&json)?;

    let document = build_annotation(&transcription, duration, options);

    let out_path = match output {
        Some(path) => path.to_path_buf(),
        None => default_output_path(transcript_path),
    };
    write_textgrid(&document, &out_path)?;
    info!(
        path = %out_path.display(),
        tiers = document.tiers.len(),
        "TextGrid written"
    );

    Ok(out_path)
}

/// Build a single-tier TextGrid from raw pipeline output ("text" plus
/// "chunks").
///
/// When `split_threshold` is given, silence gaps between chunks are
/// redistributed before the tier is built. Returns the written path.
pub fn annotate_raw_transcript_file(
    transcript_path: &Path,
    duration: f64,
    split_threshold: Option<f64>,
    output: Option<&Path>,
) -> Result<PathBuf> {
    let json = std::fs::read_to_string(transcript_path).with_context(|| {
        format!(
            "failed to read transcript file: {}",
            transcript_path.display()
        )
    })?;
    let mut transcript = RawTranscript::from_json(&json)?;

    if let (Some(threshold), Some(chunks)) = (split_threshold, &transcript.chunks) {
        let redistributor = PauseRedistributor::new(threshold);
        transcript.chunks = Some(redistributor.redistribute(chunks));
    }

    let document = build_raw_annotation(&transcript, duration);

    let out_path = match output {
        Some(path) => path.to_path_buf(),
        None => default_output_path(transcript_path),
    };
    write_textgrid(&document, &out_path)?;
    info!(path = %out_path.display(), "TextGrid written");

    Ok(out_path)
}

/// Redistribute pauses between the transcription's segment spans.
fn redistribute_pauses(mut transcription: Transcription, split_threshold: f64) -> Transcription {
    if let Some(segments) = transcription.segments.take() {
        let redistributor = PauseRedistributor::new(split_threshold);
        transcription.segments = Some(redistributor.redistribute_segments(&segments));
    }
    transcription
}

/// Default output path: the input path with a `.TextGrid` extension.
fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("TextGrid")
}

/// Convert SpeechModel config to ModelId for download.
pub(crate) fn speech_model_to_model_id(model: SpeechModel) -> ModelId {
    match model {
        SpeechModel::WhisperTiny => ModelId::WhisperTiny,
        SpeechModel::WhisperTinyEn => ModelId::WhisperTinyEn,
        SpeechModel::WhisperBase => ModelId::WhisperBase,
        SpeechModel::WhisperBaseEn => ModelId::WhisperBaseEn,
        SpeechModel::WhisperSmall => ModelId::WhisperSmall,
        SpeechModel::WhisperSmallEn => ModelId::WhisperSmallEn,
        SpeechModel::WhisperMedium => ModelId::WhisperMedium,
        SpeechModel::WhisperMediumEn => ModelId::WhisperMediumEn,
        SpeechModel::WhisperLargeV3 => ModelId::WhisperLargeV3,
        SpeechModel::WhisperLargeV3Turbo => ModelId::WhisperLargeV3Turbo,
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
