//! Audio file loading and preprocessing.
//!
//! Decodes WAV input, averages channels to mono and resamples to the
//! 16 kHz rate the recognition models expect. The reported duration comes
//! from the source file, not the resampled buffer, so annotation ranges
//! match the original audio.

use std::path::Path;

use anyhow::{Context, Result};
use audioadapter_buffers::direct::SequentialSliceOfVecs;
use rubato::audioadapter::Adapter;
use rubato::{Fft, FixedSync, Resampler};
use tracing::debug;

/// Target sample rate for speech recognition models.
pub const TARGET_SAMPLE_RATE: u32 = 16000;

/// Input chunk size used when resampling whole files.
const RESAMPLE_CHUNK: usize = 1024;

/// Audio buffer containing mono f32 samples at a known sample rate.
#[derive(Debug, Clone)]
pub struct AudioBuffer {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl AudioBuffer {
    /// Create a new audio buffer.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Duration of the buffer in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }
}

/// Convert multi-channel interleaved samples to mono by averaging all
/// channels.
pub fn to_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    if channels == 1 {
        return samples.to_vec();
    }

    let channels = channels as usize;
    samples
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Load a WAV file and prepare it for recognition.
///
/// Returns the 16 kHz mono buffer and the source duration in seconds.
pub fn load_wav(path: impl AsRef<Path>) -> Result<(AudioBuffer, f64)> {
    let path = path.as_ref();
    let mut reader = hound::WavReader::open(path)
        .with_context(|| format!("failed to open audio file: {}", path.display()))?;
    let spec = reader.spec();
    let duration = f64::from(reader.duration()) / f64::from(spec.sample_rate);

    debug!(
        path = %path.display(),
        sample_rate = spec.sample_rate,
        channels = spec.channels,
        duration_secs = duration,
        "Loading audio file"
    );

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .context("failed to decode float samples")?,
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|sample| sample.map(|value| value as f32 / scale))
                .collect::<Result<_, _>>()
                .context("failed to decode integer samples")?
        }
    };

    let mono = to_mono(&samples, spec.channels);
    let buffer = if spec.sample_rate == TARGET_SAMPLE_RATE {
        AudioBuffer::new(mono, TARGET_SAMPLE_RATE)
    } else {
        resample_to_target(&mono, spec.sample_rate)?
    };

    Ok((buffer, duration))
}

/// Resample a whole mono buffer to the target rate.
///
/// The tail is zero-padded to a full chunk so no input samples are
/// dropped; the padding adds at most one chunk of silence at the end.
fn resample_to_target(samples: &[f32], input_rate: u32) -> Result<AudioBuffer> {
    let mut resampler = AudioResampler::new(input_rate, TARGET_SAMPLE_RATE, RESAMPLE_CHUNK)?;

    let mut padded = samples.to_vec();
    let remainder = padded.len() % RESAMPLE_CHUNK;
    if remainder != 0 {
        padded.resize(padded.len() + RESAMPLE_CHUNK - remainder, 0.0);
    }

    let output = resampler.process(&padded)?;
    Ok(AudioBuffer::new(output, TARGET_SAMPLE_RATE))
}

/// Resampler for converting audio between sample rates.
pub struct AudioResampler {
    resampler: Fft<f32>,
    chunk_size_in: usize,
}

impl AudioResampler {
    /// Create a new resampler.
    ///
    /// # Arguments
    /// * `input_rate` - Input sample rate in Hz
    /// * `output_rate` - Output sample rate in Hz
    /// * `chunk_size` - Number of input samples per processing chunk
    pub fn new(input_rate: u32, output_rate: u32, chunk_size: usize) -> Result<Self> {
        let resampler = Fft::new(
            input_rate as usize,
            output_rate as usize,
            chunk_size,
            1, // sub_chunks
            1, // channels
            FixedSync::Input,
        )
        .context("failed to create resampler")?;

        Ok(Self {
            resampler,
            chunk_size_in: chunk_size,
        })
    }

    /// Resample audio data. Input length must be a multiple of the chunk
    /// size; a partial trailing chunk is ignored.
    pub fn process(&mut self, input: &[f32]) -> Result<Vec<f32>> {
        if input.is_empty() {
            return Ok(Vec::new());
        }

        let mut output = Vec::new();
        for chunk in input.chunks_exact(self.chunk_size_in) {
            let input_vecs = vec![chunk.to_vec()];
            let input_adapter =
                SequentialSliceOfVecs::new(&input_vecs, 1, chunk.len()).expect("valid input");
            let resampled = self
                .resampler
                .process(&input_adapter, 0, None)
                .context("resampling failed")?;

            for frame_idx in 0..resampled.frames() {
                output.push(resampled.read_sample(0, frame_idx).unwrap_or(0.0));
            }
        }

        Ok(output)
    }

    /// Get the required input chunk size.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size_in
    }
}

#[cfg(test)]
#[path = "audio_test.rs"]
mod tests;
