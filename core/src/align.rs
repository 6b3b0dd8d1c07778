//! Forced alignment via the Montreal Forced Aligner.
//!
//! MFA runs as an external subprocess over a corpus directory (audio files
//! plus transcripts) and produces TextGrid files with word and phone
//! tiers. This module only builds and supervises the invocation; the
//! aligner itself is an environment concern.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::{debug, info};

/// Options passed through to `mfa align`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignConfig {
    /// Aligner executable, resolved via PATH when not absolute.
    pub executable: String,
    /// Pronunciation dictionary name or path.
    pub dictionary: String,
    /// Acoustic model name or path.
    pub acoustic_model: String,
    /// Initial decoding beam width.
    pub beam: u32,
    /// Beam width for the retry pass on utterances that fail the first.
    pub retry_beam: u32,
    /// Worker process count.
    pub num_jobs: u32,
    /// Remove temporary files from previous runs first.
    pub clean: bool,
    /// Copy the input transcript into the output TextGrids.
    pub include_original_text: bool,
    /// Post-process TextGrids (collapse silence paddings).
    pub textgrid_cleanup: bool,
    /// Fixed-width speaker prefix in corpus file names, when used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker_characters: Option<u32>,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            executable: "mfa".to_string(),
            dictionary: "english_mfa".to_string(),
            acoustic_model: "english_mfa".to_string(),
            beam: 100,
            retry_beam: 400,
            num_jobs: 4,
            clean: false,
            include_original_text: true,
            textgrid_cleanup: true,
            speaker_characters: None,
        }
    }
}

/// Drives the aligner subprocess.
pub struct ForcedAligner {
    config: AlignConfig,
}

impl ForcedAligner {
    pub fn new(config: AlignConfig) -> Self {
        Self { config }
    }

    /// Align a corpus directory, writing TextGrids to `output`.
    ///
    /// Defaults the output to an `aligned/` directory next to the corpus
    /// when not given. Returns the output directory.
    pub async fn align(&self, corpus: &Path, output: Option<&Path>) -> Result<PathBuf> {
        let output = match output {
            Some(path) => path.to_path_buf(),
            None => corpus.join("aligned"),
        };

        info!(
            corpus = %corpus.display(),
            output = %output.display(),
            dictionary = %self.config.dictionary,
            acoustic_model = %self.config.acoustic_model,
            "Running forced alignment"
        );

        let result = self
            .command(corpus, &output)
            .output()
            .await
            .with_context(|| {
                format!(
                    "failed to run aligner '{}' (is MFA installed?)",
                    self.config.executable
                )
            })?;

        debug!(
            stdout = %String::from_utf8_lossy(&result.stdout),
            stderr = %String::from_utf8_lossy(&result.stderr),
            "Aligner finished"
        );

        if !result.status.success() {
            anyhow::bail!(
                "aligner exited with {}: {}",
                result.status,
                String::from_utf8_lossy(&result.stderr).trim()
            );
        }

        info!(output = %output.display(), "Forced alignment complete");
        Ok(output)
    }

    /// Build the `mfa align` invocation for a corpus.
    fn command(&self, corpus: &Path, output: &Path) -> Command {
        let mut cmd = Command::new(&self.config.executable);
        cmd.arg("align")
            .arg(corpus)
            .arg(&self.config.dictionary)
            .arg(&self.config.acoustic_model)
            .arg(output)
            .arg("--beam")
            .arg(self.config.beam.to_string())
            .arg("--retry_beam")
            .arg(self.config.retry_beam.to_string())
            .arg("--num_jobs")
            .arg(self.config.num_jobs.to_string());

        if self.config.clean {
            cmd.arg("--clean");
        }
        if self.config.include_original_text {
            cmd.arg("--include_original_text");
        }
        if !self.config.textgrid_cleanup {
            cmd.arg("--no_textgrid_cleanup");
        }
        if let Some(width) = self.config.speaker_characters {
            cmd.arg("--speaker_characters").arg(width.to_string());
        }

        cmd
    }
}

#[cfg(test)]
#[path = "align_test.rs"]
mod tests;
