//! Model download and management.
//!
//! Handles automatic downloading of whisper.cpp GGML models on first use.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use futures_util::StreamExt;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// Identifier for downloadable models.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelId {
    /// Whisper tiny model (~75MB).
    WhisperTiny,
    /// Whisper tiny English-only model (~75MB).
    WhisperTinyEn,
    /// Whisper base model (~150MB).
    WhisperBase,
    /// Whisper base English-only model (~150MB).
    WhisperBaseEn,
    /// Whisper small model (~500MB).
    WhisperSmall,
    /// Whisper small English-only model (~500MB).
    WhisperSmallEn,
    /// Whisper medium model (~1.5GB).
    WhisperMedium,
    /// Whisper medium English-only model (~1.5GB).
    WhisperMediumEn,
    /// Whisper large-v3 model (~3GB).
    WhisperLargeV3,
    /// Whisper large-v3-turbo model (~1.5GB).
    WhisperLargeV3Turbo,
}

const WHISPER_BASE_URL: &str = "https://huggingface.co/ggerganov/whisper.cpp/resolve/main";

impl ModelId {
    /// Get model metadata.
    fn info(&self) -> ModelInfo {
        let (filename, size_bytes) = match self {
            ModelId::WhisperTiny => ("ggml-tiny.bin", 77_691_713),
            ModelId::WhisperTinyEn => ("ggml-tiny.en.bin", 77_704_715),
            ModelId::WhisperBase => ("ggml-base.bin", 147_951_465),
            ModelId::WhisperBaseEn => ("ggml-base.en.bin", 147_964_211),
            ModelId::WhisperSmall => ("ggml-small.bin", 487_601_967),
            ModelId::WhisperSmallEn => ("ggml-small.en.bin", 487_614_201),
            ModelId::WhisperMedium => ("ggml-medium.bin", 1_533_774_781),
            ModelId::WhisperMediumEn => ("ggml-medium.en.bin", 1_533_774_781),
            ModelId::WhisperLargeV3 => ("ggml-large-v3.bin", 3_094_623_691),
            ModelId::WhisperLargeV3Turbo => ("ggml-large-v3-turbo.bin", 1_624_592_891),
        };
        ModelInfo {
            filename,
            url: format!("{WHISPER_BASE_URL}/{filename}"),
            size_bytes: Some(size_bytes),
        }
    }
}

/// Metadata for a downloadable model.
struct ModelInfo {
    /// Filename to save as.
    filename: &'static str,
    /// Download URL.
    url: String,
    /// Expected file size for validation (optional).
    size_bytes: Option<u64>,
}

/// Manages model downloads and storage.
pub struct ModelManager {
    models_dir: PathBuf,
}

impl ModelManager {
    /// Create a new ModelManager using the default models directory.
    ///
    /// Default: `~/.local/share/gridscribe/models/`
    pub fn new() -> Result<Self> {
        let models_dir = crate::config::Config::models_dir()?;
        Ok(Self { models_dir })
    }

    /// Create a ModelManager with a custom models directory.
    pub fn with_dir(models_dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: models_dir.into(),
        }
    }

    /// Get the models directory path.
    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    /// Ensure a model is available, downloading if necessary.
    ///
    /// Returns the path to the model file.
    pub async fn ensure_model(&self, model: ModelId) -> Result<PathBuf> {
        let info = model.info();
        let model_path = self.models_dir.join(info.filename);

        if model_path.exists() {
            match info.size_bytes {
                Some(expected_size) => {
                    let metadata = fs::metadata(&model_path)
                        .await
                        .context("failed to read model metadata")?;
                    let actual_size = metadata.len();

                    if actual_size == expected_size {
                        debug!(path = %model_path.display(), "Model already exists");
                        return Ok(model_path);
                    }

                    warn!(
                        model = ?model,
                        expected = expected_size,
                        actual = actual_size,
                        "Model size mismatch, re-downloading"
                    );
                    fs::remove_file(&model_path)
                        .await
                        .context("failed to remove corrupted model")?;
                }
                None => {
                    debug!(path = %model_path.display(), "Model already exists");
                    return Ok(model_path);
                }
            }
        }

        self.download_model(&info, &model_path).await?;
        Ok(model_path)
    }

    /// Download a model from its URL, streaming to disk.
    ///
    /// Writes to a temporary file first and renames on success, so a
    /// partial download never masquerades as a model.
    async fn download_model(&self, info: &ModelInfo, dest: &Path) -> Result<()> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .await
                .context("failed to create models directory")?;
        }

        info!(
            url = %info.url,
            dest = %dest.display(),
            "Downloading model"
        );

        let response = reqwest::get(&info.url)
            .await
            .with_context(|| format!("failed to download model from {}", info.url))?;

        if !response.status().is_success() {
            anyhow::bail!("failed to download model: HTTP {}", response.status());
        }

        let temp_path = dest.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)
            .await
            .context("failed to create temporary model file")?;

        let mut downloaded = 0u64;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.context("failed to read download stream")?;
            file.write_all(&chunk)
                .await
                .context("failed to write model file")?;
            downloaded += chunk.len() as u64;
        }
        file.sync_all().await.context("failed to sync model file")?;
        drop(file);

        if let Some(expected) = info.size_bytes {
            if downloaded != expected {
                let _ = fs::remove_file(&temp_path).await;
                anyhow::bail!(
                    "downloaded model size mismatch: expected {}, got {}",
                    expected,
                    downloaded
                );
            }
        }

        fs::rename(&temp_path, dest)
            .await
            .context("failed to finalize model file")?;

        info!(
            path = %dest.display(),
            size = downloaded,
            "Model downloaded successfully"
        );

        Ok(())
    }
}
