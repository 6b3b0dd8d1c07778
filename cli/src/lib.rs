//! Command-line interface for gridscribe.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use gridscribe_core::align::ForcedAligner;
use gridscribe_core::annotation::TierOptions;
use gridscribe_core::audio;
use gridscribe_core::config::Config;
use gridscribe_core::pipeline::{Engine, annotate_raw_transcript_file, annotate_transcript_file};

/// Application-specific environment variable for log filtering (overrides
/// the configured level).
const LOG_ENV_VAR: &str = "GRIDSCRIBE_LOG";

#[derive(Parser)]
#[command(name = "gridscribe")]
#[command(about = "Time-aligned Praat TextGrid transcriptions from audio files")]
#[command(version)]
struct Cli {
    /// Path to a config file (defaults to the XDG config location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transcribe an audio file and write a TextGrid
    Transcribe(TranscribeArgs),
    /// Build a TextGrid from an existing transcription JSON file
    Annotate(AnnotateArgs),
    /// Run the Montreal Forced Aligner over a corpus directory
    Align(AlignArgs),
}

#[derive(Args)]
struct TranscribeArgs {
    /// Audio file (WAV)
    audio: PathBuf,

    /// Output TextGrid path (defaults next to the audio file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit the segment tier
    #[arg(long)]
    segment_level: bool,

    /// Emit the word tier
    #[arg(long)]
    word_level: bool,

    /// Pause redistribution ceiling in seconds
    #[arg(long)]
    split_threshold: Option<f64>,

    /// Model name, e.g. "whisper-base"
    #[arg(long)]
    model: Option<String>,

    /// Language code or "auto"
    #[arg(long)]
    language: Option<String>,

    /// Compute device: auto, cpu or gpu
    #[arg(long)]
    device: Option<String>,
}

#[derive(Args)]
struct AnnotateArgs {
    /// Transcription JSON file
    transcript: PathBuf,

    /// Total audio duration in seconds
    #[arg(long, conflicts_with = "audio")]
    duration: Option<f64>,

    /// Audio file to read the duration from
    #[arg(long)]
    audio: Option<PathBuf>,

    /// Output TextGrid path (defaults next to the transcript)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit the segment tier
    #[arg(long)]
    segment_level: bool,

    /// Emit the word tier
    #[arg(long)]
    word_level: bool,

    /// Treat the input as raw pipeline output ("text" plus "chunks") and
    /// build a single transcription tier
    #[arg(long, conflicts_with_all = ["segment_level", "word_level"])]
    raw: bool,
}

#[derive(Args)]
struct AlignArgs {
    /// Corpus directory (audio files plus transcripts)
    corpus: PathBuf,

    /// Output directory for aligned TextGrids
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Entry point: parse arguments, configure logging and dispatch.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::load().unwrap_or_default(),
    };

    init_logging(&config)?;

    match cli.command {
        Commands::Transcribe(args) => transcribe(config, args).await,
        Commands::Annotate(args) => annotate(config, args),
        Commands::Align(args) => align(config, args).await,
    }
}

/// GRIDSCRIBE_LOG env var overrides the config file level.
fn init_logging(config: &Config) -> Result<()> {
    let filter = EnvFilter::builder()
        .with_env_var(LOG_ENV_VAR)
        .with_default_directive(config.logging.level.as_directive().parse()?)
        .from_env()?;

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    Ok(())
}

async fn transcribe(mut config: Config, args: TranscribeArgs) -> Result<()> {
    if args.segment_level {
        config.annotation.segment_level = true;
    }
    if args.word_level {
        config.annotation.word_level = true;
    }
    if let Some(threshold) = args.split_threshold {
        config.annotation.split_threshold = threshold;
    }
    if let Some(model) = &args.model {
        config.model.model = model.parse()?;
    }
    if let Some(language) = &args.language {
        config.model.language = language.clone();
    }
    if let Some(device) = &args.device {
        config.model.device = device.parse()?;
    }

    let mut engine = Engine::new(config)?;
    engine.initialize().await?;
    let out_path = engine.process_file(&args.audio, args.output.as_deref())?;

    println!("{}", out_path.display());
    Ok(())
}

fn annotate(mut config: Config, args: AnnotateArgs) -> Result<()> {
    if args.segment_level {
        config.annotation.segment_level = true;
    }
    if args.word_level {
        config.annotation.word_level = true;
    }

    let duration = match (args.duration, &args.audio) {
        (Some(duration), _) => duration,
        (None, Some(audio_path)) => {
            let (_, duration) = audio::load_wav(audio_path)?;
            tracing::debug!(
                audio = %audio_path.display(),
                duration_secs = duration,
                "Read duration from audio file"
            );
            duration
        }
        (None, None) => anyhow::bail!("either --duration or --audio is required"),
    };

    let out_path = if args.raw {
        let split_threshold = config
            .annotation
            .redistribute_pauses
            .then_some(config.annotation.split_threshold);
        annotate_raw_transcript_file(
            &args.transcript,
            duration,
            split_threshold,
            args.output.as_deref(),
        )?
    } else {
        let options = TierOptions {
            segment_level: config.annotation.segment_level,
            word_level: config.annotation.word_level,
        };
        annotate_transcript_file(&args.transcript, duration, options, args.output.as_deref())?
    };

    println!("{}", out_path.display());
    Ok(())
}

async fn align(config: Config, args: AlignArgs) -> Result<()> {
    let aligner = ForcedAligner::new(config.align);
    let out_dir = aligner.align(&args.corpus, args.output.as_deref()).await?;

    println!("{}", out_dir.display());
    Ok(())
}
