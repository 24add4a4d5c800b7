// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use bytes::Bytes;
use clap::{Parser, Subcommand, ValueEnum};
use log::{info, warn};

use crate::app_config::{Config, LogLevel};
use crate::providers::OpenAiProvider;
use crate::stt::SttClient;
use crate::transcript::{Highlight, TimedSegment, TranslatedSegment};
use crate::translation::Translator;

mod app_config;
mod errors;
mod grounding;
mod language_utils;
mod providers;
mod retry;
mod stt;
mod transcript;
mod translation;

/// CLI wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate timed transcript segments using the generation API
    Translate(TranslateArgs),

    /// Ground model-proposed highlight timestamps against real segments
    Ground(GroundArgs),

    /// Transcribe an audio file via the speech-to-text API
    Transcribe(TranscribeArgs),
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// JSON file with an array of timed segments ({start, end, text})
    #[arg(value_name = "SEGMENTS_JSON")]
    input_path: PathBuf,

    /// Source language code (e.g. 'en', 'ko')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g. 'en', 'ko')
    #[arg(short, long)]
    target_language: Option<String>,
}

#[derive(Parser, Debug)]
struct GroundArgs {
    /// JSON file with an array of highlights ({timestamp, title, description})
    #[arg(value_name = "HIGHLIGHTS_JSON")]
    highlights_path: PathBuf,

    /// JSON file with the ground-truth timed segments
    #[arg(value_name = "SEGMENTS_JSON")]
    segments_path: PathBuf,
}

#[derive(Parser, Debug)]
struct TranscribeArgs {
    /// Audio file to transcribe
    #[arg(value_name = "AUDIO_FILE")]
    input_path: PathBuf,

    /// Language hint ('auto' for detection)
    #[arg(short, long, default_value = "auto")]
    language: String,
}

/// aiscribe - AI transcript translation and highlight grounding
#[derive(Parser, Debug)]
#[command(name = "aiscribe")]
#[command(version)]
#[command(about = "Batch AI translation of timed transcripts with highlight grounding")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,

    #[command(subcommand)]
    command: Commands,
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if std::path::Path::new(&cli.config_path).exists() {
        Config::from_file(&cli.config_path)?
    } else {
        Config::default()
    };
    if let Some(level) = cli.log_level {
        config.log_level = level.into();
    }
    Ok(config)
}

fn init_logging(config: &Config) {
    env_logger::Builder::new()
        .filter_level(config.log_level.to_filter())
        .format_timestamp_secs()
        .init();
}

fn read_json<T: serde::de::DeserializeOwned>(path: &PathBuf) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

async fn run_translate(config: &Config, args: &TranslateArgs) -> Result<()> {
    let segments: Vec<TimedSegment> = read_json(&args.input_path)?;
    let source = args
        .source_language
        .as_deref()
        .unwrap_or(&config.source_language);
    let target = args
        .target_language
        .as_deref()
        .unwrap_or(&config.target_language);
    language_utils::validate_language_code(source)?;
    language_utils::validate_language_code(target)?;

    if language_utils::language_codes_match(source, target) {
        warn!(
            "Source and target are the same language ({}), passing segments through",
            source
        );
        let passthrough: Vec<TranslatedSegment> = segments
            .iter()
            .map(|s| TranslatedSegment {
                start: s.start,
                end: s.end,
                original_text: s.text.clone(),
                translated_text: s.text.clone(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&passthrough)?);
        return Ok(());
    }

    let provider = Arc::new(OpenAiProvider::new(&config.generation));
    let translator = Translator::new(
        provider,
        &config.pipeline,
        &config.retry,
        &config.generation,
    );

    let translated = translator.translate_segments(&segments, source, target).await;
    println!("{}", serde_json::to_string_pretty(&translated)?);
    Ok(())
}

fn run_ground(args: &GroundArgs) -> Result<()> {
    let highlights: Vec<Highlight> = read_json(&args.highlights_path)?;
    let segments: Vec<TimedSegment> = read_json(&args.segments_path)?;

    let corrected = grounding::correct_highlights(&highlights, &segments);
    println!("{}", serde_json::to_string_pretty(&corrected)?);
    Ok(())
}

async fn run_transcribe(config: &Config, args: &TranscribeArgs) -> Result<()> {
    let audio = std::fs::read(&args.input_path)
        .with_context(|| format!("Failed to read {}", args.input_path.display()))?;
    let filename = args
        .input_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("audio.webm")
        .to_string();

    let client = SttClient::new(&config.stt, config.retry.policy());
    let transcription = client
        .transcribe(Bytes::from(audio), &filename, &args.language)
        .await?;
    println!("{}", serde_json::to_string_pretty(&transcription)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_logging(&config);

    info!("aiscribe starting");

    match &cli.command {
        Commands::Translate(args) => run_translate(&config, args).await,
        Commands::Ground(args) => run_ground(args),
        Commands::Transcribe(args) => run_transcribe(&config, args).await,
    }
}
