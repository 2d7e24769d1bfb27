//! `vmotion` command-line client.
//!
//! Usage:
//!   vmotion generate <prompt...>
//!   vmotion list
//!   vmotion delete <id>
//!
//! Generation options come from the environment: `VMOTION_ASPECT_RATIO`,
//! `VMOTION_RESOLUTION` and `VMOTION_REFERENCE_IMAGE` (path to an image file).
//! The API key is read from `GEMINI_API_KEY` or `API_KEY`.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{bail, Context};
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vmotion_generator::{
    CancelSignal, GenerationError, GeneratorConfig, MediaStore, VideoGenerator,
};
use vmotion_history::{HistoryConfig, JsonFileStore, VideoHistory};
use vmotion_models::{
    ApiKey, AspectRatio, GeneratedVideoRecord, GenerationConfig, ReferenceImage, Resolution,
    VideoId,
};
use vmotion_veo::VeoClient;

/// Exit status when the API key must be replaced.
const EXIT_CREDENTIAL_INVALID: u8 = 3;

const USAGE: &str = "\
Usage:
  vmotion generate <prompt...>   Generate a video from a text prompt
  vmotion list                   Show generated videos, newest first
  vmotion delete <id>            Remove a video from the history

Environment:
  GEMINI_API_KEY / API_KEY       API key used for generation
  VMOTION_ASPECT_RATIO           16:9 (default) or 9:16
  VMOTION_RESOLUTION             720p (default) or 1080p
  VMOTION_REFERENCE_IMAGE        Optional first-frame image file";

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Install rustls crypto provider (required for TLS/HTTPS)
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))?;

    // Load environment variables
    dotenvy::dotenv().ok();

    init_tracing()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let history = VideoHistory::load(HistoryConfig::from_env().open_store())
        .await
        .context("Failed to open history")?;

    match args.first().map(String::as_str) {
        Some("generate") => {
            let prompt = args[1..].join(" ");
            generate(history, &prompt).await
        }
        Some("list") => {
            list(&history);
            Ok(ExitCode::SUCCESS)
        }
        Some("delete") => match args.get(1) {
            Some(id) => delete(history, id).await,
            None => usage(),
        },
        _ => usage(),
    }
}

fn init_tracing() -> anyhow::Result<()> {
    // Colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env().add_directive("vmotion=info".parse()?);

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .with(env_filter)
            .init();
    }

    Ok(())
}

fn usage() -> anyhow::Result<ExitCode> {
    eprintln!("{}", USAGE);
    Ok(ExitCode::from(2))
}

async fn generate(
    mut history: VideoHistory<JsonFileStore>,
    prompt: &str,
) -> anyhow::Result<ExitCode> {
    let credential = api_key_from_env()?;
    let config = generation_config_from_env(prompt).await?;
    config.validate()?;

    let client = VeoClient::from_env().context("Failed to create Veo client")?;
    let generator = VideoGenerator::new(client, GeneratorConfig::from_env());

    // Ctrl-C abandons the generation instead of killing the process mid-write
    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received shutdown signal");
            cancel_tx.send(true).ok();
        }
    });

    let result = generator
        .generate_with_cancel(
            &credential,
            &config,
            |message: &str| println!("{}", message),
            CancelSignal::new(cancel_rx),
        )
        .await;

    match result {
        Ok(resource) => {
            let record = GeneratedVideoRecord::from_generation(&config, &resource.url);
            println!("Video ready: {}", resource.path.display());
            println!("History id: {}", record.id);
            history
                .add(record)
                .await
                .context("Video saved, but the history could not be updated")?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if e.is_credential_invalid() => {
            eprintln!(
                "The API key no longer has access to this generation. \
                 Please select a new key (GEMINI_API_KEY) and try again."
            );
            Ok(ExitCode::from(EXIT_CREDENTIAL_INVALID))
        }
        Err(GenerationError::Cancelled) => {
            eprintln!("Generation cancelled");
            Ok(ExitCode::FAILURE)
        }
        Err(e) => {
            eprintln!("Generation failed: {}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn list(history: &VideoHistory<JsonFileStore>) {
    if history.is_empty() {
        println!("No videos yet.");
        return;
    }

    for record in history.list() {
        let created = record
            .created_at()
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| record.timestamp.to_string());
        println!(
            "{}  {}  {} {}  {}",
            record.id, created, record.aspect_ratio, record.resolution, record.prompt
        );
        println!("    {}", record.url);
    }
}

async fn delete(mut history: VideoHistory<JsonFileStore>, id: &str) -> anyhow::Result<ExitCode> {
    match history.delete(&VideoId::from(id)).await? {
        Some(record) => {
            let media = MediaStore::new(GeneratorConfig::from_env().media_dir);
            match media.remove(&record.url).await {
                Ok(true) => println!("Deleted {} ({}) and its video file", record.id, record.prompt),
                Ok(false) => println!("Deleted {} ({})", record.id, record.prompt),
                Err(e) => {
                    warn!(video_id = %record.id, error = %e, "Failed to remove video file");
                    println!("Deleted {} ({}), video file left in place", record.id, record.prompt);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("No video with id {}", id);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn api_key_from_env() -> anyhow::Result<ApiKey> {
    let key = std::env::var("GEMINI_API_KEY")
        .or_else(|_| std::env::var("API_KEY"))
        .unwrap_or_default();

    if key.trim().is_empty() {
        bail!("No API key configured. Set GEMINI_API_KEY or API_KEY.");
    }

    Ok(ApiKey::new(key.trim()))
}

async fn generation_config_from_env(prompt: &str) -> anyhow::Result<GenerationConfig> {
    let mut config = GenerationConfig::new(prompt);

    if let Ok(value) = std::env::var("VMOTION_ASPECT_RATIO") {
        config = config.with_aspect_ratio(value.parse::<AspectRatio>()?);
    }
    if let Ok(value) = std::env::var("VMOTION_RESOLUTION") {
        config = config.with_resolution(value.parse::<Resolution>()?);
    }
    if let Ok(path) = std::env::var("VMOTION_REFERENCE_IMAGE") {
        let bytes = tokio::fs::read(&path)
            .await
            .with_context(|| format!("Failed to read reference image {}", path))?;
        config = config.with_reference_image(ReferenceImage::from_bytes(
            &bytes,
            image_mime_type(Path::new(&path)),
        ));
    }

    Ok(config)
}

fn image_mime_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/png",
    }
}
