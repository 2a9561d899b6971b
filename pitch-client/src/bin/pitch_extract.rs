//! pitch-extract - send one audio file through the pitch relay
//!
//! Prints the extraction result as JSON on stdout. Logs go to stderr.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use pitch_client::config::{TOKEN_ENV, URL_ENV};
use pitch_client::{AudioUpload, ClientConfig, PitchExtractor};

/// Command-line arguments for pitch-extract
#[derive(Parser, Debug)]
#[command(name = "pitch-extract")]
#[command(about = "Extract pitch from an audio file via the pitch relay")]
#[command(version)]
struct Args {
    /// Audio file to upload
    file: PathBuf,

    /// Relay base URL
    #[arg(long, env = URL_ENV)]
    url: Option<String>,

    /// Bearer token for the relay
    #[arg(long, env = TOKEN_ENV, hide_env_values = true)]
    token: Option<String>,

    /// Pretty-print the JSON result
    #[arg(long)]
    pretty: bool,
}

impl Args {
    /// Relay settings, failing early when either one is absent
    fn client_config(&self) -> Result<ClientConfig> {
        let url = self
            .url
            .clone()
            .with_context(|| format!("Relay URL missing: pass --url or set {}", URL_ENV))?;
        let token = self
            .token
            .clone()
            .with_context(|| format!("Relay token missing: pass --token or set {}", TOKEN_ENV))?;
        Ok(ClientConfig::new(url, token))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pitch_client=info,pitch_extract=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let extractor =
        PitchExtractor::with_config(args.client_config()?).context("Failed to create HTTP client")?;

    let upload = AudioUpload::from_path(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    info!("Uploading {} ({} bytes)", upload.filename, upload.data.len());

    let Some(result) = extractor.extract_pitch(upload).await else {
        let message = extractor.error().unwrap_or_default();
        anyhow::bail!("Pitch extraction failed: {}", message);
    };

    info!(
        "{}: {:.2}s at {} Hz, {} contour samples, {} notes",
        result.metadata.filename,
        result.metadata.duration_seconds,
        result.metadata.sample_rate,
        result.pitch_contour.times.len(),
        result.note_events.len()
    );

    let json = if args.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{}", json);

    Ok(())
}
