//! recap - audio transcription and AI-powered summaries over HTTP
//!
//! Entry point for the recap server binary.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use recap::config::Settings;
use recap::web::AppState;

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "recap", version, about = "Audio transcription and AI-powered summaries")]
struct Args {
    /// Path to the configuration file (defaults to the platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to bind (overrides configuration)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides configuration)
    #[arg(long, env = "PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        settings.server.host = host;
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }

    settings.ensure_dirs()?;

    // Providers are built once and shared read-only across requests. A
    // missing Gemini credential or whisper model aborts here, before the
    // server binds.
    let transcriber = recap::transcription::build_provider(&settings)?;
    let summarizer = recap::llm::build_provider(&settings)?;

    let state = AppState::new(
        Arc::new(settings.clone()),
        Arc::from(transcriber),
        Arc::from(summarizer),
    );
    let app = recap::web::build_router(state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
