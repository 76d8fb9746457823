use alttext_cache::UploadCache;
use alttext_dispatch::Dispatcher;
use alttext_models::GeminiClient;
use alttext_server::{AppConfig, AppState, create_router, init_logging};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Alt text, caption and condensation proxy in front of Gemini.
#[derive(Debug, Parser)]
#[command(name = "alttext-proxy", version, about)]
struct Cli {
    /// Configuration file (replaces ./alttext.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides server.port)
    #[arg(short, long)]
    port: Option<u16>,

    /// Debug logging for the proxy's crates
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        let server = config.server().clone().with_port(port);
        config = config.with_server(server);
    }

    init_logging(config.logging(), cli.verbose)?;

    let backend = GeminiClient::from_env(config.gemini().clone())?;
    let cache = Arc::new(UploadCache::new(config.cache().clone()));
    let dispatcher = Arc::new(Dispatcher::new(
        Arc::new(backend),
        cache,
        *config.transport(),
    ));

    let app = create_router(
        AppState::new(dispatcher),
        *config.server().body_limit_bytes(),
    );

    let addr = config.server().bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("alttext-proxy listening on {addr}");
    info!("  Health:   http://{addr}/health");
    info!("  Generate: http://{addr}/generate-alt-text");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
