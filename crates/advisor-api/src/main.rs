//! Advisor CLI and HTTP API entry point.
//!
//! Binary name: `advisor`
//!
//! Parses CLI arguments, loads configuration, initializes tracing, then
//! either starts the HTTP server or runs the embeddings check.

mod cli;
mod http;
mod state;

use clap::Parser;

use advisor_infra::config::{load_app_config, resolve_api_key, resolve_data_dir};
use advisor_observe::tracing_setup::{TracingOptions, init_tracing, shutdown_tracing};

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(&TracingOptions {
        verbosity: cli.verbose,
        json: cli.log_json,
        enable_otel: cli.otel,
    })
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let data_dir = resolve_data_dir();
    let config = load_app_config(&data_dir).await;

    let result = match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            serve(config, &data_dir, &host, port).await
        }
        Commands::EmbedCheck { text } => match resolve_api_key() {
            Some(api_key) => cli::embed::embed_check(&config.embedding, api_key, &text).await,
            None => Err(anyhow::anyhow!(
                "no API key: set ADVISOR_API_KEY, OPENAI_API_KEY or DASHSCOPE_API_KEY"
            )),
        },
    };

    shutdown_tracing();
    result
}

async fn serve(
    config: advisor_types::config::AppConfig,
    data_dir: &std::path::Path,
    host: &str,
    port: u16,
) -> anyhow::Result<()> {
    let state = AppState::init(config, data_dir).await?;

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, data_dir = %data_dir.display(), "Advisor API listening");

    let router = http::router::build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
