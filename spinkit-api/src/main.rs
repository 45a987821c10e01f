//! spinkit-api - listing service for SpinKit discovery pages
//!
//! Loads mock listings into an in-memory catalog and serves the paginated
//! listing routes, plus the Notion export routes when a key is configured.

use anyhow::{Context, Result};
use clap::Parser;
use spinkit_api::catalog::{self, MockData};
use spinkit_api::config::{ApiConfig, Args};
use spinkit_api::notion::NotionClient;
use spinkit_api::{build_router, AppState};
use spinkit_common::config::TomlConfig;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spinkit_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Build identification first, before any I/O
    info!(
        "Starting SpinKit API (spinkit-api) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let config = ApiConfig::resolve(args, TomlConfig::load_or_default())
        .context("Invalid configuration")?;

    let data = match &config.data_dir {
        Some(dir) => {
            info!("Loading mock data from {}", dir.display());
            MockData::from_dir(dir)?
        }
        None => MockData::embedded()?,
    };

    let pool = catalog::connect_in_memory()
        .await
        .context("Failed to open catalog")?;
    catalog::seed_catalog(&pool, &data)
        .await
        .context("Failed to seed catalog")?;

    let notion = match config.notion.clone() {
        Some(notion_config) => match NotionClient::new(notion_config) {
            Ok(client) => {
                info!("✓ Notion export enabled");
                Some(client)
            }
            Err(e) => {
                error!("Failed to build Notion client: {}", e);
                None
            }
        },
        None => {
            warn!("NOTION_API_KEY not set; Notion export routes will return errors");
            None
        }
    };

    let app = build_router(AppState::new(pool, notion));

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .context("Failed to bind to address")?;
    info!("spinkit-api listening on http://{}", config.listen_addr);
    info!("Health check: http://{}/health", config.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
