//! ccrawl-server - ConcertCrawler HTTP service
//!
//! Searches the Spotify catalog for an artist and returns their live albums
//! ordered by performance date.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use ccrawl_common::config::{self, TomlConfig};
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ccrawl_server::service::LiveAlbumService;
use ccrawl_server::spotify::SpotifyClient;
use ccrawl_server::{build_router, AppState};

/// Command-line arguments for ccrawl-server
#[derive(Parser, Debug)]
#[command(name = "ccrawl-server")]
#[command(about = "Chronological live album listings from the Spotify catalog")]
#[command(version)]
struct Args {
    /// TOML config file (default: CCRAWL_CONFIG, then the platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind, overrides the config file
    #[arg(long, env = "CCRAWL_HOST")]
    host: Option<String>,

    /// Port to listen on, overrides the config file
    #[arg(short, long, env = "CCRAWL_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = config::resolve_config_path(args.config.as_deref());
    let toml_config = config::load_or_default(config_path.as_deref())
        .context("Failed to load configuration")?;

    init_tracing(&toml_config);

    info!("Starting ccrawl-server v{}", env!("CARGO_PKG_VERSION"));
    match &config_path {
        Some(path) if path.exists() => info!("Configuration: {}", path.display()),
        Some(path) => warn!("Configuration: {} (missing, using defaults)", path.display()),
        None => warn!("Configuration: built-in defaults"),
    }

    let credentials = match config::resolve_credentials(&toml_config.spotify) {
        Ok(credentials) => Some(credentials),
        Err(e) => {
            warn!("{}", e);
            warn!("Searches will report auth-error until credentials are configured");
            None
        }
    };

    let catalog = SpotifyClient::new(&toml_config.spotify, credentials)
        .context("Failed to create Spotify client")?;
    let service = Arc::new(LiveAlbumService::new(
        Arc::new(catalog),
        toml_config.spotify.page_size,
        &toml_config.cache,
    ));

    if !service.authorize().await {
        warn!("Initial catalog authorization failed, will retry on first search");
    }

    let app = build_router(AppState::new(service));

    let host = args.host.unwrap_or(toml_config.server.host);
    let port = args.port.unwrap_or(toml_config.server.port);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", host, port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// `RUST_LOG` wins; otherwise the configured level
fn init_tracing(toml_config: &TomlConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "{level},ccrawl_server={level},tower_http=info",
            level = toml_config.logging.level
        )
        .into()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
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
                error!("Failed to install signal handler: {}", e);
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
