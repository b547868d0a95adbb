//! # Photoshare Server
//!
//! Serves a password-protected photo gallery and a downloads folder from
//! local directories. Configuration comes from the environment (optionally a
//! `.env` file) and an optional `photoshare.toml`; generate the secrets with
//! `photoshare-secrets <admin_password>`.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use photoshare_config::{ConfigLoad, ConfigLoader, ConfigLoaderOptions, PasswordCrypto};
use photoshare_server::{AppState, create_app};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "photoshare-server")]
#[command(about = "Password-gated photo and download sharing")]
struct Cli {
    /// Server host (overrides config)
    #[arg(long, env = "SERVER_HOST")]
    host: Option<String>,

    /// Server port (overrides config)
    #[arg(short, long, env = "SERVER_PORT")]
    port: Option<u16>,

    /// Path to a TOML configuration file
    #[arg(long, env = "PHOTOSHARE_CONFIG")]
    config: Option<PathBuf>,

    /// Path to a .env file (defaults to ./.env when present)
    #[arg(long)]
    env_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let ConfigLoad {
        mut config,
        warnings,
    } = ConfigLoader::with_options(ConfigLoaderOptions {
        config_path: cli.config.clone(),
        env_file: cli.env_file.clone(),
    })
    .load()
    .context("failed to load configuration")?;

    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(host) = cli.host.clone() {
        config.server.host = host;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    if let Some(path) = &config.metadata.config_path {
        info!(path = %path.display(), "configuration file loaded");
    }

    for warning in warnings.iter() {
        match &warning.hint {
            Some(hint) => {
                warn!(message = %warning.message, hint = %hint, "configuration warning")
            }
            None => {
                warn!(message = %warning.message, "configuration warning")
            }
        }
    }

    info!(
        media_root = %config.media_root().display(),
        downloads_root = %config.downloads_root().display(),
        static_root = %config.static_root().display(),
        dev_mode = config.dev_mode,
        "serving directories"
    );

    let listener = tokio::net::TcpListener::bind((
        config.server.host.as_str(),
        config.server.port,
    ))
    .await
    .with_context(|| {
        format!(
            "failed to bind {}:{}",
            config.server.host, config.server.port
        )
    })?;
    let addr = listener.local_addr().context("listener has no address")?;

    let crypto = PasswordCrypto::new().context("failed to initialise password hashing")?;
    let router = create_app(AppState::new(config, crypto));

    info!("Starting Photoshare on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Photoshare stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
