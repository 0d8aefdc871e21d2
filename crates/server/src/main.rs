//! Helix server binary.

use anyhow::{Context, Result};
use clap::Parser;
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use helix_core::config::AppConfig;
use helix_server::{AppState, create_router, seed};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Helix - genomics research portal API server
#[derive(Parser, Debug)]
#[command(name = "helixd")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "HELIX_CONFIG", default_value = "config/server.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Helix v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration (file is optional, env vars can provide/override everything)
    let config_path = std::path::Path::new(&args.config);
    let mut figment = Figment::new();
    let has_config_file = config_path.exists();

    if has_config_file {
        tracing::info!(config_path = %args.config, "Loading configuration from file");
        figment = figment.merge(Toml::file(&args.config));
    } else {
        tracing::debug!("No config file found at {}", args.config);
    }

    let has_env_config =
        std::env::vars().any(|(key, _)| key.starts_with("HELIX_") && key != "HELIX_CONFIG");

    if !has_config_file && !has_env_config {
        anyhow::bail!(
            "No configuration provided.\n\n\
             Provide configuration via one of:\n  \
             1. Config file: helixd --config /path/to/config.toml\n  \
             2. Environment variables: HELIX_SERVER__BIND=0.0.0.0:8080 \
             HELIX_AUTH__SECRET=YOUR_SECRET_HERE helixd\n\n\
             See config/server.example.toml for example configuration.\n\
             Set HELIX_CONFIG env var to specify a default config file path."
        );
    }

    if !has_config_file {
        tracing::info!("Using environment variables for configuration");
    }

    let config: AppConfig = figment
        .merge(Env::prefixed("HELIX_").split("__"))
        .extract()
        .context("failed to load configuration")?;

    let metadata = helix_metadata::from_config(&config.metadata)
        .await
        .context("failed to initialize metadata store")?;
    tracing::info!("Metadata store initialized");

    if config.server.seed_demo_data {
        let count = metadata
            .count_institutions()
            .await
            .context("failed to query institutions")?;
        if count == 0 {
            seed::seed_demo_data(metadata.as_ref())
                .await
                .context("failed to seed demonstration data")?;
        } else {
            tracing::debug!("Database already populated, skipping seed");
        }
    }

    let state = AppState::new(config.clone(), metadata);
    let app = create_router(state);

    let addr: SocketAddr = config.server.bind.parse().context("invalid bind address")?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
