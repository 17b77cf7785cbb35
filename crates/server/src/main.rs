//! File-store registry server binary.

use anyhow::{Context, Result};
use clap::Parser;
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use filestore_core::config::AppConfig;
use filestore_server::{AppState, create_router};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// File-store registry: tenant-scoped bindings of buckets to file classes
#[derive(Parser, Debug)]
#[command(name = "filestored")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(
        short,
        long,
        env = "FILESTORE_CONFIG",
        default_value = "config/server.toml"
    )]
    config: String,
}

/// Load configuration from the optional file merged with `FILESTORE_` env vars.
fn load_config(path: &str) -> Result<AppConfig> {
    let mut figment = Figment::new();

    if std::path::Path::new(path).exists() {
        tracing::info!(config_path = %path, "Loading configuration from file");
        figment = figment.merge(Toml::file(path));
    } else {
        tracing::info!(
            config_path = %path,
            "No config file found, using defaults and environment variables"
        );
    }

    let config: AppConfig = figment
        .merge(Env::prefixed("FILESTORE_").split("__"))
        .extract()
        .context("failed to load configuration")?;

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;
    Ok(config)
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

    tracing::info!("filestored v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&args.config)?;
    tracing::info!(
        project = %config.server.project,
        environment = %config.server.deployment_environment,
        "Configuration loaded"
    );

    filestore_server::metrics::register_metrics();
    tracing::info!("Prometheus metrics registered");

    let state = AppState::from_config(config.clone())
        .await
        .context("failed to initialize backends")?;

    // Fail before accepting requests when persistence is unreachable.
    state
        .registry
        .health_check()
        .await
        .context("metadata store health check failed")?;
    tracing::info!("Metadata store connectivity verified");

    let app = create_router(state);

    let addr: SocketAddr = config.server.bind.parse().context("invalid bind address")?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
