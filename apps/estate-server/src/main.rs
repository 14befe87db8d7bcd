//! Estate server: loads configuration, connects the database, applies
//! migrations and serves the estate routes until Ctrl-C.

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use estate::EstateModule;
use sea_orm::{ConnectOptions, Database};
use static_authn_plugin::StaticAuthNPlugin;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "estate-server", version, about = "Residential estate server")]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = AppConfig::load(cli.config.as_deref())?;

    init_tracing(cfg.logging.json);
    info!(bind_addr = %cfg.server.bind_addr, "Starting estate server");

    let mut opts = ConnectOptions::new(cfg.database.url.clone());
    opts.max_connections(cfg.database.max_conns)
        .sqlx_logging(false);
    let db = Database::connect(opts)
        .await
        .context("failed to connect to the database")?;

    let authn = Arc::new(StaticAuthNPlugin::from_config(&cfg.authn));
    let module = EstateModule::init(db, authn, &cfg.estate).await?;

    let listener = tokio::net::TcpListener::bind(&cfg.server.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", cfg.server.bind_addr))?;
    info!(addr = %cfg.server.bind_addr, "Listening");

    axum::serve(listener, module.router())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Estate server stopped");
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().with_target(true)).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    info!("Shutdown signal received");
}
