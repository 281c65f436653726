use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use userservice_lib::{
    config::{Settings, DEFAULT_CONFIG_FILE},
    create_router,
    storage::FlatFileStorage,
    AppState,
};

/// User sign-in and registration service
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// TOML config file; environment variables prefixed USERSERVICE_ override it
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Address to listen on, overriding the config
    #[arg(short, long)]
    bind: Option<SocketAddr>,
}

fn init_tracing(settings: &Settings) {
    // RUST_LOG wins over the configured level when set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_level.to_ascii_lowercase()));

    if settings.log_json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load_from(&args.config)
        .with_context(|| format!("loading settings from {}", args.config.display()))?;
    if let Some(bind) = args.bind {
        settings.bind_addr = bind;
    }

    init_tracing(&settings);
    if settings.uses_development_secret() {
        tracing::warn!("using the built-in development JWT secret; set USERSERVICE_JWT__SECRET");
    }

    let storage = FlatFileStorage::open(&settings.data_dir)
        .await
        .with_context(|| format!("opening store in {}", settings.data_dir.display()))?;
    if settings.seed_roles {
        let added = storage.seed_roles().await.context("seeding roles")?;
        if added > 0 {
            tracing::info!(added, "seeded roles");
        }
    }

    let addr = settings.bind_addr;
    let state = Arc::new(AppState::new(storage, settings));
    let app = create_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
