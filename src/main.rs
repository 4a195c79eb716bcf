//! Tileboard - leaderboard backend for the Matching Tiles game

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tileboard::{
    config::Args,
    db::{DocumentStore, MongoClient},
    server,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let log_level = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("tileboard={},info", log_level).into()),
        )
        .with(args.log_json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!args.log_json).then(tracing_subscriber::fmt::layer))
        .init();

    if let Err(e) = args.validate() {
        error!("{}", e);
        std::process::exit(1);
    }

    info!("======================================");
    info!("  Tileboard - Matching Tiles API");
    info!("======================================");
    info!("Listen: {}", args.listen_addr());
    info!(
        "DATABASE_URL: {}",
        if args.database_url.is_some() { "set" } else { "not set" }
    );
    info!(
        "DATABASE_NAME: {}",
        args.database_name.as_deref().unwrap_or("not set")
    );
    info!("======================================");

    let store = connect_store(&args).await;
    let state = Arc::new(server::AppState::new(args, store.clone()));

    server::run(state, shutdown_signal()).await?;

    if let Some(store) = store {
        store.shutdown().await;
    }
    info!("Tileboard stopped");

    Ok(())
}

/// Create the shared database handle, or `None` to run degraded.
///
/// An unreachable server is not fatal: the handle is kept and requests
/// report the failure until the server comes back.
async fn connect_store(args: &Args) -> Option<Arc<dyn DocumentStore>> {
    let Some((uri, db_name)) = args.database_config() else {
        if args.database_url.is_some() || args.database_name.is_some() {
            warn!("Both DATABASE_URL and DATABASE_NAME are required, continuing without database");
        } else {
            warn!("No database configured, continuing without database");
        }
        return None;
    };

    let client = match MongoClient::new(uri, db_name).await {
        Ok(client) => client,
        Err(e) => {
            warn!("MongoDB client creation failed (continuing without): {}", e);
            return None;
        }
    };

    match client.ping().await {
        Ok(()) => info!("MongoDB connected successfully"),
        Err(e) => warn!("MongoDB not reachable yet: {}", e),
    }

    Some(Arc::new(client))
}

/// Resolve on Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
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
