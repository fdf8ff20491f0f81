use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use notifications_api::config::AppConfig;
use notifications_api::database::Database;
use notifications_api::routes::app;
use notifications_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DB_* and JWT_SECRET.
    let _ = dotenvy::dotenv();

    let config = AppConfig::from_env().context("configuration")?;
    init_tracing(&config);

    tracing::info!(
        environment = ?config.environment,
        project = %config.project_name,
        "api starting"
    );

    let db = Database::connect(&config)
        .await
        .context("database connection failed")?;

    let port = config.port;
    let state = AppState {
        db,
        config: Arc::new(config),
    };

    let bind_addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    tracing::info!(addr = %bind_addr, "api started");

    axum::serve(listener, app(state.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("api shutting down");
    state.db.close().await;
    tracing::info!("api shutdown complete");

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
