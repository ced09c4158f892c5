use std::net::SocketAddr;

use anyhow::Context;
use tracing::{Level, info};

use tutordesk_server::config::{AppConfig, RunEnvironment};
use tutordesk_server::state::AppState;
use tutordesk_server::{build_media_store, build_router, database, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load().context("Failed to load configuration")?;
    if config.environment == RunEnvironment::Production && config.auth.jwt_secret.len() < 32 {
        anyhow::bail!("auth.jwt_secret must be at least 32 bytes in production");
    }

    let db = database::init_db(&config.database.url)
        .await
        .context("Failed to connect to database")?;
    seed::ensure_indexes(&db)
        .await
        .context("Failed to create database indexes")?;

    let media = build_media_store(&config)
        .await
        .context("Failed to initialise media storage")?;
    info!(backend = ?config.storage.backend, "Media storage ready");

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server.host / server.port")?;

    let app = build_router(AppState { db, config, media });

    info!("Server running at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
