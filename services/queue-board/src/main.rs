//! Queue board entry point.

use queue_board::backend::RedisConnection;
use queue_board::{api, BoardConfig, QueueRegistry};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    info!("Starting queue board");

    let config = BoardConfig::load()?;

    let connection = Arc::new(RedisConnection::connect(&config.redis.url).await?);
    info!(url = %config.redis.url, "Connected to Redis");

    let registry = QueueRegistry::from_config(&config.queues, &connection)?;
    info!(queues = ?registry.names().collect::<Vec<_>>(), "Registered queues");

    let addr: SocketAddr = format!("{}:{}", config.service.host, config.service.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(%addr, "Queue board listening");

    axum::serve(listener, api::router(Arc::new(registry))).await?;

    Ok(())
}
