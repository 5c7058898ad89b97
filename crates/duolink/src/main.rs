//! The duolink server binary.

use duolink::{DuolinkError, DuolinkServer, ServerConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), DuolinkError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env();
    let server = DuolinkServer::builder()
        .bind(&config.bind_addr())
        .origin_policy(config.origin_policy())
        .build()
        .await?;

    tracing::info!(port = config.port, "server starting");
    server.run().await
}
