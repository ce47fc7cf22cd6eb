use clap::Parser;
use tracing::{error, info};

use resource_server::config::ServerConfig;
use resource_server::http::{self, AppState};
use resource_server::system::System;
use resource_server::wire;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::parse();
    resource_core::setup_tracing(&config.log_level);

    let system = System::new(&config)?;
    let app = http::router(AppState::new(system.service.clone()));

    let http_listener =
        tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    let stream_listener =
        tokio::net::TcpListener::bind((config.host.as_str(), config.stream_port)).await?;
    info!(host = %config.host, port = config.port, "serving product API");
    info!(port = config.stream_port, "serving interaction channel");

    let interactions = system.interactions.clone();
    tokio::spawn(async move {
        if let Err(err) = wire::serve(stream_listener, interactions).await {
            error!(error = %err, "interaction listener failed");
        }
    });

    axum::serve(http_listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    system.shutdown().await;
    Ok(())
}
