//! webim-gateway server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints, the event
//! dispatcher, and the optional file tail producer.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use webim_gateway::api;
use webim_gateway::app_state::AppState;
use webim_gateway::config::{ChatConfig, LogFormat};
use webim_gateway::domain::{Broadcaster, EventBus, Registry};
use webim_gateway::tail::FileTail;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = ChatConfig::from_env().context("invalid LISTEN_ADDR")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    tracing::info!(addr = %config.listen_addr, "starting webim-gateway");

    // Build domain layer
    let registry = Arc::new(Registry::new());
    let (event_bus, event_stream) = EventBus::new(config.event_bus_capacity);
    let dispatcher = tokio::spawn(event_stream.run(Broadcaster::new(Arc::clone(&registry))));

    let tail = config
        .tail
        .clone()
        .map(|tail_config| FileTail::new(tail_config, event_bus.clone()).spawn());

    // Build application state
    let app_state = AppState {
        registry,
        event_bus,
        outbound_queue_capacity: config.outbound_queue_capacity,
        send_timeout: config.send_timeout,
    };

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, api::build_app(app_state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(tail) = tail {
        tail.abort();
    }
    dispatcher.abort();
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
