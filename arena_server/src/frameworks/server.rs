// Framework bootstrap for the arena server runtime.

use crate::frameworks::config;
use crate::interface_adapters::codec::JsonCodec;
use crate::interface_adapters::net::{stats_handler, ws_handler};
use crate::interface_adapters::state::AppState;
use crate::use_cases::{ServerSettings, spawn_server};

use axum::{Router, routing::get};
use std::net::SocketAddr;
use std::{io::Result, sync::Arc};

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

/// Serves on `listener` with settings read from the environment.
pub async fn run(listener: tokio::net::TcpListener) -> Result<()> {
    let settings = config::server_settings().map_err(|e| {
        tracing::error!(error = %e, "invalid configuration");
        std::io::Error::other(e)
    })?;
    run_with_settings(listener, settings).await
}

pub async fn run_with_settings(
    listener: tokio::net::TcpListener,
    settings: ServerSettings,
) -> Result<()> {
    let address = listener.local_addr()?;
    tracing::debug!(
        tick_ms = settings.tick_interval.as_millis(),
        arena_width = settings.tuning.arena.width,
        arena_height = settings.tuning.arena.height,
        "server settings"
    );

    // The server loop runs on its own task and owns all game state.
    let server = spawn_server(settings, JsonCodec);
    let state = Arc::new(AppState { server });

    let app = Router::new()
        .route("/ws", get(ws_handler))
        .route("/stats", get(stats_handler))
        .with_state(state);

    tracing::info!(%address, "listening");

    // Serve app and report errors rather than panicking
    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let address = SocketAddr::new(config::bind_address(), config::http_port());

    // Bind TCP listener with error handling
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener).await
}
