//! Chess Clock - a two-player countdown clock served over HTTP
//!
//! This is the main entry point for the chess-clock application.

use std::sync::Arc;
use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use chess_clock::{
    api::create_router,
    config::Config,
    state::AppState,
    tasks::clock_ticker_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("chess_clock={},tower_http=info", config.log_level()))
        .init();

    info!("Starting chess-clock server v{}", env!("CARGO_PKG_VERSION"));

    let state = Arc::new(AppState::from_config(&config).context("invalid clock presets")?);
    let clock = state.snapshot()?;
    info!(
        "Configuration: host={}, port={}, left={} +{}s, right={} +{}s, first={}, tick={}ms",
        config.host,
        config.port,
        clock.left.display,
        clock.left.increment_seconds,
        clock.right.display,
        clock.right.increment_seconds,
        config.first,
        state.tick_interval.as_millis()
    );

    // Start the clock ticker background task
    let ticker_state = Arc::clone(&state);
    tokio::spawn(async move {
        clock_ticker_task(ticker_state).await;
    });

    let app = create_router(state);

    let addr = config.address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /toggle    - Start or stop the clock");
    info!("  POST /switch    - Pass the move to the other side");
    info!("  POST /reset     - Stop and restore preset times");
    info!("  GET  /settings  - Current settings form");
    info!("  PUT  /settings  - Commit a settings form");
    info!("  GET  /status    - Clock display values and status");
    info!("  GET  /health    - Health check");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}
