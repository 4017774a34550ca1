//! Lunar Ticker Binary
//!
//! Starts the feed client and the dashboard server.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin lunar-ticker
//! ```
//!
//! # Environment Variables
//!
//! - `OKX_WS_URL`: Feed endpoint (default: <wss://ws.okx.com:8443/ws/v5/public>)
//! - `LUNAR_TICKER_CHANNEL`: Channel to subscribe (default: tickers)
//! - `LUNAR_TICKER_INSTRUMENTS`: Comma-separated instrument ids
//!   (default: BTC-USDT-SWAP,XRP-USDT-SWAP,CELO-USDT-SWAP)
//! - `LUNAR_TICKER_HTTP_PORT`: Dashboard port (default: 8080)
//! - `LUNAR_TICKER_KEEPALIVE_SECS`: Ping interval, 0 disables (default: 25)
//! - `LUNAR_TICKER_PAGE_REFRESH_SECS`: Page auto-refresh (default: 2)
//! - `OTEL_ENABLED`: Export traces over OTLP (default: false)
//! - `RUST_LOG`: Log level (default: info)

use std::sync::Arc;
use std::time::Duration;

use lunar_ticker::infrastructure::telemetry;
use lunar_ticker::{
    DashboardState, FeedDisplayAdapter, FeedState, OkxClient, SlotBoard, SlotBoardHandle,
    SystemClock, TickerConfig, WebServer, init_metrics, slots,
};
use tokio::signal;
use tokio_util::sync::CancellationToken;

/// Graceful shutdown timeout.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| "failed to install rustls crypto provider")?;

    load_dotenv();

    let telemetry_guard = telemetry::init();

    tracing::info!(
        otlp_export = telemetry_guard.is_exporting(),
        "Starting Lunar Ticker"
    );

    let _metrics_handle = init_metrics();

    let config = TickerConfig::from_env()?;
    log_config(&config);

    let shutdown_token = CancellationToken::new();
    let subscription = config.feed.subscription();

    // Page layout is fixed for the life of the process
    let board = SlotBoardHandle::new(SlotBoard::with_layout(slots::layout(&subscription)));

    let mut adapter = FeedDisplayAdapter::new(board.clone(), SystemClock, subscription.clone());
    let phase = adapter.render_initial();
    tracing::info!(
        phase = phase.name.as_str(),
        illumination = phase.illumination_percent,
        zodiac = phase.zodiac.as_str(),
        "Initial lunar dashboard rendered"
    );

    let feed_state = Arc::new(FeedState::new());

    let dashboard_state = Arc::new(DashboardState::new(
        env!("CARGO_PKG_VERSION").to_string(),
        board,
        Arc::clone(&feed_state),
        subscription.instruments,
        config.server.page_refresh_secs,
    ));
    let web_server = WebServer::new(
        config.server.http_port,
        dashboard_state,
        shutdown_token.clone(),
    );

    let mut client = OkxClient::new(
        config.feed.client_config(),
        adapter,
        feed_state,
        shutdown_token.clone(),
    );

    let feed_task = tokio::spawn(async move {
        if let Err(e) = client.run().await {
            tracing::error!(error = %e, "Feed client error");
        }
        tracing::info!(
            status = client.handlers().status().as_str(),
            "Feed client finished"
        );
    });

    let web_task = tokio::spawn(async move {
        if let Err(e) = web_server.run().await {
            tracing::error!(error = %e, "Dashboard server error");
        }
    });

    tracing::info!("Lunar Ticker ready");

    await_shutdown(shutdown_token).await;

    let drained = tokio::time::timeout(SHUTDOWN_TIMEOUT, async {
        if let Err(e) = feed_task.await {
            tracing::error!(error = %e, "Feed task panicked or was aborted");
        }
        if let Err(e) = web_task.await {
            tracing::error!(error = %e, "Dashboard server task panicked or was aborted");
        }
    })
    .await;
    if drained.is_err() {
        tracing::warn!(
            timeout_secs = SHUTDOWN_TIMEOUT.as_secs(),
            "Tasks did not stop before the shutdown timeout"
        );
    }

    tracing::info!("Lunar Ticker stopped");
    Ok(())
}

/// Load .env file from current directory or any ancestor directory.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Log the parsed configuration.
fn log_config(config: &TickerConfig) {
    let instruments: Vec<&str> = config
        .feed
        .instruments
        .iter()
        .map(lunar_ticker::Instrument::as_str)
        .collect();

    tracing::info!(
        url = %config.feed.url,
        channel = %config.feed.channel,
        instruments = ?instruments,
        http_port = config.server.http_port,
        keepalive_secs = config.feed.keepalive_interval.as_secs(),
        "Configuration loaded"
    );
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
#[allow(clippy::expect_used)]
async fn await_shutdown(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }

    shutdown_token.cancel();
}
