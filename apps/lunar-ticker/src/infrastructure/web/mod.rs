//! Dashboard HTTP Server
//!
//! Serves the dashboard page built from the slot board, plus health and
//! Prometheus endpoints.
//!
//! # Endpoints
//!
//! - `GET /` - Dashboard page (auto-refreshing)
//! - `GET /slots` - JSON snapshot of every slot
//! - `GET /lunar` - Lunar phase computed at request time
//! - `GET /health` - JSON health status
//! - `GET /healthz` - Liveness probe (simple OK)
//! - `GET /metrics` - Prometheus metrics in text format

pub mod page;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{Clock, SystemClock};
use crate::domain::feed::{ConnectionStatus, Instrument};
use crate::domain::lunar;
use crate::infrastructure::display::SlotBoardHandle;
use crate::infrastructure::metrics::get_metrics_handle;
use crate::infrastructure::okx::FeedState;

// =============================================================================
// Health Response Types
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: HealthStatus,
    /// Service version.
    pub version: String,
    /// Server uptime in seconds.
    pub uptime_secs: u64,
    /// Current time.
    pub current_time: DateTime<Utc>,
    /// Feed connection details.
    pub feed: FeedInfo,
}

/// Overall health status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Feed online.
    Healthy,
    /// Feed still connecting.
    Degraded,
    /// Feed closed or failed; it will not come back.
    Unhealthy,
}

impl From<ConnectionStatus> for HealthStatus {
    fn from(status: ConnectionStatus) -> Self {
        match status {
            ConnectionStatus::Online => Self::Healthy,
            ConnectionStatus::Connecting => Self::Degraded,
            ConnectionStatus::Closed | ConnectionStatus::Errored => Self::Unhealthy,
        }
    }
}

/// Feed connection details.
#[derive(Debug, Clone, Serialize)]
pub struct FeedInfo {
    /// Connection state.
    pub state: ConnectionStatus,
    /// Whether the feed is online.
    pub connected: bool,
    /// When the feed opened.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connected_at: Option<DateTime<Utc>>,
    /// Ticker messages delivered to the dashboard.
    pub messages_received: u64,
    /// Frames dropped.
    pub messages_ignored: u64,
    /// Last error, if the feed failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&FeedState> for FeedInfo {
    fn from(state: &FeedState) -> Self {
        let status = state.status();
        Self {
            state: status,
            connected: status == ConnectionStatus::Online,
            connected_at: state.connected_at(),
            messages_received: state.messages_received(),
            messages_ignored: state.messages_ignored(),
            error: state.error_message(),
        }
    }
}

// =============================================================================
// Server State
// =============================================================================

/// Shared state for the dashboard server.
pub struct DashboardState {
    version: String,
    started_at: Instant,
    board: SlotBoardHandle,
    feed: Arc<FeedState>,
    instruments: Vec<Instrument>,
    refresh_secs: u64,
    clock: Box<dyn Clock + Send + Sync>,
}

impl DashboardState {
    /// Create server state reading from `board` and `feed`.
    #[must_use]
    pub fn new(
        version: String,
        board: SlotBoardHandle,
        feed: Arc<FeedState>,
        instruments: Vec<Instrument>,
        refresh_secs: u64,
    ) -> Self {
        Self {
            version,
            started_at: Instant::now(),
            board,
            feed,
            instruments,
            refresh_secs,
            clock: Box::new(SystemClock),
        }
    }

    /// Replace the clock used by `/lunar`.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }
}

// =============================================================================
// Web Server
// =============================================================================

/// Dashboard HTTP server.
pub struct WebServer {
    port: u16,
    state: Arc<DashboardState>,
    cancel: CancellationToken,
}

impl WebServer {
    /// Create a new server.
    #[must_use]
    pub const fn new(port: u16, state: Arc<DashboardState>, cancel: CancellationToken) -> Self {
        Self {
            port,
            state,
            cancel,
        }
    }

    /// Run the server until cancelled.
    ///
    /// # Errors
    ///
    /// Returns `WebServerError` if binding fails or the HTTP server
    /// encounters a fatal error while running.
    pub async fn run(self) -> Result<(), WebServerError> {
        let app = router(self.state);

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| WebServerError::BindFailed(self.port, e.to_string()))?;

        tracing::info!(port = self.port, "Dashboard server listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(self.cancel.cancelled_owned())
            .await
            .map_err(|e| WebServerError::ServerFailed(e.to_string()))?;

        tracing::info!("Dashboard server stopped");
        Ok(())
    }
}

/// Build the dashboard router.
pub fn router(state: Arc<DashboardState>) -> Router {
    Router::new()
        .route("/", get(page_handler))
        .route("/slots", get(slots_handler))
        .route("/lunar", get(lunar_handler))
        .route("/health", get(health_handler))
        .route("/healthz", get(liveness_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

// =============================================================================
// HTTP Handlers
// =============================================================================

async fn page_handler(State(state): State<Arc<DashboardState>>) -> Response {
    let snapshot = state.board.snapshot();
    match page::render_page(&snapshot, &state.instruments, state.refresh_secs) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Dashboard template failed to render");
            (StatusCode::INTERNAL_SERVER_ERROR, "Dashboard unavailable").into_response()
        }
    }
}

async fn slots_handler(State(state): State<Arc<DashboardState>>) -> impl IntoResponse {
    Json(state.board.snapshot())
}

async fn lunar_handler(State(state): State<Arc<DashboardState>>) -> impl IntoResponse {
    Json(lunar::compute(state.clock.now()))
}

async fn health_handler(State(state): State<Arc<DashboardState>>) -> impl IntoResponse {
    let response = build_health_response(&state);
    let status_code = match response.status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status_code, Json(response))
}

async fn liveness_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

async fn metrics_handler() -> impl IntoResponse {
    get_metrics_handle().map_or_else(
        || {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                [("content-type", "text/plain")],
                "Metrics not initialized".to_string(),
            )
        },
        |handle| {
            (
                StatusCode::OK,
                [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
                handle.render(),
            )
        },
    )
}

fn build_health_response(state: &DashboardState) -> HealthResponse {
    let feed = FeedInfo::from(state.feed.as_ref());
    HealthResponse {
        status: feed.state.into(),
        version: state.version.clone(),
        uptime_secs: state.started_at.elapsed().as_secs(),
        current_time: Utc::now(),
        feed,
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Dashboard server errors.
#[derive(Debug, thiserror::Error)]
pub enum WebServerError {
    /// Failed to bind to port.
    #[error("failed to bind to port {0}: {1}")]
    BindFailed(u16, String),

    /// Server error.
    #[error("server error: {0}")]
    ServerFailed(String),
}

// =============================================================================
// Tests
// =============================================================================
