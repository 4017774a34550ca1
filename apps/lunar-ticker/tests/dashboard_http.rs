//! Dashboard HTTP Integration Tests
//!
//! Drives the feed adapter into a shared board and reads the result back
//! through the dashboard routes.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use lunar_ticker::domain::lunar::NEW_MOON_EPOCH_MS;
use lunar_ticker::infrastructure::web::router;
use lunar_ticker::{
    ConnectionStatus, DashboardState, FeedDisplayAdapter, FeedHandlers, FeedSender, FeedState,
    FixedClock, Instrument, SlotBoard, SlotBoardHandle, Subscription, TickerUpdate, WebServer,
    slots,
};

struct NoopSender;

impl FeedSender for NoopSender {
    fn subscribe(&mut self, _subscription: &Subscription) {}
}

fn dashboard() -> (SlotBoardHandle, Arc<FeedState>, Arc<DashboardState>) {
    let subscription = Subscription::default_watchlist();
    let board = SlotBoardHandle::new(SlotBoard::with_layout(slots::layout(&subscription)));
    let feed = Arc::new(FeedState::new());
    let clock = FixedClock(Utc.timestamp_millis_opt(NEW_MOON_EPOCH_MS).unwrap());

    let mut adapter = FeedDisplayAdapter::new(board.clone(), clock, subscription.clone());
    adapter.render_initial();
    adapter.on_open(&mut NoopSender);
    adapter.on_message(TickerUpdate {
        instrument: Instrument::new("BTC-USDT-SWAP"),
        last: Some(Decimal::new(9_725_050, 2)),
    });
    feed.set_status(ConnectionStatus::Online);

    let state = Arc::new(
        DashboardState::new(
            "test-0.0.1".to_string(),
            board.clone(),
            Arc::clone(&feed),
            subscription.instruments,
            0,
        )
        .with_clock(clock),
    );
    (board, feed, state)
}

async fn get(state: Arc<DashboardState>, uri: &str) -> (StatusCode, String) {
    let response = router(state)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn page_shows_adapter_writes() {
    let (_board, _feed, state) = dashboard();
    let (status, html) = get(state, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<h1 id=\"phase-name\">New Moon</h1>"));
    assert!(html.contains("<span id=\"BTC-USDT-SWAP-price\">97,250.5</span>"));
    assert!(html.contains("<span id=\"status-text\">OKX Live</span>"));
    assert!(html.contains("class=\"bias-badge new-moon\""));
    assert!(!html.contains("http-equiv"));
}

#[tokio::test]
async fn slots_reflect_later_writes() {
    let (mut board, _feed, state) = dashboard();
    lunar_ticker::DisplaySurface::write(
        &mut board,
        slots::STATUS_TEXT,
        lunar_ticker::SlotWrite::Text("Disconnected".into()),
    );

    let (status, body) = get(state, "/slots").await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["slots"]["status-text"]["text"], "Disconnected");
    assert_eq!(json["slots"]["illumination-val"]["text"], "0.0");
    assert_eq!(
        json["slots"]["illumination-progress"]["style"]["width"],
        "0.00%"
    );
}

#[tokio::test]
async fn health_follows_feed_state() {
    let (_board, feed, state) = dashboard();

    let (status, _) = get(Arc::clone(&state), "/health").await;
    assert_eq!(status, StatusCode::OK);

    feed.set_status(ConnectionStatus::Closed);
    let (status, body) = get(state, "/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["feed"]["state"], "closed");
}

#[tokio::test]
async fn metrics_unavailable_without_recorder() {
    let (_board, _feed, state) = dashboard();
    let (status, body) = get(state, "/metrics").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, "Metrics not initialized");
}

#[tokio::test]
async fn server_serves_until_cancelled() {
    let (_board, _feed, state) = dashboard();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let cancel = CancellationToken::new();
    let server = tokio::spawn(WebServer::new(port, state, cancel.clone()).run());

    let mut response = String::new();
    for _ in 0..50 {
        if let Ok(mut stream) = TcpStream::connect(("127.0.0.1", port)).await {
            stream
                .write_all(b"GET /healthz HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
                .await
                .unwrap();
            stream.read_to_string(&mut response).await.unwrap();
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(response.ends_with("OK"));

    cancel.cancel();
    tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server should stop")
        .unwrap()
        .unwrap();
}
