//! Feed Session Integration Tests
//!
//! Runs the OKX client against a local WebSocket server and checks what
//! lands on the slot board.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use lunar_ticker::domain::lunar::{self, NEW_MOON_EPOCH_MS};
use lunar_ticker::infrastructure::okx::KeepaliveConfig;
use lunar_ticker::{
    ConnectionStatus, FeedDisplayAdapter, FeedState, FixedClock, OkxClient, OkxClientConfig,
    SlotBoard, SlotBoardHandle, Subscription, slots,
};

type Client = OkxClient<FeedDisplayAdapter<SlotBoardHandle, FixedClock>>;
type ServerSocket = tokio_tungstenite::WebSocketStream<tokio::net::TcpStream>;

/// 14.5 days after the reference new moon.
fn test_moment() -> DateTime<Utc> {
    Utc.timestamp_millis_opt(NEW_MOON_EPOCH_MS + 1_252_800_000).unwrap()
}

fn setup_client(
    url: String,
    keepalive: KeepaliveConfig,
) -> (Client, SlotBoardHandle, CancellationToken) {
    let subscription = Subscription::default_watchlist();
    let board = SlotBoardHandle::new(SlotBoard::with_layout(slots::layout(&subscription)));

    let clock = FixedClock(test_moment());
    let mut adapter = FeedDisplayAdapter::new(board.clone(), clock, subscription);
    adapter.render_initial();

    let cancel = CancellationToken::new();
    let config = OkxClientConfig { url, keepalive };
    let client = OkxClient::new(config, adapter, Arc::new(FeedState::new()), cancel.clone());
    (client, board, cancel)
}

/// Start a one-connection server that runs `script` on the accepted socket.
async fn start_server<F, Fut>(script: F) -> (String, tokio::task::JoinHandle<Vec<String>>)
where
    F: FnOnce(ServerSocket) -> Fut + Send + 'static,
    Fut: std::future::Future<Output = Vec<String>> + Send,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        script(ws).await
    });

    (format!("ws://{addr}"), handle)
}

async fn next_text(ws: &mut ServerSocket) -> String {
    loop {
        match ws.next().await.unwrap().unwrap() {
            Message::Text(text) => return text.as_str().to_string(),
            Message::Ping(_) | Message::Pong(_) => {}
            other => panic!("unexpected frame: {other:?}"),
        }
    }
}

fn ticker(inst_id: &str, last: &str) -> Message {
    Message::Text(
        format!(
            r#"{{"arg":{{"channel":"tickers","instId":"{inst_id}"}},"data":[{{"instType":"SWAP","instId":"{inst_id}","last":"{last}","ts":"1700000000000"}}]}}"#
        )
        .into(),
    )
}

#[tokio::test]
async fn subscribes_renders_prices_and_closes() {
    let (url, server) = start_server(|mut ws| async move {
        let subscribe = next_text(&mut ws).await;

        ws.send(Message::Text(
            r#"{"event":"subscribe","arg":{"channel":"tickers","instId":"BTC-USDT-SWAP"},"connId":"a4d3ae55"}"#.into(),
        ))
        .await
        .unwrap();
        ws.send(ticker("BTC-USDT-SWAP", "97250.5")).await.unwrap();
        ws.send(ticker("ETH-USDT-SWAP", "3500.1")).await.unwrap();
        ws.send(Message::Text("not json".into())).await.unwrap();
        ws.send(Message::Text(
            r#"{"arg":{"channel":"tickers","instId":"XRP-USDT-SWAP"},"data":[]}"#.into(),
        ))
        .await
        .unwrap();
        ws.send(ticker("XRP-USDT-SWAP", "0.523456")).await.unwrap();
        ws.send(ticker("CELO-USDT-SWAP", "")).await.unwrap();
        ws.close(None).await.unwrap();

        vec![subscribe]
    })
    .await;

    let (mut client, board, _cancel) = setup_client(url, KeepaliveConfig::disabled());
    timeout(Duration::from_secs(5), client.run())
        .await
        .expect("client should finish")
        .unwrap();

    let frames = server.await.unwrap();
    let subscribe: serde_json::Value = serde_json::from_str(&frames[0]).unwrap();
    assert_eq!(subscribe["op"], "subscribe");
    let args = subscribe["args"].as_array().unwrap();
    assert_eq!(args.len(), 3);
    assert_eq!(args[0]["channel"], "tickers");
    assert_eq!(args[0]["instId"], "BTC-USDT-SWAP");

    let expected_bias = lunar::compute(test_moment()).ticker_bias();
    let snapshot = board.snapshot();
    assert_eq!(snapshot.text("BTC-USDT-SWAP-price"), "97,250.5");
    assert_eq!(snapshot.text("XRP-USDT-SWAP-price"), "0.523");
    assert_eq!(snapshot.text("BTC-bias"), expected_bias.label());
    let bias_style = &snapshot.get("BTC-bias").unwrap().style;
    assert_eq!(
        bias_style.get("background-color").map(String::as_str),
        Some(expected_bias.color())
    );
    // Empty price: bias refreshed, price left blank
    assert_eq!(snapshot.text("CELO-USDT-SWAP-price"), "");
    assert_eq!(snapshot.text("CELO-bias"), expected_bias.label());
    assert!(snapshot.get("ETH-USDT-SWAP-price").is_none());
    assert_eq!(snapshot.text(slots::PHASE_NAME), "Waxing Gibbous");

    assert_eq!(snapshot.text(slots::STATUS_TEXT), "Disconnected");
    assert_eq!(
        snapshot.get(slots::STATUS_DOT).unwrap().class.as_deref(),
        Some("dot offline")
    );

    assert_eq!(client.handlers().status(), ConnectionStatus::Closed);
    let state = client.state();
    assert_eq!(state.status(), ConnectionStatus::Closed);
    assert_eq!(state.messages_received(), 4);
    assert_eq!(state.messages_ignored(), 2);
}

#[tokio::test]
async fn connection_refused_marks_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (mut client, board, _cancel) =
        setup_client(format!("ws://{addr}"), KeepaliveConfig::disabled());
    let result = timeout(Duration::from_secs(5), client.run())
        .await
        .expect("client should finish");
    assert!(result.is_err());

    let snapshot = board.snapshot();
    assert_eq!(snapshot.text(slots::STATUS_TEXT), "Connection Error");
    assert_eq!(client.handlers().status(), ConnectionStatus::Errored);
    assert!(client.state().error_message().is_some());
}

#[tokio::test]
async fn sends_text_ping_keepalive() {
    let (url, server) = start_server(|mut ws| async move {
        let _subscribe = next_text(&mut ws).await;
        let ping = next_text(&mut ws).await;
        ws.send(Message::Text("pong".into())).await.unwrap();
        ws.close(None).await.unwrap();
        vec![ping]
    })
    .await;

    let keepalive = KeepaliveConfig {
        interval: Duration::from_millis(50),
    };
    let (mut client, _board, _cancel) = setup_client(url, keepalive);
    timeout(Duration::from_secs(5), client.run())
        .await
        .expect("client should finish")
        .unwrap();

    assert_eq!(server.await.unwrap(), vec!["ping".to_string()]);
    assert_eq!(client.state().messages_ignored(), 0);
}

#[tokio::test]
async fn cancellation_stops_without_closing_session() {
    let (url, _server) = start_server(|mut ws| async move {
        let subscribe = next_text(&mut ws).await;
        // Hold the connection open until the client goes away
        while ws.next().await.is_some() {}
        vec![subscribe]
    })
    .await;

    let (mut client, board, cancel) = setup_client(url, KeepaliveConfig::disabled());
    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        cancel.cancel();
    });

    timeout(Duration::from_secs(5), client.run())
        .await
        .expect("client should stop on cancel")
        .unwrap();
    canceller.await.unwrap();

    assert_eq!(client.handlers().status(), ConnectionStatus::Online);
    assert_eq!(board.snapshot().text(slots::STATUS_TEXT), "OKX Live");
}
