use std::sync::Arc;
use std::time::Duration;

use flapboard::board::{Board, ManualClock, RollTiming};
use flapboard::event::{AppEvent, Event};
use flapboard::feed::{FeedClient, FeedItem, PollDecision, Poller, SkipReason};
use flapboard::FlapboardError;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Answers exactly one request with `status` and `body`, returning the raw request.
async fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/feed", listener.local_addr().unwrap());
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
            if request.windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
        String::from_utf8_lossy(&request).to_string()
    });

    (url, handle)
}

fn client(url: &str) -> FeedClient {
    let http = reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();
    FeedClient::with_client(url, http)
}

#[tokio::test]
async fn test_fetch_parses_items_and_bypasses_cache() {
    let (url, server) = serve_once(
        "200 OK",
        r#"{"items":[{"name":"ACME","price":1234.5,"change":2.3}]}"#,
    ).await;

    let items = client(&url).fetch().await.unwrap();
    assert_eq!(items, vec![FeedItem::new("ACME", 1234.5, 2.3)]);

    let request = server.await.unwrap().to_lowercase();
    assert!(request.starts_with("get /feed"));
    assert!(request.contains("cache-control: no-cache"));
    assert!(request.contains("pragma: no-cache"));
}

#[tokio::test]
async fn test_fetch_reports_http_status() {
    let (url, _server) = serve_once("503 Service Unavailable", "{}").await;

    let err = client(&url).fetch().await.unwrap_err();
    assert!(matches!(err, FlapboardError::HttpStatus(503)));
    assert_eq!(err.to_string(), "HTTP 503");
}

#[tokio::test]
async fn test_fetch_reports_malformed_json() {
    let (url, _server) = serve_once("200 OK", "{\"items\": [").await;

    let err = client(&url).fetch().await.unwrap_err();
    assert!(matches!(err, FlapboardError::MalformedJson(_)));
}

#[tokio::test]
async fn test_fetch_reports_missing_items() {
    let (url, _server) = serve_once("200 OK", r#"{"prices":[]}"#).await;

    let err = client(&url).fetch().await.unwrap_err();
    assert_eq!(err.to_string(), "JSON senza items[]");
}

#[tokio::test]
async fn test_fetch_reports_network_failure() {
    // Bind then drop to get a port nobody listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/feed", listener.local_addr().unwrap());
    drop(listener);

    let err = client(&url).fetch().await.unwrap_err();
    assert!(matches!(err, FlapboardError::Network(_)));
}

#[tokio::test]
async fn test_busy_board_skips_poll_entirely() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/feed", listener.local_addr().unwrap());
    let (sender, mut receiver) = mpsc::unbounded_channel();
    let mut poller = Poller::new(client(&url), sender);

    assert_eq!(poller.poll(true), PollDecision::Skipped(SkipReason::Busy));
    assert!(!poller.is_in_flight());

    let accepted = tokio::time::timeout(Duration::from_millis(200), listener.accept()).await;
    assert!(accepted.is_err(), "no request may be sent while busy");
    assert!(receiver.try_recv().is_err());
}

#[tokio::test]
async fn test_poll_round_trip_renders_board() {
    let (url, _server) = serve_once(
        "200 OK",
        r#"{"items":[{"name":"ACME","price":1234.5,"change":2.3},{"name":"INITECH","price":0,"change":0}]}"#,
    ).await;
    let (sender, mut receiver) = mpsc::unbounded_channel();
    let mut poller = Poller::new(client(&url), sender);
    let mut board = Board::new(RollTiming::default(), Arc::new(ManualClock::new()));

    assert_eq!(poller.poll(board.is_busy()), PollDecision::Started);
    assert_eq!(poller.poll(board.is_busy()), PollDecision::Skipped(SkipReason::InFlight));

    let event = tokio::time::timeout(Duration::from_secs(5), receiver.recv())
        .await
        .unwrap()
        .unwrap();
    let Event::App(AppEvent::FeedLoaded(outcome)) = event else {
        panic!("unexpected event: {:?}", event);
    };
    poller.finish();
    board.apply_poll_result(outcome);

    assert!(!poller.is_in_flight());
    assert_eq!(board.cards().len(), 2);
    assert_eq!(board.cards()[0].name, "ACME");
    assert_eq!(board.cards()[0].change.text, "+2.3%");
    assert_eq!(board.cards()[1].change.text, "±0.0%");
    assert!(board.error_banner().is_none());

    // Still animating, so the next tick is dropped.
    assert_eq!(poller.poll(board.is_busy()), PollDecision::Skipped(SkipReason::Busy));
}

#[tokio::test]
async fn test_malformed_feed_shows_banner_and_keeps_cards() {
    let (url, _server) = serve_once("200 OK", "not json").await;
    let (sender, mut receiver) = mpsc::unbounded_channel();
    let mut poller = Poller::new(client(&url), sender);
    let mut board = Board::new(RollTiming::default(), Arc::new(ManualClock::new()));

    poller.poll(false);
    let Some(Event::App(AppEvent::FeedLoaded(outcome))) = receiver.recv().await else {
        panic!("expected a feed result");
    };
    poller.finish();
    board.apply_poll_result(outcome);

    let banner = board.error_banner().unwrap();
    assert!(banner.starts_with("ERRORE DATI: "));
    assert!(board.cards().is_empty());
    assert!(!board.has_rendered());

    board.dismiss_error();
    assert!(board.error_banner().is_none());
}
