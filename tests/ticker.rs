//! Streaming tests against an in-process WebSocket server.
//!
//! The server binds `127.0.0.1:0`, records the request URI of every handshake
//! and every text frame it receives, and can greet each connection with a
//! fixed list of frames, hang up right after the handshake, or drop only the
//! first connection after a number of inbound frames.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};

use easeapi_rs::EaseApiTicker;
use easeapi_rs::ws::reconnect::ReconnectState;
use easeapi_rs::ws::subscription::Venue;
use easeapi_rs::ws::ticker::{ConnectionState, EaseApiTickerBuilder, StreamKind};

const WAIT: Duration = Duration::from_secs(5);

#[derive(Debug)]
enum ServerEvent {
    /// Handshake completed; carries the request URI (path and query).
    Connected(String),
    /// Text frame received from the client.
    Received(String),
}

#[derive(Clone, Default)]
struct Behaviour {
    greet: Vec<Message>,
    hang_up: bool,
    /// Close the first connection once it has sent this many text frames.
    drop_first_after: Option<usize>,
}

async fn spawn_server(behaviour: Behaviour) -> (SocketAddr, mpsc::UnboundedReceiver<ServerEvent>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();
    let accepted = Arc::new(AtomicUsize::new(0));

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let tx = tx.clone();
            let behaviour = behaviour.clone();
            let index = accepted.fetch_add(1, Ordering::SeqCst);
            tokio::spawn(async move {
                let uri_tx = tx.clone();
                let callback = move |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
                    let _ = uri_tx.send(ServerEvent::Connected(req.uri().to_string()));
                    Ok(resp)
                };
                let Ok(mut ws) = accept_hdr_async(stream, callback).await else {
                    return;
                };

                for frame in behaviour.greet {
                    if ws.send(frame).await.is_err() {
                        return;
                    }
                }
                if behaviour.hang_up {
                    let _ = ws.close(None).await;
                    return;
                }

                let limit = behaviour.drop_first_after.filter(|_| index == 0);
                let mut seen = 0;
                while let Some(Ok(msg)) = ws.next().await {
                    if let Message::Text(text) = msg {
                        let _ = tx.send(ServerEvent::Received(text.as_str().to_owned()));
                        seen += 1;
                        if limit == Some(seen) {
                            let _ = ws.close(None).await;
                            return;
                        }
                    }
                }
            });
        }
    });

    (addr, rx)
}

/// An address nothing listens on.
async fn dead_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

fn ticker_for(addr: SocketAddr, reconnect_interval: Duration) -> EaseApiTicker {
    EaseApiTickerBuilder::new("KEY", "AA0605", "tok")
        .ws_base_url(format!("ws://{addr}"))
        .reconnect_interval(reconnect_interval)
        .build()
}

async fn next_event(rx: &mut mpsc::UnboundedReceiver<ServerEvent>) -> ServerEvent {
    timeout(WAIT, rx.recv())
        .await
        .expect("timed out waiting for server event")
        .expect("server channel closed")
}

async fn next_received(rx: &mut mpsc::UnboundedReceiver<ServerEvent>) -> Value {
    loop {
        if let ServerEvent::Received(text) = next_event(rx).await {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

// ---------------------------------------------------------------------------
// Replay
// ---------------------------------------------------------------------------

#[tokio::test]
async fn replays_each_venue_once_on_open() {
    let (addr, mut events) = spawn_server(Behaviour::default()).await;
    let ticker = ticker_for(addr, Duration::from_millis(50));

    assert!(!ticker.subscribe(["2885", "11536"], "nse"));
    assert!(!ticker.subscribe(500570, Venue::Bse));
    let before = ticker.subscriptions();

    let (connected_tx, mut connected_rx) = mpsc::unbounded_channel();
    ticker.on_connect(move |_, meta| {
        assert_eq!(meta, &json!({}));
        let _ = connected_tx.send(());
    });
    ticker.connect(StreamKind::MarketData).unwrap();

    timeout(WAIT, connected_rx.recv()).await.unwrap();
    assert!(ticker.is_connected());

    let mut replayed = vec![next_received(&mut events).await, next_received(&mut events).await];
    replayed.sort_by_key(|v| v["actions"][0].as_str().map(str::to_owned));
    assert_eq!(
        replayed,
        vec![
            json!({"actions": ["bse:ltp"], "token": ["500570"], "mode": "sub"}),
            json!({"actions": ["nse:ltp"], "token": ["11536", "2885"], "mode": "sub"}),
        ]
    );

    // replay leaves the registry alone
    assert_eq!(ticker.subscriptions(), before);

    // nothing beyond the two replay frames
    assert!(timeout(Duration::from_millis(200), events.recv()).await.is_err());

    ticker.close();
}

#[tokio::test]
async fn live_subscribe_and_unsubscribe_are_sent() {
    let (addr, mut events) = spawn_server(Behaviour::default()).await;
    let ticker = ticker_for(addr, Duration::from_millis(50));

    // subscribing from inside the connect observer
    ticker.on_connect(|t, _| {
        assert!(t.subscribe("2885", "nse"));
    });
    ticker.connect(StreamKind::MarketData).unwrap();

    assert_eq!(
        next_received(&mut events).await,
        json!({"actions": ["nse:ltp"], "token": ["2885"], "mode": "sub"})
    );

    assert!(ticker.unsubscribe("2885", "nse"));
    assert_eq!(
        next_received(&mut events).await,
        json!({"actions": ["nse:ltp"], "token": ["2885"], "mode": "unsub"})
    );
    assert!(ticker.subscriptions().is_empty());

    assert!(ticker.send(&json!({"hello": "world"})));
    assert_eq!(next_received(&mut events).await, json!({"hello": "world"}));

    ticker.close();
    assert!(!ticker.send_text("late"));
}

#[tokio::test]
async fn replays_after_server_drop_and_resets_counter() {
    let (addr, mut events) = spawn_server(Behaviour {
        drop_first_after: Some(1),
        ..Default::default()
    })
    .await;
    let ticker = ticker_for(addr, Duration::from_millis(20));

    assert!(!ticker.subscribe("2885", "nse"));
    let before = ticker.subscriptions();

    let reconnects = Arc::new(Mutex::new(Vec::new()));
    let r = reconnects.clone();
    ticker.on_reconnect(move |_, n| r.lock().push(n));
    let (connected_tx, mut connected_rx) = mpsc::unbounded_channel();
    ticker.on_connect(move |t, _| {
        let _ = connected_tx.send(t.reconnect_attempts());
    });

    ticker.connect(StreamKind::MarketData).unwrap();

    let expected = json!({"actions": ["nse:ltp"], "token": ["2885"], "mode": "sub"});
    assert_eq!(next_received(&mut events).await, expected);
    assert_eq!(timeout(WAIT, connected_rx.recv()).await.unwrap(), Some(0));

    // first connection dropped by the server, second one gets the replay
    assert_eq!(next_received(&mut events).await, expected);
    assert_eq!(timeout(WAIT, connected_rx.recv()).await.unwrap(), Some(0));

    assert_eq!(*reconnects.lock(), vec![1]);
    assert_eq!(ticker.reconnect_attempts(), 0);
    assert_eq!(ticker.reconnect_state(), ReconnectState::Idle);
    assert_eq!(ticker.subscriptions(), before);

    ticker.close();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn observers_of_successive_sessions_never_overlap() {
    let (addr, _events) = spawn_server(Behaviour::default()).await;
    let ticker = ticker_for(addr, Duration::from_millis(20));

    let busy = Arc::new(AtomicBool::new(false));
    let overlaps = Arc::new(AtomicUsize::new(0));
    let order = Arc::new(Mutex::new(Vec::new()));

    let observe = {
        let busy = busy.clone();
        let overlaps = overlaps.clone();
        let order = order.clone();
        move |name: &'static str| {
            if busy.swap(true, Ordering::SeqCst) {
                overlaps.fetch_add(1, Ordering::SeqCst);
            }
            std::thread::sleep(Duration::from_millis(300));
            order.lock().push(name);
            busy.store(false, Ordering::SeqCst);
        }
    };

    let (connected_tx, mut connected_rx) = mpsc::unbounded_channel();
    let on_connect = observe.clone();
    ticker.on_connect(move |_, _| {
        on_connect("connect");
        let _ = connected_tx.send(());
    });
    let on_close = observe;
    ticker.on_close(move |_, _, _| on_close("close"));

    ticker.connect(StreamKind::MarketData).unwrap();
    timeout(WAIT, connected_rx.recv()).await.unwrap();

    ticker.close();
    ticker.connect(StreamKind::MarketData).unwrap();
    timeout(WAIT, connected_rx.recv()).await.unwrap();

    assert_eq!(overlaps.load(Ordering::SeqCst), 0);
    assert_eq!(*order.lock(), vec!["connect", "close", "connect"]);

    ticker.clear_handlers();
    ticker.close();
}

// ---------------------------------------------------------------------------
// Inbound dispatch
// ---------------------------------------------------------------------------

#[tokio::test]
async fn malformed_payloads_are_dropped() {
    let (addr, _events) = spawn_server(Behaviour {
        greet: vec![
            Message::text("not json"),
            Message::text(r#"{"token":"2885","ltp":1424.5}"#),
            Message::binary(br#"{"token":"500570","ltp":301.2}"#.to_vec()),
            Message::binary(vec![0xff, 0xfe]),
        ],
        ..Default::default()
    })
    .await;
    let ticker = ticker_for(addr, Duration::from_millis(50));

    let (tick_tx, mut ticks) = mpsc::unbounded_channel();
    ticker.on_ticks(move |_, tick| {
        let _ = tick_tx.send(tick);
    });
    let errors = Arc::new(Mutex::new(0));
    let e = errors.clone();
    ticker.on_error(move |_, _| *e.lock() += 1);

    ticker.connect(StreamKind::MarketData).unwrap();

    let first = timeout(WAIT, ticks.recv()).await.unwrap().unwrap();
    assert_eq!(first, json!({"token": "2885", "ltp": 1424.5}));
    let second = timeout(WAIT, ticks.recv()).await.unwrap().unwrap();
    assert_eq!(second["token"], "500570");

    assert!(timeout(Duration::from_millis(200), ticks.recv()).await.is_err());
    assert_eq!(*errors.lock(), 0);
    assert!(ticker.is_connected());

    ticker.close();
}

// ---------------------------------------------------------------------------
// Reconnection
// ---------------------------------------------------------------------------

#[tokio::test]
async fn gives_up_after_five_attempts() {
    let ticker = ticker_for(dead_addr().await, Duration::from_millis(10));

    let attempts = Arc::new(Mutex::new(Vec::new()));
    let closes = Arc::new(Mutex::new(0));
    let (done_tx, mut done_rx) = mpsc::unbounded_channel();

    let a = attempts.clone();
    ticker.on_reconnect(move |_, n| a.lock().push(n));
    let c = closes.clone();
    ticker.on_close(move |_, _, _| *c.lock() += 1);
    ticker.on_noreconnect(move |_| {
        let _ = done_tx.send(());
    });

    ticker.connect(StreamKind::MarketData).unwrap();
    timeout(WAIT, done_rx.recv()).await.unwrap();

    // no sixth attempt and no second exhaustion notice
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(*attempts.lock(), vec![1, 2, 3, 4, 5]);
    assert!(done_rx.try_recv().is_err());
    assert_eq!(*closes.lock(), 6);
    assert_eq!(ticker.reconnect_state(), ReconnectState::Exhausted);
    assert_eq!(ticker.state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn connect_after_exhaustion_starts_a_fresh_budget() {
    let ticker = EaseApiTickerBuilder::new("KEY", "AA0605", "tok")
        .ws_base_url(format!("ws://{}", dead_addr().await))
        .max_reconnect_attempts(1)
        .reconnect_interval(Duration::from_millis(10))
        .build();

    let attempts = Arc::new(Mutex::new(Vec::new()));
    let (done_tx, mut done_rx) = mpsc::unbounded_channel();
    let a = attempts.clone();
    ticker.on_reconnect(move |_, n| a.lock().push(n));
    ticker.on_noreconnect(move |_| {
        let _ = done_tx.send(());
    });

    ticker.connect(StreamKind::MarketData).unwrap();
    timeout(WAIT, done_rx.recv()).await.unwrap();
    ticker.connect(StreamKind::MarketData).unwrap();
    timeout(WAIT, done_rx.recv()).await.unwrap();

    assert_eq!(*attempts.lock(), vec![1, 1]);
}

#[tokio::test]
async fn close_cancels_pending_reconnect() {
    let ticker = ticker_for(dead_addr().await, Duration::from_millis(300));

    let closes = Arc::new(Mutex::new(0));
    let c = closes.clone();
    ticker.on_close(move |_, _, _| *c.lock() += 1);
    let (scheduled_tx, mut scheduled_rx) = mpsc::unbounded_channel();
    ticker.on_reconnect(move |_, n| {
        let _ = scheduled_tx.send(n);
    });

    ticker.connect(StreamKind::MarketData).unwrap();
    assert_eq!(timeout(WAIT, scheduled_rx.recv()).await.unwrap(), Some(1));

    ticker.close();
    tokio::time::sleep(Duration::from_millis(600)).await;

    // the scheduled attempt never ran: no second failure, no second notice
    assert_eq!(*closes.lock(), 1);
    assert!(scheduled_rx.try_recv().is_err());
    assert_eq!(ticker.state(), ConnectionState::Disconnected);
    assert_eq!(ticker.reconnect_state(), ReconnectState::Idle);
}

#[tokio::test]
async fn close_on_open_socket_does_not_reconnect() {
    let (addr, mut events) = spawn_server(Behaviour::default()).await;
    let ticker = ticker_for(addr, Duration::from_millis(10));

    let (closed_tx, mut closed_rx) = mpsc::unbounded_channel();
    ticker.on_close(move |_, _, reason| {
        let _ = closed_tx.send(reason.to_owned());
    });
    let reconnects = Arc::new(Mutex::new(0));
    let r = reconnects.clone();
    ticker.on_reconnect(move |_, _| *r.lock() += 1);

    ticker.connect(StreamKind::MarketData).unwrap();
    assert!(matches!(next_event(&mut events).await, ServerEvent::Connected(_)));

    // a second connect while live is a no-op
    ticker.connect(StreamKind::OrderStatus).unwrap();

    ticker.close();
    timeout(WAIT, closed_rx.recv()).await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(*reconnects.lock(), 0);
    assert!(!ticker.is_task_alive());
    assert_eq!(ticker.stream_kind(), StreamKind::MarketData);
    assert!(timeout(Duration::from_millis(100), events.recv()).await.is_err());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn closed_session_never_reports_connect() {
    let (addr, _events) = spawn_server(Behaviour::default()).await;
    let ticker = ticker_for(addr, Duration::from_millis(10));

    let connects = Arc::new(AtomicUsize::new(0));
    let c = connects.clone();
    ticker.on_connect(move |_, _| {
        c.fetch_add(1, Ordering::SeqCst);
    });
    let (closed_tx, mut closed_rx) = mpsc::unbounded_channel();
    ticker.on_close(move |_, _, _| {
        let _ = closed_tx.send(());
    });

    ticker.connect(StreamKind::MarketData).unwrap();
    ticker.close();

    timeout(WAIT, closed_rx.recv()).await.unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(connects.load(Ordering::SeqCst), 0);
    assert!(closed_rx.try_recv().is_err());
    assert!(ticker.subscriptions().is_empty());
    assert_eq!(ticker.state(), ConnectionState::Disconnected);
}

async fn reconnect_keeps_endpoint(kind: StreamKind, path: &str) {
    let (addr, mut events) = spawn_server(Behaviour {
        hang_up: true,
        ..Default::default()
    })
    .await;
    let ticker = ticker_for(addr, Duration::from_millis(20));
    ticker.connect(kind).unwrap();

    let mut uris = Vec::new();
    while uris.len() < 2 {
        if let ServerEvent::Connected(uri) = next_event(&mut events).await {
            uris.push(uri);
        }
    }
    ticker.close();

    for uri in uris {
        assert_eq!(
            uri,
            format!("{path}?app_key=KEY&client_id=AA0605&authorization=tok")
        );
    }
    assert_eq!(ticker.stream_kind(), kind);
}

#[tokio::test]
async fn order_status_reconnect_targets_order_status() {
    reconnect_keeps_endpoint(StreamKind::OrderStatus, "/v1/easeapi_ob").await;
}

#[tokio::test]
async fn market_data_reconnect_targets_market_data() {
    reconnect_keeps_endpoint(StreamKind::MarketData, "/v1/easeapi_mktdata").await;
}
