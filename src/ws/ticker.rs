//! Live market-data and order-status WebSocket client.
//!
//! [`EaseApiTicker`] owns one streaming connection at a time. The connection
//! is authenticated through query parameters, runs on its own Tokio task, and
//! is re-established automatically after a disconnect: a fixed delay, a
//! bounded number of attempts, and a replay of every tracked subscription once
//! the socket is back.
//!
//! # Example
//!
//! ```no_run
//! use easeapi_rs::ws::ticker::{EaseApiTicker, StreamKind};
//! use easeapi_rs::ws::subscription::Venue;
//!
//! # #[tokio::main]
//! # async fn main() -> easeapi_rs::error::Result<()> {
//! let ticker = EaseApiTicker::new("app-key", "client-id", "auth-token");
//!
//! ticker.on_ticks(|_, tick| println!("tick: {tick}"));
//! ticker.on_connect(|t, _| {
//!     t.subscribe(["2885", "11536"], Venue::Nse);
//!     t.subscribe(500570, "bse");
//! });
//! ticker.on_close(|_, code, reason| println!("closed: {code:?} {reason}"));
//!
//! ticker.connect(StreamKind::MarketData)?;
//! tokio::signal::ctrl_c().await.ok();
//! ticker.close();
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use crate::client::EaseApiClient;
use crate::constants::websocket::{
    MAX_RECONNECT_ATTEMPTS, PING_INTERVAL_SECS, RECONNECT_INTERVAL_MS,
};
use crate::constants::{WS_BASE_URL, WS_MARKET_DATA_PATH, WS_ORDER_STATUS_PATH};
use crate::error::{EaseApiError, Result};
use crate::ws::handlers::Handlers;
use crate::ws::reconnect::{ReconnectDecision, ReconnectState, Reconnector};
use crate::ws::subscription::{
    SubscriptionMode, SubscriptionRegistry, SubscriptionRequest, Tokens, Venue,
};

// ---------------------------------------------------------------------------
// Targets
// ---------------------------------------------------------------------------

/// Which of the two streaming endpoints a session talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StreamKind {
    /// Live LTP ticks for subscribed tokens.
    #[default]
    MarketData,
    /// Order-status pushes for the logged-in client. Needs no subscription.
    OrderStatus,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MarketData => f.write_str("market data"),
            Self::OrderStatus => f.write_str("order status"),
        }
    }
}

/// Fully-resolved, authenticated URLs for both stream kinds.
///
/// Credentials are substituted into the query string verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionTargets {
    market_data: String,
    order_status: String,
}

impl ConnectionTargets {
    pub fn new(base_url: &str, app_key: &str, client_id: &str, auth_token: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        let query = format!("app_key={app_key}&client_id={client_id}&authorization={auth_token}");
        Self {
            market_data: format!("{base}{WS_MARKET_DATA_PATH}?{query}"),
            order_status: format!("{base}{WS_ORDER_STATUS_PATH}?{query}"),
        }
    }

    /// URL for the given stream kind.
    pub fn url(&self, kind: StreamKind) -> &str {
        match kind {
            StreamKind::MarketData => &self.market_data,
            StreamKind::OrderStatus => &self.order_status,
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for an [`EaseApiTicker`].
#[derive(Debug, Clone)]
pub struct TickerConfig {
    /// WebSocket base URL (scheme + host, no path).
    pub ws_base_url: String,
    /// Reconnect attempts after a disconnect before giving up.
    pub max_reconnect_attempts: u32,
    /// Fixed delay before each reconnect attempt.
    pub reconnect_interval: Duration,
    /// Interval between keep-alive pings on an open connection.
    pub ping_interval: Duration,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            ws_base_url: WS_BASE_URL.to_owned(),
            max_reconnect_attempts: MAX_RECONNECT_ATTEMPTS,
            reconnect_interval: Duration::from_millis(RECONNECT_INTERVAL_MS),
            ping_interval: Duration::from_secs(PING_INTERVAL_SECS),
        }
    }
}

/// Builder for an [`EaseApiTicker`] with custom configuration.
///
/// ```no_run
/// use std::time::Duration;
/// use easeapi_rs::ws::ticker::EaseApiTickerBuilder;
///
/// let ticker = EaseApiTickerBuilder::new("app-key", "client-id", "auth-token")
///     .max_reconnect_attempts(10)
///     .reconnect_interval(Duration::from_secs(2))
///     .build();
/// ```
pub struct EaseApiTickerBuilder {
    app_key: String,
    client_id: String,
    auth_token: String,
    config: TickerConfig,
}

impl EaseApiTickerBuilder {
    pub fn new(
        app_key: impl Into<String>,
        client_id: impl Into<String>,
        auth_token: impl Into<String>,
    ) -> Self {
        Self {
            app_key: app_key.into(),
            client_id: client_id.into(),
            auth_token: auth_token.into(),
            config: TickerConfig::default(),
        }
    }

    /// Point the ticker at a different WebSocket host (e.g. a local mock).
    pub fn ws_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.ws_base_url = url.into();
        self
    }

    /// Set the reconnect budget. Default: 5.
    pub fn max_reconnect_attempts(mut self, n: u32) -> Self {
        self.config.max_reconnect_attempts = n;
        self
    }

    /// Set the fixed reconnect delay. Default: 1 second.
    pub fn reconnect_interval(mut self, delay: Duration) -> Self {
        self.config.reconnect_interval = delay;
        self
    }

    /// Set the keep-alive ping interval. Default: 30 seconds. Clamped to at
    /// least one millisecond.
    pub fn ping_interval(mut self, every: Duration) -> Self {
        self.config.ping_interval = every.max(Duration::from_millis(1));
        self
    }

    pub fn build(self) -> EaseApiTicker {
        EaseApiTicker::with_config(self.app_key, self.client_id, self.auth_token, self.config)
    }
}

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// Lifecycle state of the streaming connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Commands for the session task's write half.
#[derive(Debug)]
enum Outbound {
    Frame(Message),
    Close,
}

struct Session {
    state: ConnectionState,
    kind: StreamKind,
    /// Bumped on every connect and on `close()`. Tasks carrying an older
    /// value are stale and must not touch state or reconnect.
    generation: u64,
    reconnector: Reconnector,
    timer: Option<JoinHandle<()>>,
    task: Option<JoinHandle<()>>,
    writer: Option<mpsc::UnboundedSender<Outbound>>,
}

struct Inner {
    targets: ConnectionTargets,
    config: TickerConfig,
    session: Mutex<Session>,
    registry: Mutex<SubscriptionRegistry>,
    handlers: Handlers,
}

// ---------------------------------------------------------------------------
// EaseApiTicker
// ---------------------------------------------------------------------------

/// Streaming client for the EaseAPI market-data and order-status sockets.
///
/// Cloning is cheap; every clone drives the same connection. All methods are
/// synchronous and may be called from any thread, including from inside the
/// observer callbacks. [`connect`](Self::connect) must run inside a Tokio
/// runtime because it spawns the session task.
#[derive(Clone)]
pub struct EaseApiTicker {
    inner: Arc<Inner>,
}

impl fmt::Debug for EaseApiTicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.inner.session.lock();
        f.debug_struct("EaseApiTicker")
            .field("state", &s.state)
            .field("kind", &s.kind)
            .field("reconnect_attempts", &s.reconnector.attempts())
            .finish_non_exhaustive()
    }
}

impl EaseApiTicker {
    /// Create a ticker with the default configuration.
    pub fn new(
        app_key: impl Into<String>,
        client_id: impl Into<String>,
        auth_token: impl Into<String>,
    ) -> Self {
        EaseApiTickerBuilder::new(app_key, client_id, auth_token).build()
    }

    /// Create a ticker with explicit configuration.
    ///
    /// Prefer [`EaseApiTickerBuilder`] for a more ergonomic API.
    pub fn with_config(
        app_key: impl Into<String>,
        client_id: impl Into<String>,
        auth_token: impl Into<String>,
        config: TickerConfig,
    ) -> Self {
        let app_key: String = app_key.into();
        let client_id: String = client_id.into();
        let auth_token: String = auth_token.into();
        let targets =
            ConnectionTargets::new(&config.ws_base_url, &app_key, &client_id, &auth_token);
        let reconnector = Reconnector::new(config.max_reconnect_attempts, config.reconnect_interval);

        Self {
            inner: Arc::new(Inner {
                targets,
                config,
                session: Mutex::new(Session {
                    state: ConnectionState::Disconnected,
                    kind: StreamKind::MarketData,
                    generation: 0,
                    reconnector,
                    timer: None,
                    task: None,
                    writer: None,
                }),
                registry: Mutex::new(SubscriptionRegistry::new()),
                handlers: Handlers::default(),
            }),
        }
    }

    /// Create a ticker from the credentials held by a logged-in REST client.
    pub fn from_client(client: &EaseApiClient) -> Result<Self> {
        let client_id = client.client_id().ok_or_else(|| {
            EaseApiError::InvalidArgument("client id not set on EaseApiClient".into())
        })?;
        let auth_token = client.auth_token().ok_or_else(|| {
            EaseApiError::InvalidArgument("auth token not set on EaseApiClient".into())
        })?;
        Ok(Self::new(client.app_key(), client_id, auth_token))
    }

    // -----------------------------------------------------------------------
    // Observers
    // -----------------------------------------------------------------------

    /// Called with every inbound payload that parses as JSON.
    pub fn on_ticks<F>(&self, f: F)
    where
        F: Fn(&EaseApiTicker, Value) + Send + Sync + 'static,
    {
        self.inner.handlers.set_on_ticks(Some(Arc::new(f)));
    }

    /// Called after the socket opens and subscriptions have been replayed.
    pub fn on_connect<F>(&self, f: F)
    where
        F: Fn(&EaseApiTicker, &Value) + Send + Sync + 'static,
    {
        self.inner.handlers.set_on_connect(Some(Arc::new(f)));
    }

    /// Called whenever a connection ends, including after [`close`](Self::close).
    pub fn on_close<F>(&self, f: F)
    where
        F: Fn(&EaseApiTicker, Option<u16>, &str) + Send + Sync + 'static,
    {
        self.inner.handlers.set_on_close(Some(Arc::new(f)));
    }

    /// Called on socket-level errors. A close event always follows.
    pub fn on_error<F>(&self, f: F)
    where
        F: Fn(&EaseApiTicker, &EaseApiError) + Send + Sync + 'static,
    {
        self.inner.handlers.set_on_error(Some(Arc::new(f)));
    }

    /// Called when a reconnect attempt is scheduled, with its number.
    pub fn on_reconnect<F>(&self, f: F)
    where
        F: Fn(&EaseApiTicker, u32) + Send + Sync + 'static,
    {
        self.inner.handlers.set_on_reconnect(Some(Arc::new(f)));
    }

    /// Called once the reconnect budget is spent.
    pub fn on_noreconnect<F>(&self, f: F)
    where
        F: Fn(&EaseApiTicker) + Send + Sync + 'static,
    {
        self.inner.handlers.set_on_noreconnect(Some(Arc::new(f)));
    }

    /// Unregister every observer.
    pub fn clear_handlers(&self) {
        let h = &self.inner.handlers;
        h.set_on_ticks(None);
        h.set_on_connect(None);
        h.set_on_close(None);
        h.set_on_error(None);
        h.set_on_reconnect(None);
        h.set_on_noreconnect(None);
    }

    // -----------------------------------------------------------------------
    // Connection lifecycle
    // -----------------------------------------------------------------------

    /// Open a connection to the given endpoint.
    ///
    /// Returns immediately; the socket is opened on a background task and
    /// [`on_connect`](Self::on_connect) fires once it is up. Does nothing if a
    /// connection is already open or being opened.
    ///
    /// Calling `connect` after the reconnect budget was exhausted starts a
    /// fresh budget.
    pub fn connect(&self, kind: StreamKind) -> Result<()> {
        let handle = Handle::try_current().map_err(|_| {
            EaseApiError::InvalidArgument("connect must be called within a Tokio runtime".into())
        })?;

        let mut s = self.inner.session.lock();
        if s.state != ConnectionState::Disconnected {
            tracing::warn!(state = ?s.state, "Already connected or connecting to WebSocket");
            return Ok(());
        }
        s.reconnector.rearm();
        self.open_session(&mut s, kind, &handle);
        Ok(())
    }

    /// Close the connection and cancel any pending reconnect.
    ///
    /// The close observer still fires for the session being shut down, but no
    /// further reconnect attempt is made. Safe to call repeatedly.
    pub fn close(&self) {
        let mut s = self.inner.session.lock();
        s.generation += 1;
        if let Some(timer) = s.timer.take() {
            timer.abort();
        }
        s.reconnector.cancel();
        if let Some(tx) = s.writer.take() {
            let _ = tx.send(Outbound::Close);
        }
        s.state = ConnectionState::Disconnected;
        tracing::info!("WebSocket connection closed");
    }

    pub fn is_connected(&self) -> bool {
        self.inner.session.lock().state == ConnectionState::Connected
    }

    pub fn state(&self) -> ConnectionState {
        self.inner.session.lock().state
    }

    /// Endpoint kind of the current (or most recent) session.
    pub fn stream_kind(&self) -> StreamKind {
        self.inner.session.lock().kind
    }

    /// URL of the current (or most recent) session.
    pub fn url(&self) -> String {
        let kind = self.stream_kind();
        self.inner.targets.url(kind).to_owned()
    }

    pub fn targets(&self) -> &ConnectionTargets {
        &self.inner.targets
    }

    pub fn config(&self) -> &TickerConfig {
        &self.inner.config
    }

    /// Reconnect attempts made since the last successful open.
    pub fn reconnect_attempts(&self) -> u32 {
        self.inner.session.lock().reconnector.attempts()
    }

    pub fn reconnect_state(&self) -> ReconnectState {
        self.inner.session.lock().reconnector.state()
    }

    /// Whether the session task is still running.
    pub fn is_task_alive(&self) -> bool {
        self.inner
            .session
            .lock()
            .task
            .as_ref()
            .is_some_and(|t| !t.is_finished())
    }

    // -----------------------------------------------------------------------
    // Subscriptions
    // -----------------------------------------------------------------------

    /// Subscribe to LTP ticks for `tokens` on `venue`.
    ///
    /// Unknown venues fall back to `nse`. The tokens are recorded for replay
    /// even when the ticker is not connected; in that case nothing is sent
    /// and `false` is returned.
    pub fn subscribe(&self, tokens: impl Into<Tokens>, venue: impl AsRef<str>) -> bool {
        self.subscribe_with(tokens, venue, false)
    }

    /// Like [`subscribe`](Self::subscribe), optionally leaving the registry
    /// untouched.
    pub fn subscribe_with(
        &self,
        tokens: impl Into<Tokens>,
        venue: impl AsRef<str>,
        skip_registry_update: bool,
    ) -> bool {
        let venue = Venue::from_str_lossy(venue.as_ref());
        let tokens = tokens.into().into_vec();

        if !skip_registry_update {
            self.inner.registry.lock().add(venue, &tokens);
        }

        if !self.is_connected() {
            tracing::warn!(%venue, "Cannot subscribe, WebSocket not connected");
            return false;
        }

        let req = SubscriptionRequest::new(venue, tokens, SubscriptionMode::Subscribe);
        self.send(&req)
    }

    /// Unsubscribe `tokens` on `venue`, dropping them from the registry.
    pub fn unsubscribe(&self, tokens: impl Into<Tokens>, venue: impl AsRef<str>) -> bool {
        let venue = Venue::from_str_lossy(venue.as_ref());
        let tokens = tokens.into().into_vec();

        self.inner.registry.lock().remove(venue, &tokens);

        if !self.is_connected() {
            tracing::warn!(%venue, "Cannot unsubscribe, WebSocket not connected");
            return false;
        }

        let req = SubscriptionRequest::new(venue, tokens, SubscriptionMode::Unsubscribe);
        self.send(&req)
    }

    /// Snapshot of every tracked subscription.
    pub fn subscriptions(&self) -> SubscriptionRegistry {
        self.inner.registry.lock().clone()
    }

    /// Serialise `payload` as JSON and queue it on the socket.
    ///
    /// Returns `false` if the ticker is not connected.
    pub fn send<T: Serialize + ?Sized>(&self, payload: &T) -> bool {
        match serde_json::to_string(payload) {
            Ok(text) => self.send_text(text),
            Err(e) => {
                tracing::error!(error = %e, "Error serialising outbound message");
                false
            }
        }
    }

    /// Queue a raw text frame on the socket.
    pub fn send_text(&self, text: impl Into<String>) -> bool {
        let s = self.inner.session.lock();
        if s.state != ConnectionState::Connected {
            tracing::warn!("Cannot send message, WebSocket not connected");
            return false;
        }
        let Some(tx) = s.writer.as_ref() else {
            return false;
        };
        let text: String = text.into();
        tracing::debug!(%text, "Sending");
        tx.send(Outbound::Frame(Message::Text(text.into()))).is_ok()
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    /// Start a new session for `kind`. The caller holds the session lock and
    /// has checked that no session is live.
    ///
    /// The new task waits for the previous session task to finish so that
    /// observers of two sessions never run at the same time.
    fn open_session(&self, s: &mut Session, kind: StreamKind, handle: &Handle) {
        s.kind = kind;
        s.state = ConnectionState::Connecting;
        s.generation += 1;

        let (tx, rx) = mpsc::unbounded_channel();
        s.writer = Some(tx);

        let generation = s.generation;
        let url = self.inner.targets.url(kind).to_owned();
        let ticker = self.clone();
        let previous = s.task.take();

        tracing::info!(%kind, "Connecting to EaseAPI WebSocket");
        s.task = Some(handle.spawn(async move {
            // the previous session still owes its close observer
            if let Some(previous) = previous {
                let _ = previous.await;
            }
            ticker.run_session(generation, url, rx).await;
        }));
    }

    /// Body of the session task: connect, pump frames, then report the close.
    async fn run_session(
        &self,
        generation: u64,
        url: String,
        mut rx: mpsc::UnboundedReceiver<Outbound>,
    ) {
        let connected = tokio::select! {
            res = connect_async(url.as_str()) => res,
            _ = rx.recv() => {
                self.handle_close(generation, None, "closed by client");
                return;
            }
        };

        let ws = match connected {
            Ok((ws, _resp)) => ws,
            Err(e) => {
                let err = EaseApiError::from(e);
                self.handle_error(generation, &err);
                self.handle_close(generation, None, &err.to_string());
                return;
            }
        };

        let (mut write, mut read) = ws.split();

        if !self.handle_open(generation) {
            let _ = write.send(Message::Close(None)).await;
            self.handle_close(generation, None, "closed by client");
            return;
        }

        let every = self.inner.config.ping_interval.max(Duration::from_millis(1));
        let mut ping = tokio::time::interval_at(Instant::now() + every, every);
        ping.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut code = None;
        let mut reason = String::new();

        loop {
            tokio::select! {
                frame = read.next() => match frame {
                    Some(Ok(Message::Text(text))) => self.handle_message(text.as_str()),
                    Some(Ok(Message::Binary(data))) => match std::str::from_utf8(&data) {
                        Ok(text) => self.handle_message(text),
                        Err(_) => tracing::warn!(len = data.len(), "Dropping non-UTF-8 binary frame"),
                    },
                    Some(Ok(Message::Close(frame))) => {
                        if let Some(frame) = frame {
                            code = Some(u16::from(frame.code));
                            reason = frame.reason.as_str().to_owned();
                        }
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        let err = EaseApiError::from(e);
                        self.handle_error(generation, &err);
                        reason = err.to_string();
                        break;
                    }
                    None => break,
                },
                cmd = rx.recv() => match cmd {
                    Some(Outbound::Frame(msg)) => {
                        if let Err(e) = write.send(msg).await {
                            let err = EaseApiError::from(e);
                            tracing::error!(error = %err, "Error sending data");
                            self.handle_error(generation, &err);
                            reason = err.to_string();
                            break;
                        }
                    }
                    Some(Outbound::Close) | None => {
                        let _ = write.send(Message::Close(None)).await;
                        reason = "closed by client".to_owned();
                        break;
                    }
                },
                _ = ping.tick() => {
                    if let Err(e) = write.send(Message::Ping(Default::default())).await {
                        let err = EaseApiError::from(e);
                        self.handle_error(generation, &err);
                        reason = err.to_string();
                        break;
                    }
                }
            }
        }

        self.handle_close(generation, code, &reason);
    }

    /// Returns `false` if the session went stale while connecting or while
    /// replaying subscriptions.
    fn handle_open(&self, generation: u64) -> bool {
        {
            let mut s = self.inner.session.lock();
            if s.generation != generation {
                return false;
            }
            s.state = ConnectionState::Connected;
            s.reconnector.on_open();
            tracing::info!(kind = %s.kind, "WebSocket connected successfully");
        }

        self.resubscribe();
        if self.inner.session.lock().generation != generation {
            return false;
        }
        self.inner
            .handlers
            .connect(self, &Value::Object(serde_json::Map::new()));
        true
    }

    fn handle_message(&self, text: &str) {
        match serde_json::from_str::<Value>(text) {
            Ok(data) => {
                if let Some(data) = self.inner.handlers.ticks(self, data) {
                    tracing::debug!(%data, "Received tick data");
                }
            }
            Err(_) => tracing::warn!(raw = text, "Received non-JSON message"),
        }
    }

    fn handle_error(&self, generation: u64, err: &EaseApiError) {
        tracing::error!(error = %err, "WebSocket error");
        {
            let mut s = self.inner.session.lock();
            if s.generation != generation {
                return;
            }
            if s.state == ConnectionState::Connecting {
                s.state = ConnectionState::Disconnected;
            }
        }
        self.inner.handlers.error(self, err);
    }

    fn handle_close(&self, generation: u64, code: Option<u16>, reason: &str) {
        tracing::info!(?code, reason, "WebSocket connection closed");
        let current = {
            let mut s = self.inner.session.lock();
            if s.generation == generation {
                s.state = ConnectionState::Disconnected;
                s.writer = None;
                true
            } else {
                false
            }
        };

        self.inner.handlers.close(self, code, reason);

        if current {
            self.handle_reconnect(generation);
        }
    }

    fn handle_reconnect(&self, generation: u64) {
        let (decision, max) = {
            let mut s = self.inner.session.lock();
            if s.generation != generation || s.state != ConnectionState::Disconnected {
                return;
            }
            (s.reconnector.on_close(), s.reconnector.max_attempts())
        };

        match decision {
            ReconnectDecision::Exhausted => {
                tracing::error!(max, "Max reconnection attempts reached");
                self.inner.handlers.noreconnect(self);
            }
            ReconnectDecision::Retry { attempt, delay } => {
                tracing::info!(attempt, max, ?delay, "Attempting to reconnect");
                self.inner.handlers.reconnect(self, attempt);

                let mut s = self.inner.session.lock();
                // close() or connect() may have run inside the observer
                if s.generation != generation || s.state != ConnectionState::Disconnected {
                    return;
                }
                if let Some(old) = s.timer.take() {
                    old.abort();
                }
                let ticker = self.clone();
                s.timer = Some(tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    ticker.reconnect_now(generation);
                }));
            }
        }
    }

    /// Timer body: reconnect to the same endpoint kind as before.
    fn reconnect_now(&self, generation: u64) {
        let mut s = self.inner.session.lock();
        if s.generation != generation {
            return;
        }
        s.timer = None;
        if s.state != ConnectionState::Disconnected {
            return;
        }
        let kind = s.kind;
        self.open_session(&mut s, kind, &Handle::current());
    }

    /// Re-send every tracked subscription without touching the registry.
    fn resubscribe(&self) {
        let snapshot = self.inner.registry.lock().snapshot();
        if snapshot.is_empty() {
            return;
        }
        tracing::info!(exchanges = snapshot.len(), "Resubscribing");
        for (venue, tokens) in snapshot {
            self.subscribe_with(tokens, venue, true);
        }
    }
}
