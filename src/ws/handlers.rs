//! Observer slots for ticker events.
//!
//! Each event kind has exactly one slot. Registering a callback replaces the
//! previous one; nothing is chained. Callbacks run on the session task that
//! owns the socket, one at a time, so they never race each other for the same
//! ticker.

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use crate::error::EaseApiError;
use crate::ws::ticker::EaseApiTicker;

/// Inbound tick or order-status payload.
pub type TickHandler = Arc<dyn Fn(&EaseApiTicker, Value) + Send + Sync>;
/// Connection opened; the second argument is an (empty) metadata object.
pub type ConnectHandler = Arc<dyn Fn(&EaseApiTicker, &Value) + Send + Sync>;
/// Connection closed with an optional close code and a reason.
pub type CloseHandler = Arc<dyn Fn(&EaseApiTicker, Option<u16>, &str) + Send + Sync>;
/// Socket-level error.
pub type ErrorHandler = Arc<dyn Fn(&EaseApiTicker, &EaseApiError) + Send + Sync>;
/// A reconnect attempt was scheduled; the argument is the attempt number.
pub type ReconnectHandler = Arc<dyn Fn(&EaseApiTicker, u32) + Send + Sync>;
/// The reconnect budget is spent.
pub type NoReconnectHandler = Arc<dyn Fn(&EaseApiTicker) + Send + Sync>;

#[derive(Default)]
struct Slots {
    on_ticks: Option<TickHandler>,
    on_connect: Option<ConnectHandler>,
    on_close: Option<CloseHandler>,
    on_error: Option<ErrorHandler>,
    on_reconnect: Option<ReconnectHandler>,
    on_noreconnect: Option<NoReconnectHandler>,
}

/// The six observer slots of a ticker.
///
/// Handlers are cloned out of the lock before they are invoked, so a callback
/// may re-register handlers on the same ticker without deadlocking.
#[derive(Default)]
pub(crate) struct Handlers {
    slots: Mutex<Slots>,
}

impl Handlers {
    pub(crate) fn set_on_ticks(&self, h: Option<TickHandler>) {
        self.slots.lock().on_ticks = h;
    }

    pub(crate) fn set_on_connect(&self, h: Option<ConnectHandler>) {
        self.slots.lock().on_connect = h;
    }

    pub(crate) fn set_on_close(&self, h: Option<CloseHandler>) {
        self.slots.lock().on_close = h;
    }

    pub(crate) fn set_on_error(&self, h: Option<ErrorHandler>) {
        self.slots.lock().on_error = h;
    }

    pub(crate) fn set_on_reconnect(&self, h: Option<ReconnectHandler>) {
        self.slots.lock().on_reconnect = h;
    }

    pub(crate) fn set_on_noreconnect(&self, h: Option<NoReconnectHandler>) {
        self.slots.lock().on_noreconnect = h;
    }

    /// Deliver a parsed payload. Returns it back when no tick observer is set.
    pub(crate) fn ticks(&self, ticker: &EaseApiTicker, data: Value) -> Option<Value> {
        let h = self.slots.lock().on_ticks.clone();
        match h {
            Some(h) => {
                h(ticker, data);
                None
            }
            None => Some(data),
        }
    }

    pub(crate) fn connect(&self, ticker: &EaseApiTicker, meta: &Value) {
        let h = self.slots.lock().on_connect.clone();
        if let Some(h) = h {
            h(ticker, meta);
        }
    }

    pub(crate) fn close(&self, ticker: &EaseApiTicker, code: Option<u16>, reason: &str) {
        let h = self.slots.lock().on_close.clone();
        if let Some(h) = h {
            h(ticker, code, reason);
        }
    }

    pub(crate) fn error(&self, ticker: &EaseApiTicker, err: &EaseApiError) {
        let h = self.slots.lock().on_error.clone();
        if let Some(h) = h {
            h(ticker, err);
        }
    }

    pub(crate) fn reconnect(&self, ticker: &EaseApiTicker, attempt: u32) {
        let h = self.slots.lock().on_reconnect.clone();
        if let Some(h) = h {
            h(ticker, attempt);
        }
    }

    pub(crate) fn noreconnect(&self, ticker: &EaseApiTicker) {
        let h = self.slots.lock().on_noreconnect.clone();
        if let Some(h) = h {
            h(ticker);
        }
    }
}
