//! Reconnection bookkeeping for a ticker session.
//!
//! [`Reconnector`] is a small state machine over [`ReconnectState`]. It never
//! touches the network or the clock: the ticker feeds it close/open events and
//! acts on the returned [`ReconnectDecision`] by scheduling a timer.
//!
//! The delay between attempts is fixed. There is no exponential backoff.

use std::time::Duration;

use crate::constants::websocket::{MAX_RECONNECT_ATTEMPTS, RECONNECT_INTERVAL_MS};

/// Where the reconnection controller currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconnectState {
    /// Connected, or never disconnected.
    Idle,
    /// A reconnect attempt is waiting on its timer.
    Scheduled,
    /// The attempt budget is spent; no more attempts until an explicit connect.
    Exhausted,
}

/// What the ticker should do after a close event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconnectDecision {
    /// Schedule attempt number `attempt` after `delay`.
    Retry { attempt: u32, delay: Duration },
    /// Give up and notify the exhaustion observer.
    Exhausted,
}

/// Bounded fixed-interval reconnection policy.
#[derive(Debug, Clone)]
pub struct Reconnector {
    max_attempts: u32,
    interval: Duration,
    attempts: u32,
    state: ReconnectState,
}

impl Default for Reconnector {
    fn default() -> Self {
        Self::new(
            MAX_RECONNECT_ATTEMPTS,
            Duration::from_millis(RECONNECT_INTERVAL_MS),
        )
    }
}

impl Reconnector {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
            attempts: 0,
            state: ReconnectState::Idle,
        }
    }

    /// Register a connection close and decide whether to retry.
    pub fn on_close(&mut self) -> ReconnectDecision {
        if self.attempts >= self.max_attempts {
            self.state = ReconnectState::Exhausted;
            return ReconnectDecision::Exhausted;
        }
        self.attempts += 1;
        self.state = ReconnectState::Scheduled;
        ReconnectDecision::Retry {
            attempt: self.attempts,
            delay: self.interval,
        }
    }

    /// A connection opened: the counter starts over.
    pub fn on_open(&mut self) {
        self.attempts = 0;
        self.state = ReconnectState::Idle;
    }

    /// The pending attempt was cancelled.
    ///
    /// Leaves the counter alone so a cancelled chain does not earn a fresh
    /// budget.
    pub fn cancel(&mut self) {
        if self.state == ReconnectState::Scheduled {
            self.state = ReconnectState::Idle;
        }
    }

    /// Start a fresh budget after exhaustion. No-op in any other state.
    pub fn rearm(&mut self) {
        if self.state == ReconnectState::Exhausted {
            self.attempts = 0;
            self.state = ReconnectState::Idle;
        }
    }

    pub fn state(&self) -> ReconnectState {
        self.state
    }

    /// Attempts made since the last successful open.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}
