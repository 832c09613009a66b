//! # easeapi-rs
//!
//! A Rust client library for the EaseAPI brokerage gateway: REST endpoints for
//! login, instruments, orders and portfolio, plus a self-healing WebSocket
//! ticker for live prices and order-status updates.
//!
//! ## Quick Start
//!
//! ```no_run
//! use easeapi_rs::{EaseApiTicker, ws::ticker::StreamKind, ws::subscription::Venue};
//!
//! #[tokio::main]
//! async fn main() -> easeapi_rs::Result<()> {
//!     let ticker = EaseApiTicker::new("app-key", "client-id", "auth-token");
//!     ticker.on_connect(|t, _| {
//!         t.subscribe(["2885", "11536"], Venue::Nse);
//!     });
//!     ticker.on_ticks(|_, tick| println!("{tick}"));
//!     ticker.connect(StreamKind::MarketData)?;
//!     tokio::signal::ctrl_c().await.ok();
//!     ticker.close();
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod constants;
pub mod error;
pub mod types;
pub mod ws;

/// Re-export the main client types at crate root for convenience.
pub use client::EaseApiClient;
pub use ws::ticker::EaseApiTicker;
/// Re-export the error type and Result alias.
pub use error::{EaseApiError, Result};
