//! WebSocket modules for real-time data streaming.
//!
//! EaseAPI exposes two WebSocket endpoints, both authenticated through query
//! parameters (`app_key`, `client_id`, `authorization`):
//!
//! - **Market data** (`/v1/easeapi_mktdata`) — LTP ticks for the tokens you
//!   subscribe to, per venue (`nse`, `bse`, `fno`, `bfo`).
//! - **Order status** (`/v1/easeapi_ob`) — order-status pushes for the
//!   logged-in client; no subscription needed.
//!
//! Both are served by [`ticker::EaseApiTicker`], which picks the endpoint at
//! [`connect`](ticker::EaseApiTicker::connect) time.
//!
//! ## Modules
//!
//! - [`ticker`] — connection lifecycle, keep-alive, reconnect, replay
//! - [`subscription`] — venues, token normalisation, subscription registry
//! - [`reconnect`] — bounded fixed-interval reconnection state machine
//! - [`handlers`] — single-slot observer callbacks

pub mod handlers;
pub mod reconnect;
pub mod subscription;
pub mod ticker;
