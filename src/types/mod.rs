//! Request and response types for the EaseAPI REST gateway.
//!
//! ## Organization
//!
//! - [`enums`] — Wire enumerations (exchange, segment, product, order type, ...)
//! - [`orders`] — Order placement, modification and cancellation payloads
//! - [`auth`] — Token exchange request/response types
//! - [`instrument`] — Instrument master records parsed from CSV
//!
//! All enums are re-exported at the module root via `pub use enums::*`.

pub mod auth;
pub mod enums;
pub mod instrument;
pub mod orders;

pub use enums::*;
