//! REST API endpoint implementations.
//!
//! Each sub-module adds `async` methods to
//! [`EaseApiClient`](crate::client::EaseApiClient) via `impl` blocks. Bodies
//! are serialised from the typed requests in [`crate::types`]; responses are
//! returned as [`serde_json::Value`] unless the gateway format is fixed.
//!
//! ## Usage
//!
//! ```no_run
//! use easeapi_rs::EaseApiClient;
//!
//! # #[tokio::main]
//! # async fn main() -> easeapi_rs::Result<()> {
//! let mut client = EaseApiClient::new("app-key");
//! client.set_client_id("AA0605");
//! client.set_auth_token("auth-token");
//! let orders = client.get_order_book().await?;
//! let holdings = client.get_holdings().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! | Module | Endpoints | Description |
//! |---|---|---|
//! | [`auth`] | 3 | SSO login URL, token exchange, logout |
//! | [`instruments`] | 1 | CSV instrument master |
//! | [`user`] | 2 | Profile, fund details |
//! | [`orders`] | 10 | Placement, modify, cancel, order & trade books |
//! | [`portfolio`] | 2 | Holdings, positions |

pub mod auth;
pub mod instruments;
pub mod orders;
pub mod portfolio;
pub mod user;
