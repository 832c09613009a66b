//! Binary to connect to the EaseAPI streaming gateway and print live data.
//!
//! On the market-data stream it subscribes to Reliance (nse:2885),
//! TCS (nse:11536) and SBI (bse:500570). With `EASEAPI_ORDER_STATUS=1` it
//! listens to order-status pushes instead. Runs until Ctrl-C.
//!
//! # Usage
//!
//! ```sh
//! export EASEAPI_APP_KEY="your-app-key"
//! export EASEAPI_CLIENT_ID="your-client-id"
//! export EASEAPI_AUTH_TOKEN="your-auth-token"
//! cargo run --bin ws_check --features cli
//! ```

use std::env;

use easeapi_rs::EaseApiTicker;
use easeapi_rs::error::{EaseApiError, Result};
use easeapi_rs::ws::subscription::Venue;
use easeapi_rs::ws::ticker::StreamKind;

fn require_env(name: &str) -> Result<String> {
    env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| EaseApiError::InvalidArgument(format!("set {name} env var before running")))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let app_key = require_env("EASEAPI_APP_KEY")?;
    let client_id = require_env("EASEAPI_CLIENT_ID")?;
    let auth_token = require_env("EASEAPI_AUTH_TOKEN")?;
    let kind = match env::var("EASEAPI_ORDER_STATUS").as_deref() {
        Ok("1") => StreamKind::OrderStatus,
        _ => StreamKind::MarketData,
    };

    let ticker = EaseApiTicker::new(app_key, client_id, auth_token);

    ticker.on_ticks(|_, data| println!("{data:#}"));
    ticker.on_connect(move |t, _| {
        println!("Connected to {kind} stream");
        if kind == StreamKind::MarketData {
            t.subscribe(["2885", "11536"], Venue::Nse);
            t.subscribe("500570", Venue::Bse);
        }
    });
    ticker.on_close(|_, code, reason| println!("Closed: code={code:?} reason={reason}"));
    ticker.on_error(|_, e| eprintln!("Error: {e}"));
    ticker.on_reconnect(|_, attempt| println!("Reconnecting (attempt {attempt})…"));
    ticker.on_noreconnect(|_| eprintln!("Gave up reconnecting"));

    println!("Connecting to EaseAPI {kind} stream…");
    println!("(Note: ticks only arrive during market hours 9:15–15:30 IST)\n");
    ticker.connect(kind)?;

    if let Err(e) = tokio::signal::ctrl_c().await {
        eprintln!("Failed to listen for Ctrl-C: {e}");
    }

    println!("\nDisconnecting…");
    ticker.close();
    println!("Done.");

    Ok(())
}
