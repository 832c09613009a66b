//! Constants for the EaseAPI gateway.
//!
//! Contains base URLs, REST routes, WebSocket endpoints, and the default
//! timing values used by [`EaseApiClient`](crate::client::EaseApiClient) and
//! [`EaseApiTicker`](crate::ws::ticker::EaseApiTicker). They are exported for
//! advanced usage such as pointing the client at a mock server.

// ---------------------------------------------------------------------------
// Base URLs
// ---------------------------------------------------------------------------

/// Base URL for the EaseAPI REST gateway.
pub const API_BASE_URL: &str = "https://easeapi.venturasecurities.com";

/// Base URL for the EaseAPI WebSocket gateway.
pub const WS_BASE_URL: &str = "wss://easeapi-ws.venturasecurities.com";

// ---------------------------------------------------------------------------
// WebSocket paths
// ---------------------------------------------------------------------------

/// Path of the live market-data (LTP) stream.
pub const WS_MARKET_DATA_PATH: &str = "/v1/easeapi_mktdata";

/// Path of the live order-status stream.
pub const WS_ORDER_STATUS_PATH: &str = "/v1/easeapi_ob";

// ---------------------------------------------------------------------------
// REST routes (relative to the base URL)
// ---------------------------------------------------------------------------

/// REST route paths.
pub mod routes {
    pub const LOGIN: &str = "/auth/v1/login";
    pub const AUTH_TOKEN: &str = "/login/v1/authorization/token";
    pub const INSTRUMENTS: &str = "/instrument/v1/instruments";
    pub const FUND_DETAILS: &str = "/user/v1/fund_details";
    pub const USER_PROFILE: &str = "/user/v1/profile";
    pub const LOGOUT: &str = "/user/v1/logout";
    pub const ORDER_BOOK: &str = "/trade/v1/orders";
    pub const ORDER_HISTORY: &str = "/trade/v1/order_history";
    pub const DELIVERY: &str = "/trade/v1/delivery";
    pub const INTRADAY_REGULAR: &str = "/trade/v1/intraday/regular";
    pub const INTRADAY_COVER: &str = "/trade/v1/intraday/cover";
    pub const MODIFY_ORDER: &str = "/trade/v1/modify";
    pub const CANCEL_ORDER: &str = "/trade/v1/cancel";
    pub const TRADE_BOOK: &str = "/trade/v1/trades";
    pub const HOLDINGS: &str = "/portfolio/v1/holdings";
    pub const POSITIONS: &str = "/portfolio/v1/positions";
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Default REST request timeout in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 7;

/// Value of the `X-EaseApi-Version` header.
pub const API_VERSION_HEADER: &str = "1";

/// WebSocket defaults.
pub mod websocket {
    /// Keep-alive ping interval in seconds.
    pub const PING_INTERVAL_SECS: u64 = 30;
    /// Reconnect attempts before the ticker gives up.
    pub const MAX_RECONNECT_ATTEMPTS: u32 = 5;
    /// Fixed delay between reconnect attempts in milliseconds.
    pub const RECONNECT_INTERVAL_MS: u64 = 1_000;
}
