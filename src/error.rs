//! Error types for the `easeapi-rs` crate.
//!
//! All fallible operations in this crate return [`Result<T>`], which is an
//! alias for `std::result::Result<T, EaseApiError>`.
//!
//! [`EaseApiError`] covers:
//! - **API errors** — Structured error responses from the gateway
//! - **Auth token errors** — Expired sessions and rejected tokens
//! - **Data errors** — Responses the client could not make sense of
//! - **HTTP status errors** — Unexpected status codes with response body
//! - **HTTP transport errors** — Network, TLS, timeout failures
//! - **JSON / CSV errors** — Deserialization failures
//! - **WebSocket errors** — Connection and protocol errors
//! - **URL errors** — Malformed URL construction
//! - **Invalid arguments** — Client-side validation errors

/// Generic error code for unclassified failures.
pub const GENERAL_ERROR_CODE: u16 = 500;
/// Generic error code for token and authentication failures.
pub const AUTH_ERROR_CODE: u16 = 401;
/// Generic error code for bad responses from the order management system.
pub const DATA_ERROR_CODE: u16 = 502;
/// Generic error code for missing or invalid parameters.
pub const PARAMETER_ERROR_CODE: u16 = 503;

/// All possible errors produced by the `easeapi-rs` client.
#[derive(Debug, thiserror::Error)]
pub enum EaseApiError {
    /// An error response returned by the EaseAPI gateway.
    #[error("API error ({status}): {message}")]
    Api {
        /// The HTTP status code.
        status: reqwest::StatusCode,
        /// The `message` field of the error body.
        message: String,
    },

    /// The session has expired or the auth token was rejected.
    #[error("auth token error ({status}): {message}")]
    AuthToken {
        /// The HTTP status code.
        status: reqwest::StatusCode,
        /// Server-provided message.
        message: String,
    },

    /// The gateway returned a body the client could not interpret.
    #[error("data error: {0}")]
    Data(String),

    /// The server returned an unexpected HTTP status code.
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// The HTTP status code.
        status: reqwest::StatusCode,
        /// The response body text.
        body: String,
    },

    /// A network or transport-level error from `reqwest`.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to (de)serialize a JSON payload.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to parse the CSV instrument master.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A WebSocket-level error.
    #[error("WebSocket error: {0}")]
    WebSocket(Box<tokio_tungstenite::tungstenite::Error>),

    /// An error building or parsing a URL.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// The caller provided an invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for EaseApiError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::WebSocket(Box::new(e))
    }
}

impl EaseApiError {
    /// Generic numeric classification of the error.
    ///
    /// HTTP-derived variants report their status code; the rest map onto the
    /// gateway's general (500), auth (401), data (502) and parameter (503)
    /// buckets.
    pub fn code(&self) -> u16 {
        match self {
            Self::Api { status, .. } | Self::HttpStatus { status, .. } => status.as_u16(),
            Self::AuthToken { .. } => AUTH_ERROR_CODE,
            Self::Data(_) | Self::Json(_) | Self::Csv(_) => DATA_ERROR_CODE,
            Self::InvalidArgument(_) | Self::Url(_) => PARAMETER_ERROR_CODE,
            Self::Http(e) => e.status().map_or(GENERAL_ERROR_CODE, |s| s.as_u16()),
            Self::WebSocket(_) => GENERAL_ERROR_CODE,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EaseApiError>;
