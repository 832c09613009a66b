//! Authentication types.

use serde::{Deserialize, Serialize};

/// Body of the token exchange request.
///
/// `data` is the lowercase hex SHA-256 of `app_key + secret_key`.
#[derive(Debug, Clone, Serialize)]
pub struct AuthTokenRequest {
    pub request_token: String,
    pub data: String,
}

/// Tokens issued after a successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub auth_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Body of the logout request.
#[derive(Debug, Clone, Serialize)]
pub struct LogoutRequest {
    pub refresh_token: Option<String>,
}
