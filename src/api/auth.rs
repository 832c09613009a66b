//! Login and session endpoints.
//!
//! Login is a two-step flow: the user signs in on the page returned by
//! [`EaseApiClient::sso_url`], the gateway redirects back with a
//! `request_token`, and [`EaseApiClient::generate_auth_token`] exchanges it for
//! session tokens.

use sha2::{Digest, Sha256};
use serde_json::Value;

use crate::client::EaseApiClient;
use crate::constants::routes;
use crate::error::Result;
use crate::types::auth::{AuthTokenRequest, LogoutRequest, TokenResponse};

impl EaseApiClient {
    /// URL of the single sign-on page for this `app_key`.
    ///
    /// `state` is echoed back on the redirect and can be used to correlate the
    /// login with the caller's session.
    ///
    /// **Endpoint:** `GET /auth/v1/login?app_key=..&state=..`
    pub fn sso_url(&self, state: &str) -> Result<String> {
        let url = url::Url::parse_with_params(
            &self.url(routes::LOGIN),
            [("app_key", self.app_key()), ("state", state)],
        )?;
        Ok(url.into())
    }

    /// Exchange a `request_token` for an auth token and refresh token.
    ///
    /// The tokens are returned, not stored; call
    /// [`set_auth_token`](Self::set_auth_token) and
    /// [`set_refresh_token`](Self::set_refresh_token) to use them.
    ///
    /// **Endpoint:** `POST /login/v1/authorization/token`
    pub async fn generate_auth_token(
        &self,
        request_token: &str,
        secret_key: &str,
    ) -> Result<TokenResponse> {
        let body = AuthTokenRequest {
            request_token: request_token.to_owned(),
            data: checksum(self.app_key(), secret_key),
        };
        let resp = self.post(routes::AUTH_TOKEN, &body).await?;
        Ok(serde_json::from_value(resp)?)
    }

    /// Invalidate the session identified by the stored refresh token.
    ///
    /// **Endpoint:** `POST /user/v1/logout`
    pub async fn logout(&self) -> Result<Value> {
        let body = LogoutRequest {
            refresh_token: self.refresh_token().map(str::to_owned),
        };
        self.post(routes::LOGOUT, &body).await
    }
}

/// Lowercase hex SHA-256 of `app_key + secret_key`.
fn checksum(app_key: &str, secret_key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(app_key.as_bytes());
    hasher.update(secret_key.as_bytes());
    hex::encode(hasher.finalize())
}
