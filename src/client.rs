//! Core HTTP client for the EaseAPI REST gateway.
//!
//! The [`EaseApiClient`] struct is the main entry point for the REST side of
//! the API. It wraps [`reqwest::Client`] with the gateway's identification and
//! authentication headers and provides typed `get` and `post` helpers.
//!
//! Endpoint methods are added to `EaseApiClient` via `impl` blocks in the
//! [`crate::api`] module.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::Serialize;
use serde_json::Value;

use crate::constants::{API_BASE_URL, API_VERSION_HEADER, REQUEST_TIMEOUT_SECS};
use crate::error::{EaseApiError, Result};

/// Callback invoked when the gateway reports an expired session.
pub type SessionExpiryHook = Arc<dyn Fn() + Send + Sync>;

/// Core HTTP client for the EaseAPI REST gateway.
///
/// Create one instance per `app_key`. After login, store the client id and
/// tokens with the setters so subsequent calls are authenticated.
///
/// # Example
///
/// ```no_run
/// use easeapi_rs::client::EaseApiClient;
///
/// # #[tokio::main]
/// # async fn main() -> easeapi_rs::error::Result<()> {
/// let mut client = EaseApiClient::new("your-app-key");
/// println!("Log in at {}", client.sso_url("my-state")?);
///
/// let tokens = client.generate_auth_token("request-token", "secret-key").await?;
/// client.set_client_id("AA0605");
/// client.set_auth_token(&tokens.auth_token);
/// let profile = client.get_user_profile().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct EaseApiClient {
    http: reqwest::Client,
    app_key: String,
    client_id: Option<String>,
    auth_token: Option<String>,
    refresh_token: Option<String>,
    /// Base URL for REST requests (defaults to [`API_BASE_URL`]).
    base_url: String,
    session_expiry_hook: Option<SessionExpiryHook>,
}

impl fmt::Debug for EaseApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EaseApiClient")
            .field("app_key", &self.app_key)
            .field("client_id", &self.client_id)
            .field("base_url", &self.base_url)
            .field("authenticated", &self.auth_token.is_some())
            .finish_non_exhaustive()
    }
}

impl EaseApiClient {
    /// Create a new client for `app_key` against the production gateway.
    pub fn new(app_key: impl Into<String>) -> Self {
        Self::with_base_url(app_key, API_BASE_URL)
    }

    /// Create a new client pointing at a custom base URL.
    ///
    /// Useful for testing against a sandbox or mock server.
    pub fn with_base_url(app_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self::with_options(app_key, base_url, Duration::from_secs(REQUEST_TIMEOUT_SECS), false)
    }

    /// Create a client with an explicit timeout and, optionally, TLS
    /// certificate verification turned off.
    pub fn with_options(
        app_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
        disable_ssl: bool,
    ) -> Self {
        let http = reqwest::Client::builder()
            .default_headers(Self::default_headers())
            .timeout(timeout)
            .danger_accept_invalid_certs(disable_ssl)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Falling back to default reqwest client");
                reqwest::Client::new()
            });

        Self {
            http,
            app_key: app_key.into(),
            client_id: None,
            auth_token: None,
            refresh_token: None,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            session_expiry_hook: None,
        }
    }

    /// Returns a reference to the underlying `reqwest::Client`.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn app_key(&self) -> &str {
        &self.app_key
    }

    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_client_id(&mut self, client_id: impl Into<String>) {
        self.client_id = Some(client_id.into());
    }

    /// Store the auth token received after a successful login.
    pub fn set_auth_token(&mut self, auth_token: impl Into<String>) {
        self.auth_token = Some(auth_token.into());
    }

    pub fn set_refresh_token(&mut self, refresh_token: impl Into<String>) {
        self.refresh_token = Some(refresh_token.into());
    }

    /// Register a callback fired whenever a response reports
    /// `session_expired: true`.
    pub fn set_session_expiry_hook<F>(&mut self, hook: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.session_expiry_hook = Some(Arc::new(hook));
    }

    // -----------------------------------------------------------------------
    // Generic HTTP helpers
    // -----------------------------------------------------------------------

    /// Perform a GET request and return the JSON body.
    pub async fn get(&self, path: &str) -> Result<Value> {
        self.get_body(path).await?.into_json()
    }

    /// Perform a POST request with a JSON body and return the JSON response.
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value> {
        let url = self.url(path);
        tracing::debug!(%url, "POST");

        let resp = self
            .http
            .post(&url)
            .headers(self.auth_headers())
            .json(body)
            .send()
            .await?;

        self.handle_response(resp).await?.into_json()
    }

    /// Perform a GET request and return the body, JSON or CSV.
    pub(crate) async fn get_body(&self, path: &str) -> Result<ResponseBody> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");

        let resp = self
            .http
            .get(&url)
            .headers(self.auth_headers())
            .send()
            .await?;

        self.handle_response(resp).await
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    /// Build the full URL from a path segment.
    pub(crate) fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Default headers applied to every request.
    fn default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            HeaderValue::from_static(concat!("EaseApi-rust/", env!("CARGO_PKG_VERSION"))),
        );
        headers.insert("x-easeapi-version", HeaderValue::from_static(API_VERSION_HEADER));
        headers
    }

    /// Per-request identification and auth headers. Values that are not valid
    /// header text are skipped with a warning.
    pub(crate) fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::with_capacity(3);
        let mut put = |name: header::HeaderName, value: &str| match HeaderValue::from_str(value) {
            Ok(v) => {
                headers.insert(name, v);
            }
            Err(_) => tracing::warn!(header = %name, "Skipping header with invalid characters"),
        };

        put(header::HeaderName::from_static("x-app-key"), &self.app_key);
        if let Some(id) = &self.client_id {
            put(header::HeaderName::from_static("x-client-id"), id);
        }
        if let Some(token) = &self.auth_token {
            put(header::AUTHORIZATION, &format!("Bearer {token}"));
        }
        headers
    }

    /// Classify a response by status and content type.
    async fn handle_response(&self, resp: reqwest::Response) -> Result<ResponseBody> {
        let status = resp.status();
        let content_type = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        let bytes = resp.bytes().await?;

        tracing::debug!(%status, %content_type, "Response");
        self.classify(status, &content_type, &bytes)
    }

    pub(crate) fn classify(
        &self,
        status: reqwest::StatusCode,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<ResponseBody> {
        if content_type.contains("json") {
            let data: Value = serde_json::from_slice(bytes).map_err(|_| {
                EaseApiError::Data(format!(
                    "Couldn't parse the JSON response received from the server: {}",
                    String::from_utf8_lossy(bytes)
                ))
            })?;

            if data.get("session_expired").and_then(Value::as_bool) == Some(true) {
                if let Some(hook) = &self.session_expiry_hook {
                    hook();
                }
                return Err(EaseApiError::AuthToken {
                    status,
                    message: message_of(&data).unwrap_or("session expired").to_owned(),
                });
            }

            if !status.is_success() {
                return Err(match message_of(&data) {
                    Some(message) => EaseApiError::Api {
                        status,
                        message: message.to_owned(),
                    },
                    None => EaseApiError::HttpStatus {
                        status,
                        body: data.to_string(),
                    },
                });
            }

            Ok(ResponseBody::Json(data))
        } else if !status.is_success() {
            Err(EaseApiError::HttpStatus {
                status,
                body: String::from_utf8_lossy(bytes).into_owned(),
            })
        } else if content_type.contains("csv") {
            Ok(ResponseBody::Csv(bytes.to_vec()))
        } else {
            Err(EaseApiError::Data(format!(
                "Unknown Content-Type ({content_type}) with response: ({})",
                String::from_utf8_lossy(bytes)
            )))
        }
    }
}

fn message_of(data: &Value) -> Option<&str> {
    data.get("message").and_then(Value::as_str)
}

/// A successfully classified response body.
#[derive(Debug)]
pub(crate) enum ResponseBody {
    Json(Value),
    Csv(Vec<u8>),
}

impl ResponseBody {
    pub(crate) fn into_json(self) -> Result<Value> {
        match self {
            Self::Json(v) => Ok(v),
            Self::Csv(_) => Err(EaseApiError::Data("expected JSON, got CSV".into())),
        }
    }

    pub(crate) fn into_csv(self) -> Result<Vec<u8>> {
        match self {
            Self::Csv(b) => Ok(b),
            Self::Json(v) => Err(EaseApiError::Data(format!("expected CSV, got JSON: {v}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn url_joins_paths() {
        let c = EaseApiClient::with_base_url("k", "https://example.test/");
        assert_eq!(c.url("/user/v1/profile"), "https://example.test/user/v1/profile");
        assert_eq!(c.url("user/v1/profile"), "https://example.test/user/v1/profile");
    }

    #[test]
    fn auth_headers_follow_credentials() {
        let mut c = EaseApiClient::new("KEY");
        let h = c.auth_headers();
        assert_eq!(h.get("x-app-key").unwrap(), "KEY");
        assert!(h.get("x-client-id").is_none());
        assert!(h.get(header::AUTHORIZATION).is_none());

        c.set_client_id("AA0605");
        c.set_auth_token("tok");
        let h = c.auth_headers();
        assert_eq!(h.get("x-client-id").unwrap(), "AA0605");
        assert_eq!(h.get(header::AUTHORIZATION).unwrap(), "Bearer tok");
    }

    #[test]
    fn classify_json_and_csv() {
        let c = EaseApiClient::new("k");
        let body = c
            .classify(StatusCode::OK, "application/json", br#"{"status":"ok"}"#)
            .unwrap();
        assert_eq!(body.into_json().unwrap()["status"], "ok");

        let body = c.classify(StatusCode::OK, "text/csv", b"a,b\n1,2").unwrap();
        assert_eq!(body.into_csv().unwrap(), b"a,b\n1,2");
    }

    #[test]
    fn classify_errors() {
        let c = EaseApiClient::new("k");
        assert!(matches!(
            c.classify(StatusCode::OK, "text/html", b"<html>"),
            Err(EaseApiError::Data(_))
        ));
        assert!(matches!(
            c.classify(StatusCode::OK, "application/json", b"not json"),
            Err(EaseApiError::Data(_))
        ));
        assert!(matches!(
            c.classify(StatusCode::BAD_REQUEST, "application/json", br#"{"message":"bad qty"}"#),
            Err(EaseApiError::Api { message, .. }) if message == "bad qty"
        ));
        assert!(matches!(
            c.classify(StatusCode::BAD_GATEWAY, "text/plain", b"oops"),
            Err(EaseApiError::HttpStatus { .. })
        ));
    }

    #[test]
    fn session_expiry_runs_hook() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let hits = Arc::new(AtomicUsize::new(0));
        let mut c = EaseApiClient::new("k");
        let h = hits.clone();
        c.set_session_expiry_hook(move || {
            h.fetch_add(1, Ordering::SeqCst);
        });

        let res = c.classify(
            StatusCode::OK,
            "application/json",
            br#"{"session_expired":true,"message":"login again"}"#,
        );
        assert!(matches!(res, Err(EaseApiError::AuthToken { message, .. }) if message == "login again"));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
