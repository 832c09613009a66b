//! User profile and funds endpoints.

use serde_json::Value;

use crate::client::EaseApiClient;
use crate::constants::routes;
use crate::error::Result;

impl EaseApiClient {
    /// Retrieve the logged-in user's profile.
    ///
    /// **Endpoint:** `GET /user/v1/profile`
    pub async fn get_user_profile(&self) -> Result<Value> {
        self.get(routes::USER_PROFILE).await
    }

    /// Retrieve available funds and margin usage.
    ///
    /// **Endpoint:** `GET /user/v1/fund_details`
    pub async fn get_fund_details(&self) -> Result<Value> {
        self.get(routes::FUND_DETAILS).await
    }
}
