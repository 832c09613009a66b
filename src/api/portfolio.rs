//! Portfolio endpoints.

use serde_json::Value;

use crate::client::EaseApiClient;
use crate::constants::routes;
use crate::error::Result;

impl EaseApiClient {
    /// Retrieve demat holdings.
    ///
    /// **Endpoint:** `GET /portfolio/v1/holdings`
    pub async fn get_holdings(&self) -> Result<Value> {
        self.get(routes::HOLDINGS).await
    }

    /// Retrieve open positions for the day.
    ///
    /// **Endpoint:** `GET /portfolio/v1/positions`
    pub async fn get_positions(&self) -> Result<Value> {
        self.get(routes::POSITIONS).await
    }
}
