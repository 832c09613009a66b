//! Instrument master download.

use crate::client::EaseApiClient;
use crate::constants::routes;
use crate::error::Result;
use crate::types::instrument::{InstrumentRecord, parse_instruments};

impl EaseApiClient {
    /// Download and parse the full instrument master.
    ///
    /// The list is large (tens of thousands of rows); fetch it once per day.
    ///
    /// **Endpoint:** `GET /instrument/v1/instruments` (CSV)
    pub async fn get_instruments(&self) -> Result<Vec<InstrumentRecord>> {
        let body = self.get_body(routes::INSTRUMENTS).await?.into_csv()?;
        parse_instruments(&body)
    }
}
