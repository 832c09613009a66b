//! Instrument master records.
//!
//! The gateway serves the instrument list as CSV. Numeric and date columns are
//! typed; every column this crate does not model is kept verbatim in
//! [`InstrumentRecord::extra`].

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{EaseApiError, Result};

/// Date format of the `expiry` column.
const EXPIRY_FORMAT: &str = "%d/%m/%Y";

/// One row of the instrument master.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstrumentRecord {
    pub exchange_token: i64,
    pub trading_symbol: String,
    pub name: String,
    pub last_price: f64,
    /// `None` for instruments without an expiry (the column is blank or not a
    /// `dd/mm/yyyy` date).
    pub expiry: Option<NaiveDate>,
    pub tick_size: f64,
    pub lot_size: i64,
    pub instrument: String,
    pub segment: String,
    pub exchange: String,
    /// Remaining columns, keyed by header name.
    pub extra: BTreeMap<String, String>,
}

/// Parse the CSV instrument master.
///
/// Rows must carry `exchange_token`, `last_price`, `tick_size` and `lot_size`;
/// a missing or non-numeric value in any of them fails the whole parse.
pub fn parse_instruments(data: &[u8]) -> Result<Vec<InstrumentRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);
    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    for (line, row) in reader.records().enumerate() {
        let row = row?;
        let mut fields: BTreeMap<String, String> = headers
            .iter()
            .zip(row.iter())
            .map(|(h, v)| (h.to_owned(), v.to_owned()))
            .collect();

        let mut take = |col: &str| fields.remove(col).unwrap_or_default();
        let exchange_token = parse_num(&take("exchange_token"), "exchange_token", line)?;
        let last_price = parse_num(&take("last_price"), "last_price", line)?;
        let tick_size = parse_num(&take("tick_size"), "tick_size", line)?;
        let lot_size = parse_num(&take("lot_size"), "lot_size", line)?;
        let expiry = parse_expiry(&take("expiry"));

        records.push(InstrumentRecord {
            exchange_token,
            last_price,
            tick_size,
            lot_size,
            expiry,
            trading_symbol: take("trading_symbol"),
            name: take("name"),
            instrument: take("instrument"),
            segment: take("segment"),
            exchange: take("exchange"),
            extra: fields,
        });
    }

    tracing::debug!(count = records.len(), "Parsed instrument master");
    Ok(records)
}

fn parse_num<T: std::str::FromStr>(raw: &str, column: &str, line: usize) -> Result<T> {
    raw.parse().map_err(|_| {
        EaseApiError::Data(format!(
            "instrument row {}: invalid {column} {raw:?}",
            line + 1
        ))
    })
}

fn parse_expiry(raw: &str) -> Option<NaiveDate> {
    if raw.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(raw, EXPIRY_FORMAT).ok()
}
