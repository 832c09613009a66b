//! Shared enum types that map directly to EaseAPI wire values.
//!
//! The gateway uses short codes (`"E"`, `"MKT"`, `"B"`); the variants carry
//! readable names and `serde` renames them to the codes.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Exchange
// ---------------------------------------------------------------------------

/// Exchange an order is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Exchange {
    #[serde(rename = "NSE")]
    Nse,
    #[serde(rename = "BSE")]
    Bse,
}

// ---------------------------------------------------------------------------
// Segment
// ---------------------------------------------------------------------------

/// Market segment of the instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Segment {
    /// Cash equity.
    #[serde(rename = "E")]
    Equity,
    /// Futures & options.
    #[serde(rename = "D")]
    Derivative,
}

// ---------------------------------------------------------------------------
// Product
// ---------------------------------------------------------------------------

/// Product type of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Product {
    /// Delivery (cash & carry).
    #[serde(rename = "C")]
    Cash,
    #[serde(rename = "I")]
    Intraday,
    /// Carry-forward derivatives.
    #[serde(rename = "M")]
    Margin,
}

// ---------------------------------------------------------------------------
// Transaction Type
// ---------------------------------------------------------------------------

/// Buy or sell side of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    #[serde(rename = "B")]
    Buy,
    #[serde(rename = "S")]
    Sell,
}

// ---------------------------------------------------------------------------
// Order Type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderType {
    #[serde(rename = "MKT")]
    Market,
    #[serde(rename = "LMT")]
    Limit,
}

// ---------------------------------------------------------------------------
// Validity
// ---------------------------------------------------------------------------

/// Order validity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Validity {
    /// Valid for the trading day.
    #[serde(rename = "DAY")]
    Day,
    /// Immediate or Cancel.
    #[serde(rename = "IOC")]
    Ioc,
}

// ---------------------------------------------------------------------------
// Off-market flag
// ---------------------------------------------------------------------------

/// Whether the order is placed during market hours or as an after-market
/// order. Serialised as `0` / `1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OffMarketFlag {
    /// Market is open.
    #[default]
    Active,
    /// After-market order.
    Amo,
}

impl Serialize for OffMarketFlag {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u8(match self {
            Self::Active => 0,
            Self::Amo => 1,
        })
    }
}

impl<'de> Deserialize<'de> for OffMarketFlag {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        match u8::deserialize(d)? {
            0 => Ok(Self::Active),
            1 => Ok(Self::Amo),
            other => Err(serde::de::Error::custom(format!(
                "invalid off_market_flag: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_codes() {
        assert_eq!(serde_json::to_string(&Segment::Derivative).unwrap(), r#""D""#);
        assert_eq!(serde_json::to_string(&OrderType::Limit).unwrap(), r#""LMT""#);
        assert_eq!(serde_json::to_string(&OffMarketFlag::Amo).unwrap(), "1");
        let p: Product = serde_json::from_str(r#""M""#).unwrap();
        assert_eq!(p, Product::Margin);
        assert!(serde_json::from_str::<OffMarketFlag>("2").is_err());
    }
}
