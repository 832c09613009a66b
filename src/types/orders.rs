//! Order placement, modification and cancellation payloads.

use serde::{Deserialize, Serialize};

use super::enums::*;

// ---------------------------------------------------------------------------
// Place
// ---------------------------------------------------------------------------

/// Body of every `place_*_order` call.
///
/// The same shape is sent to the delivery, intraday regular and intraday cover
/// routes; `segment` and `product` select equity or derivative handling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    pub transaction_type: TransactionType,
    pub exchange: Exchange,
    pub segment: Segment,
    pub product: Product,
    pub instrument_id: i64,
    pub quantity: u32,
    /// `0.0` for market orders.
    pub price: f64,
    pub validity: Validity,
    pub order_type: OrderType,
    #[serde(default)]
    pub disclosed_quantity: u32,
    #[serde(default)]
    pub trigger_price: f64,
    #[serde(default)]
    pub off_market_flag: OffMarketFlag,
    #[serde(default)]
    pub remarks: String,
}

impl OrderRequest {
    /// A day market order with no trigger, disclosure or remarks.
    pub fn market(
        transaction_type: TransactionType,
        exchange: Exchange,
        segment: Segment,
        product: Product,
        instrument_id: i64,
        quantity: u32,
    ) -> Self {
        Self {
            transaction_type,
            exchange,
            segment,
            product,
            instrument_id,
            quantity,
            price: 0.0,
            validity: Validity::Day,
            order_type: OrderType::Market,
            disclosed_quantity: 0,
            trigger_price: 0.0,
            off_market_flag: OffMarketFlag::Active,
            remarks: String::new(),
        }
    }

    /// A day limit order at `price`.
    pub fn limit(
        transaction_type: TransactionType,
        exchange: Exchange,
        segment: Segment,
        product: Product,
        instrument_id: i64,
        quantity: u32,
        price: f64,
    ) -> Self {
        Self {
            price,
            order_type: OrderType::Limit,
            ..Self::market(transaction_type, exchange, segment, product, instrument_id, quantity)
        }
    }
}

// ---------------------------------------------------------------------------
// Modify / Cancel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModifyOrderRequest {
    pub order_no: String,
    pub order_type: OrderType,
    pub quantity: u32,
    pub price: f64,
    #[serde(default)]
    pub trigger_price: f64,
    #[serde(default)]
    pub disc_quantity: u32,
    #[serde(default)]
    pub remarks: String,
    pub validity: Validity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelOrderRequest {
    pub order_no: String,
}

/// Body of the order-history request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderHistoryRequest {
    pub order_id: String,
}

impl CancelOrderRequest {
    pub fn new(order_no: impl Into<String>) -> Self {
        Self {
            order_no: order_no.into(),
        }
    }
}
