//! Order management endpoints.
//!
//! Equity and derivative orders share routes; the `segment` and `product` of
//! the [`OrderRequest`] tell the gateway which book the order belongs to. The
//! derivative variants exist so call sites read like the order they place.

use serde_json::Value;

use crate::client::EaseApiClient;
use crate::constants::routes;
use crate::error::Result;
use crate::types::orders::*;

impl EaseApiClient {
    /// Retrieve all orders for the day.
    ///
    /// **Endpoint:** `GET /trade/v1/orders`
    pub async fn get_order_book(&self) -> Result<Value> {
        self.get(routes::ORDER_BOOK).await
    }

    /// Retrieve the state transitions of one order.
    ///
    /// **Endpoint:** `POST /trade/v1/order_history`
    pub async fn get_order_history(&self, order_id: &str) -> Result<Value> {
        let body = OrderHistoryRequest {
            order_id: order_id.to_owned(),
        };
        self.post(routes::ORDER_HISTORY, &body).await
    }

    /// Place a delivery (cash & carry) equity order.
    ///
    /// **Endpoint:** `POST /trade/v1/delivery`
    pub async fn place_delivery_order(&self, req: &OrderRequest) -> Result<Value> {
        self.post(routes::DELIVERY, req).await
    }

    /// Place an intraday equity order.
    ///
    /// **Endpoint:** `POST /trade/v1/intraday/regular`
    pub async fn place_intraday_regular_order(&self, req: &OrderRequest) -> Result<Value> {
        self.post(routes::INTRADAY_REGULAR, req).await
    }

    /// Place an intraday cover order (carries a mandatory `trigger_price`).
    ///
    /// **Endpoint:** `POST /trade/v1/intraday/cover`
    pub async fn place_intraday_cover_order(&self, req: &OrderRequest) -> Result<Value> {
        self.post(routes::INTRADAY_COVER, req).await
    }

    /// Place a carry-forward derivative order.
    ///
    /// **Endpoint:** `POST /trade/v1/delivery`
    pub async fn place_delivery_derivative_order(&self, req: &OrderRequest) -> Result<Value> {
        self.post(routes::DELIVERY, req).await
    }

    /// Place an intraday derivative order.
    ///
    /// **Endpoint:** `POST /trade/v1/intraday/regular`
    pub async fn place_intraday_derivative_regular_order(
        &self,
        req: &OrderRequest,
    ) -> Result<Value> {
        self.post(routes::INTRADAY_REGULAR, req).await
    }

    /// Place an intraday derivative cover order.
    ///
    /// **Endpoint:** `POST /trade/v1/intraday/cover`
    pub async fn place_intraday_derivative_cover_order(
        &self,
        req: &OrderRequest,
    ) -> Result<Value> {
        self.post(routes::INTRADAY_COVER, req).await
    }

    /// Modify a pending order.
    ///
    /// **Endpoint:** `POST /trade/v1/modify`
    pub async fn modify_order(&self, req: &ModifyOrderRequest) -> Result<Value> {
        self.post(routes::MODIFY_ORDER, req).await
    }

    /// Cancel a pending order.
    ///
    /// **Endpoint:** `POST /trade/v1/cancel`
    pub async fn cancel_order(&self, req: &CancelOrderRequest) -> Result<Value> {
        self.post(routes::CANCEL_ORDER, req).await
    }

    /// Retrieve all trades executed today.
    ///
    /// **Endpoint:** `GET /trade/v1/trades`
    pub async fn get_trade_book(&self) -> Result<Value> {
        self.get(routes::TRADE_BOOK).await
    }
}
