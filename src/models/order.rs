//! Order models: the order specs we submit and the orders we read back.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::account::Instrument;
use super::primitives::{OrderId, Symbol};

/// Which side of the market an order is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderSide {
    /// Buy to open/increase a position
    Buy,
    /// Sell to close/reduce a position
    Sell,
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "BUY"),
            OrderSide::Sell => write!(f, "SELL"),
        }
    }
}

/// Order pricing type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// Execute at the current market price
    Market,
    /// Execute at the limit price or better
    Limit,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::Market => write!(f, "MARKET"),
            OrderType::Limit => write!(f, "LIMIT"),
        }
    }
}

/// An equity order spec ready for submission, in the upstream wire shape.
///
/// Built through [`NewOrder::equity_market`] / [`NewOrder::equity_limit`];
/// there is no other way to construct one, so every submitted order is a
/// single-leg day order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    /// MARKET or LIMIT
    pub order_type: OrderType,
    /// Trading session, always "NORMAL"
    pub session: String,
    /// Time in force, always "DAY"
    pub duration: String,
    /// Strategy type, always "SINGLE"
    pub order_strategy_type: String,
    /// Limit price, present for limit orders only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    /// The single order leg
    pub order_leg_collection: Vec<NewOrderLeg>,
}

/// One leg of a new order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderLeg {
    /// BUY or SELL
    pub instruction: OrderSide,
    /// Share quantity
    pub quantity: u32,
    /// The instrument being traded
    pub instrument: Instrument,
}

impl NewOrder {
    /// Build a single-leg equity market order.
    pub fn equity_market(side: OrderSide, symbol: &Symbol, quantity: u32) -> Self {
        Self::build(OrderType::Market, None, side, symbol, quantity)
    }

    /// Build a single-leg equity limit order.
    pub fn equity_limit(
        side: OrderSide,
        symbol: &Symbol,
        quantity: u32,
        limit_price: Decimal,
    ) -> Self {
        Self::build(OrderType::Limit, Some(limit_price), side, symbol, quantity)
    }

    fn build(
        order_type: OrderType,
        price: Option<Decimal>,
        side: OrderSide,
        symbol: &Symbol,
        quantity: u32,
    ) -> Self {
        Self {
            order_type,
            session: "NORMAL".to_string(),
            duration: "DAY".to_string(),
            order_strategy_type: "SINGLE".to_string(),
            price,
            order_leg_collection: vec![NewOrderLeg {
                instruction: side,
                quantity,
                instrument: Instrument {
                    symbol: symbol.clone(),
                    asset_type: "EQUITY".to_string(),
                },
            }],
        }
    }
}

/// An existing order as read back from the brokerage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Numeric order ID
    #[serde(default)]
    pub order_id: Option<i64>,
    /// Order status (e.g. "WORKING", "FILLED")
    #[serde(default)]
    pub status: String,
    /// Limit price if present
    #[serde(default)]
    pub price: Option<Decimal>,
    /// Stop price if present
    #[serde(default)]
    pub stop_price: Option<Decimal>,
    /// Order legs
    #[serde(default)]
    pub order_leg_collection: Vec<OrderLeg>,
}

/// One leg of an existing order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLeg {
    /// Instruction, e.g. "BUY" / "SELL"
    #[serde(default)]
    pub instruction: String,
    /// Share quantity
    #[serde(default)]
    pub quantity: Decimal,
    /// The instrument
    #[serde(default)]
    pub instrument: Instrument,
}

/// Result of a successful order placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacedOrder {
    /// Order ID extracted from the response, when the brokerage returns one
    pub order_id: Option<OrderId>,
    /// HTTP status the placement returned
    pub status_code: u16,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn market_order_wire_shape() {
        let order = NewOrder::equity_market(OrderSide::Buy, &Symbol::new("AAPL"), 10);
        let json = serde_json::to_value(&order).unwrap();

        assert_eq!(json["orderType"], "MARKET");
        assert_eq!(json["session"], "NORMAL");
        assert_eq!(json["duration"], "DAY");
        assert_eq!(json["orderStrategyType"], "SINGLE");
        assert!(json.get("price").is_none());
        assert_eq!(json["orderLegCollection"][0]["instruction"], "BUY");
        assert_eq!(json["orderLegCollection"][0]["quantity"], 10);
        assert_eq!(
            json["orderLegCollection"][0]["instrument"]["symbol"],
            "AAPL"
        );
        assert_eq!(
            json["orderLegCollection"][0]["instrument"]["assetType"],
            "EQUITY"
        );
    }

    #[test]
    fn limit_order_carries_price() {
        let order =
            NewOrder::equity_limit(OrderSide::Sell, &Symbol::new("SPY"), 5, dec!(450.25));
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["orderType"], "LIMIT");
        assert_eq!(json["price"], "450.25");
        assert_eq!(json["orderLegCollection"][0]["instruction"], "SELL");
    }

    #[test]
    fn reads_back_order_payload() {
        let json = r#"{
            "orderId": 123456,
            "status": "WORKING",
            "price": 150.00,
            "orderLegCollection": [{
                "instruction": "BUY",
                "quantity": 10,
                "instrument": {"symbol": "AAPL", "assetType": "EQUITY"}
            }]
        }"#;

        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.status, "WORKING");
        assert_eq!(order.order_leg_collection[0].instruction, "BUY");
        assert_eq!(
            order.order_leg_collection[0].instrument.symbol.as_str(),
            "AAPL"
        );
    }
}
