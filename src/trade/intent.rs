//! Trade intents and the decisions made about them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{OrderSide, OrderType, Symbol};

/// A fully-described request to trade, before any safety evaluation.
///
/// Intents are immutable once constructed; the safety gate and executor
/// only read them.
#[derive(Debug, Clone)]
pub struct TradeIntent {
    /// Alias of the account the trade targets
    pub account_alias: String,
    /// Symbol to trade
    pub symbol: Symbol,
    /// Whole-share quantity
    pub quantity: u32,
    /// Buy or sell
    pub side: OrderSide,
    /// Limit price; `None` means a market order
    pub limit_price: Option<Decimal>,
    /// Preview only, never submit
    pub dry_run: bool,
    /// Skip the initial yes/no prompt (the typed token is still required)
    pub assume_yes: bool,
    /// No interactive terminal is available for confirmation
    pub non_interactive: bool,
}

impl TradeIntent {
    /// The order type implied by the presence of a limit price.
    pub fn order_type(&self) -> OrderType {
        if self.limit_price.is_some() {
            OrderType::Limit
        } else {
            OrderType::Market
        }
    }

    /// One-line human description, e.g. `BUY 10 AAPL @ limit 150.00`.
    pub fn describe(&self) -> String {
        match self.limit_price {
            Some(price) => format!(
                "{} {} {} @ limit {}",
                self.side, self.quantity, self.symbol, price
            ),
            None => format!("{} {} {} @ market", self.side, self.quantity, self.symbol),
        }
    }
}

/// How an evaluated intent may proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeMode {
    /// Preview only; no order leaves the process
    DryRun,
    /// Cleared for live submission
    Live,
    /// Blocked by a safety rule or declined by the user
    Rejected,
}

impl TradeMode {
    /// Stable string form used in audit records and output.
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeMode::DryRun => "dry_run",
            TradeMode::Live => "live",
            TradeMode::Rejected => "rejected",
        }
    }
}

/// The outcome of evaluating a [`TradeIntent`] against the safety rules.
#[derive(Debug, Clone)]
pub struct TradeDecision {
    /// Whether the trade may proceed at all
    pub allowed: bool,
    /// The mode the trade may proceed in
    pub mode: TradeMode,
    /// Why the decision came out this way
    pub reason: String,
}

impl TradeDecision {
    pub(crate) fn dry_run() -> Self {
        Self {
            allowed: true,
            mode: TradeMode::DryRun,
            reason: "dry run".to_string(),
        }
    }

    pub(crate) fn live(reason: impl Into<String>) -> Self {
        Self {
            allowed: true,
            mode: TradeMode::Live,
            reason: reason.into(),
        }
    }

    pub(crate) fn rejected(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            mode: TradeMode::Rejected,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn intent(limit: Option<Decimal>) -> TradeIntent {
        TradeIntent {
            account_alias: "acct_trading".into(),
            symbol: Symbol::new("aapl"),
            quantity: 10,
            side: OrderSide::Buy,
            limit_price: limit,
            dry_run: true,
            assume_yes: false,
            non_interactive: false,
        }
    }

    #[test]
    fn order_type_follows_limit_price() {
        assert_eq!(intent(None).order_type(), OrderType::Market);
        assert_eq!(intent(Some(dec!(150))).order_type(), OrderType::Limit);
    }

    #[test]
    fn describe_is_human_readable() {
        assert_eq!(intent(None).describe(), "BUY 10 AAPL @ market");
        assert_eq!(
            intent(Some(dec!(150.50))).describe(),
            "BUY 10 AAPL @ limit 150.50"
        );
    }
}
