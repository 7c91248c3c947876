//! Order execution.
//!
//! Runs only after the safety gate has decided. Validates the order spec
//! before anything leaves the process, previews dry runs locally, and
//! submits live orders exactly once. A failed submission is never retried
//! here: the result may be ambiguous and a retry could double-place.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use crate::client::BrokerageApi;
use crate::error::{Error, Result};
use crate::models::{NewOrder, OrderId};

use super::intent::{TradeDecision, TradeIntent, TradeMode};
use super::resolver::ResolvedAccount;

/// What a dry run would have submitted.
#[derive(Debug, Clone, Serialize)]
pub struct OrderPreview {
    /// Always "dry_run"
    pub mode: &'static str,
    /// Account display label (masked)
    pub account: String,
    /// Trading symbol
    pub symbol: String,
    /// "BUY" or "SELL"
    pub side: String,
    /// Share quantity
    pub quantity: u32,
    /// "MARKET" or "LIMIT"
    pub order_type: String,
    /// Limit price, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_price: Option<Decimal>,
}

/// A live order accepted by the brokerage.
#[derive(Debug, Clone, Serialize)]
pub struct OrderConfirmation {
    /// Always "live"
    pub mode: &'static str,
    /// Account display label (masked)
    pub account: String,
    /// Trading symbol
    pub symbol: String,
    /// "BUY" or "SELL"
    pub side: String,
    /// Share quantity
    pub quantity: u32,
    /// "MARKET" or "LIMIT"
    pub order_type: String,
    /// Limit price, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_price: Option<Decimal>,
    /// Order ID, when the brokerage returned one
    pub order_id: Option<OrderId>,
    /// HTTP status of the placement response
    pub status_code: u16,
}

/// Result of executing a cleared intent.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum TradeOutcome {
    /// Dry run: nothing was submitted
    Preview(OrderPreview),
    /// Live order accepted
    Placed(OrderConfirmation),
}

/// Executes trade intents the safety gate has cleared.
pub struct TradeExecutor {
    api: Arc<dyn BrokerageApi>,
}

impl TradeExecutor {
    /// Build an executor over the brokerage port.
    pub fn new(api: Arc<dyn BrokerageApi>) -> Self {
        Self { api }
    }

    /// Execute an evaluated intent.
    ///
    /// The order spec is validated before any external call; a rejected
    /// decision fails here without touching the brokerage.
    pub async fn execute(
        &self,
        intent: &TradeIntent,
        decision: &TradeDecision,
        account: &ResolvedAccount,
    ) -> Result<TradeOutcome> {
        validate(intent)?;

        match decision.mode {
            TradeMode::Rejected => Err(Error::TradeNotAllowed {
                reason: decision.reason.clone(),
            }),
            TradeMode::DryRun => Ok(TradeOutcome::Preview(OrderPreview {
                mode: "dry_run",
                account: account.display_label(),
                symbol: intent.symbol.to_string(),
                side: intent.side.to_string(),
                quantity: intent.quantity,
                order_type: intent.order_type().to_string(),
                limit_price: intent.limit_price,
            })),
            TradeMode::Live => self.place_live(intent, account).await,
        }
    }

    async fn place_live(
        &self,
        intent: &TradeIntent,
        account: &ResolvedAccount,
    ) -> Result<TradeOutcome> {
        let entries = self.api.get_account_numbers().await?;
        let hash = entries
            .iter()
            .find(|e| e.account_number == account.info.account_number)
            .map(|e| e.hash_value.clone())
            .ok_or_else(|| {
                Error::Config(format!(
                    "account {} not found at the brokerage",
                    account.display_label()
                ))
            })?;

        let order = build_order(intent);
        let placed = self.api.place_order(&hash, &order).await?;

        info!(
            account = %account.display_label(),
            trade = %intent.describe(),
            order_id = placed.order_id.as_ref().map(OrderId::as_str),
            "live order placed"
        );

        Ok(TradeOutcome::Placed(OrderConfirmation {
            mode: "live",
            account: account.display_label(),
            symbol: intent.symbol.to_string(),
            side: intent.side.to_string(),
            quantity: intent.quantity,
            order_type: intent.order_type().to_string(),
            limit_price: intent.limit_price,
            order_id: placed.order_id,
            status_code: placed.status_code,
        }))
    }
}

fn build_order(intent: &TradeIntent) -> NewOrder {
    match intent.limit_price {
        Some(price) => NewOrder::equity_limit(intent.side, &intent.symbol, intent.quantity, price),
        None => NewOrder::equity_market(intent.side, &intent.symbol, intent.quantity),
    }
}

fn validate(intent: &TradeIntent) -> Result<()> {
    if intent.symbol.is_empty() {
        return Err(Error::InvalidOrder("symbol must not be empty".into()));
    }
    if intent.quantity == 0 {
        return Err(Error::InvalidOrder(
            "quantity must be a positive whole number".into(),
        ));
    }
    if let Some(price) = intent.limit_price {
        if price <= Decimal::ZERO {
            return Err(Error::InvalidOrder("limit price must be positive".into()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockBrokerageApi;
    use crate::config::{AccountInfo, AccountType, TaxStatus};
    use crate::models::{AccountNumberEntry, OrderSide, PlacedOrder, Symbol};
    use crate::trade::intent::TradeDecision;
    use rust_decimal_macros::dec;

    fn resolved_account() -> ResolvedAccount {
        ResolvedAccount {
            alias: "acct_trading".into(),
            info: AccountInfo {
                account_number: "12345678".into(),
                name: String::new(),
                label: "Trading".into(),
                account_type: AccountType::IndividualTaxable,
                tax_status: TaxStatus::Taxable,
                category: "personal".into(),
                notes: String::new(),
            },
        }
    }

    fn intent(symbol: &str, quantity: u32, limit: Option<Decimal>, dry_run: bool) -> TradeIntent {
        TradeIntent {
            account_alias: "acct_trading".into(),
            symbol: Symbol::new(symbol),
            quantity,
            side: OrderSide::Buy,
            limit_price: limit,
            dry_run,
            assume_yes: false,
            non_interactive: false,
        }
    }

    #[tokio::test]
    async fn dry_run_never_calls_the_api() {
        // The mock has no expectations; any call would panic.
        let executor = TradeExecutor::new(Arc::new(MockBrokerageApi::new()));
        let outcome = executor
            .execute(
                &intent("AAPL", 10, None, true),
                &TradeDecision::dry_run(),
                &resolved_account(),
            )
            .await
            .unwrap();

        match outcome {
            TradeOutcome::Preview(preview) => {
                assert_eq!(preview.symbol, "AAPL");
                assert_eq!(preview.order_type, "MARKET");
                assert_eq!(preview.account, "Trading (...5678)");
            }
            other => panic!("expected preview, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn rejected_decision_fails_without_api_calls() {
        let executor = TradeExecutor::new(Arc::new(MockBrokerageApi::new()));
        let err = executor
            .execute(
                &intent("AAPL", 10, None, false),
                &TradeDecision::rejected("live trading disabled"),
                &resolved_account(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, Error::TradeNotAllowed { .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[tokio::test]
    async fn invalid_quantity_fails_before_any_call() {
        let executor = TradeExecutor::new(Arc::new(MockBrokerageApi::new()));
        let err = executor
            .execute(
                &intent("AAPL", 0, None, false),
                &TradeDecision::live("confirmed"),
                &resolved_account(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidOrder(_)));
    }

    #[tokio::test]
    async fn invalid_limit_price_fails_before_any_call() {
        let executor = TradeExecutor::new(Arc::new(MockBrokerageApi::new()));
        let err = executor
            .execute(
                &intent("AAPL", 1, Some(dec!(-5)), true),
                &TradeDecision::dry_run(),
                &resolved_account(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidOrder(_)));
    }

    #[tokio::test]
    async fn live_order_resolves_hash_and_places_once() {
        let mut mock = MockBrokerageApi::new();
        mock.expect_get_account_numbers().times(1).returning(|| {
            Ok(vec![AccountNumberEntry {
                account_number: "12345678".into(),
                hash_value: crate::models::AccountHash::new("HASH123"),
            }])
        });
        mock.expect_place_order()
            .times(1)
            .withf(|hash, order| {
                hash.as_str() == "HASH123"
                    && order.order_leg_collection[0].quantity == 3
                    && order.price == Some(dec!(150.00))
            })
            .returning(|_, _| {
                Ok(PlacedOrder {
                    order_id: Some(OrderId::new("987654")),
                    status_code: 201,
                })
            });

        let executor = TradeExecutor::new(Arc::new(mock));
        let outcome = executor
            .execute(
                &intent("AAPL", 3, Some(dec!(150.00)), false),
                &TradeDecision::live("confirmed"),
                &resolved_account(),
            )
            .await
            .unwrap();

        match outcome {
            TradeOutcome::Placed(confirmation) => {
                assert_eq!(confirmation.order_id.unwrap().as_str(), "987654");
                assert_eq!(confirmation.status_code, 201);
                assert_eq!(confirmation.order_type, "LIMIT");
            }
            other => panic!("expected placed order, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_account_at_brokerage_is_config_error() {
        let mut mock = MockBrokerageApi::new();
        mock.expect_get_account_numbers()
            .times(1)
            .returning(|| Ok(vec![]));

        let executor = TradeExecutor::new(Arc::new(mock));
        let err = executor
            .execute(
                &intent("AAPL", 1, None, false),
                &TradeDecision::live("confirmed"),
                &resolved_account(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
