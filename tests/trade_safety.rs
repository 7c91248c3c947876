//! End-to-end checks of the trade path: resolver → safety gate →
//! executor → audit log, over a fake brokerage.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rust_decimal_macros::dec;

use broker_cli::client::BrokerageApi;
use broker_cli::config::{AccountInfo, AccountType, AccountsConfig, TaxStatus};
use broker_cli::error::{Error, Result};
use broker_cli::models::{
    AccountDetail, AccountHash, AccountNumberEntry, NewOrder, Order, OrderId, OrderSide,
    PlacedOrder, Quote, Symbol,
};
use broker_cli::trade::{
    AccountResolver, AuditLog, ConfirmationProvider, NonInteractiveConfirmation, SafetyConfig,
    TradeExecutor, TradeIntent, TradeMode, TradeOutcome, TradeSafetyGate,
};

/// In-memory brokerage that records every order it receives.
#[derive(Default)]
struct FakeBrokerage {
    placed: Mutex<Vec<(AccountHash, NewOrder)>>,
    calls: AtomicUsize,
    place_calls: AtomicUsize,
    reject_orders: bool,
}

#[async_trait]
impl BrokerageApi for FakeBrokerage {
    async fn get_account_numbers(&self) -> Result<Vec<AccountNumberEntry>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![AccountNumberEntry {
            account_number: "12345678".into(),
            hash_value: AccountHash::new("HASH-TRADING"),
        }])
    }

    async fn get_accounts(&self) -> Result<Vec<AccountDetail>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![])
    }

    async fn get_quote(&self, symbol: &Symbol) -> Result<Quote> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(Error::Api {
            status: 404,
            message: format!("no quote for {symbol}"),
            body: serde_json::Value::Null,
        })
    }

    async fn get_quotes(&self, _symbols: &[Symbol]) -> Result<Vec<Quote>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![])
    }

    async fn get_orders(&self, _account: &AccountHash) -> Result<Vec<Order>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![])
    }

    async fn place_order(&self, account: &AccountHash, order: &NewOrder) -> Result<PlacedOrder> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.place_calls.fetch_add(1, Ordering::SeqCst);
        if self.reject_orders {
            return Err(Error::OrderExecution {
                status: Some(400),
                message: "order rejected: insufficient buying power".into(),
            });
        }
        self.placed
            .lock()
            .unwrap()
            .push((account.clone(), order.clone()));
        Ok(PlacedOrder {
            order_id: Some(OrderId::new("1004055538123")),
            status_code: 201,
        })
    }
}

struct TypedConfirm;
impl ConfirmationProvider for TypedConfirm {
    fn confirm(&self, _intent: &TradeIntent) -> Result<bool> {
        Ok(true)
    }
}

struct TypedDecline;
impl ConfirmationProvider for TypedDecline {
    fn confirm(&self, _intent: &TradeIntent) -> Result<bool> {
        Ok(false)
    }
}

fn accounts_config() -> AccountsConfig {
    let mut map = BTreeMap::new();
    map.insert(
        "acct_trading".to_string(),
        AccountInfo {
            account_number: "12345678".into(),
            name: "Jordan".into(),
            label: "Trading".into(),
            account_type: AccountType::IndividualTaxable,
            tax_status: TaxStatus::Taxable,
            category: "personal".into(),
            notes: String::new(),
        },
    );
    AccountsConfig::from_map(map)
}

fn intent(dry_run: bool, non_interactive: bool) -> TradeIntent {
    TradeIntent {
        account_alias: "acct_trading".into(),
        symbol: Symbol::new("AAPL"),
        quantity: 10,
        side: OrderSide::Buy,
        limit_price: Some(dec!(150.00)),
        dry_run,
        assume_yes: false,
        non_interactive,
    }
}

struct Harness {
    _dir: tempfile::TempDir,
    audit: AuditLog,
    api: Arc<FakeBrokerage>,
    executor: TradeExecutor,
    resolver: AccountResolver,
}

impl Harness {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let audit = AuditLog::new(dir.path().join("audit.jsonl"));
        let api = Arc::new(FakeBrokerage::default());
        let executor = TradeExecutor::new(api.clone());
        let resolver = AccountResolver::new(accounts_config(), None);
        Self {
            _dir: dir,
            audit,
            api,
            executor,
            resolver,
        }
    }

    fn gate(
        &self,
        live_enabled: bool,
        json_mode: bool,
        confirmation: Box<dyn ConfirmationProvider>,
    ) -> TradeSafetyGate {
        TradeSafetyGate::new(
            SafetyConfig {
                live_enabled,
                json_mode,
            },
            confirmation,
            self.audit.clone(),
        )
    }
}

#[tokio::test]
async fn dry_run_previews_without_touching_the_brokerage() {
    let h = Harness::new();
    let account = h.resolver.resolve(Some("acct_trading")).unwrap();

    // Hostile settings everywhere: dry run must still work
    let gate = h.gate(false, true, Box::new(NonInteractiveConfirmation));
    let decision = gate.evaluate(&intent(true, true)).unwrap();
    assert_eq!(decision.mode, TradeMode::DryRun);

    let outcome = h
        .executor
        .execute(&intent(true, true), &decision, &account)
        .await
        .unwrap();

    match outcome {
        TradeOutcome::Preview(preview) => {
            assert_eq!(preview.symbol, "AAPL");
            assert_eq!(preview.order_type, "LIMIT");
            // Masked label only, never the raw number
            assert_eq!(preview.account, "Trading (...5678)");
            assert!(!preview.account.contains("12345678"));
        }
        other => panic!("expected preview, got {other:?}"),
    }
    assert_eq!(h.api.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn live_order_blocked_without_enable_toggle() {
    let h = Harness::new();
    let account = h.resolver.resolve(Some("acct_trading")).unwrap();

    let gate = h.gate(false, false, Box::new(TypedConfirm));
    let decision = gate.evaluate(&intent(false, false)).unwrap();
    assert_eq!(decision.mode, TradeMode::Rejected);

    let err = h
        .executor
        .execute(&intent(false, false), &decision, &account)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::TradeNotAllowed { .. }));
    assert_eq!(err.exit_code(), 1);
    assert_eq!(h.api.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn live_order_blocked_in_json_mode_even_when_enabled() {
    let h = Harness::new();
    let gate = h.gate(true, true, Box::new(TypedConfirm));
    let decision = gate.evaluate(&intent(false, false)).unwrap();
    assert_eq!(decision.mode, TradeMode::Rejected);
    assert!(decision.reason.contains("JSON"));
}

#[tokio::test]
async fn live_order_blocked_without_a_terminal() {
    let h = Harness::new();
    let gate = h.gate(true, false, Box::new(TypedConfirm));
    let decision = gate.evaluate(&intent(false, true)).unwrap();
    assert_eq!(decision.mode, TradeMode::Rejected);
    assert!(decision.reason.contains("interactive"));
}

#[tokio::test]
async fn confirmed_live_order_is_placed_exactly_once() {
    let h = Harness::new();
    let account = h.resolver.resolve(Some("acct_trading")).unwrap();

    let gate = h.gate(true, false, Box::new(TypedConfirm));
    let decision = gate.evaluate(&intent(false, false)).unwrap();
    assert_eq!(decision.mode, TradeMode::Live);

    let outcome = h
        .executor
        .execute(&intent(false, false), &decision, &account)
        .await
        .unwrap();

    match outcome {
        TradeOutcome::Placed(confirmation) => {
            assert_eq!(confirmation.order_id.unwrap().as_str(), "1004055538123");
            assert_eq!(confirmation.status_code, 201);
        }
        other => panic!("expected placed order, got {other:?}"),
    }

    let placed = h.api.placed.lock().unwrap();
    assert_eq!(placed.len(), 1);
    let (hash, order) = &placed[0];
    assert_eq!(hash.as_str(), "HASH-TRADING");
    assert_eq!(order.order_leg_collection[0].quantity, 10);
    assert_eq!(order.price, Some(dec!(150.00)));
}

#[tokio::test]
async fn placement_failure_surfaces_upstream_error_without_retry() {
    let mut h = Harness::new();
    let api = Arc::new(FakeBrokerage {
        reject_orders: true,
        ..FakeBrokerage::default()
    });
    h.executor = TradeExecutor::new(api.clone());
    let account = h.resolver.resolve(Some("acct_trading")).unwrap();

    let gate = h.gate(true, false, Box::new(TypedConfirm));
    let decision = gate.evaluate(&intent(false, false)).unwrap();

    let err = h
        .executor
        .execute(&intent(false, false), &decision, &account)
        .await
        .unwrap_err();

    match err {
        Error::OrderExecution {
            status,
            ref message,
        } => {
            assert_eq!(status, Some(400));
            assert!(message.contains("buying power"));
        }
        ref other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.exit_code(), 2);
    assert_eq!(api.place_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn declined_confirmation_rejects_the_order() {
    let h = Harness::new();
    let account = h.resolver.resolve(Some("acct_trading")).unwrap();

    let gate = h.gate(true, false, Box::new(TypedDecline));
    let decision = gate.evaluate(&intent(false, false)).unwrap();
    assert_eq!(decision.mode, TradeMode::Rejected);
    assert!(decision.reason.contains("not confirmed"));

    let err = h
        .executor
        .execute(&intent(false, false), &decision, &account)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::TradeNotAllowed { .. }));
    assert!(h.api.placed.lock().unwrap().is_empty());
}

#[tokio::test]
async fn every_evaluated_intent_lands_in_the_audit_log() {
    let h = Harness::new();

    h.gate(false, false, Box::new(TypedDecline))
        .evaluate(&intent(true, false))
        .unwrap();
    h.gate(false, false, Box::new(TypedDecline))
        .evaluate(&intent(false, false))
        .unwrap();
    h.gate(true, false, Box::new(TypedConfirm))
        .evaluate(&intent(false, false))
        .unwrap();

    let records = h.audit.read_all().unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].mode, "dry_run");
    assert_eq!(records[1].mode, "rejected");
    assert_eq!(records[2].mode, "live");

    for record in &records {
        assert_eq!(record.account_alias, "acct_trading");
        assert_eq!(record.symbol, "AAPL");
        assert_eq!(record.quantity, 10);
        assert!(!record.reason.is_empty());
    }
}

#[tokio::test]
async fn unknown_alias_is_a_user_error() {
    let h = Harness::new();
    let err = h.resolver.resolve(Some("acct_missing")).unwrap_err();
    assert!(matches!(err, Error::UnknownAccount(_)));
    assert!(err.to_string().contains("acct_missing"));
    assert_eq!(err.exit_code(), 1);
}

#[tokio::test]
async fn missing_default_account_is_a_user_error() {
    let h = Harness::new();
    let err = h.resolver.resolve(None).unwrap_err();
    assert!(matches!(err, Error::MissingAccount));
    assert_eq!(err.exit_code(), 1);
}

#[tokio::test]
async fn zero_quantity_fails_validation_before_any_call() {
    let h = Harness::new();
    let account = h.resolver.resolve(Some("acct_trading")).unwrap();

    let mut bad = intent(true, false);
    bad.quantity = 0;
    let gate = h.gate(false, false, Box::new(TypedDecline));
    let decision = gate.evaluate(&bad).unwrap();

    let err = h
        .executor
        .execute(&bad, &decision, &account)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidOrder(_)));
    assert_eq!(h.api.calls.load(Ordering::SeqCst), 0);
}
