//! Account payload models returned by the brokerage API.
//!
//! These mirror the upstream wire format (camelCase fields, accounts
//! wrapped in a `securitiesAccount` envelope) and deserialize leniently:
//! missing balances or positions default to zero/empty rather than
//! failing the whole payload.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::primitives::{AccountHash, AccountNumber, Symbol};

/// One entry from the account-numbers endpoint: the plain number plus the
/// opaque hash required by every account-scoped call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountNumberEntry {
    /// Plain account number
    pub account_number: AccountNumber,
    /// Opaque hash used in account-scoped API paths
    pub hash_value: AccountHash,
}

/// An account payload with balances and (optionally) positions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDetail {
    /// The actual account data
    pub securities_account: SecuritiesAccount,
}

/// The inner account object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecuritiesAccount {
    /// Plain account number
    #[serde(default)]
    pub account_number: String,
    /// Account type reported by the brokerage (e.g. "CASH", "MARGIN")
    #[serde(rename = "type", default)]
    pub account_type: String,
    /// Current balance snapshot
    #[serde(default)]
    pub current_balances: CurrentBalances,
    /// Open positions, present only when requested
    #[serde(default)]
    pub positions: Vec<Position>,
}

/// Balance snapshot for an account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentBalances {
    /// Total liquidation value of the account
    #[serde(default)]
    pub liquidation_value: Decimal,
    /// Settled cash balance
    #[serde(default)]
    pub cash_balance: Decimal,
    /// Available buying power
    #[serde(default)]
    pub buying_power: Decimal,
}

/// A single position within an account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    /// The held instrument
    #[serde(default)]
    pub instrument: Instrument,
    /// Long quantity held
    #[serde(default)]
    pub long_quantity: Decimal,
    /// Current market value
    #[serde(default)]
    pub market_value: Decimal,
    /// Average acquisition price
    #[serde(default)]
    pub average_price: Decimal,
    /// Unrealized profit/loss
    #[serde(default)]
    pub unrealized_profit_loss: Decimal,
    /// Unrealized profit/loss, percent
    #[serde(default)]
    pub unrealized_profit_loss_percentage: Decimal,
    /// Today's profit/loss
    #[serde(default)]
    pub current_day_profit_loss: Decimal,
    /// Today's profit/loss, percent
    #[serde(default)]
    pub current_day_profit_loss_percentage: Decimal,
}

/// Instrument description inside a position or order leg.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    /// Trading symbol
    #[serde(default = "empty_symbol")]
    pub symbol: Symbol,
    /// Asset type (e.g. "EQUITY", "COLLECTIVE_INVESTMENT")
    #[serde(default)]
    pub asset_type: String,
}

fn empty_symbol() -> Symbol {
    Symbol::new("")
}

impl Default for Instrument {
    fn default() -> Self {
        Self {
            symbol: empty_symbol(),
            asset_type: String::new(),
        }
    }
}
