//! The brokerage collaborator port.
//!
//! Everything the CLI needs from the brokerage is behind this trait, so
//! command and trade logic never depend on HTTP directly and tests can
//! substitute a mock.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    AccountDetail, AccountHash, AccountNumberEntry, NewOrder, Order, PlacedOrder, Quote, Symbol,
};

/// Operations exposed by the external brokerage API.
///
/// The wire protocol, authentication lifecycle, and payload parsing all
/// live behind this boundary; callers treat it as opaque.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BrokerageApi: Send + Sync {
    /// List account numbers with the opaque hash values required for
    /// account-scoped calls.
    async fn get_account_numbers(&self) -> Result<Vec<AccountNumberEntry>>;

    /// Fetch all accounts with balances and positions.
    async fn get_accounts(&self) -> Result<Vec<AccountDetail>>;

    /// Quote a single symbol.
    async fn get_quote(&self, symbol: &Symbol) -> Result<Quote>;

    /// Quote several symbols at once.
    async fn get_quotes(&self, symbols: &[Symbol]) -> Result<Vec<Quote>>;

    /// List orders for an account.
    async fn get_orders(&self, account: &AccountHash) -> Result<Vec<Order>>;

    /// Submit an order. Callers must not retry on failure: an ambiguous
    /// submission result means a possible duplicate order.
    async fn place_order(&self, account: &AccountHash, order: &NewOrder) -> Result<PlacedOrder>;
}
