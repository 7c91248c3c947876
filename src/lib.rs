//! # broker-cli
//!
//! A safety-first command-line client for a brokerage account.
//!
//! Read-only queries (portfolio, positions, balances, quotes) are always
//! available; order placement goes through a layered safety gate that
//! makes accidental live trades structurally hard:
//!
//! - **Dry runs always work**: `--dry-run` previews an order without any
//!   submission, in any output mode.
//! - **Live trading is off by default**: it must be enabled per
//!   invocation (`--live`) or process-wide (`BROKER_ALLOW_LIVE_TRADES`).
//! - **Typed confirmation**: every live order requires typing `CONFIRM`
//!   at an interactive terminal. `--yes` only skips the initial yes/no
//!   prompt, never the typed token.
//! - **Scripts cannot trade**: JSON output mode and non-interactive
//!   sessions are limited to dry runs.
//! - **Everything is audited**: every evaluated trade intent is appended
//!   to a local JSONL audit log, whatever the outcome.
//!
//! Account numbers come from a local config file keyed by alias and are
//! masked to their last four digits in all output.
//!
//! ## Library usage
//!
//! The trading core is usable without the CLI:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use broker_cli::client::{ClientConfig, RestClient};
//! use broker_cli::auth::TokenStore;
//! use broker_cli::models::Symbol;
//!
//! # async fn run() -> broker_cli::Result<()> {
//! let token = TokenStore::load(std::path::Path::new("config/token.json"))?;
//! let client = RestClient::new(ClientConfig::new("https://api.schwabapi.com"), token)?;
//!
//! use broker_cli::client::BrokerageApi;
//! let quote = client.get_quote(&Symbol::new("AAPL")).await?;
//! println!("{}: {}", quote.symbol, quote.last_price);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod market;
pub mod models;
pub mod portfolio;
pub mod trade;

// Re-export primary types at crate root for convenience
pub use error::{Error, Result};
pub use models::{AccountNumber, OrderId, OrderSide, Symbol};

/// Prelude module for convenient imports.
///
/// ```rust
/// use broker_cli::prelude::*;
/// ```
pub mod prelude {
    pub use crate::client::{BrokerageApi, ClientConfig, RestClient};
    pub use crate::config::{AccountsConfig, Settings};
    pub use crate::error::{Error, Result};
    pub use crate::models::{AccountNumber, OrderId, OrderSide, OrderType, Symbol};
    pub use crate::trade::{
        AccountResolver, AuditLog, TradeExecutor, TradeIntent, TradeMode, TradeSafetyGate,
    };
}
