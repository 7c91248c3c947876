//! Data models for the brokerage API.
//!
//! Strongly-typed structures for everything that crosses the wire:
//!
//! - [`primitives`] - Core newtypes like `Symbol`, `AccountNumber`, `AccountHash`
//! - [`account`] - Account, balance, and position payloads
//! - [`order`] - Order specs and order read models
//! - [`market_data`] - Quote payloads

pub mod account;
pub mod market_data;
pub mod order;
pub mod primitives;

pub use account::*;
pub use market_data::*;
pub use order::*;
pub use primitives::*;
