//! Quote models returned by the market-data endpoints.
//!
//! The quotes endpoint returns a map keyed by symbol; each entry nests the
//! actual quote under a `quote` object.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::primitives::Symbol;

/// Response shape of the quotes endpoint: symbol → entry.
pub type QuoteMap = BTreeMap<String, QuoteEntry>;

/// One symbol's entry in the quote map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteEntry {
    /// The nested quote data
    #[serde(default)]
    pub quote: QuoteData,
}

/// The quote fields we consume.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteData {
    /// Last traded price
    #[serde(default)]
    pub last_price: Decimal,
    /// Net change from previous close
    #[serde(default)]
    pub net_change: Decimal,
    /// Net change, percent
    #[serde(default)]
    pub net_percent_change: Decimal,
    /// Total volume for the day
    #[serde(default)]
    pub total_volume: Option<u64>,
    /// Bid price
    #[serde(default)]
    pub bid_price: Option<Decimal>,
    /// Ask price
    #[serde(default)]
    pub ask_price: Option<Decimal>,
}

/// A normalized quote for a single symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    /// The symbol quoted
    pub symbol: Symbol,
    /// Last traded price
    pub last_price: Decimal,
    /// Net change from previous close
    pub net_change: Decimal,
    /// Net change, percent
    pub net_percent_change: Decimal,
    /// Total volume for the day
    pub total_volume: Option<u64>,
    /// Bid price
    pub bid_price: Option<Decimal>,
    /// Ask price
    pub ask_price: Option<Decimal>,
}

impl Quote {
    /// Flatten a quote-map entry into a normalized quote.
    pub fn from_entry(symbol: &str, entry: &QuoteEntry) -> Self {
        Self {
            symbol: Symbol::new(symbol),
            last_price: entry.quote.last_price,
            net_change: entry.quote.net_change,
            net_percent_change: entry.quote.net_percent_change,
            total_volume: entry.quote.total_volume,
            bid_price: entry.quote.bid_price,
            ask_price: entry.quote.ask_price,
        }
    }
}
