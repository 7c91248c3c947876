//! Market-level analysis built on quote data.
//!
//! Pure interpretation of quotes for the volatility index and the major
//! indices; fetching stays in the client layer. Thresholds follow common
//! VIX reading conventions.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::Quote;

/// Quote symbol for the CBOE volatility index.
pub const VIX_SYMBOL: &str = "$VIX";

/// The major indices we report, symbol → display name.
pub const INDEX_SYMBOLS: &[(&str, &str)] = &[
    ("$SPX", "S&P 500"),
    ("$COMPX", "Nasdaq Composite"),
    ("$DJI", "Dow Jones"),
    ("$VIX", "VIX (Fear Index)"),
    ("$RUT", "Russell 2000"),
];

/// Volatility regime read off the VIX level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VixSignal {
    /// Below 15
    LowFear,
    /// 15 to 20
    Normal,
    /// 20 to 30
    Elevated,
    /// 30 to 40
    HighFear,
    /// 40 and above
    ExtremeFear,
}

impl VixSignal {
    /// Classify a VIX level.
    pub fn from_level(vix: Decimal) -> Self {
        if vix < Decimal::from(15) {
            VixSignal::LowFear
        } else if vix < Decimal::from(20) {
            VixSignal::Normal
        } else if vix < Decimal::from(30) {
            VixSignal::Elevated
        } else if vix < Decimal::from(40) {
            VixSignal::HighFear
        } else {
            VixSignal::ExtremeFear
        }
    }

    /// One-line reading of the regime.
    pub fn interpretation(&self) -> &'static str {
        match self {
            VixSignal::LowFear => "Market complacent - consider hedging",
            VixSignal::Normal => "Normal market conditions",
            VixSignal::Elevated => "Elevated uncertainty - be cautious",
            VixSignal::HighFear => "High fear - potential opportunity",
            VixSignal::ExtremeFear => "Extreme fear - crisis levels",
        }
    }
}

/// VIX level with its interpretation.
#[derive(Debug, Clone, Serialize)]
pub struct VixReport {
    /// Current VIX level
    pub vix: Decimal,
    /// Net change from previous close
    pub change: Decimal,
    /// Net change, percent
    pub change_pct: Decimal,
    /// Classified regime
    pub signal: VixSignal,
    /// One-line reading
    pub interpretation: &'static str,
}

impl VixReport {
    /// Interpret a VIX quote.
    pub fn from_quote(quote: &Quote) -> Self {
        let signal = VixSignal::from_level(quote.last_price);
        Self {
            vix: quote.last_price,
            change: quote.net_change,
            change_pct: quote.net_percent_change,
            signal,
            interpretation: signal.interpretation(),
        }
    }
}

/// Overall market mood derived from the S&P change and the VIX level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketSentiment {
    /// Broad index up over 1% with a calm VIX
    RiskOn,
    /// Broad index down over 1% or VIX above 25
    RiskOff,
    /// Anything in between
    Neutral,
}

impl MarketSentiment {
    /// Stable string form used in output.
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketSentiment::RiskOn => "risk_on",
            MarketSentiment::RiskOff => "risk_off",
            MarketSentiment::Neutral => "neutral",
        }
    }
}

/// One index row in the indices report.
#[derive(Debug, Clone, Serialize)]
pub struct IndexQuote {
    /// Index quote symbol
    pub symbol: String,
    /// Display name
    pub name: String,
    /// Last price
    pub price: Decimal,
    /// Net change from previous close
    pub change: Decimal,
    /// Net change, percent
    pub change_pct: Decimal,
}

/// Major index quotes with a sentiment read.
#[derive(Debug, Clone, Serialize)]
pub struct IndicesReport {
    /// Indices in [`INDEX_SYMBOLS`] order, skipping any the API omitted
    pub indices: Vec<IndexQuote>,
    /// Overall market mood
    pub sentiment: MarketSentiment,
}

/// Build the indices report from whatever quotes came back.
pub fn build_indices_report(quotes: &[Quote]) -> IndicesReport {
    let mut indices = Vec::new();
    for (symbol, name) in INDEX_SYMBOLS {
        if let Some(quote) = quotes.iter().find(|q| q.symbol.as_str() == *symbol) {
            indices.push(IndexQuote {
                symbol: symbol.to_string(),
                name: name.to_string(),
                price: quote.last_price,
                change: quote.net_change,
                change_pct: quote.net_percent_change,
            });
        }
    }

    let spx_change = indices
        .iter()
        .find(|i| i.symbol == "$SPX")
        .map(|i| i.change_pct)
        .unwrap_or(Decimal::ZERO);
    // A missing VIX quote reads as calm, matching a neutral default of 20
    let vix_level = indices
        .iter()
        .find(|i| i.symbol == VIX_SYMBOL)
        .map(|i| i.price)
        .unwrap_or_else(|| Decimal::from(20));

    let sentiment = if spx_change > Decimal::ONE && vix_level < Decimal::from(20) {
        MarketSentiment::RiskOn
    } else if spx_change < -Decimal::ONE || vix_level > Decimal::from(25) {
        MarketSentiment::RiskOff
    } else {
        MarketSentiment::Neutral
    };

    IndicesReport { indices, sentiment }
}
