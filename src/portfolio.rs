//! Portfolio aggregation over raw account payloads.
//!
//! Pure functions from `Vec<AccountDetail>` to summary reports. Money
//! market funds are treated as cash equivalents throughout. Account
//! numbers never appear unmasked in any output structure.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::AccountsConfig;
use crate::models::{AccountDetail, AccountNumber};

/// Money market fund symbols treated as cash equivalents.
pub const MONEY_MARKET_SYMBOLS: &[&str] = &["SWGXX", "SWVXX", "SNOXX", "SNSXX", "SNVXX"];

fn is_money_market(symbol: &str) -> bool {
    MONEY_MARKET_SYMBOLS.contains(&symbol)
}

fn percent_of(part: Decimal, total: Decimal) -> Decimal {
    if total > Decimal::ZERO {
        (part / total * Decimal::ONE_HUNDRED).round_dp(2)
    } else {
        Decimal::ZERO
    }
}

/// One position row in a summary, with the account identified only by
/// label and last-four digits.
#[derive(Debug, Clone, Serialize)]
pub struct PositionSummary {
    /// Trading symbol
    pub symbol: String,
    /// Shares held
    pub quantity: Decimal,
    /// Current market value
    pub market_value: Decimal,
    /// Average acquisition price
    pub average_price: Decimal,
    /// Unrealized profit/loss
    pub unrealized_pl: Decimal,
    /// Unrealized profit/loss, percent
    pub unrealized_pl_pct: Decimal,
    /// Today's profit/loss
    pub day_pl: Decimal,
    /// Today's profit/loss, percent
    pub day_pl_pct: Decimal,
    /// Account display label
    pub account: String,
    /// Last four digits of the account number
    pub account_number_last4: String,
    /// Asset type reported upstream
    pub asset_type: String,
    /// Share of total portfolio value, percent
    pub percentage: Decimal,
}

/// Whole-portfolio summary with cash/invested breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioSummary {
    /// Total portfolio value across accounts
    pub total_value: Decimal,
    /// Cash plus money market funds
    pub total_cash: Decimal,
    /// Value held in securities
    pub total_invested: Decimal,
    /// Sum of unrealized profit/loss
    pub total_unrealized_pl: Decimal,
    /// Cash as a percent of total value
    pub cash_percentage: Decimal,
    /// Number of accounts aggregated
    pub account_count: usize,
    /// Number of non-cash positions
    pub position_count: usize,
    /// Positions, largest market value first
    pub positions: Vec<PositionSummary>,
}

/// Build the portfolio summary from raw account payloads.
pub fn build_portfolio_summary(
    accounts: &[AccountDetail],
    config: &AccountsConfig,
) -> PortfolioSummary {
    let mut total_value = Decimal::ZERO;
    let mut total_cash = Decimal::ZERO;
    let mut positions: Vec<PositionSummary> = Vec::new();

    for detail in accounts {
        let account = &detail.securities_account;
        let number = AccountNumber::new(account.account_number.clone());
        let label = config.label_for_number(&number);

        total_value += account.current_balances.liquidation_value;
        let mut cash = account.current_balances.cash_balance;

        for pos in &account.positions {
            let symbol = pos.instrument.symbol.as_str();
            if is_money_market(symbol) {
                cash += pos.market_value;
                continue;
            }
            positions.push(PositionSummary {
                symbol: symbol.to_string(),
                quantity: pos.long_quantity,
                market_value: pos.market_value,
                average_price: pos.average_price,
                unrealized_pl: pos.unrealized_profit_loss,
                unrealized_pl_pct: pos.unrealized_profit_loss_percentage,
                day_pl: pos.current_day_profit_loss,
                day_pl_pct: pos.current_day_profit_loss_percentage,
                account: label.clone(),
                account_number_last4: number.last_four().to_string(),
                asset_type: pos.instrument.asset_type.clone(),
                percentage: Decimal::ZERO, // filled in below once totals are known
            });
        }

        total_cash += cash;
    }

    positions.sort_by(|a, b| b.market_value.cmp(&a.market_value));

    let total_unrealized_pl: Decimal = positions.iter().map(|p| p.unrealized_pl).sum();
    for pos in &mut positions {
        pos.percentage = percent_of(pos.market_value, total_value);
    }

    PortfolioSummary {
        total_value,
        total_cash,
        total_invested: total_value - total_cash,
        total_unrealized_pl,
        cash_percentage: percent_of(total_cash, total_value),
        account_count: accounts.len(),
        position_count: positions.len(),
        positions,
    }
}

/// Build detailed positions across accounts, optionally filtered by symbol.
pub fn build_positions(
    accounts: &[AccountDetail],
    config: &AccountsConfig,
    symbol_filter: Option<&str>,
) -> Vec<PositionSummary> {
    let filter = symbol_filter.map(str::to_uppercase);
    let total_value: Decimal = accounts
        .iter()
        .map(|a| a.securities_account.current_balances.liquidation_value)
        .sum();

    let mut positions: Vec<PositionSummary> = Vec::new();
    for detail in accounts {
        let account = &detail.securities_account;
        let number = AccountNumber::new(account.account_number.clone());
        let label = config.label_for_number(&number);

        for pos in &account.positions {
            let symbol = pos.instrument.symbol.as_str();
            if let Some(ref wanted) = filter {
                if symbol != wanted {
                    continue;
                }
            }
            positions.push(PositionSummary {
                symbol: symbol.to_string(),
                quantity: pos.long_quantity,
                market_value: pos.market_value,
                average_price: pos.average_price,
                unrealized_pl: pos.unrealized_profit_loss,
                unrealized_pl_pct: pos.unrealized_profit_loss_percentage,
                day_pl: pos.current_day_profit_loss,
                day_pl_pct: pos.current_day_profit_loss_percentage,
                account: label.clone(),
                account_number_last4: number.last_four().to_string(),
                asset_type: pos.instrument.asset_type.clone(),
                percentage: percent_of(pos.market_value, total_value),
            });
        }
    }

    positions.sort_by(|a, b| b.market_value.cmp(&a.market_value));
    positions
}

/// Balance summary for one account.
#[derive(Debug, Clone, Serialize)]
pub struct AccountBalanceSummary {
    /// Account display label
    pub account: String,
    /// Account type reported upstream
    pub account_type: String,
    /// Total account value
    pub total_value: Decimal,
    /// Cash including money market funds
    pub cash_balance: Decimal,
    /// Available buying power
    pub buying_power: Decimal,
    /// Value held in securities
    pub invested_amount: Decimal,
}

/// Build per-account balance summaries.
pub fn build_account_balances(
    accounts: &[AccountDetail],
    config: &AccountsConfig,
) -> Vec<AccountBalanceSummary> {
    accounts
        .iter()
        .map(|detail| {
            let account = &detail.securities_account;
            let number = AccountNumber::new(account.account_number.clone());

            let money_market_cash: Decimal = account
                .positions
                .iter()
                .filter(|p| is_money_market(p.instrument.symbol.as_str()))
                .map(|p| p.market_value)
                .sum();

            let total_value = account.current_balances.liquidation_value;
            let total_cash = account.current_balances.cash_balance + money_market_cash;

            AccountBalanceSummary {
                account: config.label_for_number(&number),
                account_type: account.account_type.clone(),
                total_value,
                cash_balance: total_cash,
                buying_power: account.current_balances.buying_power,
                invested_amount: total_value - total_cash,
            }
        })
        .collect()
}

/// One asset-type slice of the allocation breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct AllocationSlice {
    /// Market value in this asset type
    pub value: Decimal,
    /// Percent of portfolio
    pub percentage: Decimal,
}

/// A holding flagged for concentration.
#[derive(Debug, Clone, Serialize)]
pub struct ConcentrationRisk {
    /// Trading symbol
    pub symbol: String,
    /// Percent of portfolio
    pub percentage: Decimal,
    /// Market value
    pub value: Decimal,
    /// "High" above 20%, otherwise "Medium"
    pub risk_level: String,
}

/// One of the largest holdings.
#[derive(Debug, Clone, Serialize)]
pub struct TopHolding {
    /// Trading symbol
    pub symbol: String,
    /// Percent of portfolio
    pub percentage: Decimal,
    /// Market value
    pub value: Decimal,
}

/// Allocation and concentration analysis.
#[derive(Debug, Clone, Serialize)]
pub struct AllocationReport {
    /// 0-100; 100 means perfectly diversified (1 - HHI, scaled)
    pub diversification_score: Decimal,
    /// Breakdown by upstream asset type
    pub by_asset_type: BTreeMap<String, AllocationSlice>,
    /// Holdings above 10% of the portfolio
    pub concentration_risks: Vec<ConcentrationRisk>,
    /// Up to 15 largest holdings by percentage
    pub top_holdings: Vec<TopHolding>,
}

/// Analyze portfolio allocation and concentration.
pub fn analyze_allocation(accounts: &[AccountDetail]) -> AllocationReport {
    let mut total_value = Decimal::ZERO;
    let mut symbol_values: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut type_values: BTreeMap<String, Decimal> = BTreeMap::new();

    for detail in accounts {
        for pos in &detail.securities_account.positions {
            let symbol = pos.instrument.symbol.as_str().to_string();
            let asset_type = if pos.instrument.asset_type.is_empty() {
                "Unknown".to_string()
            } else {
                pos.instrument.asset_type.clone()
            };

            total_value += pos.market_value;
            *symbol_values.entry(symbol).or_default() += pos.market_value;
            *type_values.entry(asset_type).or_default() += pos.market_value;
        }
    }

    let by_asset_type = type_values
        .into_iter()
        .map(|(asset_type, value)| {
            (
                asset_type,
                AllocationSlice {
                    value,
                    percentage: percent_of(value, total_value),
                },
            )
        })
        .collect();

    let mut concentration_risks = Vec::new();
    let mut top_holdings: Vec<TopHolding> = Vec::new();
    let mut hhi = Decimal::ZERO;

    for (symbol, value) in &symbol_values {
        let pct = percent_of(*value, total_value);
        top_holdings.push(TopHolding {
            symbol: symbol.clone(),
            percentage: pct,
            value: *value,
        });

        if pct > Decimal::TEN {
            concentration_risks.push(ConcentrationRisk {
                symbol: symbol.clone(),
                percentage: pct,
                value: *value,
                risk_level: if pct > Decimal::from(20) {
                    "High".to_string()
                } else {
                    "Medium".to_string()
                },
            });
        }

        if total_value > Decimal::ZERO {
            let weight = *value / total_value;
            hhi += weight * weight;
        }
    }

    top_holdings.sort_by(|a, b| b.percentage.cmp(&a.percentage));
    top_holdings.truncate(15);

    AllocationReport {
        diversification_score: ((Decimal::ONE - hhi) * Decimal::ONE_HUNDRED).round_dp(2),
        by_asset_type,
        concentration_risks,
        top_holdings,
    }
}

/// Day profit/loss for one holding in the performance report.
#[derive(Debug, Clone, Serialize)]
pub struct PositionPerformance {
    /// Trading symbol
    pub symbol: String,
    /// Today's profit/loss
    pub day_pl: Decimal,
    /// Today's profit/loss, percent
    pub day_pl_pct: Decimal,
    /// Unrealized profit/loss
    pub unrealized_pl: Decimal,
    /// Current market value
    pub market_value: Decimal,
}

/// Today's portfolio performance with the biggest movers.
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceReport {
    /// Total portfolio value across accounts
    pub total_value: Decimal,
    /// Today's total profit/loss
    pub daily_change: Decimal,
    /// Today's change relative to yesterday's close value, percent
    pub daily_change_pct: Decimal,
    /// Sum of unrealized profit/loss
    pub total_unrealized_pl: Decimal,
    /// Up to five biggest gainers today, best first
    pub winners: Vec<PositionPerformance>,
    /// Up to five biggest losers today, worst first
    pub losers: Vec<PositionPerformance>,
}

/// Build today's performance report from raw account payloads.
///
/// Money market funds are excluded from the movers; the percent change is
/// computed against yesterday's implied value (today's value minus today's
/// move) and left at zero when that value is not positive.
pub fn build_performance_report(accounts: &[AccountDetail]) -> PerformanceReport {
    let mut total_value = Decimal::ZERO;
    let mut daily_change = Decimal::ZERO;
    let mut total_unrealized_pl = Decimal::ZERO;
    let mut movers: Vec<PositionPerformance> = Vec::new();

    for detail in accounts {
        let account = &detail.securities_account;
        total_value += account.current_balances.liquidation_value;

        for pos in &account.positions {
            let symbol = pos.instrument.symbol.as_str();
            if is_money_market(symbol) {
                continue;
            }
            daily_change += pos.current_day_profit_loss;
            total_unrealized_pl += pos.unrealized_profit_loss;
            movers.push(PositionPerformance {
                symbol: symbol.to_string(),
                day_pl: pos.current_day_profit_loss,
                day_pl_pct: pos.current_day_profit_loss_percentage,
                unrealized_pl: pos.unrealized_profit_loss,
                market_value: pos.market_value,
            });
        }
    }

    let yesterday_value = total_value - daily_change;
    let daily_change_pct = if yesterday_value > Decimal::ZERO {
        (daily_change / yesterday_value * Decimal::ONE_HUNDRED).round_dp(2)
    } else {
        Decimal::ZERO
    };

    let mut winners: Vec<PositionPerformance> = movers
        .iter()
        .filter(|p| p.day_pl > Decimal::ZERO)
        .cloned()
        .collect();
    winners.sort_by(|a, b| b.day_pl.cmp(&a.day_pl));
    winners.truncate(5);

    let mut losers: Vec<PositionPerformance> = movers
        .into_iter()
        .filter(|p| p.day_pl < Decimal::ZERO)
        .collect();
    losers.sort_by(|a, b| a.day_pl.cmp(&b.day_pl));
    losers.truncate(5);

    PerformanceReport {
        total_value,
        daily_change,
        daily_change_pct,
        total_unrealized_pl,
        winners,
        losers,
    }
}
