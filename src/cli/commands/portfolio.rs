//! Read-only portfolio commands: summary, positions, balances, allocation,
//! performance.

use serde_json::json;

use crate::cli::output::{
    format_change, format_currency, format_header, format_percent, format_row, CommandOutput,
};
use crate::cli::App;
use crate::error::Result;
use crate::portfolio::{
    analyze_allocation, build_account_balances, build_performance_report, build_portfolio_summary,
    build_positions, PositionPerformance, PositionSummary,
};

pub(crate) async fn summary(app: &App) -> Result<CommandOutput> {
    let accounts = app.api.get_accounts().await?;
    let summary = build_portfolio_summary(&accounts, &app.accounts);

    let mut text = format_header("PORTFOLIO SUMMARY");
    text.push('\n');
    text.push_str(&format_row(
        "Total Value:",
        format_currency(summary.total_value),
    ));
    text.push('\n');
    text.push_str(&format_row(
        "Cash:",
        format!(
            "{} ({})",
            format_currency(summary.total_cash),
            format_percent(summary.cash_percentage)
        ),
    ));
    text.push('\n');
    text.push_str(&format_row(
        "Invested:",
        format_currency(summary.total_invested),
    ));
    text.push('\n');
    text.push_str(&format_row(
        "Unrealized P/L:",
        format_change(summary.total_unrealized_pl),
    ));
    text.push('\n');
    text.push_str(&format_row("Accounts:", summary.account_count));
    text.push('\n');
    text.push_str(&format_row("Positions:", summary.position_count));

    if !summary.positions.is_empty() {
        text.push('\n');
        text.push_str(&format_header("TOP POSITIONS"));
        for pos in summary.positions.iter().take(10) {
            text.push('\n');
            text.push_str(&position_row(pos));
        }
    }

    Ok(CommandOutput::new(&summary, text))
}

pub(crate) async fn positions(app: &App, symbol: Option<&str>) -> Result<CommandOutput> {
    let accounts = app.api.get_accounts().await?;
    let positions = build_positions(&accounts, &app.accounts, symbol);

    let title = match symbol {
        Some(s) => format!("POSITIONS: {}", s.to_uppercase()),
        None => "POSITIONS".to_string(),
    };
    let mut text = format_header(&title);
    if positions.is_empty() {
        text.push_str("\n  No positions found.");
    }
    for pos in &positions {
        text.push('\n');
        text.push_str(&position_row(pos));
    }

    Ok(CommandOutput::new(
        json!({ "positions": positions, "count": positions.len() }),
        text,
    ))
}

pub(crate) async fn balances(app: &App) -> Result<CommandOutput> {
    let accounts = app.api.get_accounts().await?;
    let balances = build_account_balances(&accounts, &app.accounts);

    let mut text = format_header("ACCOUNT BALANCES");
    for balance in &balances {
        text.push('\n');
        text.push_str(&format!(
            "\n  {} [{}]",
            balance.account, balance.account_type
        ));
        text.push('\n');
        text.push_str(&format_row(
            "Total Value:",
            format_currency(balance.total_value),
        ));
        text.push('\n');
        text.push_str(&format_row("Cash:", format_currency(balance.cash_balance)));
        text.push('\n');
        text.push_str(&format_row(
            "Buying Power:",
            format_currency(balance.buying_power),
        ));
        text.push('\n');
        text.push_str(&format_row(
            "Invested:",
            format_currency(balance.invested_amount),
        ));
    }

    Ok(CommandOutput::new(json!({ "accounts": balances }), text))
}

pub(crate) async fn allocation(app: &App) -> Result<CommandOutput> {
    let accounts = app.api.get_accounts().await?;
    let report = analyze_allocation(&accounts);

    let mut text = format_header("ALLOCATION ANALYSIS");
    text.push('\n');
    text.push_str(&format_row(
        "Diversification:",
        format!("{}/100", report.diversification_score),
    ));

    text.push_str("\n\n  By asset type:");
    for (asset_type, slice) in &report.by_asset_type {
        text.push('\n');
        text.push_str(&format_row(
            &format!("{asset_type}:"),
            format!(
                "{} ({})",
                format_currency(slice.value),
                format_percent(slice.percentage)
            ),
        ));
    }

    if !report.concentration_risks.is_empty() {
        text.push_str("\n\n  Concentration risks:");
        for risk in &report.concentration_risks {
            text.push('\n');
            text.push_str(&format_row(
                &format!("{}:", risk.symbol),
                format!("{} of portfolio ({})", format_percent(risk.percentage), risk.risk_level),
            ));
        }
    }

    text.push_str("\n\n  Top holdings:");
    for holding in &report.top_holdings {
        text.push('\n');
        text.push_str(&format_row(
            &format!("{}:", holding.symbol),
            format!(
                "{} ({})",
                format_currency(holding.value),
                format_percent(holding.percentage)
            ),
        ));
    }

    Ok(CommandOutput::new(&report, text))
}

pub(crate) async fn performance(app: &App) -> Result<CommandOutput> {
    let accounts = app.api.get_accounts().await?;
    let report = build_performance_report(&accounts);

    let mut text = format_header("TODAY'S PERFORMANCE");
    text.push('\n');
    text.push_str(&format_row(
        "Total Value:",
        format_currency(report.total_value),
    ));
    text.push('\n');
    text.push_str(&format_row(
        "Day Change:",
        format!(
            "{} ({})",
            format_change(report.daily_change),
            format_percent(report.daily_change_pct)
        ),
    ));
    text.push('\n');
    text.push_str(&format_row(
        "Unrealized P/L:",
        format_change(report.total_unrealized_pl),
    ));

    if !report.winners.is_empty() {
        text.push_str("\n\n  Winners:");
        for mover in &report.winners {
            text.push('\n');
            text.push_str(&mover_row(mover));
        }
    }
    if !report.losers.is_empty() {
        text.push_str("\n\n  Losers:");
        for mover in &report.losers {
            text.push('\n');
            text.push_str(&mover_row(mover));
        }
    }

    Ok(CommandOutput::new(&report, text))
}

fn mover_row(mover: &PositionPerformance) -> String {
    format!(
        "  {:<8} {:>12} ({})",
        mover.symbol,
        format_change(mover.day_pl),
        format_percent(mover.day_pl_pct)
    )
}

fn position_row(pos: &PositionSummary) -> String {
    format!(
        "  {:<8} {:>10} {:>14}  {:>8}  [{}]",
        pos.symbol,
        pos.quantity.round_dp(2),
        format_currency(pos.market_value),
        format_percent(pos.day_pl_pct),
        pos.account
    )
}
