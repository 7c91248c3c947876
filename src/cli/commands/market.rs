//! Market-data commands.

use serde_json::json;

use crate::cli::output::{
    format_change, format_currency, format_header, format_percent, format_row, CommandOutput,
};
use crate::cli::App;
use crate::error::Result;
use crate::market::{build_indices_report, VixReport, INDEX_SYMBOLS, VIX_SYMBOL};
use crate::models::Symbol;

pub(crate) async fn quote(app: &App, symbols: &[String]) -> Result<CommandOutput> {
    let symbols: Vec<Symbol> = symbols.iter().map(Symbol::new).collect();
    let quotes = app.api.get_quotes(&symbols).await?;

    let mut text = format_header("QUOTES");
    for quote in &quotes {
        text.push('\n');
        text.push('\n');
        text.push_str(&format!("  {}", quote.symbol));
        text.push('\n');
        text.push_str(&format_row("Last:", format_currency(quote.last_price)));
        text.push('\n');
        text.push_str(&format_row(
            "Change:",
            format!(
                "{} ({}%)",
                format_change(quote.net_change),
                quote.net_percent_change.round_dp(2)
            ),
        ));
        if let (Some(bid), Some(ask)) = (quote.bid_price, quote.ask_price) {
            text.push('\n');
            text.push_str(&format_row(
                "Bid/Ask:",
                format!("{} / {}", format_currency(bid), format_currency(ask)),
            ));
        }
        if let Some(volume) = quote.total_volume {
            text.push('\n');
            text.push_str(&format_row("Volume:", volume));
        }
    }

    Ok(CommandOutput::new(json!({ "quotes": quotes }), text))
}

pub(crate) async fn vix(app: &App) -> Result<CommandOutput> {
    let quote = app.api.get_quote(&Symbol::new(VIX_SYMBOL)).await?;
    let report = VixReport::from_quote(&quote);

    let mut text = format_header("VOLATILITY INDEX");
    text.push('\n');
    text.push_str(&format_row("VIX:", report.vix.round_dp(2)));
    text.push('\n');
    text.push_str(&format_row(
        "Change:",
        format!(
            "{} ({})",
            report.change.round_dp(2),
            format_percent(report.change_pct)
        ),
    ));
    text.push('\n');
    text.push_str(&format_row("Signal:", report.interpretation));

    Ok(CommandOutput::new(&report, text))
}

pub(crate) async fn indices(app: &App) -> Result<CommandOutput> {
    let symbols: Vec<Symbol> = INDEX_SYMBOLS
        .iter()
        .map(|(symbol, _)| Symbol::new(symbol))
        .collect();
    let quotes = app.api.get_quotes(&symbols).await?;
    let report = build_indices_report(&quotes);

    let mut text = format_header("MARKET INDICES");
    for index in &report.indices {
        text.push('\n');
        text.push_str(&format_row(
            &format!("{}:", index.name),
            format!(
                "{} ({})",
                index.price.round_dp(2),
                format_percent(index.change_pct)
            ),
        ));
    }
    text.push('\n');
    text.push_str(&format_row("Sentiment:", report.sentiment.as_str()));

    Ok(CommandOutput::new(&report, text))
}
