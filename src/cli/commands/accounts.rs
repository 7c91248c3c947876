//! Account commands: the configured account list and order history.

use serde_json::json;

use crate::cli::output::{format_currency, format_header, format_row, CommandOutput};
use crate::cli::App;
use crate::error::Result;
use crate::trade::AccountResolver;

/// List configured accounts. Purely local; account numbers stay masked.
pub(crate) fn list(app: &App) -> Result<CommandOutput> {
    let accounts: Vec<_> = app
        .accounts
        .iter()
        .map(|(alias, info)| {
            json!({
                "alias": alias,
                "label": info.label,
                "account_number": info.account_number.masked(),
                "type": info.account_type,
                "tax_status": info.tax_status,
                "category": info.category,
            })
        })
        .collect();

    let mut text = format_header("CONFIGURED ACCOUNTS");
    for (alias, info) in app.accounts.iter() {
        text.push('\n');
        text.push_str(&format_row(alias, info.display_label()));
    }
    if app.accounts.is_empty() {
        text.push_str("\n  No accounts configured.");
    }

    Ok(CommandOutput::new(json!({ "accounts": accounts }), text))
}

/// List orders for one account.
pub(crate) async fn orders(app: &App, alias: Option<&str>) -> Result<CommandOutput> {
    let resolver = AccountResolver::new(
        app.accounts.clone(),
        app.settings.default_account.clone(),
    );
    let account = resolver.resolve(alias)?;

    let entries = app.api.get_account_numbers().await?;
    let hash = entries
        .iter()
        .find(|e| e.account_number == account.info.account_number)
        .map(|e| e.hash_value.clone())
        .ok_or_else(|| {
            crate::error::Error::Config(format!(
                "account {} not found at the brokerage",
                account.display_label()
            ))
        })?;

    let orders = app.api.get_orders(&hash).await?;

    let mut text = format_header(&format!("ORDERS: {}", account.display_label()));
    if orders.is_empty() {
        text.push_str("\n  No orders found.");
    }
    for order in &orders {
        let leg = order.order_leg_collection.first();
        let (instruction, quantity, symbol) = match leg {
            Some(leg) => (
                leg.instruction.as_str(),
                leg.quantity.to_string(),
                leg.instrument.symbol.to_string(),
            ),
            None => ("?", "?".to_string(), "?".to_string()),
        };
        let price = order
            .price
            .map(format_currency)
            .unwrap_or_else(|| "market".to_string());
        text.push('\n');
        text.push_str(&format!(
            "  #{:<12} {:<10} {} {} {} @ {}",
            order.order_id.map_or_else(|| "?".to_string(), |id| id.to_string()),
            order.status,
            instruction,
            quantity,
            symbol,
            price,
        ));
    }

    Ok(CommandOutput::new(
        json!({ "account": account.display_label(), "orders": orders }),
        text,
    ))
}
