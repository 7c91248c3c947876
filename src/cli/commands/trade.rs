//! The buy/sell command path: resolve, gate, execute.

use serde_json::json;

use crate::cli::output::{format_currency, format_header, format_row, CommandOutput};
use crate::cli::{App, TradeArgs};
use crate::error::Result;
use crate::models::{OrderSide, Symbol};
use crate::trade::{
    AccountResolver, AuditLog, ConfirmationProvider, NonInteractiveConfirmation, SafetyConfig,
    TerminalConfirmation, TradeExecutor, TradeIntent, TradeOutcome, TradeSafetyGate,
};

pub(crate) async fn execute(app: &App, side: OrderSide, args: &TradeArgs) -> Result<CommandOutput> {
    let resolver = AccountResolver::new(
        app.accounts.clone(),
        app.settings.default_account.clone(),
    );
    let account = resolver.resolve(args.account.as_deref())?;

    let intent = TradeIntent {
        account_alias: account.alias.clone(),
        symbol: Symbol::new(&args.symbol),
        quantity: args.quantity,
        side,
        limit_price: args.limit,
        dry_run: args.dry_run,
        assume_yes: args.yes,
        non_interactive: !app.interactive,
    };

    let safety = SafetyConfig {
        live_enabled: args.live || app.settings.allow_live_trades,
        json_mode: app.output.is_json(),
    };
    let confirmation: Box<dyn ConfirmationProvider> = if app.interactive {
        Box::new(TerminalConfirmation)
    } else {
        Box::new(NonInteractiveConfirmation)
    };
    let gate = TradeSafetyGate::new(
        safety,
        confirmation,
        AuditLog::new(app.settings.audit_log_path.clone()),
    );

    let decision = gate.evaluate(&intent)?;
    let executor = TradeExecutor::new(app.api.clone());
    let outcome = executor.execute(&intent, &decision, &account).await?;

    Ok(render(&outcome))
}

fn render(outcome: &TradeOutcome) -> CommandOutput {
    match outcome {
        TradeOutcome::Preview(preview) => {
            let mut text = format_header("ORDER PREVIEW (DRY RUN)");
            text.push('\n');
            text.push_str(&format_row("Account:", &preview.account));
            text.push('\n');
            text.push_str(&format_row(
                "Order:",
                format!("{} {} {}", preview.side, preview.quantity, preview.symbol),
            ));
            text.push('\n');
            text.push_str(&format_row("Type:", &preview.order_type));
            if let Some(price) = preview.limit_price {
                text.push('\n');
                text.push_str(&format_row("Limit:", format_currency(price)));
            }
            text.push_str("\n\n  No order was submitted.");

            CommandOutput::new(
                json!({ "preview": preview, "submitted": false, "dry_run": true }),
                text,
            )
        }
        TradeOutcome::Placed(confirmation) => {
            let mut text = format_header("ORDER PLACED");
            text.push('\n');
            text.push_str(&format_row("Account:", &confirmation.account));
            text.push('\n');
            text.push_str(&format_row(
                "Order:",
                format!(
                    "{} {} {}",
                    confirmation.side, confirmation.quantity, confirmation.symbol
                ),
            ));
            text.push('\n');
            text.push_str(&format_row("Type:", &confirmation.order_type));
            if let Some(price) = confirmation.limit_price {
                text.push('\n');
                text.push_str(&format_row("Limit:", format_currency(price)));
            }
            text.push('\n');
            text.push_str(&format_row(
                "Order ID:",
                confirmation
                    .order_id
                    .as_ref()
                    .map_or("(not returned)", |id| id.as_str()),
            ));

            CommandOutput::new(
                json!({ "order": confirmation, "submitted": true, "dry_run": false }),
                text,
            )
        }
    }
}
