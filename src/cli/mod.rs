//! Command-line interface: argument parsing and command dispatch.

mod commands;
pub mod output;

use std::io::IsTerminal;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use tracing::debug;

use crate::auth::TokenStore;
use crate::client::{BrokerageApi, ClientConfig, RestClient};
use crate::config::{AccountsConfig, Settings};
use crate::error::Result;
use crate::models::OrderSide;

use output::OutputMode;

/// Safe CLI for brokerage accounts: read-only queries plus a guarded
/// order path.
#[derive(Debug, Parser)]
#[command(name = "broker", version, about)]
pub struct Cli {
    /// Output format (also settable via BROKER_OUTPUT)
    #[arg(long, global = true, value_enum)]
    pub output: Option<OutputArg>,

    /// Shorthand for --output json
    #[arg(long, global = true, conflicts_with = "output")]
    pub json: bool,

    /// Treat the session as non-interactive even at a terminal
    #[arg(long, global = true)]
    pub non_interactive: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputArg {
    /// Human-readable text
    Text,
    /// Machine-readable JSON envelope
    Json,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show a portfolio summary across all accounts
    Portfolio,
    /// List positions, optionally filtered by symbol
    Positions {
        /// Only show positions in this symbol
        #[arg(long)]
        symbol: Option<String>,
    },
    /// Show per-account balances
    Balance,
    /// Analyze allocation and concentration
    Allocation,
    /// Show today's winners and losers
    Performance,
    /// Quote one or more symbols
    Quote {
        /// Symbols to quote
        #[arg(required = true)]
        symbols: Vec<String>,
    },
    /// Show the VIX level with an interpretation
    Vix,
    /// Show the major indices with a sentiment read
    Indices,
    /// List configured accounts (numbers masked)
    Accounts,
    /// List orders for an account
    Orders {
        /// Account alias (defaults to BROKER_DEFAULT_ACCOUNT)
        #[arg(long)]
        account: Option<String>,
    },
    /// Buy shares
    Buy(TradeArgs),
    /// Sell shares
    Sell(TradeArgs),
}

impl Command {
    /// Stable command name used in the response envelope.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Portfolio => "portfolio",
            Command::Positions { .. } => "positions",
            Command::Balance => "balance",
            Command::Allocation => "allocation",
            Command::Performance => "performance",
            Command::Quote { .. } => "quote",
            Command::Vix => "vix",
            Command::Indices => "indices",
            Command::Accounts => "accounts",
            Command::Orders { .. } => "orders",
            Command::Buy(_) => "buy",
            Command::Sell(_) => "sell",
        }
    }
}

/// Shared arguments for `buy` and `sell`.
#[derive(Debug, Args)]
pub struct TradeArgs {
    /// Symbol to trade
    pub symbol: String,

    /// Whole-share quantity
    pub quantity: u32,

    /// Limit price (omit for a market order)
    #[arg(long)]
    pub limit: Option<Decimal>,

    /// Account alias (defaults to BROKER_DEFAULT_ACCOUNT)
    #[arg(long)]
    pub account: Option<String>,

    /// Preview the order without submitting anything
    #[arg(long)]
    pub dry_run: bool,

    /// Enable live trading for this invocation
    #[arg(long)]
    pub live: bool,

    /// Skip the yes/no prompt (typing CONFIRM is still required)
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Everything a command handler needs, wired once per invocation.
pub struct App {
    /// Brokerage port; swapped for a fake in tests
    pub api: Arc<dyn BrokerageApi>,
    /// Loaded account config
    pub accounts: AccountsConfig,
    /// Environment settings snapshot
    pub settings: Settings,
    /// Resolved output mode
    pub output: OutputMode,
    /// Whether stdin and stdout are attached to a terminal
    pub interactive: bool,
}

impl App {
    /// Wire the application from settings and the resolved output mode.
    ///
    /// Loads the accounts file and auth token, then builds the REST
    /// client. An expired token gets a single refresh attempt when
    /// refresh credentials are configured; otherwise wiring fails with an
    /// auth error before any command runs. `force_non_interactive`
    /// disables prompting even at a terminal.
    pub async fn from_settings(
        settings: Settings,
        output: OutputMode,
        force_non_interactive: bool,
    ) -> Result<Self> {
        let accounts = AccountsConfig::load(&settings.accounts_file)?;

        let mut token = TokenStore::load(&settings.token_file)?;
        if !token.is_fresh() {
            match (&settings.client_id, &settings.client_secret) {
                (Some(client_id), Some(client_secret)) => {
                    token
                        .refresh(&settings.api_base_url, client_id, client_secret)
                        .await?;
                }
                _ => token.ensure_fresh()?,
            }
        }

        let client = RestClient::new(ClientConfig::new(settings.api_base_url.clone()), token)?;

        debug!(accounts = accounts.len(), "application wired");
        Ok(Self {
            api: Arc::new(client),
            accounts,
            settings,
            output,
            interactive: !force_non_interactive
                && std::io::stdin().is_terminal()
                && std::io::stdout().is_terminal(),
        })
    }

    /// Run one parsed command to completion.
    pub async fn run(&self, command: &Command) -> Result<output::CommandOutput> {
        match command {
            Command::Portfolio => commands::portfolio::summary(self).await,
            Command::Positions { symbol } => {
                commands::portfolio::positions(self, symbol.as_deref()).await
            }
            Command::Balance => commands::portfolio::balances(self).await,
            Command::Allocation => commands::portfolio::allocation(self).await,
            Command::Performance => commands::portfolio::performance(self).await,
            Command::Quote { symbols } => commands::market::quote(self, symbols).await,
            Command::Vix => commands::market::vix(self).await,
            Command::Indices => commands::market::indices(self).await,
            Command::Accounts => commands::accounts::list(self),
            Command::Orders { account } => {
                commands::accounts::orders(self, account.as_deref()).await
            }
            Command::Buy(args) => commands::trade::execute(self, OrderSide::Buy, args).await,
            Command::Sell(args) => commands::trade::execute(self, OrderSide::Sell, args).await,
        }
    }
}

/// Resolve the output mode from the CLI flags and environment, flags first.
pub fn resolve_output_mode(
    flag: Option<OutputArg>,
    json_flag: bool,
    settings: &Settings,
) -> OutputMode {
    if json_flag {
        return OutputMode::Json;
    }
    match flag {
        Some(OutputArg::Json) => OutputMode::Json,
        Some(OutputArg::Text) => OutputMode::Text,
        None => match settings.output_mode.as_deref() {
            Some("json") => OutputMode::Json,
            _ => OutputMode::Text,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_with_output(mode: Option<&str>) -> Settings {
        Settings {
            default_account: None,
            allow_live_trades: false,
            output_mode: mode.map(String::from),
            audit_log_path: "audit.jsonl".into(),
            accounts_file: "accounts.json".into(),
            token_file: "token.json".into(),
            api_base_url: "https://example.com".into(),
            client_id: None,
            client_secret: None,
        }
    }

    #[test]
    fn cli_parses_trade_command() {
        let cli = Cli::try_parse_from([
            "broker", "buy", "AAPL", "10", "--limit", "150.25", "--dry-run",
        ])
        .unwrap();

        match cli.command {
            Command::Buy(args) => {
                assert_eq!(args.symbol, "AAPL");
                assert_eq!(args.quantity, 10);
                assert!(args.dry_run);
                assert!(!args.live);
                assert_eq!(args.limit.unwrap().to_string(), "150.25");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_rejects_fractional_quantity() {
        assert!(Cli::try_parse_from(["broker", "buy", "AAPL", "1.5"]).is_err());
    }

    #[test]
    fn cli_requires_quote_symbols() {
        assert!(Cli::try_parse_from(["broker", "quote"]).is_err());
    }

    #[test]
    fn flag_overrides_environment_output_mode() {
        let settings = settings_with_output(Some("json"));
        assert_eq!(
            resolve_output_mode(Some(OutputArg::Text), false, &settings),
            OutputMode::Text
        );
        assert_eq!(
            resolve_output_mode(None, false, &settings),
            OutputMode::Json
        );
        assert_eq!(
            resolve_output_mode(None, false, &settings_with_output(None)),
            OutputMode::Text
        );
        assert_eq!(
            resolve_output_mode(None, true, &settings_with_output(None)),
            OutputMode::Json
        );
    }

    #[test]
    fn market_and_performance_commands_parse() {
        let vix = Cli::try_parse_from(["broker", "vix"]).unwrap();
        assert!(matches!(vix.command, Command::Vix));
        assert_eq!(vix.command.name(), "vix");

        let indices = Cli::try_parse_from(["broker", "indices"]).unwrap();
        assert!(matches!(indices.command, Command::Indices));

        let perf = Cli::try_parse_from(["broker", "performance"]).unwrap();
        assert_eq!(perf.command.name(), "performance");
    }

    #[test]
    fn json_shorthand_parses_globally() {
        let cli = Cli::try_parse_from(["broker", "portfolio", "--json"]).unwrap();
        assert!(cli.json);
        assert!(Cli::try_parse_from(["broker", "portfolio", "--json", "--output", "text"]).is_err());
    }
}
