//! The trade safety gate.
//!
//! Every trade intent passes through [`TradeSafetyGate::evaluate`] before
//! anything can be submitted. The gate applies the safety rules in order,
//! prompts for confirmation when a live order needs one, and appends
//! exactly one audit record per evaluated intent before returning.

use dialoguer::{Confirm, Input};
use tracing::{info, warn};

use crate::config::LIVE_TRADES_ENV;
use crate::error::Result;

use super::audit::{AuditLog, AuditRecord};
use super::intent::{TradeDecision, TradeIntent};

/// The exact token a user must type to clear a live order.
pub const CONFIRM_TOKEN: &str = "CONFIRM";

/// Safety-relevant runtime state, fixed before evaluation.
#[derive(Debug, Clone, Copy)]
pub struct SafetyConfig {
    /// Live trading enabled via flag or environment
    pub live_enabled: bool,
    /// Output is machine-readable JSON (live orders are blocked)
    pub json_mode: bool,
}

/// How the gate asks the user to confirm a live order.
///
/// Interactive sessions prompt on the terminal; non-interactive ones
/// refuse rather than guess.
pub trait ConfirmationProvider {
    /// Ask the user to confirm the described trade. `Ok(false)` means a
    /// clean decline; errors mean the prompt itself failed.
    fn confirm(&self, intent: &TradeIntent) -> Result<bool>;
}

/// Terminal prompts: a yes/no question followed by a typed token.
///
/// The `--yes` flag skips the yes/no question but never the token; an
/// exact typed `CONFIRM` is always required before a live order.
#[derive(Debug, Default)]
pub struct TerminalConfirmation;

impl ConfirmationProvider for TerminalConfirmation {
    fn confirm(&self, intent: &TradeIntent) -> Result<bool> {
        if !intent.assume_yes {
            let proceed = Confirm::new()
                .with_prompt(format!("Submit live order: {}?", intent.describe()))
                .default(false)
                .interact()
                .map_err(|e| std::io::Error::other(e.to_string()))?;
            if !proceed {
                return Ok(false);
            }
        }

        let typed: String = Input::new()
            .with_prompt(format!("Type {CONFIRM_TOKEN} to place this order"))
            .allow_empty(true)
            .interact_text()
            .map_err(|e| std::io::Error::other(e.to_string()))?;

        Ok(typed.trim() == CONFIRM_TOKEN)
    }
}

/// Always declines: used when no terminal is attached.
#[derive(Debug, Default)]
pub struct NonInteractiveConfirmation;

impl ConfirmationProvider for NonInteractiveConfirmation {
    fn confirm(&self, _intent: &TradeIntent) -> Result<bool> {
        Ok(false)
    }
}

/// Applies the safety rules to trade intents and records every decision.
pub struct TradeSafetyGate {
    config: SafetyConfig,
    confirmation: Box<dyn ConfirmationProvider>,
    audit: AuditLog,
}

impl TradeSafetyGate {
    /// Build a gate with the given confirmation provider and audit log.
    pub fn new(
        config: SafetyConfig,
        confirmation: Box<dyn ConfirmationProvider>,
        audit: AuditLog,
    ) -> Self {
        Self {
            config,
            confirmation,
            audit,
        }
    }

    /// Evaluate an intent against the safety rules.
    ///
    /// Appends exactly one audit record regardless of the outcome. The
    /// rules apply in a fixed order: dry runs always pass; then the
    /// live-trading toggle, the output mode, and interactivity are
    /// checked; only then is the user prompted.
    pub fn evaluate(&self, intent: &TradeIntent) -> Result<TradeDecision> {
        let decision = self.decide(intent);
        self.audit
            .append(&AuditRecord::from_decision(intent, &decision))?;

        if decision.allowed {
            info!(mode = decision.mode.as_str(), trade = %intent.describe(), "trade cleared");
        } else {
            warn!(reason = %decision.reason, trade = %intent.describe(), "trade rejected");
        }
        Ok(decision)
    }

    fn decide(&self, intent: &TradeIntent) -> TradeDecision {
        if intent.dry_run {
            return TradeDecision::dry_run();
        }

        if !self.config.live_enabled {
            return TradeDecision::rejected(format!(
                "live trading is disabled (pass --live or set {LIVE_TRADES_ENV}=true)"
            ));
        }

        if self.config.json_mode {
            return TradeDecision::rejected(
                "live orders are not allowed with JSON output; use --dry-run",
            );
        }

        if intent.non_interactive {
            return TradeDecision::rejected(
                "live orders require an interactive terminal for confirmation",
            );
        }

        match self.confirmation.confirm(intent) {
            Ok(true) => TradeDecision::live("confirmed by user"),
            Ok(false) => TradeDecision::rejected("not confirmed by user"),
            Err(e) => TradeDecision::rejected(format!("confirmation failed: {e}")),
        }
    }
}
