//! The trading core: resolve, gate, execute, audit.
//!
//! A trade flows through this module in a fixed order. The resolver turns
//! an alias into an account; the safety gate evaluates the intent and
//! records the decision; the executor acts on the decision. The gate is
//! the only writer to the audit log.

mod audit;
mod executor;
mod gate;
mod intent;
mod resolver;

pub use audit::{AuditLog, AuditRecord};
pub use executor::{OrderConfirmation, OrderPreview, TradeExecutor, TradeOutcome};
pub use gate::{
    ConfirmationProvider, NonInteractiveConfirmation, SafetyConfig, TerminalConfirmation,
    TradeSafetyGate, CONFIRM_TOKEN,
};
pub use intent::{TradeDecision, TradeIntent, TradeMode};
pub use resolver::{AccountResolver, ResolvedAccount};
