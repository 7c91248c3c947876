//! Append-only trade audit log.
//!
//! Every evaluated trade intent lands here as one JSON line, whatever the
//! decision was. Records are never rewritten or deleted.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

use super::intent::{TradeDecision, TradeIntent, TradeMode};

/// One audit log entry: an intent plus the decision made about it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    /// When the decision was made
    pub timestamp: DateTime<Utc>,
    /// Account alias the trade targeted
    pub account_alias: String,
    /// Symbol
    pub symbol: String,
    /// "BUY" or "SELL"
    pub side: String,
    /// Whole-share quantity
    pub quantity: u32,
    /// Limit price, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_price: Option<Decimal>,
    /// Decided mode: "dry_run", "live", or "rejected"
    pub mode: String,
    /// The decision reason
    pub reason: String,
}

impl AuditRecord {
    /// Build a record from an intent and its decision, stamped now.
    pub fn from_decision(intent: &TradeIntent, decision: &TradeDecision) -> Self {
        Self {
            timestamp: Utc::now(),
            account_alias: intent.account_alias.clone(),
            symbol: intent.symbol.to_string(),
            side: intent.side.to_string(),
            quantity: intent.quantity,
            limit_price: intent.limit_price,
            mode: decision.mode.as_str().to_string(),
            reason: decision.reason.clone(),
        }
    }

    /// Whether this record describes a rejected intent.
    pub fn is_rejected(&self) -> bool {
        self.mode == TradeMode::Rejected.as_str()
    }
}

/// JSONL audit log backed by a local file.
#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    /// Create a log handle for the given file path. The file and its
    /// parent directory are created lazily on first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The log file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record as a single JSON line.
    pub fn append(&self, record: &AuditRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    Error::Config(format!(
                        "cannot create audit log directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        let line = serde_json::to_string(record)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")?;

        debug!(path = %self.path.display(), mode = %record.mode, "audit record appended");
        Ok(())
    }

    /// Read all records back, oldest first. Malformed lines are an error;
    /// the log is append-only and should never contain them.
    pub fn read_all(&self) -> Result<Vec<AuditRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        raw.lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str(l).map_err(Error::from))
            .collect()
    }
}
