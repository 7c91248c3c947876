//! Output rendering: the JSON response envelope and text helpers.
//!
//! Every command renders either human-readable text or a versioned JSON
//! envelope; nothing else ever reaches stdout. Errors in text mode go to
//! stderr.

use chrono::{SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::Error;

/// Envelope schema version. Bump only on breaking envelope changes.
pub const SCHEMA_VERSION: u32 = 1;

/// How command results are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text
    Text,
    /// Machine-readable JSON envelope
    Json,
}

impl OutputMode {
    /// Returns `true` for JSON output.
    pub fn is_json(&self) -> bool {
        *self == OutputMode::Json
    }
}

/// The versioned response envelope emitted in JSON mode.
///
/// `data` and `error` are always present; exactly one of them is non-null.
#[derive(Debug, Serialize)]
pub struct Envelope {
    /// Envelope schema version, currently 1
    pub schema_version: u32,
    /// The command that produced this response
    pub command: String,
    /// When the response was produced (UTC, second precision)
    pub timestamp: String,
    /// Whether the command succeeded
    pub success: bool,
    /// Command payload on success, null on failure
    pub data: Value,
    /// Error details on failure, null on success
    pub error: Value,
}

impl Envelope {
    /// Build a success envelope around a payload.
    pub fn success(command: &str, data: impl Serialize) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            command: command.to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            success: true,
            data: serde_json::to_value(data).unwrap_or(Value::Null),
            error: Value::Null,
        }
    }

    /// Build a failure envelope from a command error.
    pub fn failure(command: &str, error: &Error) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            command: command.to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            success: false,
            data: Value::Null,
            error: json!({
                "type": error.error_type(),
                "message": error.to_string(),
            }),
        }
    }

    /// Render as pretty-printed JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// A rendered command result: the JSON payload plus its text rendering.
#[derive(Debug)]
pub struct CommandOutput {
    /// Payload for the JSON envelope
    pub data: Value,
    /// Human-readable rendering for text mode
    pub text: String,
}

impl CommandOutput {
    /// Build from a serializable payload and its text form.
    pub fn new(data: impl Serialize, text: impl Into<String>) -> Self {
        Self {
            data: serde_json::to_value(data).unwrap_or(Value::Null),
            text: text.into(),
        }
    }
}

/// Section header used by text renderings.
pub fn format_header(title: &str) -> String {
    let bar = "=".repeat(60);
    format!("\n{bar}\n{title}\n{bar}")
}

/// Label/value row with a fixed label column.
pub fn format_row(label: &str, value: impl std::fmt::Display) -> String {
    format!("  {label:<22} {value}")
}

/// `$1,234.56`-style currency formatting.
pub fn format_currency(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    let negative = rounded.is_sign_negative();
    let abs = rounded.abs();

    let raw = format!("{abs:.2}");
    let (whole, frac) = raw.split_once('.').unwrap_or((raw.as_str(), "00"));

    let mut grouped = String::new();
    for (i, c) in whole.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let grouped: String = grouped.chars().rev().collect();

    if negative {
        format!("-${grouped}.{frac}")
    } else {
        format!("${grouped}.{frac}")
    }
}

/// Signed percentage, e.g. `+3.20%`.
pub fn format_percent(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    if rounded > Decimal::ZERO {
        format!("+{rounded:.2}%")
    } else {
        format!("{rounded:.2}%")
    }
}

/// Signed currency change, e.g. `+$120.00`.
pub fn format_change(value: Decimal) -> String {
    if value > Decimal::ZERO {
        format!("+{}", format_currency(value))
    } else {
        format_currency(value)
    }
}
