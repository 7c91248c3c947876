//! Error types for the broker CLI.
//!
//! Every failure the CLI can surface is a variant here, so the binary
//! boundary can map errors onto the JSON envelope and an exit code
//! without string matching.

use serde_json::Value;
use thiserror::Error;

/// A specialized `Result` type for broker CLI operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for all broker CLI operations.
#[derive(Error, Debug)]
pub enum Error {
    /// An account alias was given but is not present in the config mapping.
    #[error("Unknown account alias '{0}'. Use 'broker accounts' to see available aliases")]
    UnknownAccount(String),

    /// No alias was given and no default account is configured.
    #[error("No account specified and no default account configured. Provide an account alias or set BROKER_DEFAULT_ACCOUNT")]
    MissingAccount,

    /// The trade-safety gate rejected the trade.
    #[error("Trade not allowed: {reason}")]
    TradeNotAllowed {
        /// Which safety condition failed.
        reason: String,
    },

    /// Order submission failed upstream. Never retried: resubmitting an
    /// ambiguous order risks a duplicate fill.
    #[error("Order execution failed (status {status:?}): {message}")]
    OrderExecution {
        /// HTTP status from the brokerage, if the request got that far
        status: Option<u16>,
        /// Upstream error message, verbatim
        message: String,
    },

    /// Order failed local validation before any external call.
    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    /// Configuration file or environment error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Token missing, malformed, or expired without a refresh path.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The brokerage API returned an error response.
    #[error("API error: status={status}, message={message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Human-readable error message
        message: String,
        /// Raw response body for debugging
        body: Value,
    },

    /// HTTP transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem failure (config, token, or audit log I/O).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Process exit code for this error.
    ///
    /// User, config, and safety errors exit 1; upstream API and transport
    /// failures exit 2.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::OrderExecution { .. } | Error::Api { .. } | Error::Http(_) => 2,
            _ => 1,
        }
    }

    /// Stable error-type name used in the JSON envelope's `error.type`.
    pub fn error_type(&self) -> &'static str {
        match self {
            Error::UnknownAccount(_) => "UnknownAccountError",
            Error::MissingAccount => "MissingAccountError",
            Error::TradeNotAllowed { .. } => "TradeNotAllowedError",
            Error::OrderExecution { .. } => "OrderExecutionError",
            Error::InvalidOrder(_) => "InvalidOrderError",
            Error::Config(_) => "ConfigError",
            Error::Auth(_) => "AuthError",
            Error::Api { .. } => "ApiError",
            Error::Http(_) => "HttpError",
            Error::Json(_) => "JsonError",
            Error::Io(_) => "IoError",
        }
    }

    /// Returns `true` if this error indicates a client-side issue
    /// (bad input, unknown alias, safety rejection).
    pub fn is_client_error(&self) -> bool {
        self.exit_code() == 1
    }

    /// Create an API error from an error response body.
    pub(crate) fn from_api_response(status: u16, body: Value) -> Self {
        let message = body
            .get("error")
            .and_then(|e| e.get("message"))
            .or_else(|| body.get("message"))
            .and_then(|m| m.as_str())
            .unwrap_or("Unknown API error")
            .to_string();

        Error::Api {
            status,
            message,
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_split_user_and_upstream_errors() {
        assert_eq!(Error::UnknownAccount("x".into()).exit_code(), 1);
        assert_eq!(Error::MissingAccount.exit_code(), 1);
        assert_eq!(
            Error::TradeNotAllowed {
                reason: "live trading disabled".into()
            }
            .exit_code(),
            1
        );
        assert_eq!(
            Error::OrderExecution {
                status: Some(500),
                message: "boom".into()
            }
            .exit_code(),
            2
        );
        assert_eq!(
            Error::Api {
                status: 403,
                message: "denied".into(),
                body: Value::Null
            }
            .exit_code(),
            2
        );
    }

    #[test]
    fn error_type_names_are_stable() {
        assert_eq!(Error::MissingAccount.error_type(), "MissingAccountError");
        assert_eq!(
            Error::TradeNotAllowed { reason: "x".into() }.error_type(),
            "TradeNotAllowedError"
        );
    }

    #[test]
    fn from_api_response_extracts_nested_message() {
        let body = serde_json::json!({
            "error": { "message": "Order validation failed" }
        });

        match Error::from_api_response(400, body) {
            Error::Api {
                status, message, ..
            } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Order validation failed");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }
}
