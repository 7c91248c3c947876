//! Process-wide settings resolved from the environment at startup.
//!
//! All environment reads happen here, once. Business logic (the safety
//! gate in particular) receives plain values and never touches ambient
//! state itself.

use std::env;
use std::path::PathBuf;

use secrecy::SecretString;

/// Environment variable naming the default account alias.
pub const DEFAULT_ACCOUNT_ENV: &str = "BROKER_DEFAULT_ACCOUNT";
/// Environment variable enabling live trading process-wide.
pub const LIVE_TRADES_ENV: &str = "BROKER_ALLOW_LIVE_TRADES";
/// Environment variable selecting the default output mode.
pub const OUTPUT_ENV: &str = "BROKER_OUTPUT";
/// Environment variable overriding the audit log path.
pub const AUDIT_LOG_ENV: &str = "BROKER_AUDIT_LOG";
/// Environment variable overriding the accounts file path.
pub const ACCOUNTS_FILE_ENV: &str = "BROKER_ACCOUNTS_FILE";
/// Environment variable overriding the token file path.
pub const TOKEN_FILE_ENV: &str = "BROKER_TOKEN_FILE";
/// Environment variable overriding the API base URL.
pub const API_BASE_URL_ENV: &str = "BROKER_API_BASE_URL";
/// Environment variable holding the OAuth client ID (token refresh only).
pub const CLIENT_ID_ENV: &str = "BROKER_CLIENT_ID";
/// Environment variable holding the OAuth client secret (token refresh only).
pub const CLIENT_SECRET_ENV: &str = "BROKER_CLIENT_SECRET";

/// Settings snapshot taken at process start.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Default account alias used when a command omits the account
    pub default_account: Option<String>,
    /// Process-wide live-trading toggle
    pub allow_live_trades: bool,
    /// Output mode from the environment ("json"/"text"), if set
    pub output_mode: Option<String>,
    /// Audit log path
    pub audit_log_path: PathBuf,
    /// Accounts file path
    pub accounts_file: PathBuf,
    /// Token file path
    pub token_file: PathBuf,
    /// API base URL
    pub api_base_url: String,
    /// OAuth client ID, needed only to refresh an expired token
    pub client_id: Option<String>,
    /// OAuth client secret, needed only to refresh an expired token
    pub client_secret: Option<SecretString>,
}

impl Settings {
    /// Capture settings from the process environment.
    pub fn from_env() -> Self {
        Self {
            default_account: non_empty(DEFAULT_ACCOUNT_ENV),
            allow_live_trades: env_flag(LIVE_TRADES_ENV),
            output_mode: non_empty(OUTPUT_ENV).map(|s| s.to_lowercase()),
            audit_log_path: non_empty(AUDIT_LOG_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data/trade_audit.jsonl")),
            accounts_file: non_empty(ACCOUNTS_FILE_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("config/accounts.json")),
            token_file: non_empty(TOKEN_FILE_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("config/token.json")),
            api_base_url: non_empty(API_BASE_URL_ENV)
                .unwrap_or_else(|| "https://api.schwabapi.com".to_string()),
            client_id: non_empty(CLIENT_ID_ENV),
            client_secret: non_empty(CLIENT_SECRET_ENV).map(SecretString::from),
        }
    }
}

fn non_empty(var: &str) -> Option<String> {
    env::var(var).ok().filter(|v| !v.trim().is_empty())
}

/// Truthy parsing for boolean env toggles: "true", "1", "yes".
pub fn env_flag(var: &str) -> bool {
    matches!(
        env::var(var)
            .unwrap_or_default()
            .trim()
            .to_lowercase()
            .as_str(),
        "true" | "1" | "yes"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env-var tests mutate process state; each test uses its own variable
    // name to stay independent of test ordering.

    #[test]
    fn env_flag_accepts_truthy_values() {
        for (value, expected) in [
            ("true", true),
            ("1", true),
            ("yes", true),
            ("TRUE", true),
            (" yes ", true),
            ("false", false),
            ("0", false),
            ("", false),
            ("maybe", false),
        ] {
            env::set_var("BROKER_TEST_FLAG", value);
            assert_eq!(env_flag("BROKER_TEST_FLAG"), expected, "value {value:?}");
        }
        env::remove_var("BROKER_TEST_FLAG");
    }

    #[test]
    fn env_flag_unset_is_false() {
        assert!(!env_flag("BROKER_TEST_FLAG_UNSET"));
    }
}
