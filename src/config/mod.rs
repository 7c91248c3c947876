//! Configuration: the local accounts file and environment settings.

mod accounts;
mod settings;

pub use accounts::{AccountInfo, AccountType, AccountsConfig, TaxStatus};
pub use settings::{
    env_flag, Settings, ACCOUNTS_FILE_ENV, API_BASE_URL_ENV, AUDIT_LOG_ENV, CLIENT_ID_ENV,
    CLIENT_SECRET_ENV, DEFAULT_ACCOUNT_ENV, LIVE_TRADES_ENV, OUTPUT_ENV, TOKEN_FILE_ENV,
};
