//! Alias → account resolution.
//!
//! Pure lookup over the loaded account config plus an optional default
//! alias from the environment. Performs no I/O.

use crate::config::{AccountInfo, AccountsConfig};
use crate::error::{Error, Result};

/// An account resolved from an alias, ready for trading.
#[derive(Debug, Clone)]
pub struct ResolvedAccount {
    /// The alias that resolved to this account
    pub alias: String,
    /// The configured account metadata
    pub info: AccountInfo,
}

impl ResolvedAccount {
    /// Display label with masked account number.
    pub fn display_label(&self) -> String {
        self.info.display_label()
    }
}

/// Resolves trade targets from aliases, falling back to a configured
/// default when no alias is given.
#[derive(Debug)]
pub struct AccountResolver {
    config: AccountsConfig,
    default_alias: Option<String>,
}

impl AccountResolver {
    /// Build a resolver over the loaded config.
    pub fn new(config: AccountsConfig, default_alias: Option<String>) -> Self {
        Self {
            config,
            default_alias,
        }
    }

    /// Resolve an alias (or the default) to an account.
    ///
    /// An explicit alias that is not in the config fails with the list of
    /// known aliases; a missing alias with no default configured fails
    /// with instructions for setting one.
    pub fn resolve(&self, alias: Option<&str>) -> Result<ResolvedAccount> {
        let alias = match alias {
            Some(a) => a,
            None => self
                .default_alias
                .as_deref()
                .ok_or(Error::MissingAccount)?,
        };

        match self.config.get(alias) {
            Some(info) => Ok(ResolvedAccount {
                alias: alias.to_string(),
                info: info.clone(),
            }),
            None => Err(Error::UnknownAccount(alias.to_string())),
        }
    }
}
