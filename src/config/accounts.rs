//! Local account configuration: alias → account metadata.
//!
//! Account numbers are never hardcoded; they live in a local, gitignored
//! JSON file keyed by alias. The mapping is loaded once at process start
//! and is immutable for the process lifetime.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::AccountNumber;

/// Broad account classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountType {
    /// Standard taxable brokerage account
    #[serde(rename = "Individual Taxable")]
    IndividualTaxable,
    /// 401(k), traditional IRA, etc.
    #[serde(rename = "Retirement")]
    Retirement,
    /// Inherited traditional IRA
    #[serde(rename = "Inherited IRA")]
    InheritedIra,
    /// Inherited Roth IRA
    #[serde(rename = "Inherited Roth IRA")]
    InheritedRoth,
    /// 529 or similar education account
    #[serde(rename = "Education")]
    Education,
    /// Business brokerage account
    #[serde(rename = "Business")]
    Business,
}

/// Tax treatment of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaxStatus {
    /// Gains taxed in the year realized
    #[serde(rename = "Taxable")]
    Taxable,
    /// Taxed on withdrawal
    #[serde(rename = "Tax-Deferred")]
    TaxDeferred,
    /// Never taxed on qualified withdrawal
    #[serde(rename = "Tax-Free")]
    TaxFree,
}

/// Metadata for one configured account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountInfo {
    /// Plain account number
    pub account_number: AccountNumber,
    /// Owner name
    #[serde(default)]
    pub name: String,
    /// Short display label
    pub label: String,
    /// Account classification
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Tax treatment
    pub tax_status: TaxStatus,
    /// Free-form grouping category (e.g. "personal", "retirement")
    pub category: String,
    /// Free-form notes
    #[serde(default)]
    pub notes: String,
}

impl AccountInfo {
    /// Display label with masked account number, e.g. `Trading (...5678)`.
    pub fn display_label(&self) -> String {
        format!("{} ({})", self.label, self.account_number.masked())
    }
}

#[derive(Debug, Deserialize)]
struct AccountsFile {
    accounts: BTreeMap<String, AccountInfo>,
}

/// The alias → account mapping, loaded once at startup.
///
/// Alias uniqueness is enforced by the map structure; account numbers are
/// validated to be non-empty digit strings at load time.
#[derive(Debug, Clone)]
pub struct AccountsConfig {
    accounts: BTreeMap<String, AccountInfo>,
}

impl AccountsConfig {
    /// Load and validate the accounts file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "cannot read accounts file {}: {e}",
                path.display()
            ))
        })?;
        let file: AccountsFile = serde_json::from_str(&raw).map_err(|e| {
            Error::Config(format!(
                "invalid JSON in accounts file {}: {e}",
                path.display()
            ))
        })?;

        for (alias, info) in &file.accounts {
            let number = info.account_number.as_str();
            if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
                return Err(Error::Config(format!(
                    "account '{alias}' has an invalid account number (must be a non-empty digit string)"
                )));
            }
        }

        debug!(count = file.accounts.len(), "loaded account config");
        Ok(Self {
            accounts: file.accounts,
        })
    }

    /// Build directly from a mapping (used by tests).
    pub fn from_map(accounts: BTreeMap<String, AccountInfo>) -> Self {
        Self { accounts }
    }

    /// Look up account metadata by alias.
    pub fn get(&self, alias: &str) -> Option<&AccountInfo> {
        self.accounts.get(alias)
    }

    /// Look up account metadata by plain account number.
    pub fn get_by_number(&self, number: &AccountNumber) -> Option<(&str, &AccountInfo)> {
        self.accounts
            .iter()
            .find(|(_, info)| &info.account_number == number)
            .map(|(alias, info)| (alias.as_str(), info))
    }

    /// Display label for an account number, falling back to a masked form
    /// for accounts not in the config.
    pub fn label_for_number(&self, number: &AccountNumber) -> String {
        match self.get_by_number(number) {
            Some((_, info)) => info.display_label(),
            None => format!("Account ({})", number.masked()),
        }
    }

    /// Iterate over all configured accounts, alias-ordered.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AccountInfo)> {
        self.accounts.iter().map(|(a, i)| (a.as_str(), i))
    }

    /// Number of configured accounts.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Returns `true` when no accounts are configured.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "accounts": {
            "acct_trading": {
                "account_number": "12345678",
                "name": "Jordan",
                "label": "Trading",
                "type": "Individual Taxable",
                "tax_status": "Taxable",
                "category": "personal"
            },
            "acct_ira": {
                "account_number": "87654321",
                "label": "Roth IRA",
                "type": "Retirement",
                "tax_status": "Tax-Free",
                "category": "retirement"
            }
        }
    }"#;

    fn write_sample(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accounts.json");
        fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn loads_and_resolves_aliases() {
        let (_dir, path) = write_sample(SAMPLE);
        let config = AccountsConfig::load(&path).unwrap();

        assert_eq!(config.len(), 2);
        let info = config.get("acct_trading").unwrap();
        assert_eq!(info.account_number.as_str(), "12345678");
        assert_eq!(info.account_type, AccountType::IndividualTaxable);
        assert_eq!(info.display_label(), "Trading (...5678)");
        assert!(config.get("unknown_alias").is_none());
    }

    #[test]
    fn lookup_by_number() {
        let (_dir, path) = write_sample(SAMPLE);
        let config = AccountsConfig::load(&path).unwrap();

        let number = AccountNumber::new("87654321");
        let (alias, info) = config.get_by_number(&number).unwrap();
        assert_eq!(alias, "acct_ira");
        assert_eq!(info.label, "Roth IRA");

        let unknown = AccountNumber::new("00001111");
        assert_eq!(config.label_for_number(&unknown), "Account (...1111)");
    }

    #[test]
    fn rejects_non_digit_account_number() {
        let bad = SAMPLE.replace("12345678", "12AB5678");
        let (_dir, path) = write_sample(&bad);
        let err = AccountsConfig::load(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn rejects_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = AccountsConfig::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
