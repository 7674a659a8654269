//! Alphanumeric account numbers (general-ledger accounts, real-estate
//! object numbers, accounting areas, vendor/client partner accounts).
//!
//! Grammar: first character alphanumeric, remainder alphanumeric or one of
//! `. - _ /`, total length 1..=64.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::ValueError;

static ACCOUNT_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._/\-]{0,63}$").unwrap());

/// An alphanumeric account number as transferred on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountNumber(String);

impl AccountNumber {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn validate(&self) -> Result<(), ValueError> {
        if ACCOUNT_NUMBER.is_match(&self.0) {
            Ok(())
        } else {
            Err(ValueError::new(format!(
                "account number {:?} does not match the account-number grammar",
                self.0
            )))
        }
    }

    /// Returns the trimmed value or the violated constraint.
    pub fn normalized(&self) -> Result<AccountNumber, ValueError> {
        let trimmed = AccountNumber(self.0.trim().to_string());
        trimmed.validate()?;
        Ok(trimmed)
    }
}

impl fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_numbers() {
        for n in ["A100", "4711", "0815", "70000/1", "K-2020_3.1"] {
            assert!(AccountNumber::new(n).validate().is_ok(), "{n}");
        }
    }

    #[test]
    fn test_invalid_numbers() {
        assert!(AccountNumber::new("").validate().is_err());
        assert!(AccountNumber::new("-100").validate().is_err());
        assert!(AccountNumber::new("A 100").validate().is_err());
        assert!(AccountNumber::new(&"x".repeat(65)).validate().is_err());
    }

    #[test]
    fn test_normalize_trims() {
        assert_eq!(
            AccountNumber::new(" A100 ").normalized().unwrap().as_str(),
            "A100"
        );
    }
}
