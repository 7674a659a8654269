//! General-ledger account records.

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};
use crate::types::AccountNumber;

use super::Validate;

/// A general-ledger account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GlAccount {
    /// Alphanumeric account number.
    pub number: AccountNumber,
    /// Name of the account.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Higher-level description of the account.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Optional real-estate object number connected to the account.
    #[serde(rename = "ObjectNo", skip_serializing_if = "Option::is_none")]
    pub object_no: Option<AccountNumber>,
}

impl GlAccount {
    pub fn new(number: AccountNumber) -> Self {
        Self {
            number,
            name: None,
            category: None,
            object_no: None,
        }
    }
}

impl Validate for GlAccount {
    fn validate(&self) -> ValidationResult {
        let mut err = ValidationError::new();
        if let Err(e) = self.number.validate() {
            err.push(
                "Number",
                format!("invalid number {:?}: {e}", self.number.as_str()),
            );
        }
        if let Some(object_no) = &self.object_no {
            if let Err(e) = object_no.validate() {
                err.push(
                    "ObjectNo",
                    format!("invalid object number {:?}: {e}", object_no.as_str()),
                );
            }
        }
        err.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_account() {
        let mut acc = GlAccount::new(AccountNumber::new("4711"));
        acc.name = Some("Office supplies".to_string());
        assert!(acc.validate().is_ok());
    }

    #[test]
    fn test_absent_object_no_is_not_an_error() {
        assert!(GlAccount::new(AccountNumber::new("4711")).validate().is_ok());
    }

    #[test]
    fn test_both_failures_reported() {
        let mut acc = GlAccount::new(AccountNumber::new(""));
        acc.object_no = Some(AccountNumber::new("no spaces allowed"));
        let err = acc.validate().unwrap_err();
        assert_eq!(err.len(), 2);
        assert_eq!(err.errors()[0].field, "Number");
        assert_eq!(err.errors()[1].field, "ObjectNo");
    }
}
