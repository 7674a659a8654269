//! Bank-account records.
//!
//! [`BankAccount`] is the standalone master-data entity posted to
//! `/masterdata/bank-accounts`. [`PaymentAccount`] is the embedded payment
//! account carried by partners and real-estate objects, where only the
//! IBAN is required.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};
use crate::types::{is_blank, trim_opt, Bic, Currency, Iban};

use super::{Normalize, Validate};

/// A checking account of the client company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BankAccount {
    #[serde(rename = "IBAN")]
    pub iban: Iban,
    #[serde(rename = "BIC")]
    pub bic: Bic,
    pub currency: Currency,
    /// Name of the account holder.
    pub holder: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl BankAccount {
    pub fn new(iban: Iban, bic: Bic, currency: Currency, holder: impl Into<String>) -> Self {
        Self {
            iban,
            bic,
            currency,
            holder: holder.into(),
            account_number: None,
            name: None,
            description: None,
        }
    }
}

impl Validate for BankAccount {
    fn validate(&self) -> ValidationResult {
        let mut err = ValidationError::new();
        if let Err(e) = self.iban.validate() {
            err.push("IBAN", format!("invalid IBAN {:?}: {e}", self.iban.as_str()));
        }
        if let Err(e) = self.bic.validate() {
            err.push("BIC", format!("invalid BIC {:?}: {e}", self.bic.as_str()));
        }
        if !self.currency.is_valid() {
            err.push(
                "Currency",
                format!("invalid currency {:?}", self.currency.as_str()),
            );
        }
        if is_blank(&self.holder) {
            err.push("Holder", "must not be empty");
        }
        err.into_result()
    }
}

impl Normalize for BankAccount {
    /// All scalar fields of a bank account are required, so
    /// `reset_invalid` has nothing to reset here.
    fn normalize(&mut self, _reset_invalid: bool) -> ValidationError {
        let mut err = ValidationError::new();
        match self.iban.normalized() {
            Ok(iban) => self.iban = iban,
            Err(e) => err.push("IBAN", format!("invalid IBAN {:?}: {e}", self.iban.as_str())),
        }
        match self.bic.normalized() {
            Ok(bic) => self.bic = bic,
            Err(e) => err.push("BIC", format!("invalid BIC {:?}: {e}", self.bic.as_str())),
        }
        match self.currency.normalized() {
            Ok(currency) => self.currency = currency,
            Err(e) => err.push(
                "Currency",
                format!("invalid currency {:?}: {e}", self.currency.as_str()),
            ),
        }
        self.holder = self.holder.trim().to_string();
        if self.holder.is_empty() {
            err.push("Holder", "must not be empty");
        }
        trim_opt(&mut self.account_number);
        trim_opt(&mut self.name);
        trim_opt(&mut self.description);
        err
    }
}

/// A payment bank account embedded in partner and real-estate records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PaymentAccount {
    #[serde(rename = "IBAN")]
    pub iban: Iban,
    #[serde(rename = "BIC", skip_serializing_if = "Option::is_none")]
    pub bic: Option<Bic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holder: Option<String>,
}

impl PaymentAccount {
    pub fn new(iban: Iban) -> Self {
        Self {
            iban,
            bic: None,
            currency: None,
            holder: None,
        }
    }

    pub fn with_bic(mut self, bic: Bic) -> Self {
        self.bic = Some(bic);
        self
    }
}

impl Validate for PaymentAccount {
    fn validate(&self) -> ValidationResult {
        let mut err = ValidationError::new();
        if let Err(e) = self.iban.validate() {
            err.push("IBAN", format!("invalid IBAN {:?}: {e}", self.iban.as_str()));
        }
        if let Some(bic) = &self.bic {
            if let Err(e) = bic.validate() {
                err.push("BIC", format!("invalid BIC {:?}: {e}", bic.as_str()));
            }
        }
        if let Some(currency) = &self.currency {
            if !currency.is_valid() {
                err.push(
                    "Currency",
                    format!("invalid currency {:?}", currency.as_str()),
                );
            }
        }
        err.into_result()
    }
}

impl Normalize for PaymentAccount {
    fn normalize(&mut self, reset_invalid: bool) -> ValidationError {
        let mut err = ValidationError::new();
        match self.iban.normalized() {
            Ok(iban) => self.iban = iban,
            Err(e) => err.push("IBAN", format!("invalid IBAN {:?}: {e}", self.iban.as_str())),
        }
        if let Some(bic) = &self.bic {
            match bic.normalized() {
                Ok(bic) => self.bic = Some(bic),
                Err(e) => {
                    err.push("BIC", format!("invalid BIC {:?}: {e}", bic.as_str()));
                    if reset_invalid {
                        self.bic = None;
                    }
                }
            }
        }
        if let Some(currency) = &self.currency {
            match currency.normalized() {
                Ok(currency) => self.currency = Some(currency),
                Err(e) => {
                    err.push(
                        "Currency",
                        format!("invalid currency {:?}: {e}", currency.as_str()),
                    );
                    if reset_invalid {
                        self.currency = None;
                    }
                }
            }
        }
        trim_opt(&mut self.holder);
        err
    }
}

impl fmt::Display for PaymentAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.iban)?;
        if let Some(bic) = &self.bic {
            write!(f, "|{bic}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_account() -> BankAccount {
        BankAccount::new(
            Iban::new("DE89370400440532013000"),
            Bic::new("DEUTDEFF"),
            Currency::new("EUR"),
            "ACME GmbH",
        )
    }

    #[test]
    fn test_valid_account() {
        assert!(valid_account().validate().is_ok());
    }

    #[test]
    fn test_all_failures_reported() {
        let mut acc = valid_account();
        acc.iban = Iban::new("DE89370400440532013001");
        acc.holder = "  ".to_string();
        let err = acc.validate().unwrap_err();
        assert_eq!(err.len(), 2);
    }

    #[test]
    fn test_normalize_canonicalizes() {
        let mut acc = valid_account();
        acc.iban = Iban::new("de89 3704 0044 0532 0130 00");
        acc.bic = Bic::new(" deutdeff ");
        acc.currency = Currency::new("eur");
        acc.holder = " ACME GmbH ".to_string();
        assert!(acc.normalize(false).is_empty());
        assert_eq!(acc.iban.as_str(), "DE89370400440532013000");
        assert_eq!(acc.bic.as_str(), "DEUTDEFF");
        assert_eq!(acc.currency.as_str(), "EUR");
        assert_eq!(acc.holder, "ACME GmbH");
    }

    #[test]
    fn test_payment_account_reset_invalid_bic() {
        let mut acc = PaymentAccount::new(Iban::new("DE89370400440532013000"))
            .with_bic(Bic::new("NOPE"));
        let err = acc.normalize(true);
        assert_eq!(err.len(), 1);
        assert!(acc.bic.is_none());
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_value(valid_account()).unwrap();
        assert!(json.get("IBAN").is_some());
        assert!(json.get("BIC").is_some());
        assert!(json.get("Currency").is_some());
        assert!(json.get("Holder").is_some());
        assert!(json.get("AccountNumber").is_none());
    }
}
