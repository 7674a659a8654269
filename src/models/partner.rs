//! Partner-company records.

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};
use crate::types::{is_blank, normalize_email, trim_opt, AccountNumber, Bic, CountryCode, Iban, VatId};

use super::{Normalize, PaymentAccount, Validate};

/// A partner company (vendor or client) of the client company.
///
/// The single `iban`/`bic` pair exists for flat imports (one account per
/// row); [`Partner::normalize`] folds a populated pair into
/// `bank_accounts` as the first entry and clears both fields, so after one
/// normalization pass only the structured list remains.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Partner {
    pub name: String,
    /// Used when merging partners; trimmed, deduplicated and sorted by
    /// normalization.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternative_names: Vec<String>,

    // Main location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(rename = "ZIP", skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<CountryCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(rename = "CompRegNo", skip_serializing_if = "Option::is_none")]
    pub comp_reg_no: Option<String>,
    #[serde(rename = "TaxIDNo", skip_serializing_if = "Option::is_none")]
    pub tax_id_no: Option<String>,
    #[serde(rename = "VATIDNo", skip_serializing_if = "Option::is_none")]
    pub vat_id_no: Option<VatId>,

    // Partner accounts; unset means no partner account is created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_account_number: Option<AccountNumber>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_account_number: Option<AccountNumber>,

    /// A single payment bank account, well suited for flat (CSV-style)
    /// imports. Folded into `bank_accounts` by normalization.
    #[serde(rename = "IBAN", skip_serializing_if = "Option::is_none")]
    pub iban: Option<Iban>,
    #[serde(rename = "BIC", skip_serializing_if = "Option::is_none")]
    pub bic: Option<Bic>,
    /// Structured payment bank accounts, better suited for JSON imports.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bank_accounts: Vec<PaymentAccount>,
}

impl Partner {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Alternative names with whitespace trimmed, empties and duplicates
    /// removed, sorted alphabetically.
    pub fn normalized_alternative_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .alternative_names
            .iter()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

impl Validate for Partner {
    fn validate(&self) -> ValidationResult {
        let mut err = ValidationError::new();
        if is_blank(&self.name) {
            err.push("Name", "must not be empty");
        }
        if let Some(country) = &self.country {
            if let Err(e) = country.validate() {
                err.push("Country", e.to_string());
            }
        }
        if let Some(email) = &self.email {
            if let Err(e) = normalize_email(email) {
                err.push("Email", e.to_string());
            }
        }
        if let Some(vat_id) = &self.vat_id_no {
            if let Err(e) = vat_id.validate() {
                err.push("VATIDNo", e.to_string());
            }
        }
        if let Some(number) = &self.vendor_account_number {
            if let Err(e) = number.validate() {
                err.push("VendorAccountNumber", e.to_string());
            }
        }
        if let Some(number) = &self.client_account_number {
            if let Err(e) = number.validate() {
                err.push("ClientAccountNumber", e.to_string());
            }
        }
        if let Some(iban) = &self.iban {
            if let Err(e) = iban.validate() {
                err.push("IBAN", e.to_string());
            }
        }
        if let Some(bic) = &self.bic {
            if let Err(e) = bic.validate() {
                err.push("BIC", e.to_string());
            }
        }
        for (i, account) in self.bank_accounts.iter().enumerate() {
            if let Err(e) = account.validate() {
                err.merge_prefixed(&format!("BankAccounts[{i}]"), e);
            }
        }
        err.into_result()
    }
}

impl Normalize for Partner {
    fn normalize(&mut self, reset_invalid: bool) -> ValidationError {
        let mut err = ValidationError::new();
        self.name = self.name.trim().to_string();
        if self.name.is_empty() {
            err.push("Name", "must not be empty");
        }
        self.alternative_names = self.normalized_alternative_names();
        trim_opt(&mut self.street);
        trim_opt(&mut self.city);
        trim_opt(&mut self.zip);
        trim_opt(&mut self.phone);
        trim_opt(&mut self.website);
        trim_opt(&mut self.comp_reg_no);
        trim_opt(&mut self.tax_id_no);

        if let Some(country) = &self.country {
            match country.normalized() {
                Ok(country) => self.country = Some(country),
                Err(e) => {
                    err.push("Country", e.to_string());
                    if reset_invalid {
                        self.country = None;
                    }
                }
            }
        }
        if let Some(vat_id) = &self.vat_id_no {
            match vat_id.normalized() {
                Ok(vat_id) => self.vat_id_no = Some(vat_id),
                Err(e) => {
                    err.push("VATIDNo", e.to_string());
                    if reset_invalid {
                        self.vat_id_no = None;
                    }
                }
            }
        }
        if let Some(email) = &self.email {
            match normalize_email(email) {
                Ok(email) => self.email = Some(email),
                Err(e) => {
                    err.push("Email", e.to_string());
                    if reset_invalid {
                        self.email = None;
                    }
                }
            }
        }
        if let Some(number) = &self.vendor_account_number {
            match number.normalized() {
                Ok(number) => self.vendor_account_number = Some(number),
                Err(e) => {
                    err.push("VendorAccountNumber", e.to_string());
                    if reset_invalid {
                        self.vendor_account_number = None;
                    }
                }
            }
        }
        if let Some(number) = &self.client_account_number {
            match number.normalized() {
                Ok(number) => self.client_account_number = Some(number),
                Err(e) => {
                    err.push("ClientAccountNumber", e.to_string());
                    if reset_invalid {
                        self.client_account_number = None;
                    }
                }
            }
        }
        if let Some(iban) = &self.iban {
            match iban.normalized() {
                Ok(iban) => self.iban = Some(iban),
                Err(e) => {
                    err.push("IBAN", e.to_string());
                    if reset_invalid {
                        self.iban = None;
                    }
                }
            }
        }
        if let Some(bic) = &self.bic {
            match bic.normalized() {
                Ok(bic) => self.bic = Some(bic),
                Err(e) => {
                    err.push("BIC", e.to_string());
                    if reset_invalid {
                        self.bic = None;
                    }
                }
            }
        }

        let mut i = 0;
        while i < self.bank_accounts.len() {
            let account_err = self.bank_accounts[i].normalize(reset_invalid);
            if !account_err.is_empty() {
                err.merge_prefixed(&format!("BankAccounts[{i}]"), account_err);
                if reset_invalid {
                    self.bank_accounts.remove(i);
                    continue;
                }
            }
            i += 1;
        }

        // Fold the flat IBAN/BIC pair into the structured list as the
        // first account, then clear the pair. Idempotent: after one pass
        // the pair is empty.
        if let Some(iban) = self.iban.take() {
            let bic = self.bic.take();
            self.bank_accounts.insert(0, PaymentAccount { iban, bic, currency: None, holder: None });
        }

        let mut i = 1;
        while i < self.bank_accounts.len() {
            let duplicate = self.bank_accounts[..i]
                .iter()
                .any(|a| a.iban == self.bank_accounts[i].iban);
            if duplicate {
                err.push(
                    format!("BankAccounts[{i}]"),
                    format!("duplicate bank account {}", self.bank_accounts[i]),
                );
                if reset_invalid {
                    self.bank_accounts.remove(i);
                    continue;
                }
            }
            i += 1;
        }
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_partner_is_valid() {
        let mut partner = Partner::new("ACME GmbH");
        assert!(partner.normalize(false).is_empty());
        assert!(partner.validate().is_ok());
    }

    #[test]
    fn test_empty_name_fails() {
        let mut partner = Partner::new("   ");
        let err = partner.normalize(false);
        assert_eq!(err.len(), 1);
        assert_eq!(err.errors()[0].field, "Name");
    }

    #[test]
    fn test_alternative_names_normalized() {
        let mut partner = Partner::new("ACME GmbH");
        partner.alternative_names = vec![
            " ACME ".to_string(),
            "".to_string(),
            "Acme Corp".to_string(),
            "ACME".to_string(),
        ];
        partner.normalize(false);
        assert_eq!(partner.alternative_names, vec!["ACME", "Acme Corp"]);
    }

    #[test]
    fn test_flat_iban_folded_into_bank_accounts() {
        let mut partner = Partner::new("ACME GmbH");
        partner.iban = Some(Iban::new("de89 3704 0044 0532 0130 00"));
        partner.bic = Some(Bic::new("DEUTDEFF"));
        partner.bank_accounts = vec![PaymentAccount::new(Iban::new("AT611904300234573201"))];

        assert!(partner.normalize(false).is_empty());
        assert_eq!(partner.iban, None);
        assert_eq!(partner.bic, None);
        assert_eq!(partner.bank_accounts.len(), 2);
        assert_eq!(
            partner.bank_accounts[0].iban.as_str(),
            "DE89370400440532013000"
        );
        assert_eq!(partner.bank_accounts[0].bic.as_ref().unwrap().as_str(), "DEUTDEFF");

        // Idempotent in content: a second pass changes nothing.
        let before = partner.clone();
        assert!(partner.normalize(false).is_empty());
        assert_eq!(partner, before);
    }

    #[test]
    fn test_duplicate_iban_flagged_and_dropped() {
        let mut partner = Partner::new("ACME GmbH");
        partner.bank_accounts = vec![
            PaymentAccount::new(Iban::new("DE89370400440532013000")),
            PaymentAccount::new(Iban::new("DE89 3704 0044 0532 0130 00")),
        ];
        let err = partner.normalize(true);
        assert_eq!(err.len(), 1);
        assert!(err.to_string().contains("duplicate"));
        assert_eq!(partner.bank_accounts.len(), 1);
    }

    #[test]
    fn test_reset_invalid_clears_bad_fields() {
        let mut partner = Partner::new("ACME GmbH");
        partner.country = Some(CountryCode::new("NOWHERE"));
        partner.vat_id_no = Some(VatId::new("ATU1"));
        partner.email = Some("not an email".to_string());
        let err = partner.normalize(true);
        assert_eq!(err.len(), 3);
        assert_eq!(partner.country, None);
        assert_eq!(partner.vat_id_no, None);
        assert_eq!(partner.email, None);
    }

    #[test]
    fn test_validate_aggregates_without_mutating() {
        let mut partner = Partner::new("");
        partner.country = Some(CountryCode::new("XX"));
        partner.iban = Some(Iban::new("DE89370400440532013001"));
        let err = partner.validate().unwrap_err();
        assert_eq!(err.len(), 3);
    }
}
