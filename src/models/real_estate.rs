//! Real-estate object and tenant-owner records.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};
use crate::types::{is_blank, trim_opt, AccountNumber, CountryCode};

use super::{Normalize, PaymentAccount, Validate};

/// Kind of a real-estate object.
///
/// Categorizes objects by their legal and management structure; KREIS and
/// MANDANT are virtual groupings used for aggregation only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RealEstateObjectType {
    /// Condominium owners' association (Wohnungseigentümergemeinschaft).
    Weg,
    /// House/building under management (Hausverwaltung).
    Hi,
    /// Sub-object or unit within a larger property.
    Sub,
    /// Virtual grouping object (accounting circle).
    Kreis,
    /// Virtual client-level object.
    Mandant,
    /// Property under Austrian rent control law (Mietrechtsgesetz).
    Mrg,
    /// Rental property management object (Miethausverwaltung).
    Mhv,
    /// Separate property management object (Sondereigentumsverwaltung).
    Sev,
}

impl RealEstateObjectType {
    pub const ALL: [RealEstateObjectType; 8] = [
        Self::Weg,
        Self::Hi,
        Self::Sub,
        Self::Kreis,
        Self::Mandant,
        Self::Mrg,
        Self::Mhv,
        Self::Sev,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weg => "WEG",
            Self::Hi => "HI",
            Self::Sub => "SUB",
            Self::Kreis => "KREIS",
            Self::Mandant => "MANDANT",
            Self::Mrg => "MRG",
            Self::Mhv => "MHV",
            Self::Sev => "SEV",
        }
    }

    /// Parse the canonical wire string.
    pub fn from_str_opt(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == s)
    }

    /// True for virtual grouping kinds (KREIS, MANDANT) that organize data
    /// but do not represent actual real estate.
    pub fn is_virtual(&self) -> bool {
        matches!(self, Self::Kreis | Self::Mandant)
    }
}

impl fmt::Display for RealEstateObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A real-estate property managed in the system, identified by its number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RealEstateObject {
    #[serde(rename = "Type")]
    pub object_type: RealEstateObjectType,
    /// Unique alphanumeric identifier of the object.
    pub number: AccountNumber,
    /// Optional accounting segregation identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accounting_area: Option<AccountNumber>,
    /// Optional user account number associated with the object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_account: Option<AccountNumber>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Primary street address.
    pub street_address: String,
    /// Additional addresses of the same property.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternative_addresses: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// ISO 3166-1 alpha-2 country code; normalization accepts alternate
    /// and legacy spellings.
    pub country: CountryCode,
    /// Payment bank accounts associated with the object.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bank_accounts: Vec<PaymentAccount>,
    pub active: bool,
}

impl RealEstateObject {
    pub fn new(
        object_type: RealEstateObjectType,
        number: AccountNumber,
        street_address: impl Into<String>,
        country: CountryCode,
    ) -> Self {
        Self {
            object_type,
            number,
            accounting_area: None,
            user_account: None,
            description: None,
            street_address: street_address.into(),
            alternative_addresses: Vec::new(),
            zip_code: None,
            city: None,
            country,
            bank_accounts: Vec::new(),
            active: true,
        }
    }
}

impl Validate for RealEstateObject {
    fn validate(&self) -> ValidationResult {
        let mut err = ValidationError::new();
        if let Err(e) = self.number.validate() {
            err.push("Number", e.to_string());
        }
        if let Some(area) = &self.accounting_area {
            if let Err(e) = area.validate() {
                err.push("AccountingArea", e.to_string());
            }
        }
        if let Some(account) = &self.user_account {
            if let Err(e) = account.validate() {
                err.push("UserAccount", e.to_string());
            }
        }
        // Alias spellings are acceptable here; normalization canonicalizes.
        if let Err(e) = self.country.normalized() {
            err.push("Country", e.to_string());
        }
        if is_blank(&self.street_address) {
            err.push("StreetAddress", "must not be empty");
        }
        for (i, account) in self.bank_accounts.iter().enumerate() {
            if let Err(e) = account.validate() {
                err.merge_prefixed(&format!("BankAccounts[{i}]"), e);
            }
        }
        err.into_result()
    }
}

impl Normalize for RealEstateObject {
    fn normalize(&mut self, reset_invalid: bool) -> ValidationError {
        let mut err = ValidationError::new();
        match self.number.normalized() {
            Ok(number) => self.number = number,
            Err(e) => err.push("Number", e.to_string()),
        }
        if let Some(area) = &self.accounting_area {
            match area.normalized() {
                Ok(area) => self.accounting_area = Some(area),
                Err(e) => {
                    err.push("AccountingArea", e.to_string());
                    if reset_invalid {
                        self.accounting_area = None;
                    }
                }
            }
        }
        if let Some(account) = &self.user_account {
            match account.normalized() {
                Ok(account) => self.user_account = Some(account),
                Err(e) => {
                    err.push("UserAccount", e.to_string());
                    if reset_invalid {
                        self.user_account = None;
                    }
                }
            }
        }
        match self.country.normalized() {
            Ok(country) => self.country = country,
            Err(e) => err.push("Country", e.to_string()),
        }
        self.street_address = self.street_address.trim().to_string();
        if self.street_address.is_empty() {
            err.push("StreetAddress", "must not be empty");
        }
        self.alternative_addresses = self
            .alternative_addresses
            .iter()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();
        trim_opt(&mut self.description);
        trim_opt(&mut self.zip_code);
        trim_opt(&mut self.city);
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
        err
    }
}

/// A tenant or owner assigned to a unit of a real-estate object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ObjectTenantOwner {
    #[serde(rename = "ObjectNo")]
    pub object_no: AccountNumber,
    pub tenant_owner_no: i64,
    pub unit_no: i64,
    pub owner_link_no: i64,
    pub owner: String,
}

impl Validate for ObjectTenantOwner {
    fn validate(&self) -> ValidationResult {
        let mut err = ValidationError::new();
        if let Err(e) = self.object_no.validate() {
            err.push("ObjectNo", e.to_string());
        }
        if is_blank(&self.owner) {
            err.push("Owner", "must not be empty");
        }
        err.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Iban;

    fn weg_object() -> RealEstateObject {
        RealEstateObject::new(
            RealEstateObjectType::Weg,
            AccountNumber::new("A100"),
            "Main St 1",
            CountryCode::new("DE"),
        )
    }

    #[test]
    fn test_object_type_wire_strings() {
        for t in RealEstateObjectType::ALL {
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{t}\""));
            assert_eq!(RealEstateObjectType::from_str_opt(t.as_str()), Some(t));
        }
        assert!(serde_json::from_str::<RealEstateObjectType>("\"CASTLE\"").is_err());
    }

    #[test]
    fn test_virtual_types() {
        assert!(RealEstateObjectType::Kreis.is_virtual());
        assert!(RealEstateObjectType::Mandant.is_virtual());
        assert!(!RealEstateObjectType::Weg.is_virtual());
    }

    #[test]
    fn test_valid_object() {
        assert!(weg_object().validate().is_ok());
    }

    #[test]
    fn test_country_alias_normalized() {
        let mut obj = weg_object();
        obj.country = CountryCode::new("D");
        assert!(obj.validate().is_ok());
        assert!(obj.normalize(false).is_empty());
        assert_eq!(obj.country.as_str(), "DE");
    }

    #[test]
    fn test_all_failures_aggregated() {
        let mut obj = weg_object();
        obj.number = AccountNumber::new("");
        obj.street_address = " ".to_string();
        obj.country = CountryCode::new("ATLANTIS");
        obj.bank_accounts = vec![PaymentAccount::new(Iban::new("bad"))];
        let err = obj.validate().unwrap_err();
        assert_eq!(err.len(), 4);
    }

    #[test]
    fn test_tenant_owner() {
        let mut owner = ObjectTenantOwner {
            object_no: AccountNumber::new("A100"),
            tenant_owner_no: 12,
            unit_no: 3,
            owner_link_no: 7,
            owner: "Jane Doe".to_string(),
        };
        assert!(owner.validate().is_ok());
        owner.owner = String::new();
        assert_eq!(owner.validate().unwrap_err().len(), 1);
    }
}
