//! VAT identification numbers.
//!
//! Normalization strips spaces and dots, uppercases, and validates against
//! the country-specific grammar selected by the 2-letter prefix. Greece
//! uses the "EL" prefix and "EU" identifies MOSS scheme registrations.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::ValueError;

/// Country-specific VAT-ID grammars, keyed by prefix.
/// Patterns cover the part after the 2-letter prefix.
static VAT_GRAMMARS: Lazy<HashMap<&'static str, Regex>> = Lazy::new(|| {
    let patterns: &[(&str, &str)] = &[
        ("AT", r"^U\d{8}$"),
        ("BE", r"^[01]\d{9}$"),
        ("BG", r"^\d{9,10}$"),
        ("CH", r"^E\d{9}$"),
        ("CY", r"^\d{8}[A-Z]$"),
        ("CZ", r"^\d{8,10}$"),
        ("DE", r"^\d{9}$"),
        ("DK", r"^\d{8}$"),
        ("EE", r"^\d{9}$"),
        ("EL", r"^\d{9}$"),
        ("ES", r"^[A-Z0-9]\d{7}[A-Z0-9]$"),
        ("EU", r"^\d{9}$"),
        ("FI", r"^\d{8}$"),
        ("FR", r"^[A-Z0-9]{2}\d{9}$"),
        ("GB", r"^(\d{9}|\d{12}|GD\d{3}|HA\d{3})$"),
        ("HR", r"^\d{11}$"),
        ("HU", r"^\d{8}$"),
        ("IE", r"^(\d{7}[A-W][A-IW]?|\d[A-Z+*]\d{5}[A-W])$"),
        ("IT", r"^\d{11}$"),
        ("LT", r"^(\d{9}|\d{12})$"),
        ("LU", r"^\d{8}$"),
        ("LV", r"^\d{11}$"),
        ("MT", r"^\d{8}$"),
        ("NL", r"^\d{9}B\d{2}$"),
        ("PL", r"^\d{10}$"),
        ("PT", r"^\d{9}$"),
        ("RO", r"^\d{2,10}$"),
        ("SE", r"^\d{12}$"),
        ("SI", r"^\d{8}$"),
        ("SK", r"^\d{10}$"),
    ];
    patterns
        .iter()
        .map(|(cc, p)| (*cc, Regex::new(p).unwrap()))
        .collect()
});

/// A VAT identification number as transferred on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VatId(String);

impl VatId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The 2-letter prefix of the ID ("EL" for Greece, "EU" for MOSS).
    pub fn country_prefix(&self) -> Option<&str> {
        self.0.get(..2)
    }

    /// Returns the canonical form (no spaces/dots, uppercase, grammar
    /// checked) or the violated constraint.
    pub fn normalized(&self) -> Result<VatId, ValueError> {
        let canonical: String = self
            .0
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '.')
            .map(|c| c.to_ascii_uppercase())
            .collect();
        check_vat_id(&canonical)?;
        Ok(VatId(canonical))
    }

    pub fn validate(&self) -> Result<(), ValueError> {
        check_vat_id(&self.0)
    }
}

impl fmt::Display for VatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn check_vat_id(vat_id: &str) -> Result<(), ValueError> {
    if vat_id.len() < 4 || !vat_id.is_ascii() {
        return Err(ValueError::new(format!("malformed VAT ID {vat_id:?}")));
    }
    let prefix = &vat_id[..2];
    if !prefix.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(ValueError::new(format!(
            "VAT ID {vat_id:?} does not start with a country prefix"
        )));
    }
    let Some(grammar) = VAT_GRAMMARS.get(prefix) else {
        return Err(ValueError::new(format!(
            "no VAT-ID grammar for country prefix {prefix:?}"
        )));
    };
    if !grammar.is_match(&vat_id[2..]) {
        return Err(ValueError::new(format!(
            "VAT ID {vat_id:?} does not match the grammar for {prefix}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_vat_ids() {
        for id in ["ATU13585627", "DE111111125", "NL999999999B01", "EL123456789"] {
            assert!(VatId::new(id).validate().is_ok(), "{id}");
        }
    }

    #[test]
    fn test_normalize_strips_separators() {
        let id = VatId::new("at u 1358.5627").normalized().unwrap();
        assert_eq!(id.as_str(), "ATU13585627");
        assert_eq!(id.country_prefix(), Some("AT"));
    }

    #[test]
    fn test_wrong_grammar() {
        assert!(VatId::new("ATU1358562").validate().is_err());
        assert!(VatId::new("DE11111112").validate().is_err());
    }

    #[test]
    fn test_unknown_prefix() {
        let err = VatId::new("XX12345678").validate().unwrap_err();
        assert!(err.to_string().contains("prefix"));
    }
}
