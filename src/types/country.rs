//! ISO 3166-1 alpha-2 country codes.
//!
//! Normalization maps known alternate/legacy codes (vehicle registration
//! letters, "UK", "EL", common alpha-3 codes) to the canonical alpha-2 code
//! and rejects everything outside the assigned set.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ValueError;

/// Assigned ISO 3166-1 alpha-2 codes.
const ALPHA2: &[&str] = &[
    "AD", "AE", "AF", "AG", "AI", "AL", "AM", "AO", "AQ", "AR", "AS", "AT",
    "AU", "AW", "AX", "AZ", "BA", "BB", "BD", "BE", "BF", "BG", "BH", "BI",
    "BJ", "BL", "BM", "BN", "BO", "BQ", "BR", "BS", "BT", "BV", "BW", "BY",
    "BZ", "CA", "CC", "CD", "CF", "CG", "CH", "CI", "CK", "CL", "CM", "CN",
    "CO", "CR", "CU", "CV", "CW", "CX", "CY", "CZ", "DE", "DJ", "DK", "DM",
    "DO", "DZ", "EC", "EE", "EG", "EH", "ER", "ES", "ET", "FI", "FJ", "FK",
    "FM", "FO", "FR", "GA", "GB", "GD", "GE", "GF", "GG", "GH", "GI", "GL",
    "GM", "GN", "GP", "GQ", "GR", "GS", "GT", "GU", "GW", "GY", "HK", "HM",
    "HN", "HR", "HT", "HU", "ID", "IE", "IL", "IM", "IN", "IO", "IQ", "IR",
    "IS", "IT", "JE", "JM", "JO", "JP", "KE", "KG", "KH", "KI", "KM", "KN",
    "KP", "KR", "KW", "KY", "KZ", "LA", "LB", "LC", "LI", "LK", "LR", "LS",
    "LT", "LU", "LV", "LY", "MA", "MC", "MD", "ME", "MF", "MG", "MH", "MK",
    "ML", "MM", "MN", "MO", "MP", "MQ", "MR", "MS", "MT", "MU", "MV", "MW",
    "MX", "MY", "MZ", "NA", "NC", "NE", "NF", "NG", "NI", "NL", "NO", "NP",
    "NR", "NU", "NZ", "OM", "PA", "PE", "PF", "PG", "PH", "PK", "PL", "PM",
    "PN", "PR", "PS", "PT", "PW", "PY", "QA", "RE", "RO", "RS", "RU", "RW",
    "SA", "SB", "SC", "SD", "SE", "SG", "SH", "SI", "SJ", "SK", "SL", "SM",
    "SN", "SO", "SR", "SS", "ST", "SV", "SX", "SY", "SZ", "TC", "TD", "TF",
    "TG", "TH", "TJ", "TK", "TL", "TM", "TN", "TO", "TR", "TT", "TV", "TW",
    "TZ", "UA", "UG", "UM", "US", "UY", "UZ", "VA", "VC", "VE", "VG", "VI",
    "VN", "VU", "WF", "WS", "XK", "YE", "YT", "ZA", "ZM", "ZW",
];

/// Alternate and legacy spellings mapped to their canonical alpha-2 code.
const ALIASES: &[(&str, &str)] = &[
    // Non-ISO two-letter codes in common use.
    ("UK", "GB"),
    ("EL", "GR"),
    // Vehicle registration letters found in legacy exports.
    ("A", "AT"),
    ("B", "BE"),
    ("D", "DE"),
    ("E", "ES"),
    ("F", "FR"),
    ("H", "HU"),
    ("I", "IT"),
    ("L", "LU"),
    ("N", "NO"),
    ("P", "PT"),
    ("S", "SE"),
    // Alpha-3 codes for the countries that show up in master-data feeds.
    ("AUT", "AT"),
    ("BEL", "BE"),
    ("CHE", "CH"),
    ("DEU", "DE"),
    ("ESP", "ES"),
    ("FRA", "FR"),
    ("GBR", "GB"),
    ("GRC", "GR"),
    ("ITA", "IT"),
    ("LIE", "LI"),
    ("LUX", "LU"),
    ("NLD", "NL"),
    ("POL", "PL"),
    ("USA", "US"),
];

/// An ISO 3166-1 alpha-2 country code as transferred on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountryCode(String);

impl CountryCode {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if the current value is a canonical assigned alpha-2 code.
    pub fn is_valid(&self) -> bool {
        ALPHA2.binary_search(&self.0.as_str()).is_ok()
    }

    pub fn validate(&self) -> Result<(), ValueError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(ValueError::new(format!(
                "unknown country code {:?}",
                self.0
            )))
        }
    }

    /// Returns the canonical alpha-2 code, accepting alternate and legacy
    /// spellings, or the violated constraint.
    pub fn normalized(&self) -> Result<CountryCode, ValueError> {
        let upper = self.0.trim().to_ascii_uppercase();
        if ALPHA2.binary_search(&upper.as_str()).is_ok() {
            return Ok(CountryCode(upper));
        }
        if let Some((_, canonical)) = ALIASES.iter().find(|(alias, _)| *alias == upper) {
            return Ok(CountryCode((*canonical).to_string()));
        }
        Err(ValueError::new(format!(
            "unknown country code {:?}",
            self.0
        )))
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// True if `code` is an assigned alpha-2 code. Used by other scalar
/// validators (BIC, VAT ID) that embed a country code.
pub(crate) fn is_alpha2(code: &str) -> bool {
    ALPHA2.binary_search(&code).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha2_is_sorted() {
        let mut sorted = ALPHA2.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, ALPHA2);
    }

    #[test]
    fn test_canonical_codes() {
        assert!(CountryCode::new("DE").is_valid());
        assert_eq!(CountryCode::new("de").normalized().unwrap().as_str(), "DE");
    }

    #[test]
    fn test_aliases() {
        assert_eq!(CountryCode::new("UK").normalized().unwrap().as_str(), "GB");
        assert_eq!(CountryCode::new("EL").normalized().unwrap().as_str(), "GR");
        assert_eq!(CountryCode::new("D").normalized().unwrap().as_str(), "DE");
        assert_eq!(CountryCode::new("AUT").normalized().unwrap().as_str(), "AT");
    }

    #[test]
    fn test_unknown_code_rejected() {
        assert!(CountryCode::new("XX").normalized().is_err());
        assert!(CountryCode::new("GERMANY").normalized().is_err());
    }
}
