//! BIC (ISO 9362 Business Identifier Code) validation.
//!
//! Structure: 4-letter institution code, 2-letter ISO country code,
//! 2-character location code, optional 3-character branch code
//! (8 or 11 characters total).

use std::fmt;

use serde::{Deserialize, Serialize};

use super::country::is_alpha2;
use super::ValueError;

/// A BIC as transferred on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bic(String);

impl Bic {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the canonical form (trimmed, uppercase) or the violated
    /// constraint.
    pub fn normalized(&self) -> Result<Bic, ValueError> {
        let canonical = self.0.trim().to_ascii_uppercase();
        check_bic(&canonical)?;
        Ok(Bic(canonical))
    }

    pub fn validate(&self) -> Result<(), ValueError> {
        check_bic(&self.0)
    }
}

impl fmt::Display for Bic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn check_bic(bic: &str) -> Result<(), ValueError> {
    if !bic.is_ascii() {
        return Err(ValueError::new("BIC contains non-ASCII characters"));
    }
    if bic.len() != 8 && bic.len() != 11 {
        return Err(ValueError::new(format!(
            "BIC length {} is neither 8 nor 11",
            bic.len()
        )));
    }
    if !bic[..4].chars().all(|c| c.is_ascii_uppercase()) {
        return Err(ValueError::new("BIC institution code must be 4 letters"));
    }
    let country = &bic[4..6];
    if !is_alpha2(country) {
        return Err(ValueError::new(format!(
            "BIC country code {country:?} is not a known country"
        )));
    }
    if !bic[6..].chars().all(|c| c.is_ascii_alphanumeric() && !c.is_ascii_lowercase()) {
        return Err(ValueError::new(
            "BIC location/branch code must be uppercase alphanumeric",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_bics() {
        assert!(Bic::new("GIBAATWW").validate().is_ok());
        assert!(Bic::new("DEUTDEFF500").validate().is_ok());
    }

    #[test]
    fn test_normalize() {
        assert_eq!(Bic::new(" gibaatww ").normalized().unwrap().as_str(), "GIBAATWW");
    }

    #[test]
    fn test_bad_length() {
        assert!(Bic::new("GIBAATW").validate().is_err());
        assert!(Bic::new("GIBAATWWX").validate().is_err());
    }

    #[test]
    fn test_bad_country() {
        assert!(Bic::new("GIBAZZWW").validate().is_err());
    }

    #[test]
    fn test_digits_in_institution_code() {
        assert!(Bic::new("G1BAATWW").validate().is_err());
    }
}
