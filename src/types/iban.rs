//! IBAN (International Bank Account Number) validation.
//!
//! Canonicalization: uppercase, strip all whitespace, verify the
//! country-specific length and the ISO 7064 mod-97 checksum (moving the
//! first four characters to the end and interpreting letters as 10..35
//! must yield a number congruent to 1 mod 97).

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ValueError;

/// Registered IBAN length per ISO 3166-1 alpha-2 country code.
const IBAN_LENGTHS: &[(&str, usize)] = &[
    ("AD", 24), ("AE", 23), ("AL", 28), ("AT", 20), ("AZ", 28), ("BA", 20),
    ("BE", 16), ("BG", 22), ("BH", 22), ("BI", 27), ("BR", 29), ("BY", 28),
    ("CH", 21), ("CR", 22), ("CY", 28), ("CZ", 24), ("DE", 22), ("DJ", 27),
    ("DK", 18), ("DO", 28), ("EE", 20), ("EG", 29), ("ES", 24), ("FI", 18),
    ("FK", 18), ("FO", 18), ("FR", 27), ("GB", 22), ("GE", 22), ("GI", 23),
    ("GL", 18), ("GR", 27), ("GT", 28), ("HR", 21), ("HU", 28), ("IE", 22),
    ("IL", 23), ("IQ", 23), ("IS", 26), ("IT", 27), ("JO", 30), ("KW", 30),
    ("KZ", 20), ("LB", 28), ("LC", 32), ("LI", 21), ("LT", 20), ("LU", 20),
    ("LV", 21), ("LY", 25), ("MC", 27), ("MD", 24), ("ME", 22), ("MK", 19),
    ("MN", 20), ("MR", 27), ("MT", 31), ("MU", 30), ("NI", 28), ("NL", 18),
    ("NO", 15), ("OM", 23), ("PK", 24), ("PL", 28), ("PS", 29), ("PT", 25),
    ("QA", 29), ("RO", 24), ("RS", 22), ("RU", 33), ("SA", 24), ("SC", 31),
    ("SD", 18), ("SE", 24), ("SI", 19), ("SK", 24), ("SM", 27), ("SO", 23),
    ("ST", 25), ("SV", 28), ("TL", 23), ("TN", 24), ("TR", 26), ("UA", 29),
    ("VA", 22), ("VG", 24), ("XK", 20),
];

/// An IBAN as transferred on the wire.
///
/// The wrapper does not enforce validity on construction; call
/// [`Iban::normalized`] or [`Iban::validate`] before trusting the value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Iban(String);

impl Iban {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the canonical form (uppercase, no whitespace) or the
    /// violated constraint.
    pub fn normalized(&self) -> Result<Iban, ValueError> {
        let canonical: String = self
            .0
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_ascii_uppercase())
            .collect();
        check_iban(&canonical)?;
        Ok(Iban(canonical))
    }

    /// Checks the current value without canonicalizing it first.
    pub fn validate(&self) -> Result<(), ValueError> {
        check_iban(&self.0)
    }
}

impl fmt::Display for Iban {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn check_iban(iban: &str) -> Result<(), ValueError> {
    if iban.len() < 15 || iban.len() > 34 {
        return Err(ValueError::new(format!(
            "IBAN length {} outside of 15..=34",
            iban.len()
        )));
    }
    if !iban.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValueError::new("IBAN contains non-alphanumeric characters"));
    }
    let country = &iban[..2];
    if !country.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(ValueError::new(format!(
            "IBAN country prefix {country:?} is not two uppercase letters"
        )));
    }
    if !iban[2..4].chars().all(|c| c.is_ascii_digit()) {
        return Err(ValueError::new("IBAN check digits are not numeric"));
    }
    match IBAN_LENGTHS.iter().find(|(c, _)| *c == country) {
        None => {
            return Err(ValueError::new(format!(
                "unknown IBAN country code {country:?}"
            )))
        }
        Some((_, len)) if *len != iban.len() => {
            return Err(ValueError::new(format!(
                "IBAN length {} does not match expected length {} for {}",
                iban.len(),
                len,
                country
            )))
        }
        Some(_) => {}
    }
    if mod97(iban) != 1 {
        return Err(ValueError::new("IBAN checksum is invalid"));
    }
    Ok(())
}

/// ISO 7064 mod-97 over the rearranged IBAN (first four chars moved to the
/// end, letters read as 10..35).
fn mod97(iban: &str) -> u32 {
    let rearranged = iban[4..].chars().chain(iban[..4].chars());
    let mut rem: u32 = 0;
    for c in rearranged {
        if let Some(d) = c.to_digit(10) {
            rem = (rem * 10 + d) % 97;
        } else {
            let v = c as u32 - 'A' as u32 + 10;
            rem = (rem * 100 + v) % 97;
        }
    }
    rem
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_ibans() {
        for iban in [
            "DE89370400440532013000",
            "AT611904300234573201",
            "GB82WEST12345698765432",
            "FR1420041010050500013M02606",
            "CH9300762011623852957",
        ] {
            assert!(Iban::new(iban).validate().is_ok(), "{iban}");
        }
    }

    #[test]
    fn test_checksum_invalid() {
        // Well formed but with a flipped last digit.
        let err = Iban::new("DE89370400440532013001").validate().unwrap_err();
        assert!(err.to_string().contains("checksum"));
    }

    #[test]
    fn test_normalize_case_and_whitespace() {
        let iban = Iban::new("de89 3704 0044 0532 0130 00");
        assert_eq!(
            iban.normalized().unwrap().as_str(),
            "DE89370400440532013000"
        );
    }

    #[test]
    fn test_wrong_length_for_country() {
        let err = Iban::new("DE8937040044053201300").validate().unwrap_err();
        assert!(err.to_string().contains("length"));
    }

    #[test]
    fn test_unknown_country() {
        let err = Iban::new("ZZ89370400440532013000").validate().unwrap_err();
        assert!(err.to_string().contains("country"));
    }
}
