//! Trimmed-string helpers and the email shape check.
//!
//! "Empty after trim" is a distinct condition from "absent": optional
//! record fields are `Option<String>`, and [`trim_opt`] turns values that
//! are empty after trimming into `None`.

use once_cell::sync::Lazy;
use regex::Regex;

use super::ValueError;

static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// True if `s` is empty after trimming.
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Trims an optional string in place; a value that is empty after trimming
/// becomes `None`.
pub fn trim_opt(value: &mut Option<String>) {
    if let Some(s) = value {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            *value = None;
        } else if trimmed.len() != s.len() {
            *value = Some(trimmed.to_string());
        }
    }
}

/// Returns the canonical email form (trimmed, lowercased domain) or the
/// violated constraint.
pub fn normalize_email(raw: &str) -> Result<String, ValueError> {
    let trimmed = raw.trim();
    if !EMAIL.is_match(trimmed) {
        return Err(ValueError::new(format!(
            "{raw:?} is not a valid email address"
        )));
    }
    let at = trimmed.rfind('@').unwrap_or(0);
    Ok(format!(
        "{}{}",
        &trimmed[..at],
        trimmed[at..].to_ascii_lowercase()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank("  \t"));
        assert!(!is_blank(" x "));
    }

    #[test]
    fn test_trim_opt() {
        let mut v = Some("  hello ".to_string());
        trim_opt(&mut v);
        assert_eq!(v.as_deref(), Some("hello"));

        let mut blank = Some("   ".to_string());
        trim_opt(&mut blank);
        assert_eq!(blank, None);

        let mut absent: Option<String> = None;
        trim_opt(&mut absent);
        assert_eq!(absent, None);
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(
            normalize_email(" Jane.Doe@Example.COM ").unwrap(),
            "Jane.Doe@example.com"
        );
        assert!(normalize_email("not-an-email").is_err());
        assert!(normalize_email("a b@example.com").is_err());
    }
}
