//! Error types for the masterload SDK.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`FieldError`] - a single violated field constraint
//! - [`ValidationError`] - all field/record constraints violated in one pass
//! - [`ApiError`] - top-level errors of the masterdata batch endpoints
//! - [`UploadError`] - errors of the document upload endpoint
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.
//!
//! The taxonomy mirrors the call lifecycle: local validation failures abort
//! before any network interaction; once a request is sent the only failure
//! modes are transport, protocol (non-200) and decode errors. Per-item
//! server errors inside a 200 response are data, not call failures.

use std::fmt;

use thiserror::Error;

// =============================================================================
// Field-Level Errors
// =============================================================================

/// A single violated field constraint.
///
/// `field` is a path into the offending record, e.g. `iban`,
/// `bank_accounts[2].currency` or `Partner[1].name`.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    /// Path of the offending field.
    pub field: String,
    /// What constraint was violated.
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns a copy with `prefix` prepended to the field path.
    pub fn prefixed(&self, prefix: &str) -> Self {
        Self {
            field: format!("{prefix}.{}", self.field),
            message: self.message.clone(),
        }
    }
}

// =============================================================================
// Aggregated Validation Errors
// =============================================================================

/// All field/record constraints violated in one validation pass.
///
/// Field checks are evaluated independently and joined here rather than
/// short-circuited, so a caller sees every problem at once. Nested
/// validators contribute via [`ValidationError::merge_prefixed`] without
/// losing the identity of the failing sub-check.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationError {
    errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Record a violated constraint.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    pub fn push_error(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    /// Absorb another aggregate, prefixing each field path.
    pub fn merge_prefixed(&mut self, prefix: &str, other: ValidationError) {
        self.errors
            .extend(other.errors.iter().map(|e| e.prefixed(prefix)));
    }

    /// `Ok(())` if no constraint was violated, `Err(self)` otherwise.
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

impl From<FieldError> for ValidationError {
    fn from(error: FieldError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl FromIterator<FieldError> for ValidationError {
    fn from_iter<I: IntoIterator<Item = FieldError>>(iter: I) -> Self {
        Self {
            errors: iter.into_iter().collect(),
        }
    }
}

// =============================================================================
// API Errors (top-level, masterdata batch endpoints)
// =============================================================================

/// Top-level errors of the masterdata batch endpoints.
///
/// Local validation aborts the call before any request is sent. After the
/// request is sent, transport, protocol and decode failures are kept
/// distinct so callers can tell an unreachable server from a misbehaving
/// one.
#[derive(Debug, Error)]
pub enum ApiError {
    /// One or more records failed client-side validation; nothing was sent.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The request could not be sent or the response could not be read.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-200 status code.
    #[error("unexpected status code {status}: {text}")]
    Status { status: u16, text: String },

    /// The response body is not valid JSON or not the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The result array length does not match the submitted batch length.
    #[error("server returned {received} results for {sent} submitted records")]
    ResultCount { sent: usize, received: usize },

    /// Missing MASTERLOAD_API_KEY environment variable.
    #[error("missing MASTERLOAD_API_KEY environment variable")]
    MissingApiKey,
}

// =============================================================================
// Upload Errors
// =============================================================================

/// Errors of the document upload endpoint.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The attached invoice failed validation; nothing was sent.
    #[error("invalid invoice: {0}")]
    InvalidInvoice(#[from] FieldError),

    /// The request could not be sent or the response could not be read.
    #[error("upload request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The document already exists (HTTP 409).
    #[error("duplicate document: {0}")]
    Duplicate(String),

    /// The server answered with a non-200, non-409 status code.
    #[error("unexpected status code {status}: {text}")]
    Status { status: u16, text: String },

    /// The 200 response body is not a document UUID.
    #[error("invalid document id in response: {0}")]
    InvalidDocumentId(String),

    /// Failed to read a file that should be uploaded.
    #[error("failed to read upload file: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for validation.
pub type ValidationResult = Result<(), ValidationError>;

/// Result type for masterdata API calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type for document uploads.
pub type UploadResult<T> = Result<T, UploadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_display() {
        let err = FieldError::new("iban", "bad checksum");
        assert_eq!(err.to_string(), "iban: bad checksum");
        assert_eq!(
            err.prefixed("Partner[3]").to_string(),
            "Partner[3].iban: bad checksum"
        );
    }

    #[test]
    fn test_validation_error_joins_all() {
        let mut err = ValidationError::new();
        err.push("name", "must not be empty");
        err.push("country", "unknown code");
        assert_eq!(err.len(), 2);
        let msg = err.to_string();
        assert!(msg.contains("name: must not be empty"));
        assert!(msg.contains("country: unknown code"));
    }

    #[test]
    fn test_merge_prefixed_keeps_subcheck_identity() {
        let mut inner = ValidationError::new();
        inner.push("iban", "bad checksum");
        let mut outer = ValidationError::new();
        outer.merge_prefixed("bank_accounts[0]", inner);
        assert_eq!(outer.errors()[0].field, "bank_accounts[0].iban");
    }

    #[test]
    fn test_into_result() {
        assert!(ValidationError::new().into_result().is_ok());
        let mut err = ValidationError::new();
        err.push("x", "y");
        assert!(err.into_result().is_err());
    }

    #[test]
    fn test_error_conversion_chain() {
        let mut v = ValidationError::new();
        v.push("name", "must not be empty");
        let api: ApiError = v.into();
        assert!(api.to_string().contains("must not be empty"));
    }
}
