//! Scalar field types with validation and normalization.
//!
//! Each type wraps the raw wire representation (a string) and offers:
//!
//! - `validate()` - check the current value without changing it
//! - `normalized()` - return the canonical form or the violated constraint
//!
//! Normalizers are pure: one scalar in, canonical scalar or [`ValueError`]
//! out. They never consult the network or other fields; cross-field rules
//! live in [`crate::models`].
//!
//! Record fields use `Option<T>` for optional scalars, which keeps "absent"
//! distinct from "present but invalid": `None` never fails validation,
//! `Some(raw)` must normalize.

mod account;
mod bic;
mod country;
mod currency;
mod iban;
mod text;
mod vat;

pub use account::AccountNumber;
pub use bic::Bic;
pub use country::CountryCode;
pub use currency::Currency;
pub use iban::Iban;
pub use text::{is_blank, normalize_email, trim_opt};
pub use vat::VatId;

use thiserror::Error;

/// A scalar value that violated its format constraint.
///
/// Carries only the constraint message; the owning record attaches the
/// field path when it aggregates into a
/// [`ValidationError`](crate::error::ValidationError).
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{0}")]
pub struct ValueError(pub String);

impl ValueError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
