//! Domain records mirroring the server's JSON schema.
//!
//! This module contains the master-data entities and their validation:
//!
//! - [`BankAccount`] / [`PaymentAccount`] - checking accounts
//! - [`GlAccount`] - general-ledger accounts
//! - [`Partner`] - partner companies
//! - [`RealEstateObject`] / [`ObjectTenantOwner`] - real-estate master-data
//! - [`Invoice`] / [`AccountingItem`] - invoice metadata for uploads
//! - [`ImportState`] and the per-entity import results
//!
//! All entities are transient value objects: constructed by the caller,
//! validated/normalized in memory, submitted once, and discarded after the
//! corresponding import result is received.
//!
//! Partner, GL account, real-estate object, tenant-owner and bank account
//! aggregate every violated field constraint into one
//! [`ValidationError`](crate::error::ValidationError). [`Invoice`] instead
//! stops at the first violated rule; this asymmetry matches the documented
//! server contract and is deliberate.

mod bank_account;
mod gl_account;
mod import;
mod invoice;
mod partner;
mod real_estate;

pub use bank_account::{BankAccount, PaymentAccount};
pub use gl_account::GlAccount;
pub use import::{
    decode_results, ImportBankAccountResult, ImportGlAccountResult, ImportObjectResult,
    ImportPartnerResult, ImportState,
};
pub use invoice::{AccountingItem, AmountType, BookingType, Invoice};
pub use partner::Partner;
pub use real_estate::{ObjectTenantOwner, RealEstateObject, RealEstateObjectType};

use crate::error::{ValidationError, ValidationResult};

/// Read-only record validation.
///
/// Every field check is evaluated independently and the failures are joined
/// into one aggregate, never short-circuited.
pub trait Validate {
    fn validate(&self) -> ValidationResult;
}

/// In-place record normalization.
///
/// Canonicalizes every normalizable field and reports all failures. With
/// `reset_invalid`, an optional field that fails normalization is reset to
/// its unset value (and the error still reported), letting the caller keep
/// processing with best-effort data. Required fields are never reset.
pub trait Normalize {
    fn normalize(&mut self, reset_invalid: bool) -> ValidationError;
}
