//! # masterload - typed client SDK for the masterdata upsert API
//!
//! Bulk imports of business master-data (bank accounts, general-ledger
//! accounts, partner companies, real-estate objects, tenant objects) and
//! invoice-document uploads follow an upsert logic: records identified by
//! an ID or name are updated with the provided data, everything else is
//! inserted.
//!
//! Using this SDK instead of raw HTTP gives client-side validation of the
//! data before any request is sent: every field is normalized and checked,
//! per-record failures are aggregated with their batch index, and an
//! invalid batch never reaches the network.
//!
//! ## Pipeline
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌─────────────┐     ┌──────────────┐
//! │   Records   │────▶│  Normalize/  │────▶│  POST JSON  │────▶│ ImportResult │
//! │  (typed)    │     │  Validate    │     │  (bearer)   │     │  per record  │
//! └─────────────┘     └──────────────┘     └─────────────┘     └──────────────┘
//! ```
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use masterload::{Client, ImportOptions, Partner};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), masterload::ApiError> {
//!     let client = Client::from_env()?;
//!     let mut partners = vec![Partner::new("ACME GmbH")];
//!     let results = client
//!         .post_partners(&mut partners, &Default::default())
//!         .await?;
//!     for (partner, result) in partners.iter().zip(&results) {
//!         println!("{}: {}", partner.name, result.state);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - error hierarchy (validation, transport, protocol, decode)
//! - [`types`] - scalar field normalizers (IBAN, BIC, country, VAT, ...)
//! - [`models`] - entity records and their validation rules
//! - [`batch`] - per-index batch validation
//! - [`client`] - the HTTP client

pub mod batch;
pub mod client;
pub mod error;
pub mod models;
pub mod types;

// =============================================================================
// Re-exports - Errors
// =============================================================================

pub use error::{
    ApiError, ApiResult, FieldError, UploadError, UploadResult, ValidationError, ValidationResult,
};

// =============================================================================
// Re-exports - Field types
// =============================================================================

pub use types::{AccountNumber, Bic, CountryCode, Currency, Iban, VatId};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    AccountingItem, AmountType, BankAccount, BookingType, GlAccount, ImportBankAccountResult,
    ImportGlAccountResult, ImportObjectResult, ImportPartnerResult, ImportState, Invoice,
    Normalize, ObjectTenantOwner, Partner, PaymentAccount, RealEstateObject,
    RealEstateObjectType, Validate,
};

// =============================================================================
// Re-exports - Batch processing
// =============================================================================

pub use batch::{normalize_batch, validate_batch};

// =============================================================================
// Re-exports - Client
// =============================================================================

pub use client::{
    Client, GlAccountImportOptions, ImportOptions, PartnerImportOptions, UploadFile, BASE_URL,
    SOURCE_TEST_ENDPOINT_NOP,
};
