//! Per-item import results and their reconciliation with the submitted
//! batch.
//!
//! The server answers every masterdata batch request with a JSON array of
//! one result object per submitted record, in submission order: result `i`
//! belongs to input `i`. [`decode_results`] decodes the array and verifies
//! the positional contract.
//!
//! Result objects follow the additive JSON-compatibility rule of the wire
//! format: unknown object fields are ignored and absent fields decode to
//! their unset value, never to an error. `State` is the exception: it must
//! be present and one of the four enumerated values.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use uuid::Uuid;

use crate::error::ApiError;
use crate::types::AccountNumber;

/// Outcome of importing a single record.
///
/// One terminal transition per submitted record; the SDK never retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ImportState {
    /// The record already exists with identical data.
    Unchanged,
    /// An existing record was updated with new data.
    Updated,
    /// A new record was created.
    Created,
    /// The import failed for this record; see the result's error text.
    Error,
}

impl ImportState {
    pub const ALL: [ImportState; 4] = [
        Self::Unchanged,
        Self::Updated,
        Self::Created,
        Self::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unchanged => "UNCHANGED",
            Self::Updated => "UPDATED",
            Self::Created => "CREATED",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for ImportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of importing one bank account.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImportBankAccountResult {
    /// ID of the bank account that was created or updated.
    #[serde(rename = "ID", default)]
    pub id: Option<Uuid>,
    pub state: ImportState,
    /// Error message from the import in case of state `ERROR`.
    #[serde(default)]
    pub error: String,
}

/// Result of importing one general-ledger account.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImportGlAccountResult {
    /// Account number after server-side normalization (e.g. with the
    /// object number appended if configured).
    #[serde(default)]
    pub normalized_number: Option<AccountNumber>,
    #[serde(rename = "ID", default)]
    pub id: Option<Uuid>,
    /// ID of the real-estate object connected to the account.
    #[serde(rename = "RealEstateObjectID", default)]
    pub real_estate_object_id: Option<Uuid>,
    pub state: ImportState,
    #[serde(default)]
    pub error: String,
}

/// Result of importing one partner company.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImportPartnerResult {
    /// Warnings from server-side normalization of the input.
    #[serde(default)]
    pub input_warnings: Vec<String>,
    /// Raw partner-company data after import.
    #[serde(default)]
    pub partner_company: Option<Box<RawValue>>,
    #[serde(default)]
    pub vendor_account: Option<Box<RawValue>>,
    #[serde(default)]
    pub client_account: Option<Box<RawValue>>,
    pub state: ImportState,
    #[serde(default)]
    pub error: String,
}

/// Result of importing one real-estate object or tenant-owner.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImportObjectResult {
    /// Number of the imported object, echoed by the server.
    #[serde(default)]
    pub number: Option<AccountNumber>,
    #[serde(rename = "ID", default)]
    pub id: Option<Uuid>,
    pub state: ImportState,
    #[serde(default)]
    pub error: String,
}

/// Decodes the server's result array and checks the positional contract:
/// exactly one result per submitted record, in submission order.
pub fn decode_results<T: DeserializeOwned>(body: &str, submitted: usize) -> Result<Vec<T>, ApiError> {
    let results: Vec<T> = serde_json::from_str(body)?;
    if results.len() != submitted {
        return Err(ApiError::ResultCount {
            sent: submitted,
            received: results.len(),
        });
    }
    Ok(results)
}
