//! Batch processing of same-kind records before submission.
//!
//! Every record of a batch is checked independently; failures are tagged
//! with the record's index (`Partner[1].Name: ...`) and joined into one
//! aggregate so the caller sees every problem in one pass. A batch with
//! any failing record fails locally, before any network interaction -
//! the server is never called with a batch known to be invalid. Record
//! order is preserved for result reconciliation.

use crate::error::{ValidationError, ValidationResult};
use crate::models::{Normalize, Validate};

/// Validates each record independently, aggregating failures per index.
pub fn validate_batch<T: Validate>(kind: &str, records: &[T]) -> ValidationResult {
    let mut err = ValidationError::new();
    for (i, record) in records.iter().enumerate() {
        if let Err(e) = record.validate() {
            err.merge_prefixed(&format!("{kind}[{i}]"), e);
        }
    }
    err.into_result()
}

/// Normalizes each record in place, aggregating failures per index.
pub fn normalize_batch<T: Normalize>(
    kind: &str,
    records: &mut [T],
    reset_invalid: bool,
) -> ValidationResult {
    let mut err = ValidationError::new();
    for (i, record) in records.iter_mut().enumerate() {
        let record_err = record.normalize(reset_invalid);
        if !record_err.is_empty() {
            err.merge_prefixed(&format!("{kind}[{i}]"), record_err);
        }
    }
    err.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Partner;

    #[test]
    fn test_failures_tagged_with_index() {
        let mut partners = vec![
            Partner::new("First GmbH"),
            Partner::new(""),
            Partner::new("Third GmbH"),
        ];
        let err = normalize_batch("Partner", &mut partners, false).unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err.errors()[0].field, "Partner[1].Name");
    }

    #[test]
    fn test_all_records_checked_not_just_first() {
        let mut partners = vec![Partner::new(""), Partner::new("")];
        let err = normalize_batch("Partner", &mut partners, false).unwrap_err();
        assert_eq!(err.len(), 2);
        assert_eq!(err.errors()[0].field, "Partner[0].Name");
        assert_eq!(err.errors()[1].field, "Partner[1].Name");
    }

    #[test]
    fn test_empty_batch_is_valid() {
        let partners: Vec<Partner> = Vec::new();
        assert!(validate_batch("Partner", &partners).is_ok());
    }
}
