//! Data-access layer: the only code that touches stored records.
//!
//! # Responsibilities
//!
//! - Run the row guard before returning any order, single or listed.
//! - Decrypt marked fields only after access is granted.
//! - Encrypt marked fields before they are persisted.
//! - Refuse caller-supplied values that already look like stored ciphertext.
//!
//! # Module invariants
//!
//! - The raw repository lives in a private module. Request handlers reach
//!   records only through [`OrderService`] and [`UserDirectory`], so there is
//!   no unchecked single-record accessor outside this module.
//! - Plaintext field values are never logged.

pub mod orders;
mod repository;
pub mod seed;
pub mod users;

pub use orders::OrderService;
pub use users::UserDirectory;

use common::ServiceError;
use fieldsec::access::RecordRef;
use fieldsec::{is_encrypted, CipherError};
use tracing::error;

/// Map a failure to open a stored field into a caller-facing error.
///
/// Malformed and unauthenticated envelopes produce the same message.
fn open_failure(record: &RecordRef, field: &'static str, err: CipherError) -> ServiceError {
    if err.is_integrity_fault() {
        error!(record = %record, field, "stored field failed integrity check");
        ServiceError::DataIntegrity(format!("{record}: stored value could not be decrypted"))
    } else {
        error!(record = %record, field, error = %err, "field cipher misconfigured");
        ServiceError::Internal("field cipher misconfigured".into())
    }
}

/// Map a failure to seal a field before storage.
fn seal_failure(field: &'static str, err: CipherError) -> ServiceError {
    error!(field, error = %err, "failed to encrypt field");
    ServiceError::Internal("encryption failed".into())
}

/// Reject plaintext input that carries the encrypted-value marker.
///
/// Sealing is idempotent, so such a value would be stored as given and later
/// opened with the service keys on the caller's behalf.
fn ensure_plaintext(field: &'static str, value: &str) -> Result<(), ServiceError> {
    if is_encrypted(Some(value)) {
        return Err(ServiceError::BadRequest(format!(
            "{field} must not start with the encrypted value marker"
        )));
    }
    Ok(())
}
