//! Field-level encryption and row-level access decisions for multi-tenant records.
//!
//! Two independent pieces compose at a data-access call site:
//!
//! - [`crypto`]: encrypt-then-MAC protection of individual string columns,
//!   with a sentinel prefix so that sealing and opening are idempotent.
//! - [`access`]: a pure decision function that says whether a principal may
//!   read a record it may or may not own.
//!
//! [`masking`] adds per-property masking on top of a granted read.

pub mod access;
pub mod crypto;
pub mod masking;

pub use access::{can_view, filter_visible, AccessDenied, Decision, Permission, Principal, PrincipalId};
pub use crypto::{is_encrypted, CipherError, EncryptedString, FieldCipher, KeyMaterial};
