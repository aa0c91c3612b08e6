//! Row-level access control.
//!
//! # Module invariants
//!
//! - Ownership is compared on [`PrincipalId`], never on display names.
//! - [`can_view`] is pure and synchronous; audit logging belongs to the caller.
//! - Bulk listings go through [`filter_visible`], the same per-row check.

pub mod guard;
pub mod principal;

pub use guard::{can_view, filter_visible, AccessDenied, Decision, Denial, DenyReason, OwnedRecord, RecordRef};
pub use principal::{Permission, Principal, PrincipalId};
