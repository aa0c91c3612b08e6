//! Row-level read decision.
//!
//! A principal may view a record iff it owns the record or holds the override
//! permission named by the caller. The decision is pure: no logging, no
//! lookups, no errors. Callers turn a [`Decision::Deny`] into an error for
//! single-record reads or drop the row when listing.

use std::fmt;

use thiserror::Error;

use super::principal::{Permission, Principal, PrincipalId};

/// Identifies a record in audit output, e.g. `order #42`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordRef {
    pub kind: &'static str,
    pub id: String,
}

impl RecordRef {
    pub fn new(kind: &'static str, id: impl ToString) -> Self {
        Self {
            kind,
            id: id.to_string(),
        }
    }
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} #{}", self.kind, self.id)
    }
}

/// A record owned by exactly one principal.
pub trait OwnedRecord {
    fn record_ref(&self) -> RecordRef;

    /// Stable identifier of the owning principal.
    fn owner_id(&self) -> PrincipalId;
}

/// One failed check behind a denial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DenyReason {
    NotOwner,
    MissingPermission,
}

/// Audit context for a denied read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denial {
    pub requester: PrincipalId,
    pub record: RecordRef,
    /// The override permission that was checked.
    pub permission: Permission,
    pub reasons: Vec<DenyReason>,
}

impl Denial {
    pub fn has_reason(&self, reason: DenyReason) -> bool {
        self.reasons.contains(&reason)
    }
}

/// Outcome of [`can_view`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(Denial),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Convert into a `Result` for call sites that raise on denial.
    pub fn into_result(self) -> Result<(), AccessDenied> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(denial) => Err(AccessDenied(denial)),
        }
    }
}

/// A denied read, raised by callers that treat denial as an error.
#[derive(Debug, Clone, Error)]
#[error("principal {} is not authorized to access {}", .0.requester, .0.record)]
pub struct AccessDenied(pub Denial);

/// Decide whether `principal` may read `record`.
///
/// Allowed iff `record.owner_id() == principal.id` or `principal` holds
/// `override_permission`.
pub fn can_view<R>(principal: &Principal, record: &R, override_permission: Permission) -> Decision
where
    R: OwnedRecord + ?Sized,
{
    let is_owner = record.owner_id() == principal.id;
    let has_override = principal.has_permission(override_permission);
    if is_owner || has_override {
        return Decision::Allow;
    }

    Decision::Deny(Denial {
        requester: principal.id,
        record: record.record_ref(),
        permission: override_permission,
        reasons: vec![DenyReason::NotOwner, DenyReason::MissingPermission],
    })
}

/// Keep only the records `principal` may view, applying [`can_view`] per row.
///
/// Returns the visible records and the denials for the rows that were dropped.
pub fn filter_visible<R, I>(
    principal: &Principal,
    records: I,
    override_permission: Permission,
) -> (Vec<R>, Vec<Denial>)
where
    R: OwnedRecord,
    I: IntoIterator<Item = R>,
{
    let mut visible = Vec::new();
    let mut denied = Vec::new();
    for record in records {
        match can_view(principal, &record, override_permission) {
            Decision::Allow => visible.push(record),
            Decision::Deny(denial) => denied.push(denial),
        }
    }
    (visible, denied)
}
