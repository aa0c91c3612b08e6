//! [`UserDirectory`]: identity lookup and per-user encrypted attributes.
//!
//! Stands in for an external identity/permission provider. Permissions are
//! taken as given; the directory performs no authorization itself beyond
//! masking properties the caller may not see in full.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use common::protocol::ProfileResponse;
use common::ServiceError;
use fieldsec::access::RecordRef;
use fieldsec::masking::mask_unless;
use fieldsec::{EncryptedString, FieldCipher, Permission, Principal, PrincipalId};
use tracing::info;

use super::{ensure_plaintext, open_failure, seal_failure};

#[derive(Debug, Clone)]
struct UserRecord {
    principal: Principal,
    ssn: Option<EncryptedString>,
}

/// A principal's own profile, with sensitive properties masked as required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub id: PrincipalId,
    pub display_name: String,
    pub ssn: Option<String>,
}

impl From<ProfileView> for ProfileResponse {
    fn from(view: ProfileView) -> Self {
        Self {
            id: view.id.to_string(),
            display_name: view.display_name,
            ssn: view.ssn,
        }
    }
}

/// In-memory user store keyed by stable principal id.
pub struct UserDirectory {
    users: RwLock<HashMap<PrincipalId, UserRecord>>,
    cipher: Arc<FieldCipher>,
}

impl UserDirectory {
    pub fn new(cipher: Arc<FieldCipher>) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            cipher,
        }
    }

    /// Register a new principal, encrypting its SSN before storage.
    ///
    /// # Errors
    ///
    /// [`ServiceError::BadRequest`] if the SSN already carries the encrypted
    /// value marker.
    pub fn register(
        &self,
        display_name: &str,
        permissions: impl IntoIterator<Item = Permission>,
        ssn: Option<&str>,
    ) -> Result<Principal, ServiceError> {
        if let Some(value) = ssn {
            ensure_plaintext("ssn", value)?;
        }
        let ssn = ssn
            .map(|value| EncryptedString::seal(&self.cipher, value))
            .transpose()
            .map_err(|e| seal_failure("ssn", e))?;
        let principal = Principal::new(PrincipalId::new_v4(), display_name, permissions);

        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        users.insert(
            principal.id,
            UserRecord {
                principal: principal.clone(),
                ssn,
            },
        );
        info!(principal = %principal.id, "principal registered");
        Ok(principal)
    }

    /// Resolve a principal by its stable id.
    pub fn resolve(&self, id: PrincipalId) -> Option<Principal> {
        let users = self.users.read().unwrap_or_else(PoisonError::into_inner);
        users.get(&id).map(|u| u.principal.clone())
    }

    /// The caller's own profile. The SSN is decrypted, then masked unless the
    /// caller holds [`Permission::ViewSsn`].
    pub fn profile(&self, principal: &Principal) -> Result<ProfileView, ServiceError> {
        let record = {
            let users = self.users.read().unwrap_or_else(PoisonError::into_inner);
            users
                .get(&principal.id)
                .cloned()
                .ok_or_else(|| ServiceError::NotFound(format!("principal {}", principal.id)))?
        };

        let ssn = record
            .ssn
            .map(|sealed| {
                sealed
                    .open(&self.cipher)
                    .map_err(|e| open_failure(&RecordRef::new("user", principal.id), "ssn", e))
            })
            .transpose()?
            .map(|plain| mask_unless(principal, Permission::ViewSsn, &plain));

        Ok(ProfileView {
            id: record.principal.id,
            display_name: record.principal.display_name,
            ssn,
        })
    }
}
